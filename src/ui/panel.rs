// src/ui/panel.rs
//! The viewer overlay panel.
//!
//! One small fixed window: the loading status line while assets come in and
//! the theme toggle once the scene is up.

use crate::gfx::scene::loader::LoadStatus;

/// Inputs the panel renders from.
pub struct PanelState<'a> {
    pub light_mode: bool,
    pub status: &'a LoadStatus,
}

/// What the user did with the panel this frame.
#[derive(Default)]
pub struct PanelResponse {
    pub theme_toggled: bool,
}

/// Draws the overlay and reports interactions.
pub fn draw_overlay(ui: &imgui::Ui, state: PanelState) -> PanelResponse {
    let mut response = PanelResponse::default();

    ui.window("Workbench")
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .size([220.0, 0.0], imgui::Condition::FirstUseEver)
        .resizable(false)
        .collapsible(false)
        .build(|| {
            match state.status {
                LoadStatus::Loading { loaded, total } => {
                    let progress = *loaded as f32 / (*total).max(1) as f32;
                    ui.text(format!(
                        "Loading: {}% {}/{}",
                        (progress * 100.0).round(),
                        loaded,
                        total
                    ));
                }
                LoadStatus::Ready => {
                    let label = if state.light_mode {
                        "Switch to dark theme"
                    } else {
                        "Switch to light theme"
                    };
                    if ui.button(label) {
                        response.theme_toggled = true;
                    }
                }
                LoadStatus::Failed(message) => {
                    ui.text_wrapped(format!("Error loading assets: {message}"));
                }
            }

            ui.separator();
            ui.text("Drag to orbit, scroll to zoom");
            ui.text("Click the book or drawer");
        });

    response
}
