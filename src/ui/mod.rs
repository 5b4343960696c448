//! # User Interface Module
//!
//! Dear ImGui overlay for the viewer: input capture that keeps clicks from
//! leaking into camera controls and pick dispatch, plus the single panel
//! with the loading status and the theme toggle.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`panel`] - the viewer overlay panel

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{draw_overlay, PanelResponse, PanelState};
