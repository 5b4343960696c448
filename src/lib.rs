// src/lib.rs
//! Workbench Scene Viewer
//!
//! An interactive viewer for a baked 3D workbench scene, built on wgpu and
//! winit. Mesh names are classified once into materials and behavior roles;
//! clicking the book or the drawer runs a guarded two-state animation, the
//! thread cycles on its own, and a theme toggle flips the window light.

pub mod app;
pub mod gfx;
pub mod interaction;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::WorkbenchApp;

/// Creates a default workbench viewer instance
pub fn default() -> WorkbenchApp {
    pollster::block_on(WorkbenchApp::new())
}
