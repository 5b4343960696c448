//! # Graphics Module
//!
//! Everything GPU-facing in the workbench viewer: the orbit camera, the
//! forward renderer, scene and material management, and pointer picking.
//!
//! - **Camera System** ([`camera`]) - Orbit camera constrained to the
//!   authored viewing window
//! - **Rendering** ([`rendering`]) - Unlit forward passes for the baked look
//! - **Scene Management** ([`scene`]) - Named objects, asset loading
//! - **Resource Management** ([`resources`]) - Materials and GPU buffers
//! - **Picking** ([`picking`]) - Pointer rays against the pickable set

pub mod camera;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use picking::ScenePicker;
pub use rendering::render_engine::RenderEngine;
