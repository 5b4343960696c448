//! Scene management: named objects, the scene container, vertex data and
//! asset loading.
//!
//! Objects carry the author-assigned names the interaction layer classifies;
//! the scene owns them together with the camera and the central material
//! manager, and syncs transforms and GPU resources each frame.

pub mod loader;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use loader::{load_workbench, LoadStatus, SceneLoadError};
pub use object::{DrawObject, Object};
pub use scene::Scene;
pub use vertex::Vertex3D;
