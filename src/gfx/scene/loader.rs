//! Workbench asset loading.
//!
//! Loads the scene model into named [`Object`]s and registers the fixed
//! material set under its symbolic names. Progress is reported item by item
//! through a caller-supplied callback so the overlay can show a loading line;
//! a failed load is a typed error, not a panic — the viewer stays up with an
//! empty scene.

use log::{error, info};
use thiserror::Error;

use crate::gfx::resources::material::workbench_materials;

use super::object::{Mesh, Object};
use super::scene::Scene;

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("failed to load scene model: {0}")]
    Model(#[from] tobj::LoadError),
}

/// Load state surfaced on the viewer overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading { loaded: usize, total: usize },
    Ready,
    Failed(String),
}

/// Loads the workbench scene into `scene`.
///
/// Registers the material set first (one progress item each), then reads the
/// model file and appends one named object per model entry. Meshes without
/// normals get computed ones. The caller classifies the objects afterwards,
/// exactly once.
pub fn load_workbench(
    scene: &mut Scene,
    model_path: &str,
    progress: &mut dyn FnMut(usize, usize),
) -> Result<(), SceneLoadError> {
    let materials = workbench_materials();
    let total = materials.len() + 1;
    let mut loaded = 0;

    for material in materials {
        scene.material_manager.add_material(material);
        loaded += 1;
        progress(loaded, total);
    }

    let (models, _) = tobj::load_obj(
        model_path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .inspect_err(|err| error!("could not load {model_path}: {err}"))?;

    for model in &models {
        let mesh = &model.mesh;

        let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
            mesh.normals.clone()
        } else {
            Mesh::calculate_face_normals(&mesh.positions, &mesh.indices)
        };

        let mut object = Object::new(vec![Mesh::new(
            mesh.positions.clone(),
            normals,
            mesh.indices.clone(),
        )]);
        object.set_name(model.name.clone());
        scene.objects.push(object);
    }

    loaded += 1;
    progress(loaded, total);
    info!("loaded {} objects from {model_path}", models.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{
        camera_controller::CameraController, camera_utils::CameraManager,
        orbit_camera::OrbitCamera,
    };
    use cgmath::{Vector3, Zero};

    fn empty_scene() -> Scene {
        let camera = OrbitCamera::new(5.0, 0.4, 0.2, Vector3::zero(), 1.0);
        Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)))
    }

    #[test]
    fn missing_model_reports_failure_after_material_progress() {
        let mut scene = empty_scene();
        let mut reports = Vec::new();

        let result = load_workbench(&mut scene, "does/not/exist.obj", &mut |loaded, total| {
            reports.push((loaded, total))
        });

        assert!(result.is_err());
        // Every registered material reported, the model item never did.
        assert!(!reports.is_empty());
        let (_, total) = reports[0];
        assert_eq!(reports.len(), total - 1);
        assert!(reports.iter().all(|(loaded, t)| loaded < t));
        // The scene keeps its materials and stays otherwise empty.
        assert!(scene.objects.is_empty());
        assert!(scene.material_manager.get_material(&"glass".to_string()).is_some());
    }
}
