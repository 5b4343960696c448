use cgmath::Vector3;
use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::CameraManager,
    resources::material::{Material, MaterialManager},
};
use crate::interaction::classify::Classification;
use crate::interaction::movable::{Movable, MovableTarget};

use super::object::Object;

/// Main scene containing objects, materials, and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
}

impl Scene {
    /// Creates a new scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
        }
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    /// Assigns the classified material ids to the objects.
    ///
    /// Objects classified as default keep the manager's fallback material;
    /// priority between kinds was already resolved by the classifier.
    pub fn apply_classification(&mut self, classification: &Classification) {
        for (object, assignment) in self.objects.iter_mut().zip(&classification.assignments) {
            if let Some(material_id) = assignment.material.material_id() {
                object.set_material(material_id);
            }
        }
    }

    /// Applies an animated position to the objects a movable drives.
    ///
    /// The movable reports absolute positions; objects store the difference
    /// to the movable's rest position, so a composite group moves as a whole.
    pub fn apply_movable_position(&mut self, movable: &Movable, position: Vector3<f32>) {
        let offset = position - movable.initial_position;
        match &movable.target {
            MovableTarget::Single(index) => {
                if let Some(object) = self.objects.get_mut(*index) {
                    object.offset = offset;
                }
            }
            MovableTarget::Group(members) => {
                for &index in members {
                    if let Some(object) = self.objects.get_mut(index) {
                        object.offset = offset;
                    }
                }
            }
        }
    }

    /// Initializes GPU resources for all objects and materials
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(&mut self, device: &Device, queue: &wgpu::Queue) {
        for object in self.objects.iter_mut() {
            object.init_gpu_resources(device);
        }

        self.material_manager
            .update_all_gpu_resources(device, queue);
    }

    /// Updates all object transforms and syncs to GPU
    pub fn update_all_transforms(&mut self, queue: &wgpu::Queue) {
        for object in &mut self.objects {
            if object.gpu_resources.is_some() {
                object.update_transform(queue);
            }
        }
    }

    /// Gets material for rendering an object
    ///
    /// Returns the material assigned to the object, or the default material
    /// if no material is assigned or the assigned material doesn't exist.
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.material_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{camera_controller::CameraController, orbit_camera::OrbitCamera};
    use crate::interaction::classify::classify;
    use crate::interaction::movable::PropKind;
    use approx::assert_relative_eq;
    use cgmath::Zero;

    fn test_scene(names: &[&str]) -> Scene {
        let camera = OrbitCamera::new(5.0, 0.4, 0.2, Vector3::zero(), 1.0);
        let controller = CameraController::new(0.005, 0.1);
        let mut scene = Scene::new(CameraManager::new(camera, controller));
        for name in names {
            let mut object = Object::new(Vec::new());
            object.set_name(*name);
            scene.objects.push(object);
        }
        scene
    }

    #[test]
    fn classification_materials_are_applied() {
        let mut scene = test_scene(&["glass_pane", "bench_one", "anvil"]);
        let classification = classify(&scene.objects);
        scene.apply_classification(&classification);

        assert_eq!(
            scene.objects[0].material_id().map(String::as_str),
            Some("glass")
        );
        assert_eq!(
            scene.objects[1].material_id().map(String::as_str),
            Some("baked_one")
        );
        assert!(scene.objects[2].material_id().is_none());
    }

    #[test]
    fn group_members_share_the_animated_offset() {
        let mut scene = test_scene(&["drawer_target_6", "drawer_target_7", "bench_one"]);
        let classification = classify(&scene.objects);
        let drawer = classification.movable(PropKind::Drawer).unwrap();

        scene.apply_movable_position(drawer, Vector3::new(0.0, 0.0, -0.39));

        assert_relative_eq!(scene.objects[0].offset.z, -0.39);
        assert_relative_eq!(scene.objects[1].offset.z, -0.39);
        assert_relative_eq!(scene.objects[2].offset.z, 0.0);
    }
}
