//! # Pointer picking
//!
//! Converts a pointer position in normalized device coordinates into a world
//! space ray and intersects it with the scene's pickable objects. Only the
//! classified pickable set is ever tested; everything else in the scene is
//! transparent to the pointer.
//!
//! 1. **NDC to Ray**: unproject the near and far plane points through the
//!    inverse view-projection matrix
//! 2. **Ray-Object Intersection**: test the ray against object bounding boxes
//! 3. **Selection**: return the closest intersected object, or none

use crate::gfx::{camera::orbit_camera::OrbitCamera, scene::object::Object};
use cgmath::{
    ElementWise, EuclideanSpace, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero,
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        if vertices.is_empty() {
            return Self::new(Vector3::zero(), Vector3::zero());
        }

        let mut min = Vector3::new(vertices[0][0], vertices[0][1], vertices[0][2]);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::new(vertex[0], vertex[1], vertex[2]);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut transformed_corners = Vec::with_capacity(8);
        for corner in &corners {
            let homogeneous = Vector4::new(corner.x, corner.y, corner.z, 1.0);
            let transformed = matrix * homogeneous;
            transformed_corners.push([
                transformed.x / transformed.w,
                transformed.y / transformed.w,
                transformed.z / transformed.w,
            ]);
        }

        Self::from_vertices(&transformed_corners)
    }
}

/// Result of a picking operation
#[derive(Debug, Clone)]
pub struct PickResult {
    /// Index of the picked object in the scene
    pub object_index: usize,
    /// Distance from the ray origin to the intersection point
    pub distance: f32,
    /// World space intersection point
    pub intersection_point: Vector3<f32>,
}

/// Picks scene objects from pointer rays.
///
/// Local-space bounding boxes are cached per object; mesh geometry never
/// changes after load, only transforms do, so the cache stays valid across
/// prop animations.
pub struct ScenePicker {
    cached_aabbs: Vec<Option<Aabb>>,
}

impl ScenePicker {
    pub fn new() -> Self {
        Self {
            cached_aabbs: Vec::new(),
        }
    }

    /// Builds a world-space ray through a pointer position given in
    /// normalized device coordinates ([-1, 1] on both axes, y up).
    pub fn ndc_to_ray(ndc: (f32, f32), camera: &OrbitCamera) -> Ray {
        let (ndc_x, ndc_y) = ndc;

        let eye = cgmath::Point3::from_vec(camera.eye);
        let target = cgmath::Point3::from_vec(camera.target);
        let view_matrix = Matrix4::look_at_rh(eye, target, camera.up);
        let proj_matrix = cgmath::perspective(camera.fovy, camera.aspect, camera.znear, camera.zfar);

        let view_proj_matrix = proj_matrix * view_matrix;
        let inv_view_proj = view_proj_matrix.invert().unwrap_or(Matrix4::from_scale(1.0));

        // Unproject the pointer on the near and far planes.
        let near_point = Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_point = Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let world_near = inv_view_proj * near_point;
        let world_far = inv_view_proj * far_point;

        let near_3d = Vector3::new(
            world_near.x / world_near.w,
            world_near.y / world_near.w,
            world_near.z / world_near.w,
        );
        let far_3d = Vector3::new(
            world_far.x / world_far.w,
            world_far.y / world_far.w,
            world_far.z / world_far.w,
        );

        Ray::new(near_3d, far_3d - near_3d)
    }

    /// Intersects a pointer ray with the candidate objects and returns the
    /// nearest hit, or `None` when nothing pickable is under the pointer.
    ///
    /// `candidates` are indices into `objects`; anything not listed is never
    /// tested.
    pub fn pick(
        &mut self,
        ndc: (f32, f32),
        camera: &OrbitCamera,
        objects: &[Object],
        candidates: &[usize],
    ) -> Option<PickResult> {
        let ray = Self::ndc_to_ray(ndc, camera);

        while self.cached_aabbs.len() < objects.len() {
            self.cached_aabbs.push(None);
        }

        let mut closest_result: Option<PickResult> = None;

        for &index in candidates {
            let Some(object) = objects.get(index) else {
                continue;
            };

            let aabb = match self.cached_aabbs[index] {
                Some(cached) => cached,
                None => match Self::compute_object_aabb(object) {
                    Some(aabb) => {
                        self.cached_aabbs[index] = Some(aabb);
                        aabb
                    }
                    None => continue,
                },
            };

            let world_aabb = aabb.transform(&object.world_transform());

            if let Some(distance) = world_aabb.intersect_ray(&ray) {
                let intersection_point = ray.point_at(distance);

                if closest_result
                    .as_ref()
                    .map_or(true, |result| distance < result.distance)
                {
                    closest_result = Some(PickResult {
                        object_index: index,
                        distance,
                        intersection_point,
                    });
                }
            }
        }

        closest_result
    }

    /// Compute the local-space AABB for an object from its mesh data.
    ///
    /// Objects without geometry have no bounds and cannot be picked.
    fn compute_object_aabb(object: &Object) -> Option<Aabb> {
        let mut all_vertices = Vec::new();

        for mesh in &object.meshes {
            for vertex in mesh.vertices() {
                all_vertices.push(vertex.position);
            }
        }

        if all_vertices.is_empty() {
            None
        } else {
            Some(Aabb::from_vertices(&all_vertices))
        }
    }

    /// Invalidate cached AABBs (call if scene geometry is reloaded)
    pub fn invalidate_cache(&mut self) {
        self.cached_aabbs.clear();
    }
}

impl Default for ScenePicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::object::Mesh;

    fn unit_cube_object(name: &str, translation: Vector3<f32>) -> Object {
        // Two opposing corner triangles are enough to span the unit AABB.
        let positions = vec![
            -0.5, -0.5, -0.5, //
            0.5, 0.5, 0.5, //
            0.5, -0.5, -0.5, //
        ];
        let normals = vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        let indices = vec![0, 1, 2];
        let mut object = Object::new(vec![Mesh::new(positions, normals, indices)]);
        object.set_name(name);
        object.translation = translation;
        object
    }

    fn front_camera() -> OrbitCamera {
        // Eye at (0, 0, 5) looking down -z.
        OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0)
    }

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = Aabb::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray).is_some());

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn centered_ndc_ray_points_at_the_target() {
        let camera = front_camera();
        let ray = ScenePicker::ndc_to_ray((0.0, 0.0), &camera);

        assert!(ray.direction.z < -0.99);
        assert!(ray.direction.x.abs() < 1e-3);
        assert!(ray.direction.y.abs() < 1e-3);
    }

    #[test]
    fn picks_the_candidate_under_the_pointer() {
        let objects = vec![unit_cube_object("drawer_target_6", Vector3::zero())];
        let mut picker = ScenePicker::new();

        let hit = picker.pick((0.0, 0.0), &front_camera(), &objects, &[0]);
        let hit = hit.expect("cube under the pointer");
        assert_eq!(hit.object_index, 0);
        assert!(hit.distance > 0.0);
    }

    #[test]
    fn empty_space_yields_no_hit() {
        let objects = vec![unit_cube_object("drawer_target_6", Vector3::zero())];
        let mut picker = ScenePicker::new();

        // Pointer in the far corner of the viewport.
        assert!(picker
            .pick((0.95, 0.95), &front_camera(), &objects, &[0])
            .is_none());
    }

    #[test]
    fn non_candidates_are_never_hit() {
        let objects = vec![unit_cube_object("bench_one", Vector3::zero())];
        let mut picker = ScenePicker::new();

        // Geometry sits under the pointer but is not in the pickable set.
        assert!(picker
            .pick((0.0, 0.0), &front_camera(), &objects, &[])
            .is_none());
    }

    #[test]
    fn nearest_of_two_candidates_wins() {
        let objects = vec![
            unit_cube_object("target_far", Vector3::new(0.0, 0.0, -2.0)),
            unit_cube_object("target_near", Vector3::new(0.0, 0.0, 1.0)),
        ];
        let mut picker = ScenePicker::new();

        let hit = picker
            .pick((0.0, 0.0), &front_camera(), &objects, &[0, 1])
            .expect("both cubes under the pointer");
        assert_eq!(hit.object_index, 1);
    }

    #[test]
    fn click_dispatch_round_trip_on_the_book() {
        use crate::interaction::classify::{classify, Role};
        use crate::interaction::movable::PropKind;

        let objects = vec![unit_cube_object("book_target_1", Vector3::zero())];
        let mut classification = classify(&objects);
        let mut picker = ScenePicker::new();
        let camera = front_camera();

        // First click: pick the book and trigger its movable.
        let hit = picker
            .pick((0.0, 0.0), &camera, &objects, &classification.pickables)
            .expect("book under the pointer");
        assert!(classification.assignments[hit.object_index].has_role(Role::Book));
        classification
            .movable_mut(PropKind::Book)
            .unwrap()
            .trigger();

        // A second click before completion is rejected by the guard.
        let book = classification.movable_mut(PropKind::Book).unwrap();
        assert!(book.is_animating());
        book.trigger();

        for _ in 0..64 {
            book.update(0.016);
        }
        assert!(!book.is_animating());
        assert!((book.position().z - 0.3).abs() < 1e-5);

        // Clicking after completion moves it back.
        book.trigger();
        for _ in 0..64 {
            book.update(0.016);
        }
        assert!((book.position().z).abs() < 1e-5);
    }

    #[test]
    fn animated_offset_moves_the_pick_bounds() {
        let mut objects = vec![unit_cube_object("drawer_target_6", Vector3::zero())];
        let mut picker = ScenePicker::new();
        let camera = front_camera();

        assert!(picker.pick((0.0, 0.0), &camera, &objects, &[0]).is_some());

        // Slide the cube far off axis; the cached local bounds must follow
        // the transform.
        objects[0].offset = Vector3::new(100.0, 0.0, 0.0);
        assert!(picker.pick((0.0, 0.0), &camera, &objects, &[0]).is_none());
    }
}
