//! One-time classification of named scene objects.
//!
//! The scene author assigns names in the modelling tool; behavior and
//! materials are decided here by matching substrings of those names, exactly
//! once, right after the scene finishes loading. The result is a typed
//! [`Classification`] — material kind and role tags per object, single-object
//! handles, the movable props and the pickable set — so event-time dispatch
//! never rescans name strings.

use cgmath::{Vector3, Zero};

use crate::gfx::scene::object::Object;

use super::movable::{Movable, MovableTarget, PropKind};

/// Symbolic keys of the pre-baked workbench textures, in match order.
///
/// The keyed materials are pre-existing resources registered at load time;
/// classification only references them, it never creates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakedKey {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl BakedKey {
    pub const ALL: [BakedKey; 5] = [
        BakedKey::One,
        BakedKey::Two,
        BakedKey::Three,
        BakedKey::Four,
        BakedKey::Five,
    ];

    /// Substring matched against the lowercased mesh name.
    pub fn keyword(&self) -> &'static str {
        match self {
            BakedKey::One => "one",
            BakedKey::Two => "two",
            BakedKey::Three => "three",
            BakedKey::Four => "four",
            BakedKey::Five => "five",
        }
    }

    /// Id of the pre-registered stand-in material.
    pub fn material_id(&self) -> &'static str {
        match self {
            BakedKey::One => "baked_one",
            BakedKey::Two => "baked_two",
            BakedKey::Three => "baked_three",
            BakedKey::Four => "baked_four",
            BakedKey::Five => "baked_five",
        }
    }
}

/// Material decision for a mesh. Evaluated in strict priority order:
/// glass > sunrays > picture > baked-key lookup; first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Glass,
    Sunrays,
    Picture,
    Baked(BakedKey),
    Default,
}

impl MaterialKind {
    /// Id of the pre-registered material, `None` for the renderer default.
    pub fn material_id(&self) -> Option<&'static str> {
        match self {
            MaterialKind::Glass => Some("glass"),
            MaterialKind::Sunrays => Some("sunrays"),
            MaterialKind::Picture => Some("picture"),
            MaterialKind::Baked(key) => Some(key.material_id()),
            MaterialKind::Default => None,
        }
    }
}

/// Behavior roles attached to a mesh by name matching. Roles combine freely
/// with each other and with any material kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    WindowLight,
    Hat,
    Sunrays,
    Book,
    Thread,
    DrawerPart,
    PickTarget,
}

/// Per-object result of the classification pass.
#[derive(Debug)]
pub struct MeshAssignment {
    pub material: MaterialKind,
    pub roles: Vec<Role>,
}

impl MeshAssignment {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Typed registry produced by one classification pass over a loaded scene.
///
/// Handles are indices into the object list the pass ran over; missing roles
/// are tolerated and leave the corresponding handle empty.
pub struct Classification {
    /// Parallel to the classified object list.
    pub assignments: Vec<MeshAssignment>,
    pub window_light: Option<usize>,
    pub sunrays: Option<usize>,
    pub hat: Option<usize>,
    pub movables: Vec<Movable>,
    /// Candidate set for pointer-ray intersection.
    pub pickables: Vec<usize>,
}

impl Classification {
    pub fn movable(&self, kind: PropKind) -> Option<&Movable> {
        self.movables.iter().find(|movable| movable.kind == kind)
    }

    pub fn movable_mut(&mut self, kind: PropKind) -> Option<&mut Movable> {
        self.movables
            .iter_mut()
            .find(|movable| movable.kind == kind)
    }
}

fn material_kind(name: &str) -> MaterialKind {
    if name.contains("glass") {
        MaterialKind::Glass
    } else if name.contains("sunrays") {
        MaterialKind::Sunrays
    } else if name.contains("picture") {
        MaterialKind::Picture
    } else {
        BakedKey::ALL
            .iter()
            .find(|key| name.contains(key.keyword()))
            .map(|key| MaterialKind::Baked(*key))
            .unwrap_or(MaterialKind::Default)
    }
}

fn is_drawer_part(name: &str) -> bool {
    name.contains("drawer") || name.contains("target_6") || name.contains("target_7")
}

/// Classifies a freshly loaded scene.
///
/// Pure and idempotent over the snapshot: running it twice on the same object
/// list yields identical assignments, handles and computed rest positions.
pub fn classify(objects: &[Object]) -> Classification {
    let mut assignments = Vec::with_capacity(objects.len());
    let mut window_light = None;
    let mut sunrays = None;
    let mut hat = None;
    let mut movables = Vec::new();
    let mut pickables = Vec::new();
    let mut drawer_parts = Vec::new();

    for (index, object) in objects.iter().enumerate() {
        let name = object.name.to_lowercase();
        let material = material_kind(&name);
        let mut roles = Vec::new();

        if material == MaterialKind::Sunrays {
            roles.push(Role::Sunrays);
            sunrays.get_or_insert(index);
        }
        if name.contains("window") {
            roles.push(Role::WindowLight);
            window_light.get_or_insert(index);
        }
        if name.contains("hat") {
            roles.push(Role::Hat);
            hat.get_or_insert(index);
        }
        if name.contains("book") {
            roles.push(Role::Book);
            movables.push(Movable::new(
                PropKind::Book,
                MovableTarget::Single(index),
                object.translation,
            ));
        }
        if name.contains("thread") {
            roles.push(Role::Thread);
            movables.push(Movable::new(
                PropKind::Thread,
                MovableTarget::Single(index),
                object.translation,
            ));
        }
        if is_drawer_part(&name) {
            roles.push(Role::DrawerPart);
            drawer_parts.push(index);
        }
        if name.contains("target") {
            roles.push(Role::PickTarget);
            pickables.push(index);
        }

        assignments.push(MeshAssignment { material, roles });
    }

    // The drawer meshes animate as one composite group anchored at the
    // group origin, not per mesh.
    if !drawer_parts.is_empty() {
        movables.push(Movable::new(
            PropKind::Drawer,
            MovableTarget::Group(drawer_parts),
            Vector3::zero(),
        ));
    }

    Classification {
        assignments,
        window_light,
        sunrays,
        hat,
        movables,
        pickables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn named_object(name: &str, translation: Vector3<f32>) -> Object {
        let mut object = Object::new(Vec::new());
        object.set_name(name);
        object.translation = translation;
        object
    }

    fn workbench_snapshot() -> Vec<Object> {
        vec![
            named_object("bench_one", Vector3::zero()),
            named_object("glass_pane", Vector3::zero()),
            named_object("sunrays_plane", Vector3::zero()),
            named_object("picture_frame", Vector3::zero()),
            named_object("window_light", Vector3::zero()),
            named_object("hat_two", Vector3::zero()),
            named_object("book_01", Vector3::new(1.0, 2.0, 3.0)),
            named_object("thread_spool", Vector3::new(0.5, 0.0, 0.5)),
            named_object("drawer_target_6", Vector3::zero()),
            named_object("drawer_target_7", Vector3::zero()),
            named_object("book_target_1", Vector3::zero()),
        ]
    }

    #[test]
    fn material_priority_is_strict() {
        // A glass mesh whose name also mentions rays stays glass.
        let objects = vec![named_object("glass_rays_panel", Vector3::zero())];
        let classification = classify(&objects);
        assert_eq!(classification.assignments[0].material, MaterialKind::Glass);

        // A sunrays mesh whose name also matches a baked key stays sunrays.
        let objects = vec![named_object("sunrays_one", Vector3::zero())];
        let classification = classify(&objects);
        assert_eq!(
            classification.assignments[0].material,
            MaterialKind::Sunrays
        );
    }

    #[test]
    fn unmatched_names_keep_the_default_material() {
        let objects = vec![named_object("anvil", Vector3::zero())];
        let classification = classify(&objects);
        assert_eq!(
            classification.assignments[0].material,
            MaterialKind::Default
        );
        assert!(classification.assignments[0].roles.is_empty());
    }

    #[test]
    fn baked_keys_resolve_to_symbolic_material_ids() {
        let objects = vec![named_object("Bench_Three", Vector3::zero())];
        let classification = classify(&objects);
        assert_eq!(
            classification.assignments[0].material.material_id(),
            Some("baked_three")
        );
    }

    #[test]
    fn roles_combine_with_materials_and_each_other() {
        let classification = classify(&workbench_snapshot());

        // drawer_target_6 is both a drawer part and a pick target.
        let drawer = &classification.assignments[8];
        assert!(drawer.has_role(Role::DrawerPart));
        assert!(drawer.has_role(Role::PickTarget));

        // hat_two gets the hat role and the baked material.
        let hat = &classification.assignments[5];
        assert!(hat.has_role(Role::Hat));
        assert_eq!(hat.material, MaterialKind::Baked(BakedKey::Two));
    }

    #[test]
    fn single_object_handles_are_populated() {
        let classification = classify(&workbench_snapshot());
        assert_eq!(classification.window_light, Some(4));
        assert_eq!(classification.sunrays, Some(2));
        assert_eq!(classification.hat, Some(5));
    }

    #[test]
    fn missing_roles_leave_handles_empty() {
        let objects = vec![named_object("bench_one", Vector3::zero())];
        let classification = classify(&objects);
        assert!(classification.window_light.is_none());
        assert!(classification.sunrays.is_none());
        assert!(classification.movables.is_empty());
        assert!(classification.pickables.is_empty());
    }

    #[test]
    fn book_movable_offsets_from_its_rest_position() {
        let classification = classify(&workbench_snapshot());
        let book = classification.movable(PropKind::Book).unwrap();
        assert_eq!(book.target, MovableTarget::Single(6));
        assert_relative_eq!(book.initial_position.x, 1.0);
        assert_relative_eq!(book.initial_position.y, 2.0);
        assert_relative_eq!(book.initial_position.z, 3.0);
        assert_relative_eq!(book.final_position.z, 3.3);
    }

    #[test]
    fn drawer_meshes_form_one_group_movable() {
        let classification = classify(&workbench_snapshot());
        let drawer = classification.movable(PropKind::Drawer).unwrap();
        assert_eq!(drawer.target, MovableTarget::Group(vec![8, 9]));
        assert_relative_eq!(drawer.initial_position.z, 0.0);
        assert_relative_eq!(drawer.final_position.z, -0.39);
    }

    #[test]
    fn pickable_set_matches_target_names_only() {
        let classification = classify(&workbench_snapshot());
        assert_eq!(classification.pickables, vec![8, 9, 10]);
    }

    #[test]
    fn classification_is_deterministic() {
        let objects = workbench_snapshot();
        let first = classify(&objects);
        let second = classify(&objects);

        assert_eq!(first.window_light, second.window_light);
        assert_eq!(first.sunrays, second.sunrays);
        assert_eq!(first.pickables, second.pickables);
        assert_eq!(first.assignments.len(), second.assignments.len());
        for (a, b) in first.assignments.iter().zip(&second.assignments) {
            assert_eq!(a.material, b.material);
            assert_eq!(a.roles, b.roles);
        }
        for (a, b) in first.movables.iter().zip(&second.movables) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.target, b.target);
            assert_relative_eq!(a.final_position.x, b.final_position.x);
            assert_relative_eq!(a.final_position.y, b.final_position.y);
            assert_relative_eq!(a.final_position.z, b.final_position.z);
        }
    }
}
