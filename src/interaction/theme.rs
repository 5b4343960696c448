//! Light/dark theme state and its visibility side effects.

use crate::gfx::scene::object::Object;

use super::classify::Classification;

/// Process-wide theme flag, initially light.
///
/// Toggling is instantaneous and unguarded; two toggles in sequence restore
/// the original visual state. Absent handles are silently skipped, so a scene
/// without a window light degrades to a toggle with no visible effect.
pub struct ThemeToggle {
    light_mode: bool,
}

impl ThemeToggle {
    pub fn new() -> Self {
        Self { light_mode: true }
    }

    pub fn is_light(&self) -> bool {
        self.light_mode
    }

    /// Flips the theme and applies visibility to the light-dependent objects.
    pub fn toggle(&mut self, objects: &mut [Object], classification: &Classification) {
        self.light_mode = !self.light_mode;

        for handle in [classification.window_light, classification.sunrays] {
            if let Some(index) = handle {
                if let Some(object) = objects.get_mut(index) {
                    object.visible = self.light_mode;
                }
            }
        }
    }
}

impl Default for ThemeToggle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::classify::classify;
    use cgmath::{Vector3, Zero};

    fn named_object(name: &str) -> Object {
        let mut object = Object::new(Vec::new());
        object.set_name(name);
        object.translation = Vector3::zero();
        object
    }

    #[test]
    fn toggle_pair_restores_visibility() {
        let mut objects = vec![named_object("window_light"), named_object("sunrays_plane")];
        let classification = classify(&objects);
        let mut theme = ThemeToggle::new();

        theme.toggle(&mut objects, &classification);
        assert!(!theme.is_light());
        assert!(!objects[0].visible);
        assert!(!objects[1].visible);

        theme.toggle(&mut objects, &classification);
        assert!(theme.is_light());
        assert!(objects[0].visible);
        assert!(objects[1].visible);
    }

    #[test]
    fn missing_window_object_is_tolerated() {
        let mut objects = vec![named_object("bench_one")];
        let classification = classify(&objects);
        let mut theme = ThemeToggle::new();

        theme.toggle(&mut objects, &classification);
        assert!(!theme.is_light());
        assert!(objects[0].visible);
    }
}
