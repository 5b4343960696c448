//! Guarded two-state position animations for the interactive props.
//!
//! Each [`Movable`] owns two rest positions and cycles between them through
//! an explicit state machine: a trigger while idle starts a tween toward the
//! other rest position, a trigger while anything else is happening is a
//! silent no-op. The thread prop additionally rests for a fixed settle period
//! after each move before it accepts the next trigger.

use cgmath::Vector3;

use super::tween::{EasingCurve, Tween};

/// The animated props of the workbench scene.
///
/// Durations, easing and displacement are fixed per kind; they are authoring
/// constants, not user configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Book,
    Thread,
    Drawer,
}

impl PropKind {
    /// Displacement between the two rest positions.
    pub fn delta(&self) -> Vector3<f32> {
        match self {
            PropKind::Book => Vector3::new(0.0, 0.0, 0.3),
            PropKind::Thread => Vector3::new(0.1, 0.0, 0.1),
            PropKind::Drawer => Vector3::new(0.0, 0.0, -0.39),
        }
    }

    /// Interpolation time in seconds.
    pub fn duration(&self) -> f32 {
        match self {
            PropKind::Thread => 5.0,
            PropKind::Book | PropKind::Drawer => 0.5,
        }
    }

    pub fn easing(&self) -> EasingCurve {
        match self {
            PropKind::Thread => EasingCurve::SineOut,
            PropKind::Book | PropKind::Drawer => EasingCurve::QuadOut,
        }
    }

    /// Rest period after the interpolation completes, during which further
    /// triggers are still rejected.
    pub fn settle(&self) -> f32 {
        match self {
            PropKind::Thread => 0.5,
            PropKind::Book | PropKind::Drawer => 0.0,
        }
    }
}

/// Scene objects driven by a movable: one object, or a composite group that
/// moves as a whole (the drawer and its contents).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovableTarget {
    Single(usize),
    Group(Vec<usize>),
}

/// Animation state of a movable.
///
/// Settling states only occur for kinds with a nonzero settle period; the
/// moved-state flip becomes visible when the idle state is entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveState {
    IdleAtInitial,
    AnimatingToFinal,
    SettlingAtFinal { remaining: f32 },
    IdleAtFinal,
    AnimatingToInitial,
    SettlingAtInitial { remaining: f32 },
}

pub struct Movable {
    pub kind: PropKind,
    pub target: MovableTarget,
    pub initial_position: Vector3<f32>,
    pub final_position: Vector3<f32>,
    position: Vector3<f32>,
    state: MoveState,
    tween: Option<Tween>,
}

impl Movable {
    /// Wraps a scene target whose current position becomes the initial rest
    /// position; the final position is offset by the kind's fixed delta.
    pub fn new(kind: PropKind, target: MovableTarget, initial_position: Vector3<f32>) -> Self {
        Self {
            kind,
            target,
            initial_position,
            final_position: initial_position + kind.delta(),
            position: initial_position,
            state: MoveState::IdleAtInitial,
            tween: None,
        }
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// True from a successful trigger until the animation (and any settle
    /// rest) completes. The guard is set synchronously by [`Movable::trigger`],
    /// before the first animated frame is drawn.
    pub fn is_animating(&self) -> bool {
        !matches!(
            self.state,
            MoveState::IdleAtInitial | MoveState::IdleAtFinal
        )
    }

    /// Starts the next leg of the cycle. Ignored unless the movable is idle.
    pub fn trigger(&mut self) {
        let (next, destination) = match self.state {
            MoveState::IdleAtInitial => (MoveState::AnimatingToFinal, self.final_position),
            MoveState::IdleAtFinal => (MoveState::AnimatingToInitial, self.initial_position),
            _ => return,
        };
        self.tween = Some(Tween::new(
            self.position,
            destination,
            self.kind.duration(),
            self.kind.easing(),
        ));
        self.state = next;
    }

    /// Advances the animation by the frame delta.
    ///
    /// Returns the updated position while the prop is moving, `None` while it
    /// is idle or merely settling.
    pub fn update(&mut self, dt: f32) -> Option<Vector3<f32>> {
        match self.state {
            MoveState::AnimatingToFinal | MoveState::AnimatingToInitial => {
                let tween = self.tween.as_mut()?;
                self.position = tween.advance(dt);
                if tween.is_finished() {
                    self.tween = None;
                    self.finish_leg();
                }
                Some(self.position)
            }
            MoveState::SettlingAtFinal { remaining } => {
                self.state = if remaining <= dt {
                    MoveState::IdleAtFinal
                } else {
                    MoveState::SettlingAtFinal {
                        remaining: remaining - dt,
                    }
                };
                None
            }
            MoveState::SettlingAtInitial { remaining } => {
                self.state = if remaining <= dt {
                    MoveState::IdleAtInitial
                } else {
                    MoveState::SettlingAtInitial {
                        remaining: remaining - dt,
                    }
                };
                None
            }
            MoveState::IdleAtInitial | MoveState::IdleAtFinal => None,
        }
    }

    fn finish_leg(&mut self) {
        let settle = self.kind.settle();
        self.state = match self.state {
            MoveState::AnimatingToFinal if settle > 0.0 => {
                MoveState::SettlingAtFinal { remaining: settle }
            }
            MoveState::AnimatingToFinal => MoveState::IdleAtFinal,
            MoveState::AnimatingToInitial if settle > 0.0 => {
                MoveState::SettlingAtInitial { remaining: settle }
            }
            MoveState::AnimatingToInitial => MoveState::IdleAtInitial,
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn book_at(position: Vector3<f32>) -> Movable {
        Movable::new(PropKind::Book, MovableTarget::Single(0), position)
    }

    fn run_to_idle(movable: &mut Movable) {
        // Generous step budget; the longest cycle is the thread at 5.5s.
        for _ in 0..1000 {
            if !movable.is_animating() {
                return;
            }
            movable.update(0.016);
        }
        panic!("movable did not come to rest");
    }

    #[test]
    fn fixed_offsets_per_kind() {
        let book = book_at(Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(book.final_position.z, 3.3);

        let drawer = Movable::new(
            PropKind::Drawer,
            MovableTarget::Group(vec![3, 4]),
            Vector3::new(0.0, 0.0, 0.0),
        );
        assert_relative_eq!(drawer.final_position.z, -0.39);

        let thread = Movable::new(PropKind::Thread, MovableTarget::Single(1), Vector3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(thread.final_position.x, 0.1);
        assert_relative_eq!(thread.final_position.z, 0.1);
    }

    #[test]
    fn double_trigger_flips_state_once() {
        let mut book = book_at(Vector3::new(1.0, 2.0, 3.0));
        book.trigger();
        assert!(book.is_animating());
        // Second click before completion is ignored.
        book.trigger();
        run_to_idle(&mut book);

        assert_eq!(book.state(), MoveState::IdleAtFinal);
        assert_relative_eq!(book.position().z, 3.3);
    }

    #[test]
    fn trigger_guard_is_set_synchronously() {
        let mut book = book_at(Vector3::new(0.0, 0.0, 0.0));
        book.trigger();
        // No frame has been drawn yet, the guard must already hold.
        assert!(book.is_animating());
    }

    #[test]
    fn odd_cycles_end_at_final_even_cycles_return() {
        let mut book = book_at(Vector3::new(1.0, 2.0, 3.0));

        for cycle in 1..=4 {
            book.trigger();
            run_to_idle(&mut book);
            if cycle % 2 == 1 {
                assert_eq!(book.state(), MoveState::IdleAtFinal);
                assert_relative_eq!(book.position().z, 3.3);
            } else {
                assert_eq!(book.state(), MoveState::IdleAtInitial);
                assert_relative_eq!(book.position().z, 3.0);
            }
        }
    }

    #[test]
    fn thread_rests_before_accepting_the_next_trigger() {
        let mut thread =
            Movable::new(PropKind::Thread, MovableTarget::Single(0), Vector3::new(0.0, 0.0, 0.0));
        thread.trigger();

        // Run the 5s interpolation out.
        for _ in 0..50 {
            thread.update(0.1);
        }
        assert!(matches!(thread.state(), MoveState::SettlingAtFinal { .. }));
        assert!(thread.is_animating());

        // Triggers during the rest period are rejected.
        thread.trigger();
        assert!(matches!(thread.state(), MoveState::SettlingAtFinal { .. }));

        // Rest period elapses, the moved-state flip becomes visible.
        thread.update(0.3);
        thread.update(0.3);
        assert_eq!(thread.state(), MoveState::IdleAtFinal);
        assert!(!thread.is_animating());
        assert_relative_eq!(thread.position().x, 0.1);
    }

    #[test]
    fn idle_update_reports_no_movement() {
        let mut book = book_at(Vector3::new(0.0, 0.0, 0.0));
        assert!(book.update(0.016).is_none());
        book.trigger();
        assert!(book.update(0.016).is_some());
    }
}
