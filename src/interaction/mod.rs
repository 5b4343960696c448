//! Interactive behavior of the workbench scene.
//!
//! Everything here runs on plain scene data and carries no GPU state:
//!
//! - [`classify`] turns author-assigned mesh names into a typed registry of
//!   material kinds, behavior roles, movable props and the pickable set,
//!   in one pass at load time.
//! - [`movable`] holds the guarded two-state position animations the props
//!   cycle through.
//! - [`tween`] is the fixed-duration interpolation underneath them.
//! - [`theme`] owns the light/dark flag and its visibility side effects.

pub mod classify;
pub mod movable;
pub mod theme;
pub mod tween;

pub use classify::{classify, Classification, MaterialKind, Role};
pub use movable::{Movable, MovableTarget, MoveState, PropKind};
pub use theme::ThemeToggle;
pub use tween::{EasingCurve, Tween};
