//! Fixed-duration position interpolation for the animated props.
//!
//! A [`Tween`] moves a single 3D position from one point to another over a
//! fixed duration with a fixed easing curve. It is advanced once per render
//! tick with the frame delta; there is no cancellation, a started tween
//! always runs to its end value.

use cgmath::Vector3;

/// Easing curves available to prop animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasingCurve {
    Linear,
    /// Quadratic deceleration: fast start, slow end.
    QuadOut,
    /// Sinusoidal deceleration: gentler than [`EasingCurve::QuadOut`].
    SineOut,
}

impl EasingCurve {
    /// Applies the curve to a normalized 0-1 parameter.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingCurve::Linear => t,
            EasingCurve::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            EasingCurve::SineOut => (t * std::f32::consts::FRAC_PI_2).sin(),
        }
    }
}

/// An in-flight interpolation between two positions.
pub struct Tween {
    from: Vector3<f32>,
    to: Vector3<f32>,
    duration: f32,
    easing: EasingCurve,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: Vector3<f32>, to: Vector3<f32>, duration: f32, easing: EasingCurve) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            elapsed: 0.0,
        }
    }

    /// Advances the tween by the frame delta and returns the current position.
    ///
    /// Once `elapsed` reaches the duration the returned position is exactly
    /// the end value; further calls keep returning it.
    pub fn advance(&mut self, dt: f32) -> Vector3<f32> {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.is_finished() {
            return self.to;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// The position the tween lands on when it finishes.
    pub fn end(&self) -> Vector3<f32> {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn easing_curves_hit_endpoints() {
        for curve in [EasingCurve::Linear, EasingCurve::QuadOut, EasingCurve::SineOut] {
            assert_relative_eq!(curve.apply(0.0), 0.0);
            assert_relative_eq!(curve.apply(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn quad_out_decelerates() {
        // Past the halfway mark in less than half the time.
        assert!(EasingCurve::QuadOut.apply(0.5) > 0.5);
        assert_relative_eq!(EasingCurve::QuadOut.apply(0.5), 0.75);
    }

    #[test]
    fn out_of_range_parameters_are_clamped() {
        assert_relative_eq!(EasingCurve::SineOut.apply(-1.0), 0.0);
        assert_relative_eq!(EasingCurve::SineOut.apply(2.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn tween_reaches_exact_end_value() {
        let from = Vector3::new(1.0, 2.0, 3.0);
        let to = Vector3::new(1.0, 2.0, 3.3);
        let mut tween = Tween::new(from, to, 0.5, EasingCurve::QuadOut);

        let mid = tween.advance(0.25);
        assert!(!tween.is_finished());
        assert!(mid.z > from.z && mid.z < to.z);

        let end = tween.advance(0.25);
        assert!(tween.is_finished());
        assert_relative_eq!(end.z, to.z);

        // Overshooting the duration stays pinned to the end value.
        let after = tween.advance(1.0);
        assert_relative_eq!(after.z, to.z);
    }

    #[test]
    fn tween_positions_advance_monotonically_along_the_axis() {
        let mut tween = Tween::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -0.39),
            0.5,
            EasingCurve::QuadOut,
        );
        let mut previous = 0.0f32;
        for _ in 0..10 {
            let z = tween.advance(0.05).z;
            assert!(z <= previous);
            previous = z;
        }
        assert_relative_eq!(previous, -0.39);
    }
}
