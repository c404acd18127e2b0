//! Time-based tweening.
//!
//! A tween captures the state at the moment a target is set and maps every field
//! through `easing(elapsed / duration)` toward the target. Reaching the full
//! duration settles exactly on the target.

use std::time::Duration;

use crate::easing::Easing;
use crate::state::{AnimatableField, AnimatableState};

/// Slack for accumulated frame deltas landing a hair short of the duration.
const COMPLETION_EPSILON: f64 = 1e-9;

/// Fully resolved tween parameters.
#[derive(Debug, Clone)]
pub struct TweenParams {
    pub duration: Duration,
    pub easing: Easing,
}

/// Tween progress for one interpolator.
#[derive(Debug, Clone)]
pub struct TweenDriver {
    params: TweenParams,
    start: AnimatableState,
    elapsed: f64,
    running: bool,
}

impl TweenDriver {
    pub fn new(params: TweenParams) -> Self {
        Self {
            params,
            start: AnimatableState::default(),
            elapsed: 0.0,
            running: false,
        }
    }

    pub fn params(&self) -> &TweenParams {
        &self.params
    }

    /// Seconds elapsed since the last retarget.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Returns true if the tween completes the moment it starts.
    pub fn is_instant(&self) -> bool {
        self.params.duration.is_zero()
    }

    /// Restart from `current`. Returns true if there is anywhere to go.
    pub fn retarget(&mut self, current: &AnimatableState, target: &AnimatableState) -> bool {
        self.start = *current;
        self.elapsed = 0.0;
        self.running = current != target;
        self.running
    }

    /// Advance by `dt` seconds. Returns true once the tween has finished.
    pub fn step(&mut self, current: &mut AnimatableState, target: &AnimatableState, dt: f64) -> bool {
        if !self.running {
            return true;
        }

        self.elapsed += dt.max(0.0);
        let duration = self.params.duration.as_secs_f64();

        if duration <= 0.0 || self.elapsed + COMPLETION_EPSILON >= duration {
            *current = *target;
            self.running = false;
            return true;
        }

        let t = self.params.easing.evaluate(self.elapsed / duration);
        for field in AnimatableField::ALL {
            let from = self.start.get(field);
            current.set(field, from + (target.get(field) - from) * t);
        }
        false
    }

    pub fn is_settled(&self) -> bool {
        !self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingFunction;

    fn driver(ms: u64, easing: impl Into<Easing>) -> TweenDriver {
        TweenDriver::new(TweenParams {
            duration: Duration::from_millis(ms),
            easing: easing.into(),
        })
    }

    #[test]
    fn test_linear_midpoint() {
        let mut tween = driver(100, EasingFunction::Linear);
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            x: 100.0,
            opacity: 0.0,
            ..Default::default()
        };

        assert!(tween.retarget(&current, &target));
        assert!(!tween.step(&mut current, &target, 0.05));
        assert!((current.x - 50.0).abs() < 1e-9);
        assert!((current.opacity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_exact_at_duration() {
        let mut tween = driver(300, Easing::custom(|t| t.powi(3)));
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            x: 3.3,
            y: -7.1,
            scale: 0.3,
            opacity: 0.1,
            rotate: 33.3,
        };

        tween.retarget(&current, &target);
        assert!(!tween.step(&mut current, &target, 0.1));
        assert!(!tween.step(&mut current, &target, 0.1));
        assert!(tween.step(&mut current, &target, 0.1));
        assert_eq!(current, target);
    }

    #[test]
    fn test_retarget_captures_current() {
        let mut tween = driver(100, EasingFunction::Linear);
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            x: 100.0,
            ..Default::default()
        };
        tween.retarget(&current, &target);
        tween.step(&mut current, &target, 0.05);

        let back = AnimatableState::default();
        tween.retarget(&current, &back);
        assert_eq!(tween.elapsed(), 0.0);
        tween.step(&mut current, &back, 0.05);
        assert!((current.x - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_motion_when_already_at_target() {
        let mut tween = driver(100, EasingFunction::Linear);
        let current = AnimatableState::default();
        assert!(!tween.retarget(&current, &current));
        assert!(tween.is_settled());
    }

    #[test]
    fn test_zero_duration_settles_on_first_step() {
        let mut tween = driver(0, EasingFunction::Linear);
        assert!(tween.is_instant());
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            y: 9.0,
            ..Default::default()
        };
        tween.retarget(&current, &target);
        assert!(tween.step(&mut current, &target, 0.0));
        assert_eq!(current.y, 9.0);
    }
}
