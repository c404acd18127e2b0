//! Spring integration.
//!
//! Each field is advanced independently with a frame-normalized damped spring:
//! with `n = dt * 60` frames elapsed,
//!
//! ```text
//! accel    = stiffness * (target - value) - damping * velocity
//! step     = (velocity + accel) * n
//! velocity = step / n
//! value   += step
//! ```
//!
//! Long frames are integrated in substeps of at most one reference frame, so a
//! stalled clock advances the spring the same way a run of normal frames would.
//! At most [`MAX_SUBSTEPS`] are taken per call; time beyond that is dropped.
//!
//! A field settles (snaps to its target and stops consuming ticks) once both its
//! remaining distance and its last step are below `precision`.

use crate::state::{AnimatableField, AnimatableState};

/// Reference frame rate the spring constants are expressed against.
pub const REFERENCE_FPS: f64 = 60.0;

/// Upper bound on substeps per [`SpringDriver::step`] call (ten seconds).
pub const MAX_SUBSTEPS: usize = 600;

/// Frame counts this close above a whole number are not split further.
const SUBSTEP_SLACK: f64 = 1e-3;

/// Fully resolved spring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub precision: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 0.15,
            damping: 0.8,
            precision: 0.01,
        }
    }
}

impl SpringParams {
    /// Whether a field could ever settle against `precision`.
    pub fn is_valid_precision(precision: f64) -> bool {
        precision.is_finite() && precision > 0.0
    }
}

/// Per-field spring state for one interpolator.
#[derive(Debug, Clone)]
pub struct SpringDriver {
    params: SpringParams,
    velocity: [f64; 5],
    settled: [bool; 5],
}

impl SpringDriver {
    pub fn new(params: SpringParams) -> Self {
        Self {
            params,
            velocity: [0.0; 5],
            settled: [true; 5],
        }
    }

    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    /// Velocity of a field, in units per reference frame.
    pub fn velocity(&self, field: AnimatableField) -> f64 {
        self.velocity[field_index(field)]
    }

    /// Wake every field whose value differs from its new target.
    ///
    /// Velocity is kept so a retarget mid-flight continues smoothly. Returns true
    /// if any field is now in motion.
    pub fn retarget(&mut self, current: &AnimatableState, target: &AnimatableState) -> bool {
        for (i, field) in AnimatableField::ALL.iter().enumerate() {
            if current.get(*field) != target.get(*field) {
                self.settled[i] = false;
            }
        }
        !self.is_settled()
    }

    /// Advance every unsettled field by `dt` seconds. Returns true once all fields
    /// have settled.
    pub fn step(&mut self, current: &mut AnimatableState, target: &AnimatableState, dt: f64) -> bool {
        let frames = dt * REFERENCE_FPS;
        if frames.is_nan() || frames <= 0.0 {
            return self.is_settled();
        }

        let substeps = substep_count(frames);
        let n = frames.min(MAX_SUBSTEPS as f64) / substeps as f64;
        for _ in 0..substeps {
            if self.integrate(current, target, n) {
                break;
            }
        }

        self.is_settled()
    }

    /// One integration step of `n` reference frames, `0 < n <= 1`.
    fn integrate(&mut self, current: &mut AnimatableState, target: &AnimatableState, n: f64) -> bool {
        let SpringParams {
            stiffness,
            damping,
            precision,
        } = self.params;

        for (i, field) in AnimatableField::ALL.iter().enumerate() {
            if self.settled[i] {
                continue;
            }

            let value = current.get(*field);
            let goal = target.get(*field);
            let delta = goal - value;
            let accel = stiffness * delta - damping * self.velocity[i];
            let step = (self.velocity[i] + accel) * n;

            if step.abs() < precision && delta.abs() < precision {
                current.set(*field, goal);
                self.velocity[i] = 0.0;
                self.settled[i] = true;
            } else {
                self.velocity[i] = step / n;
                current.set(*field, value + step);
            }
        }

        self.is_settled()
    }

    pub fn is_settled(&self) -> bool {
        self.settled.iter().all(|s| *s)
    }

    pub fn is_field_settled(&self, field: AnimatableField) -> bool {
        self.settled[field_index(field)]
    }
}

fn substep_count(frames: f64) -> usize {
    let whole = (frames - SUBSTEP_SLACK).ceil();
    if whole <= 1.0 {
        1
    } else {
        (whole as usize).min(MAX_SUBSTEPS)
    }
}

fn field_index(field: AnimatableField) -> usize {
    match field {
        AnimatableField::X => 0,
        AnimatableField::Y => 1,
        AnimatableField::Scale => 2,
        AnimatableField::Opacity => 3,
        AnimatableField::Rotate => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn test_spring_settles_to_target() {
        let mut driver = SpringDriver::new(SpringParams::default());
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            x: 100.0,
            ..Default::default()
        };

        assert!(driver.retarget(&current, &target));
        let mut frames = 0;
        while !driver.step(&mut current, &target, FRAME) {
            frames += 1;
            assert!(frames < 1000, "spring failed to settle");
        }

        assert_eq!(current.x, 100.0);
        assert!(driver.is_settled());
    }

    #[test]
    fn test_untouched_fields_stay_settled() {
        let mut driver = SpringDriver::new(SpringParams::default());
        let current = AnimatableState::default();
        let target = AnimatableState {
            rotate: 90.0,
            ..Default::default()
        };

        driver.retarget(&current, &target);
        assert!(!driver.is_field_settled(AnimatableField::Rotate));
        assert!(driver.is_field_settled(AnimatableField::X));
        assert!(driver.is_field_settled(AnimatableField::Opacity));
    }

    #[test]
    fn test_retarget_keeps_velocity() {
        let mut driver = SpringDriver::new(SpringParams::default());
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            y: 100.0,
            ..Default::default()
        };

        driver.retarget(&current, &target);
        for _ in 0..5 {
            driver.step(&mut current, &target, FRAME);
        }
        let velocity = driver.velocity(AnimatableField::Y);
        assert!(velocity > 0.0);

        let new_target = AnimatableState {
            y: 50.0,
            ..Default::default()
        };
        driver.retarget(&current, &new_target);
        assert_eq!(driver.velocity(AnimatableField::Y), velocity);
    }

    #[test]
    fn test_zero_dt_is_no_progress() {
        let mut driver = SpringDriver::new(SpringParams::default());
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            x: 10.0,
            ..Default::default()
        };
        driver.retarget(&current, &target);

        assert!(!driver.step(&mut current, &target, 0.0));
        assert_eq!(current.x, 0.0);
    }

    #[test]
    fn test_stays_bounded_with_large_steps() {
        let mut driver = SpringDriver::new(SpringParams::default());
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            x: 1000.0,
            ..Default::default()
        };
        driver.retarget(&current, &target);

        for _ in 0..200 {
            driver.step(&mut current, &target, 0.05);
            assert!(current.x.is_finite());
            assert!(current.x < 2000.0 && current.x > -1000.0);
        }
    }

    #[test]
    fn test_long_frame_matches_substeps() {
        let target = AnimatableState {
            x: 100.0,
            ..Default::default()
        };

        let mut stalled = SpringDriver::new(SpringParams::default());
        let mut a = AnimatableState::default();
        stalled.retarget(&a, &target);
        stalled.step(&mut a, &target, 0.5);

        let mut smooth = SpringDriver::new(SpringParams::default());
        let mut b = AnimatableState::default();
        smooth.retarget(&b, &target);
        for _ in 0..30 {
            smooth.step(&mut b, &target, FRAME);
        }

        assert!((a.x - b.x).abs() < 1e-6);
        assert!(a.x > 0.0 && a.x <= 100.0);
    }

    #[test]
    fn test_one_second_stall_stays_bounded() {
        let mut driver = SpringDriver::new(SpringParams::default());
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            x: 100.0,
            ..Default::default()
        };
        driver.retarget(&current, &target);

        driver.step(&mut current, &target, 1.0);
        assert!(current.x.is_finite());
        assert!((current.x - 100.0).abs() < 1.0, "x = {}", current.x);
    }

    #[test]
    fn test_slow_cadence_settles() {
        let mut driver = SpringDriver::new(SpringParams::default());
        let mut current = AnimatableState::default();
        let target = AnimatableState {
            x: 100.0,
            rotate: -720.0,
            ..Default::default()
        };
        driver.retarget(&current, &target);

        let mut ticks = 0;
        while !driver.step(&mut current, &target, 0.3) {
            ticks += 1;
            assert!(current.is_finite());
            assert!(current.x >= 0.0 && current.x <= 100.0);
            assert!(ticks < 100, "spring failed to settle");
        }
        assert_eq!(current.x, 100.0);
        assert_eq!(current.rotate, -720.0);
    }

    #[test]
    fn test_substep_count() {
        assert_eq!(substep_count(0.5), 1);
        assert_eq!(substep_count(1.00002), 1);
        assert_eq!(substep_count(2.5), 3);
        assert_eq!(substep_count(1e9), MAX_SUBSTEPS);
    }
}
