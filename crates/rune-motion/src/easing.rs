//! Easing curves for tweened transitions.
//!
//! Named curves follow the CSS timing functions:
//! - Linear
//! - Ease, EaseIn, EaseOut, EaseInOut (standard CSS curves)
//! - CubicBezier (custom bezier curves)
//! - Steps (stepped animations)
//!
//! [`Easing`] additionally accepts an arbitrary closure over the unit interval.
//!
//! # Usage
//!
//! ```
//! use rune_motion::easing::{Easing, EasingFunction};
//!
//! let ease = EasingFunction::EaseOut;
//! let progress = ease.evaluate(0.5);
//! assert!(progress > 0.5);
//!
//! let quad = Easing::custom(|t| t * t);
//! assert_eq!(quad.evaluate(0.5), 0.25);
//! ```

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use rune_motion_config::EasingName;

/// Position for stepped animations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval (CSS `jump-start`).
    Start,
    /// Jump at the end of each interval (CSS `jump-end`).
    #[default]
    End,
}

/// A named easing curve.
///
/// Maps linear progress (0.0 to 1.0) to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing.
    #[default]
    Linear,

    /// CSS `ease`, equivalent to `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,

    /// CSS `ease-in`, equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// CSS `ease-out`, equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// CSS `ease-in-out`, equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve through control points (x1, y1) and (x2, y2).
    /// x values are clamped to [0, 1] when evaluated.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },

    /// Discrete jumps over `count` intervals.
    Steps { count: u32, position: StepPosition },
}

impl EasingFunction {
    /// Evaluate the curve at `t`, clamped into [0, 1].
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                cubic_bezier(x1.clamp(0.0, 1.0), *y1, x2.clamp(0.0, 1.0), *y2, t)
            }
            Self::Steps { count, position } => stepped(*count, *position, t),
        }
    }
}

impl From<EasingName> for EasingFunction {
    fn from(name: EasingName) -> Self {
        match name {
            EasingName::Linear => Self::Linear,
            EasingName::Ease => Self::Ease,
            EasingName::EaseIn => Self::EaseIn,
            EasingName::EaseOut => Self::EaseOut,
            EasingName::EaseInOut => Self::EaseInOut,
        }
    }
}

/// Easing used by a tween: a named curve or a caller-supplied function.
#[derive(Clone)]
pub enum Easing {
    Curve(EasingFunction),
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    /// Wrap a closure mapping the unit interval onto itself.
    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    /// Evaluate the easing at progress `t`.
    ///
    /// Custom functions receive `t` clamped into [0, 1] and are otherwise trusted.
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            Self::Curve(curve) => curve.evaluate(t),
            Self::Custom(f) => f(t.clamp(0.0, 1.0)),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::Curve(EasingFunction::Linear)
    }
}

impl From<EasingFunction> for Easing {
    fn from(curve: EasingFunction) -> Self {
        Self::Curve(curve)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curve(curve) => f.debug_tuple("Curve").field(curve).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_component(y1, y2, t)
}

/// Newton-Raphson solve for the curve parameter whose x equals `target_x`.
fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_component(x1, x2, t) - target_x;
        if x.abs() < 1e-7 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-7 {
            break;
        }

        t = (t - x / dx).clamp(0.0, 1.0);
    }

    t
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_component(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f64, x2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

fn stepped(steps: u32, position: StepPosition, t: f64) -> f64 {
    if steps == 0 {
        return t;
    }

    let steps_f = f64::from(steps);
    match position {
        StepPosition::Start => (t * steps_f).ceil() / steps_f,
        StepPosition::End => (t * steps_f).floor() / steps_f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_linear() {
        let ease = EasingFunction::Linear;
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.25), 0.25));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_named_curves_hit_endpoints_exactly() {
        for curve in [
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ] {
            assert_eq!(curve.evaluate(0.0), 0.0, "{curve:?}");
            assert_eq!(curve.evaluate(1.0), 1.0, "{curve:?}");
        }
    }

    #[test]
    fn test_ease_in_out_symmetry() {
        let ease = EasingFunction::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.25) + ease.evaluate(0.75), 1.0));
    }

    #[test]
    fn test_ease_in_and_out_shapes() {
        assert!(EasingFunction::EaseIn.evaluate(0.25) < 0.25);
        assert!(EasingFunction::EaseOut.evaluate(0.25) > 0.25);
    }

    #[test]
    fn test_linear_bezier() {
        let linear_bezier = EasingFunction::CubicBezier {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        assert!(approx_eq(linear_bezier.evaluate(0.5), 0.5));
    }

    #[test]
    fn test_steps() {
        let end = EasingFunction::Steps {
            count: 4,
            position: StepPosition::End,
        };
        assert!(approx_eq(end.evaluate(0.24), 0.0));
        assert!(approx_eq(end.evaluate(0.5), 0.5));
        assert!(approx_eq(end.evaluate(1.0), 1.0));

        let start = EasingFunction::Steps {
            count: 4,
            position: StepPosition::Start,
        };
        assert!(approx_eq(start.evaluate(0.01), 0.25));
        assert!(approx_eq(start.evaluate(0.0), 0.0));
    }

    #[test]
    fn test_clamping() {
        let ease = EasingFunction::Ease;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
    }

    #[test]
    fn test_custom_easing() {
        let quad = Easing::custom(|t| t * t);
        assert_eq!(quad.evaluate(0.5), 0.25);
        assert_eq!(quad.evaluate(2.0), 1.0);
        assert_eq!(format!("{quad:?}"), "Custom(..)");
    }

    #[test]
    fn test_serde_tagged() {
        let curve: EasingFunction =
            serde_json::from_str(r#"{"type": "cubic_bezier", "x1": 0.4, "y1": 0.0, "x2": 0.2, "y2": 1.0}"#)
                .unwrap();
        assert_eq!(
            curve,
            EasingFunction::CubicBezier {
                x1: 0.4,
                y1: 0.0,
                x2: 0.2,
                y2: 1.0
            }
        );
        let linear: EasingFunction = serde_json::from_str(r#"{"type": "linear"}"#).unwrap();
        assert_eq!(linear, EasingFunction::Linear);
    }

    #[test]
    fn test_from_config_name() {
        assert_eq!(EasingFunction::from(EasingName::EaseOut), EasingFunction::EaseOut);
        assert_eq!(EasingFunction::default(), EasingFunction::Linear);
    }
}
