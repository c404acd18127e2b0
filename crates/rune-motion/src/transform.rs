//! Transform composition.
//!
//! [`compose`] turns an [`AnimatableState`] into a renderable description. The
//! geometric order is fixed: translate, then scale, then rotate. Opacity is
//! carried alongside and never folded into the matrix.
//!
//! ```
//! use rune_motion::state::AnimatableState;
//! use rune_motion::transform::compose;
//!
//! let t = compose(&AnimatableState::default());
//! assert_eq!(t.to_css(), "translate(0px, 0px) scale(1) rotate(0deg)");
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::AnimatableState;

/// The renderable form of one element's animated state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComposedTransform {
    pub translate: (f64, f64),
    pub scale: f64,
    /// Degrees.
    pub rotate: f64,
    pub opacity: f64,
}

impl Default for ComposedTransform {
    fn default() -> Self {
        compose(&AnimatableState::default())
    }
}

/// Compose a state into a transform description.
pub fn compose(state: &AnimatableState) -> ComposedTransform {
    ComposedTransform {
        translate: (state.x, state.y),
        scale: state.scale,
        rotate: state.rotate,
        opacity: state.opacity,
    }
}

impl ComposedTransform {
    /// CSS `transform` value, e.g. `translate(10px, 0px) scale(1.5) rotate(45deg)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// The equivalent affine matrix, `T * S * R`.
    pub fn matrix(&self) -> Transform2D {
        Transform2D::translate(self.translate.0, self.translate.1)
            .then(&Transform2D::scale_uniform(self.scale))
            .then(&Transform2D::rotate_deg(self.rotate))
    }

    /// Returns true if the geometry is the identity.
    pub fn is_identity(&self) -> bool {
        self.translate == (0.0, 0.0) && self.scale == 1.0 && self.rotate == 0.0
    }
}

impl fmt::Display for ComposedTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `+ 0.0` folds -0 into 0 so settled values print cleanly.
        write!(
            f,
            "translate({}px, {}px) scale({}) rotate({}deg)",
            self.translate.0 + 0.0,
            self.translate.1 + 0.0,
            self.scale + 0.0,
            self.rotate + 0.0,
        )
    }
}

/// A 2D affine transform.
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0  1  |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self::translate(0.0, 0.0)
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn scale_uniform(s: f64) -> Self {
        Self::scale(s, s)
    }

    /// Rotation by `angle` radians (clockwise in y-down screen space).
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn rotate_deg(degrees: f64) -> Self {
        Self::rotate(degrees * PI / 180.0)
    }

    /// `self * other`: applies `other` first, then `self`.
    pub fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// CSS `matrix(a, b, c, d, tx, ty)` form.
    pub fn to_css(&self) -> String {
        format!(
            "matrix({}, {}, {}, {}, {}, {})",
            self.a, self.b, self.c, self.d, self.tx, self.ty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_default_composes_to_identity() {
        let t = compose(&AnimatableState::default());
        assert!(t.is_identity());
        assert_eq!(t.opacity, 1.0);
        assert_eq!(t.to_css(), "translate(0px, 0px) scale(1) rotate(0deg)");
        assert_eq!(t.matrix(), Transform2D::identity());
    }

    #[test]
    fn test_css_formatting() {
        let t = compose(&AnimatableState {
            x: 10.0,
            y: -2.5,
            scale: 1.5,
            opacity: 0.3,
            rotate: 45.0,
        });
        assert_eq!(t.to_css(), "translate(10px, -2.5px) scale(1.5) rotate(45deg)");
    }

    #[test]
    fn test_negative_zero_prints_as_zero() {
        let t = compose(&AnimatableState {
            x: -0.0,
            rotate: -0.0,
            ..Default::default()
        });
        assert_eq!(t.to_css(), "translate(0px, 0px) scale(1) rotate(0deg)");
    }

    #[test]
    fn test_order_translate_scale_rotate() {
        let t = compose(&AnimatableState {
            x: 10.0,
            scale: 2.0,
            rotate: 90.0,
            ..Default::default()
        });
        // Rotate first, then scale, then translate.
        assert!(close(t.matrix().apply_point(1.0, 0.0), (10.0, 2.0)));

        // Reordering changes the result.
        let reordered = Transform2D::rotate_deg(90.0)
            .then(&Transform2D::scale_uniform(2.0))
            .then(&Transform2D::translate(10.0, 0.0));
        assert!(!close(reordered.apply_point(1.0, 0.0), (10.0, 2.0)));
    }

    #[test]
    fn test_opacity_not_in_matrix() {
        let faded = compose(&AnimatableState {
            opacity: 0.0,
            ..Default::default()
        });
        assert_eq!(faded.matrix(), Transform2D::identity());
        assert!(faded.is_identity());
    }
}
