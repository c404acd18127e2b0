//! Descendant compensation.
//!
//! Nested transforms compound: a child rendered inside a rotated, scaled parent
//! inherits both. Compensation subtracts the parent's declared contribution from
//! the child's own target so the child lands where its variant says.
//!
//! The scale rule is additive, matching rotation, with one exception: a parent
//! scale that is unset or exactly `1` contributes nothing.

use crate::state::PartialState;

/// The scale a parent target contributes to its descendants.
pub fn parent_scale_contribution(parent: &PartialState) -> f64 {
    match parent.scale {
        None => 0.0,
        Some(s) if s == 1.0 => 0.0,
        Some(s) => s,
    }
}

/// Compensate `child` against `parent`.
///
/// - `rotate' = child.rotate - parent.rotate` (unset values count as 0)
/// - `scale' = child.scale - parent_scale_contribution(parent)` (unset child
///   scale counts as 1)
/// - `x`, `y` and `opacity` pass through
///
/// A field stays unset when neither side says anything about it, so the
/// interpolator keeps its current value there.
pub fn compensate(child: &PartialState, parent: &PartialState) -> PartialState {
    let rotate = match (child.rotate, parent.rotate) {
        (None, None) => None,
        (c, p) => Some(c.unwrap_or(0.0) - p.unwrap_or(0.0)),
    };

    let contribution = parent_scale_contribution(parent);
    let scale = match child.scale {
        None if contribution == 0.0 => None,
        c => Some(c.unwrap_or(1.0) - contribution),
    };

    PartialState {
        x: child.x,
        y: child.y,
        scale,
        opacity: child.opacity,
        rotate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parent_scale_is_not_subtracted() {
        let child = PartialState::new().with_scale(2.0);
        let out = compensate(&child, &PartialState::new().with_scale(1.0));
        assert_eq!(out.scale, Some(2.0));
    }

    #[test]
    fn test_non_unit_parent_scale_is_subtracted() {
        let child = PartialState::new().with_scale(2.0);
        let out = compensate(&child, &PartialState::new().with_scale(3.0));
        assert_eq!(out.scale, Some(-1.0));
    }

    #[test]
    fn test_rotation_is_relative() {
        let child = PartialState::new().with_rotate(30.0);
        let out = compensate(&child, &PartialState::new().with_rotate(45.0));
        assert_eq!(out.rotate, Some(-15.0));

        let counter = compensate(&PartialState::new(), &PartialState::new().with_rotate(90.0));
        assert_eq!(counter.rotate, Some(-90.0));
    }

    #[test]
    fn test_translation_and_opacity_pass_through() {
        let child = PartialState::new().with_x(5.0).with_y(-3.0).with_opacity(0.4);
        let parent = PartialState::new().with_x(100.0).with_opacity(0.1).with_scale(2.0);
        let out = compensate(&child, &parent);
        assert_eq!(out.x, Some(5.0));
        assert_eq!(out.y, Some(-3.0));
        assert_eq!(out.opacity, Some(0.4));
        assert_eq!(out.scale, Some(-1.0));
    }

    #[test]
    fn test_nothing_to_compensate() {
        let out = compensate(&PartialState::new(), &PartialState::new().with_scale(1.0));
        assert!(out.is_empty());
    }
}
