//! Animatable state types.
//!
//! - `AnimatableState`: the full set of animated values for one element
//! - `PartialState`: a sparse target where absent fields keep their current value
//! - `AnimatableField`: enum over the individual channels, used by the drivers

use serde::{Deserialize, Serialize};

/// One animated channel of an [`AnimatableState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatableField {
    X,
    Y,
    Scale,
    Opacity,
    Rotate,
}

impl AnimatableField {
    /// Every field, in the order drivers advance them.
    pub const ALL: [Self; 5] = [Self::X, Self::Y, Self::Scale, Self::Opacity, Self::Rotate];

    /// Returns true if this field describes geometry (as opposed to opacity).
    pub fn is_geometry(&self) -> bool {
        !matches!(self, Self::Opacity)
    }
}

/// The values being interpolated for a single element.
///
/// Rotation is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatableState {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub opacity: f64,
    pub rotate: f64,
}

impl Default for AnimatableState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            opacity: 1.0,
            rotate: 0.0,
        }
    }
}

impl AnimatableState {
    /// Read a single field.
    pub fn get(&self, field: AnimatableField) -> f64 {
        match field {
            AnimatableField::X => self.x,
            AnimatableField::Y => self.y,
            AnimatableField::Scale => self.scale,
            AnimatableField::Opacity => self.opacity,
            AnimatableField::Rotate => self.rotate,
        }
    }

    /// Write a single field.
    pub fn set(&mut self, field: AnimatableField, value: f64) {
        match field {
            AnimatableField::X => self.x = value,
            AnimatableField::Y => self.y = value,
            AnimatableField::Scale => self.scale = value,
            AnimatableField::Opacity => self.opacity = value,
            AnimatableField::Rotate => self.rotate = value,
        }
    }

    /// Return a copy of this state with every field present in `partial` replaced.
    pub fn merged(&self, partial: &PartialState) -> Self {
        let mut out = *self;
        for field in AnimatableField::ALL {
            if let Some(value) = partial.get(field) {
                out.set(field, value);
            }
        }
        out
    }

    /// Returns true if every field is a finite number.
    pub fn is_finite(&self) -> bool {
        AnimatableField::ALL
            .iter()
            .all(|field| self.get(*field).is_finite())
    }
}

impl From<AnimatableState> for PartialState {
    fn from(s: AnimatableState) -> Self {
        Self {
            x: Some(s.x),
            y: Some(s.y),
            scale: Some(s.scale),
            opacity: Some(s.opacity),
            rotate: Some(s.rotate),
        }
    }
}

/// A sparse animation target.
///
/// Applying a partial state is a merge: fields left as `None` keep whatever value
/// the interpolator currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
}

impl PartialState {
    /// Create an empty partial state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_rotate(mut self, rotate: f64) -> Self {
        self.rotate = Some(rotate);
        self
    }

    /// Read a single field, if set.
    pub fn get(&self, field: AnimatableField) -> Option<f64> {
        match field {
            AnimatableField::X => self.x,
            AnimatableField::Y => self.y,
            AnimatableField::Scale => self.scale,
            AnimatableField::Opacity => self.opacity,
            AnimatableField::Rotate => self.rotate,
        }
    }

    /// Set or clear a single field.
    pub fn set(&mut self, field: AnimatableField, value: Option<f64>) {
        match field {
            AnimatableField::X => self.x = value,
            AnimatableField::Y => self.y = value,
            AnimatableField::Scale => self.scale = value,
            AnimatableField::Opacity => self.opacity = value,
            AnimatableField::Rotate => self.rotate = value,
        }
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn overlay(&self, other: &PartialState) -> Self {
        let mut out = *self;
        for field in AnimatableField::ALL {
            if let Some(value) = other.get(field) {
                out.set(field, Some(value));
            }
        }
        out
    }

    /// Keep only the geometric fields (x, y, scale, rotate).
    pub fn geometry(&self) -> Self {
        Self {
            opacity: None,
            ..*self
        }
    }

    /// Fill every unset field from the engine defaults.
    pub fn resolve(&self) -> AnimatableState {
        AnimatableState::default().merged(self)
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        AnimatableField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}
