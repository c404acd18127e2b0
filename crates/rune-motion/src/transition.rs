//! Transition configuration.
//!
//! - `TransitionConfig`: the authored form (JSON/TOML), with an optional `type`
//!   discriminant and loosely typed fields
//! - `TransitionSpec`: the validated form, either a spring or a tween
//! - `TransitionDefaults`: built-in values for any field a spec leaves unset
//!
//! Validation from config to spec goes through [`validate_kind`] only. A spring
//! accepts `"spring"` or no discriminant; a tween requires `"tween"` exactly.
//!
//! # Example
//!
//! ```
//! use rune_motion::transition::{TransitionConfig, TransitionSpec};
//!
//! let config: TransitionConfig =
//!     serde_json::from_str(r#"{"type": "tween", "duration_ms": 250}"#).unwrap();
//! let spec = TransitionSpec::from_config(&config).unwrap();
//! assert!(matches!(spec, TransitionSpec::Tween(_)));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use rune_motion_config::MotionConfig;

use crate::easing::{Easing, EasingFunction};
use crate::error::{MotionError, Result};
use crate::spring::SpringParams;
use crate::tween::TweenParams;

/// The two supported transition families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Spring,
    Tween,
}

impl TransitionKind {
    /// The discriminant string used in authored configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Tween => "tween",
        }
    }
}

/// Check an authored discriminant against the kind a constructor builds.
///
/// A spring accepts its own name or no discriminant at all; a tween only
/// accepts its own name.
pub fn validate_kind(kind: Option<&str>, expected: TransitionKind) -> Result<()> {
    let accepted = match (kind, expected) {
        (None, TransitionKind::Spring) => true,
        (None, TransitionKind::Tween) => false,
        (Some(k), _) => k == expected.as_str(),
    };

    if accepted {
        Ok(())
    } else {
        Err(MotionError::InvalidTransitionKind {
            kind: kind.unwrap_or_default().to_owned(),
        })
    }
}

/// A transition as authored in a variant table or attach props.
///
/// Spring fields and tween fields may both be present; only those matching the
/// discriminant are read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// `"spring"`, `"tween"`, or absent (spring).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stiffness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<f64>,

    /// Tween duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<EasingFunction>,
}

impl TransitionConfig {
    /// A spring config with no discriminant and all parameters defaulted.
    pub fn spring() -> Self {
        Self::default()
    }

    /// A tween config with the given duration.
    pub fn tween(duration_ms: f64) -> Self {
        Self {
            kind: Some(TransitionKind::Tween.as_str().to_owned()),
            duration_ms: Some(duration_ms),
            ..Self::default()
        }
    }

    /// Set the discriminant verbatim.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = Some(stiffness);
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = Some(damping);
        self
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = Some(easing);
        self
    }
}

/// Spring parameters; unset fields fall back to [`TransitionDefaults`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringOptions {
    pub stiffness: Option<f64>,
    pub damping: Option<f64>,
    pub precision: Option<f64>,
}

impl SpringOptions {
    /// Build from an authored config. Accepts `"spring"` or no discriminant.
    pub fn from_config(config: &TransitionConfig) -> Result<Self> {
        validate_kind(config.kind.as_deref(), TransitionKind::Spring)?;
        Ok(Self {
            stiffness: config.stiffness,
            damping: config.damping,
            precision: config.precision,
        })
    }

    /// Fill unset fields from `defaults`. A precision that could never be met
    /// is replaced by the default one.
    pub fn resolve(&self, defaults: &SpringParams) -> SpringParams {
        SpringParams {
            stiffness: self.stiffness.unwrap_or(defaults.stiffness),
            damping: self.damping.unwrap_or(defaults.damping),
            precision: self
                .precision
                .filter(|p| SpringParams::is_valid_precision(*p))
                .unwrap_or(defaults.precision),
        }
    }
}

/// Tween parameters; unset fields fall back to [`TransitionDefaults`].
#[derive(Debug, Clone, Default)]
pub struct TweenOptions {
    pub duration: Option<Duration>,
    pub easing: Option<Easing>,
}

impl TweenOptions {
    /// Build from an authored config. Requires the `"tween"` discriminant.
    pub fn from_config(config: &TransitionConfig) -> Result<Self> {
        validate_kind(config.kind.as_deref(), TransitionKind::Tween)?;
        Ok(Self {
            duration: config.duration_ms.map(duration_from_ms),
            easing: config.easing.map(Easing::from),
        })
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// Fill unset fields from `defaults`.
    pub fn resolve(&self, defaults: &TransitionDefaults) -> TweenParams {
        TweenParams {
            duration: self.duration.unwrap_or(defaults.tween_duration),
            easing: self
                .easing
                .clone()
                .unwrap_or(Easing::Curve(defaults.tween_easing)),
        }
    }
}

/// A validated transition.
#[derive(Debug, Clone)]
pub enum TransitionSpec {
    Spring(SpringOptions),
    Tween(TweenOptions),
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::Spring(SpringOptions::default())
    }
}

impl TransitionSpec {
    /// Validate an authored config.
    ///
    /// Fails with [`MotionError::InvalidTransitionKind`] when the discriminant is
    /// present but names neither family.
    pub fn from_config(config: &TransitionConfig) -> Result<Self> {
        if validate_kind(config.kind.as_deref(), TransitionKind::Tween).is_ok() {
            TweenOptions::from_config(config).map(Self::Tween)
        } else {
            SpringOptions::from_config(config).map(Self::Spring)
        }
    }

    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Spring(_) => TransitionKind::Spring,
            Self::Tween(_) => TransitionKind::Tween,
        }
    }

    /// Fill unset parameters from `defaults`.
    pub fn resolve(&self, defaults: &TransitionDefaults) -> ResolvedTransition {
        match self {
            Self::Spring(opts) => ResolvedTransition::Spring(opts.resolve(&defaults.spring)),
            Self::Tween(opts) => ResolvedTransition::Tween(opts.resolve(defaults)),
        }
    }
}

/// A transition with every parameter decided.
#[derive(Debug, Clone)]
pub enum ResolvedTransition {
    Spring(SpringParams),
    Tween(TweenParams),
}

/// Built-in parameters for fields a transition leaves unset.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionDefaults {
    pub spring: SpringParams,
    pub tween_duration: Duration,
    pub tween_easing: EasingFunction,
}

impl Default for TransitionDefaults {
    fn default() -> Self {
        Self::from_config(&MotionConfig::default())
    }
}

impl TransitionDefaults {
    /// A non-positive or non-finite `spring.precision` is replaced by the
    /// built-in value, since a spring could never settle against it.
    pub fn from_config(config: &MotionConfig) -> Self {
        let mut precision = config.spring.precision;
        if !SpringParams::is_valid_precision(precision) {
            let fallback = SpringParams::default().precision;
            warn!(precision, fallback, "spring precision must be positive; using built-in value");
            precision = fallback;
        }

        Self {
            spring: SpringParams {
                stiffness: config.spring.stiffness,
                damping: config.spring.damping,
                precision,
            },
            tween_duration: duration_from_ms(config.tween.duration_ms),
            tween_easing: config.tween.easing.into(),
        }
    }
}

/// Non-positive or non-finite durations become zero, which settles instantly.
fn duration_from_ms(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}
