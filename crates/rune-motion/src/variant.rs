//! Variants and target resolution.
//!
//! A variant is a named partial state plus an optional transition. Variant
//! tables are authored as plain maps:
//!
//! ```
//! use rune_motion::variant::{resolve, AnimationTarget, VariantTable};
//!
//! let table: VariantTable = serde_json::from_str(r#"{
//!     "hidden":  { "opacity": 0, "scale": 0.8 },
//!     "visible": { "opacity": 1, "scale": 1, "transition": { "type": "tween", "duration_ms": 200 } }
//! }"#).unwrap();
//!
//! let resolved = resolve(&AnimationTarget::name("visible"), &table).unwrap();
//! assert_eq!(resolved.state.scale, Some(1.0));
//! assert!(resolved.transition.is_some());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::state::PartialState;
use crate::transition::TransitionConfig;

/// A named target state with its own transition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(flatten)]
    pub state: PartialState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionConfig>,
}

impl Variant {
    pub fn new(state: PartialState) -> Self {
        Self {
            state,
            transition: None,
        }
    }

    pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = Some(transition);
        self
    }
}

/// Variants by exact name. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantTable {
    variants: HashMap<String, Variant>,
}

impl VariantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a variant.
    pub fn insert(&mut self, name: impl Into<String>, variant: Variant) -> Option<Variant> {
        self.variants.insert(name.into(), variant)
    }

    pub fn with(mut self, name: impl Into<String>, variant: Variant) -> Self {
        let _ = self.insert(name, variant);
        self
    }

    /// Look up a variant, failing with `UnknownVariant` if it is missing.
    pub fn get(&self, name: &str) -> Result<&Variant> {
        self.variants.get(name).ok_or_else(|| MotionError::unknown_variant(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Variant names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variants.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// What to animate toward: a variant name or a literal state.
///
/// Authored as either a JSON string or a state object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationTarget {
    Variant(String),
    Literal(PartialState),
}

impl AnimationTarget {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Variant(name.into())
    }

    pub fn literal(state: PartialState) -> Self {
        Self::Literal(state)
    }

    pub fn variant_name(&self) -> Option<&str> {
        match self {
            Self::Variant(name) => Some(name),
            Self::Literal(_) => None,
        }
    }
}

impl Default for AnimationTarget {
    fn default() -> Self {
        Self::Literal(PartialState::default())
    }
}

impl From<&str> for AnimationTarget {
    fn from(name: &str) -> Self {
        Self::Variant(name.to_owned())
    }
}

impl From<PartialState> for AnimationTarget {
    fn from(state: PartialState) -> Self {
        Self::Literal(state)
    }
}

/// A resolved target: the variant's state and its transition, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedTarget {
    pub state: PartialState,
    pub transition: Option<TransitionConfig>,
}

/// Resolve `target` against `table`.
///
/// Literals pass through with no transition. Names are looked up exactly. No
/// merging with prior or parent state happens here.
pub fn resolve(target: &AnimationTarget, table: &VariantTable) -> Result<ResolvedTarget> {
    match target {
        AnimationTarget::Literal(state) => Ok(ResolvedTarget {
            state: *state,
            transition: None,
        }),
        AnimationTarget::Variant(name) => {
            let variant = table.get(name)?;
            Ok(ResolvedTarget {
                state: variant.state,
                transition: variant.transition.clone(),
            })
        }
    }
}
