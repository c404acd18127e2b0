//! Error types for the motion engine.

use thiserror::Error;

/// Result type for motion operations.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Errors that can occur while attaching, updating, or configuring animations.
///
/// All of these are configuration errors: they are reported synchronously to the
/// caller and never retried by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// A transition's `type` discriminant is neither `spring` nor `tween`.
    #[error("invalid transition kind {kind:?}: expected \"spring\" or \"tween\"")]
    InvalidTransitionKind {
        /// The discriminant that was supplied.
        kind: String,
    },

    /// A variant name has no entry in the variant table.
    #[error("unknown variant {name:?}")]
    UnknownVariant {
        /// The name that was looked up.
        name: String,
    },

    /// Propagation was configured to search zero levels below the root.
    #[error("propagation depth must be at least 1")]
    InvalidPropagationDepth,
}

impl MotionError {
    pub(crate) fn unknown_variant(name: &str) -> Self {
        Self::UnknownVariant {
            name: name.to_owned(),
        }
    }
}
