//! Spring and tween driven transform animation for element trees.
//!
//! This crate provides:
//! - **Interpolators**: one continuously evolving state per element, driven by a
//!   spring or a tween and pushed to subscribers on every frame
//! - **Transform composition**: state to `translate -> scale -> rotate` plus opacity
//! - **Variants**: named target states resolved from a table
//! - **Propagation**: marked descendants pick up their own variants, compensated
//!   for the scale and rotation they inherit from the root
//!
//! # Architecture
//!
//! ```text
//! attach(root, props)
//!   ├── resolve root target (variant table)
//!   ├── propagate → marked descendants, compensated targets
//!   └── MotionHandle
//!         └── ValueInterpolator per node ──emit──▶ compose ──▶ StyleSink
//!
//! FrameScheduler::tick(dt)
//!   └── advances every interpolator in motion, in creation order
//! ```

pub mod compensate;
pub mod easing;
pub mod error;
pub mod interpolator;
pub mod lifecycle;
pub mod propagate;
pub mod scheduler;
pub mod spring;
pub mod state;
pub mod transform;
pub mod transition;
pub mod tree;
pub mod tween;
pub mod variant;

pub use compensate::compensate;
pub use easing::{Easing, EasingFunction, StepPosition};
pub use error::{MotionError, Result};
pub use interpolator::{Subscription, ValueInterpolator};
pub use lifecycle::{
    attach, EngineOptions, MotionHandle, MotionProps, UpdateOutcome, UpdateRequest,
};
pub use propagate::{propagate, PropagatedNode, PropagationDepth};
pub use scheduler::{FrameClock, FrameScheduler};
pub use spring::SpringParams;
pub use state::{AnimatableField, AnimatableState, PartialState};
pub use transform::{compose, ComposedTransform, Transform2D};
pub use transition::{
    validate_kind, TransitionConfig, TransitionDefaults, TransitionKind, TransitionSpec,
};
pub use tree::{Element, Marker, MotionNode, StyleSink};
pub use tween::TweenParams;
pub use variant::{resolve, AnimationTarget, ResolvedTarget, Variant, VariantTable};

pub use rune_motion_config::MotionConfig;
