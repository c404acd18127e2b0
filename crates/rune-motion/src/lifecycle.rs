//! Attaching the engine to an element tree.
//!
//! [`attach`] resolves the root target, discovers marked descendants, and wires
//! one interpolator per node to that node's style sink. The returned
//! [`MotionHandle`] owns every interpolator it created.
//!
//! ```
//! use rune_motion::{attach, EngineOptions, FrameScheduler, MotionProps};
//! use rune_motion::state::PartialState;
//! use rune_motion::tree::Element;
//! use std::time::Duration;
//!
//! let root = Element::new("card");
//! let scheduler = FrameScheduler::new();
//! let props = MotionProps::literal(PartialState::new().with_x(20.0));
//!
//! let handle = attach(&root, &props, &scheduler, &EngineOptions::default()).unwrap();
//! scheduler.run_until_idle(Duration::from_millis(16), 1_000);
//! assert_eq!(root.style().unwrap().translate, (20.0, 0.0));
//! handle.detach();
//! ```

use tracing::{debug, warn};

use rune_motion_config::MotionConfig;

use crate::error::Result;
use crate::interpolator::{Subscription, ValueInterpolator};
use crate::propagate::{propagate, PropagationDepth};
use crate::scheduler::FrameScheduler;
use crate::state::{AnimatableState, PartialState};
use crate::transform::compose;
use crate::transition::{TransitionConfig, TransitionDefaults, TransitionSpec};
use crate::tree::MotionNode;
use crate::variant::{resolve, AnimationTarget, VariantTable};

/// Engine-wide settings for an attachment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineOptions {
    pub depth: PropagationDepth,
    pub defaults: TransitionDefaults,
}

impl EngineOptions {
    /// Fails with `InvalidPropagationDepth` when the configured depth is zero.
    pub fn from_config(config: &MotionConfig) -> Result<Self> {
        Ok(Self {
            depth: PropagationDepth::new(config.propagation.depth)?,
            defaults: TransitionDefaults::from_config(config),
        })
    }

    pub fn with_depth(mut self, depth: PropagationDepth) -> Self {
        self.depth = depth;
        self
    }
}

/// Inputs to [`attach`] and [`MotionHandle::update`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionProps {
    pub target: AnimationTarget,
    pub variants: VariantTable,
    /// Overrides the root variant's own transition and is the fallback for
    /// descendants whose variant has none.
    pub transition: Option<TransitionConfig>,
}

impl MotionProps {
    /// Target a variant from `variants`.
    pub fn variant(name: impl Into<String>, variants: VariantTable) -> Self {
        Self {
            target: AnimationTarget::name(name),
            variants,
            transition: None,
        }
    }

    /// Target a literal state with an empty variant table.
    pub fn literal(state: PartialState) -> Self {
        Self {
            target: AnimationTarget::literal(state),
            ..Self::default()
        }
    }

    pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = Some(transition);
        self
    }

    /// The same props aimed at another variant.
    pub fn retarget(&self, name: impl Into<String>) -> Self {
        Self {
            target: AnimationTarget::name(name),
            ..self.clone()
        }
    }
}

/// A requested change of target on a live attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateRequest {
    RetargetByName(String),
    /// Not supported after attach; reported as [`UpdateOutcome::LiteralIgnored`].
    RetargetLiteral(PartialState),
}

impl From<&AnimationTarget> for UpdateRequest {
    fn from(target: &AnimationTarget) -> Self {
        match target {
            AnimationTarget::Variant(name) => Self::RetargetByName(name.clone()),
            AnimationTarget::Literal(state) => Self::RetargetLiteral(*state),
        }
    }
}

/// What an update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The root interpolator was given the named variant's state.
    Retargeted,
    /// A literal update was requested and nothing changed.
    LiteralIgnored,
}

struct NodeBinding {
    interpolator: ValueInterpolator,
    subscription: Option<Subscription>,
}

/// A live attachment. Detaching (or dropping) disposes every interpolator.
pub struct MotionHandle {
    bindings: Vec<NodeBinding>,
    variant: Option<String>,
    detached: bool,
}

/// Attach the engine to `root`.
///
/// Every target and transition is resolved and validated before the first
/// interpolator is created, so an `UnknownVariant` or `InvalidTransitionKind`
/// error leaves nothing behind.
pub fn attach<N: MotionNode>(
    root: &N,
    props: &MotionProps,
    scheduler: &FrameScheduler,
    options: &EngineOptions,
) -> Result<MotionHandle> {
    let resolved = resolve(&props.target, &props.variants)?;
    let root_spec = match props.transition.as_ref().or(resolved.transition.as_ref()) {
        Some(config) => TransitionSpec::from_config(config)?,
        None => TransitionSpec::default(),
    };
    let descendants = propagate(
        root,
        &resolved.state,
        &props.variants,
        options.depth,
        props.transition.as_ref(),
    )?;

    let mut bindings = Vec::with_capacity(descendants.len() + 1);
    bindings.push(bind(root, &root_spec, &resolved.state, scheduler, options));
    for found in &descendants {
        bindings.push(bind(
            &found.node,
            &found.transition,
            &found.target,
            scheduler,
            options,
        ));
    }

    let variant = props.target.variant_name().map(str::to_owned);
    debug!(
        nodes = bindings.len(),
        variant = variant.as_deref().unwrap_or("<literal>"),
        depth = options.depth.levels(),
        "motion attached"
    );

    Ok(MotionHandle {
        bindings,
        variant,
        detached: false,
    })
}

fn bind<N: MotionNode>(
    node: &N,
    spec: &TransitionSpec,
    target: &PartialState,
    scheduler: &FrameScheduler,
    options: &EngineOptions,
) -> NodeBinding {
    let interpolator =
        ValueInterpolator::with_spec(scheduler, AnimatableState::default(), spec, &options.defaults);
    let sink = node.style_sink();
    let subscription = interpolator.subscribe(move |state| sink.write_style(&compose(state)));
    interpolator.set_target(target);

    NodeBinding {
        interpolator,
        subscription: Some(subscription),
    }
}

impl MotionHandle {
    /// Apply new props. Only a variant-name target changes anything, and only on
    /// the root.
    pub fn update(&mut self, props: &MotionProps) -> Result<UpdateOutcome> {
        self.apply(UpdateRequest::from(&props.target), &props.variants)
    }

    /// Apply an explicit update request.
    ///
    /// Fails with `UnknownVariant` if the name is not in `variants`; the
    /// attachment is left unchanged in that case.
    pub fn apply(&mut self, request: UpdateRequest, variants: &VariantTable) -> Result<UpdateOutcome> {
        match request {
            UpdateRequest::RetargetByName(name) => {
                let variant = variants.get(&name)?;
                if let Some(root) = self.bindings.first() {
                    root.interpolator.set_target(&variant.state);
                }
                debug!(variant = %name, "motion retargeted");
                self.variant = Some(name);
                Ok(UpdateOutcome::Retargeted)
            }
            UpdateRequest::RetargetLiteral(state) => {
                warn!(?state, "literal retarget after attach is not supported; ignoring");
                Ok(UpdateOutcome::LiteralIgnored)
            }
        }
    }

    /// Dispose every interpolator in creation order.
    pub fn detach(mut self) {
        self.dispose_all();
    }

    /// Root first, then descendants in discovery order.
    pub fn interpolators(&self) -> impl Iterator<Item = &ValueInterpolator> {
        self.bindings.iter().map(|b| &b.interpolator)
    }

    pub fn root(&self) -> Option<&ValueInterpolator> {
        self.bindings.first().map(|b| &b.interpolator)
    }

    /// Number of animated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.bindings.len()
    }

    /// The variant most recently applied by name, if any.
    pub fn current_variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn is_animating(&self) -> bool {
        self.interpolators().any(ValueInterpolator::is_animating)
    }

    fn dispose_all(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        for binding in &mut self.bindings {
            if let Some(subscription) = binding.subscription.take() {
                subscription.unsubscribe();
            }
            binding.interpolator.dispose();
        }
        debug!(nodes = self.bindings.len(), "motion detached");
    }
}

impl Drop for MotionHandle {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
