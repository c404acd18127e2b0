//! Value interpolators.
//!
//! A [`ValueInterpolator`] owns one evolving [`AnimatableState`] and drives it
//! toward a target with either a spring or a tween. Every advance is pushed to
//! subscribers; there is no polling API for rendering.
//!
//! Interpolators are cheap handles (`Rc`) and are advanced by a shared
//! [`FrameScheduler`]. While settled they hold no scheduler task.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::scheduler::{FrameScheduler, TaskId};
use crate::spring::SpringDriver;
use crate::state::{AnimatableState, PartialState};
use crate::transition::{
    ResolvedTransition, TransitionConfig, TransitionDefaults, TransitionKind, TransitionSpec,
};
use crate::tween::TweenDriver;

type Callback = Rc<RefCell<Box<dyn FnMut(&AnimatableState)>>>;

/// Identifies one subscriber of an interpolator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Debug, Clone)]
enum Driver {
    Spring(SpringDriver),
    Tween(TweenDriver),
}

impl Driver {
    fn new(transition: ResolvedTransition) -> Self {
        match transition {
            ResolvedTransition::Spring(params) => Self::Spring(SpringDriver::new(params)),
            ResolvedTransition::Tween(params) => Self::Tween(TweenDriver::new(params)),
        }
    }

    fn kind(&self) -> TransitionKind {
        match self {
            Self::Spring(_) => TransitionKind::Spring,
            Self::Tween(_) => TransitionKind::Tween,
        }
    }

    fn is_settled(&self) -> bool {
        match self {
            Self::Spring(d) => d.is_settled(),
            Self::Tween(d) => d.is_settled(),
        }
    }

    fn step(&mut self, current: &mut AnimatableState, target: &AnimatableState, dt: f64) -> bool {
        match self {
            Self::Spring(d) => d.step(current, target, dt),
            Self::Tween(d) => d.step(current, target, dt),
        }
    }
}

/// What a retarget requires of the interpolator.
enum Retarget {
    Idle,
    Animate,
    Snap,
}

struct InterpolatorInner {
    id: TaskId,
    current: AnimatableState,
    target: AnimatableState,
    driver: Driver,
    subscribers: Vec<(SubscriberId, Callback)>,
    next_subscriber: u64,
    scheduled: bool,
    disposed: bool,
}

/// A continuously evolving [`AnimatableState`].
///
/// Cloning yields another handle to the same interpolator.
#[derive(Clone)]
pub struct ValueInterpolator {
    inner: Rc<RefCell<InterpolatorInner>>,
    scheduler: FrameScheduler,
}

impl ValueInterpolator {
    /// Create an interpolator resting at `initial`.
    pub fn new(
        scheduler: &FrameScheduler,
        initial: AnimatableState,
        transition: ResolvedTransition,
    ) -> Self {
        let inner = InterpolatorInner {
            id: scheduler.allocate_id(),
            current: initial,
            target: initial,
            driver: Driver::new(transition),
            subscribers: Vec::new(),
            next_subscriber: 0,
            scheduled: false,
            disposed: false,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
            scheduler: scheduler.clone(),
        }
    }

    /// Create from a validated spec, filling unset parameters from `defaults`.
    pub fn with_spec(
        scheduler: &FrameScheduler,
        initial: AnimatableState,
        spec: &TransitionSpec,
        defaults: &TransitionDefaults,
    ) -> Self {
        Self::new(scheduler, initial, spec.resolve(defaults))
    }

    /// Create from an authored transition.
    ///
    /// Fails with `InvalidTransitionKind` when the config's discriminant names
    /// neither a spring nor a tween.
    pub fn from_config(
        scheduler: &FrameScheduler,
        initial: AnimatableState,
        config: &TransitionConfig,
        defaults: &TransitionDefaults,
    ) -> Result<Self> {
        let spec = TransitionSpec::from_config(config)?;
        Ok(Self::with_spec(scheduler, initial, &spec, defaults))
    }

    /// Merge `partial` into the target and start moving toward it.
    ///
    /// Fields absent from `partial` keep their previous target. A zero-duration
    /// tween lands on the target immediately and emits before returning.
    ///
    /// Non-finite target values are not rejected and their results are
    /// undefined. A NaN field propagates into the current state, and under a
    /// spring it never satisfies the settle check, so the interpolator keeps its
    /// scheduler task until disposed. Retargeting to a finite value does not
    /// recover a field that is already NaN.
    pub fn set_target(&self, partial: &PartialState) {
        let action = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            if inner.disposed {
                return;
            }

            inner.target = inner.target.merged(partial);
            let current = inner.current;
            let target = inner.target;

            let action = match &mut inner.driver {
                Driver::Spring(driver) => {
                    if driver.retarget(&current, &target) {
                        Retarget::Animate
                    } else {
                        Retarget::Idle
                    }
                }
                Driver::Tween(driver) if driver.is_instant() => {
                    let _ = driver.retarget(&target, &target);
                    if current == target {
                        Retarget::Idle
                    } else {
                        inner.current = target;
                        Retarget::Snap
                    }
                }
                Driver::Tween(driver) => {
                    if driver.retarget(&current, &target) {
                        Retarget::Animate
                    } else {
                        Retarget::Idle
                    }
                }
            };

            tracing::trace!(
                task = ?inner.id,
                kind = inner.driver.kind().as_str(),
                ?target,
                "interpolator retargeted"
            );

            if matches!(action, Retarget::Animate) && !inner.scheduled {
                inner.scheduled = true;
                let weak = Rc::downgrade(&self.inner);
                let id = inner.id;
                drop(guard);
                self.scheduler
                    .schedule(id, Box::new(move |dt| Self::advance(&weak, dt)));
            }
            action
        };

        if matches!(action, Retarget::Snap) {
            let state = self.inner.borrow().current;
            Self::emit(&self.inner, &state);
        }
    }

    /// Register `callback`, invoking it immediately with the current state.
    pub fn subscribe(&self, callback: impl FnMut(&AnimatableState) + 'static) -> Subscription {
        let callback: Callback = Rc::new(RefCell::new(Box::new(callback)));
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            inner.next_subscriber += 1;
            let id = SubscriberId(inner.next_subscriber);
            if !inner.disposed {
                inner.subscribers.push((id, callback.clone()));
            }
            (id, inner.current)
        };

        if !self.is_disposed() {
            if let Ok(mut f) = callback.try_borrow_mut() {
                (&mut **f)(&current);
            }
        }

        Subscription {
            interpolator: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Stop motion and drop every subscriber. Further calls are no-ops.
    pub fn dispose(&self) {
        let id = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            inner.scheduled = false;
            inner.subscribers.clear();
            inner.id
        };
        self.scheduler.cancel(id);
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    /// The most recently emitted state.
    pub fn current(&self) -> AnimatableState {
        self.inner.borrow().current
    }

    /// The merged target the interpolator is moving toward.
    pub fn target(&self) -> AnimatableState {
        self.inner.borrow().target
    }

    pub fn kind(&self) -> TransitionKind {
        self.inner.borrow().driver.kind()
    }

    /// Returns true while the interpolator holds a scheduler task.
    pub fn is_animating(&self) -> bool {
        self.inner.borrow().scheduled
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Scheduler task body. Returns false once the task should be dropped.
    fn advance(weak: &Weak<RefCell<InterpolatorInner>>, dt: f64) -> bool {
        let Some(inner) = weak.upgrade() else {
            return false;
        };

        let (state, keep) = {
            let mut guard = inner.borrow_mut();
            let this = &mut *guard;
            if this.disposed || this.driver.is_settled() {
                this.scheduled = false;
                return false;
            }
            if dt <= 0.0 {
                return true;
            }

            let settled = this.driver.step(&mut this.current, &this.target, dt);
            if settled {
                this.scheduled = false;
                tracing::trace!(task = ?this.id, state = ?this.current, "interpolator settled");
            }
            (this.current, !settled)
        };

        Self::emit(&inner, &state);
        keep
    }

    fn emit(inner: &Rc<RefCell<InterpolatorInner>>, state: &AnimatableState) {
        let subscribers: Vec<(SubscriberId, Callback)> = inner.borrow().subscribers.clone();
        for (id, callback) in subscribers {
            {
                let this = inner.borrow();
                if this.disposed || !this.subscribers.iter().any(|(sid, _)| *sid == id) {
                    continue;
                }
            }
            // A callback already on the stack is not re-entered.
            if let Ok(mut f) = callback.try_borrow_mut() {
                (&mut **f)(state);
            }
        }
    }
}

/// Handle returned by [`ValueInterpolator::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    interpolator: Weak<RefCell<InterpolatorInner>>,
    id: SubscriberId,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Stop receiving states. Safe to call after the interpolator is gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.interpolator.upgrade() {
            inner
                .borrow_mut()
                .subscribers
                .retain(|(id, _)| *id != self.id);
        }
    }
}
