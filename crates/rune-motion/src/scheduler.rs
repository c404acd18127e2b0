//! Frame scheduler.
//!
//! The host's animation clock drives every interpolator through a
//! [`FrameScheduler`]. Interpolators register a tick task only while they are in
//! motion and drop out once settled or disposed, so an idle scheduler costs
//! nothing per frame.
//!
//! Tasks run in registration-id order, and ids are handed out when interpolators
//! are created, so within one tick interpolators emit in creation order.
//!
//! ```text
//! host frame callback
//!   └── FrameScheduler::tick(dt)
//!         ├── task #1 (root interpolator)    -> emit
//!         ├── task #2 (first descendant)     -> emit
//!         └── ...
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Identifier of a scheduled task, allocated per interpolator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// Advances by `dt` seconds; returns false once the task should be dropped.
pub(crate) type TickTask = Box<dyn FnMut(f64) -> bool>;

#[derive(Default)]
struct SchedulerInner {
    tasks: BTreeMap<TaskId, TickTask>,
    next_id: u64,
    frame: u64,
    ticking: bool,
    /// Ids cancelled while their task was checked out for a tick.
    cancelled: HashSet<TaskId>,
}

/// Single-threaded scheduler shared by every interpolator of an engine.
///
/// Cloning yields another handle to the same scheduler.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate_id(&self) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        TaskId(inner.next_id)
    }

    pub(crate) fn schedule(&self, id: TaskId, task: TickTask) {
        let mut inner = self.inner.borrow_mut();
        let _ = inner.cancelled.remove(&id);
        let _ = inner.tasks.insert(id, task);
    }

    pub(crate) fn cancel(&self, id: TaskId) {
        let mut inner = self.inner.borrow_mut();
        if inner.tasks.remove(&id).is_none() && inner.ticking {
            let _ = inner.cancelled.insert(id);
        }
    }

    /// Advance every active task by `dt`.
    ///
    /// Returns true if any task is still active afterwards.
    pub fn tick(&self, dt: Duration) -> bool {
        self.tick_seconds(dt.as_secs_f64())
    }

    /// Advance every active task by `dt` seconds.
    ///
    /// Tasks may schedule or cancel other tasks while running; newly scheduled
    /// tasks first run on the next tick.
    pub fn tick_seconds(&self, dt: f64) -> bool {
        let running = {
            let mut inner = self.inner.borrow_mut();
            if inner.ticking {
                tracing::warn!("FrameScheduler::tick called re-entrantly; ignoring");
                return !inner.tasks.is_empty();
            }
            inner.ticking = true;
            std::mem::take(&mut inner.tasks)
        };

        let mut survivors = Vec::with_capacity(running.len());
        for (id, mut task) in running {
            if self.inner.borrow().cancelled.contains(&id) {
                continue;
            }
            if task(dt) {
                survivors.push((id, task));
            }
        }

        let mut inner = self.inner.borrow_mut();
        for (id, task) in survivors {
            if !inner.cancelled.contains(&id) {
                let _ = inner.tasks.entry(id).or_insert(task);
            }
        }
        inner.cancelled.clear();
        inner.ticking = false;
        inner.frame += 1;
        !inner.tasks.is_empty()
    }

    /// Tick at a fixed step until idle or `max_frames` is reached.
    ///
    /// Returns the number of frames run.
    pub fn run_until_idle(&self, dt: Duration, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && !self.is_idle() {
            let _ = self.tick(dt);
            frames += 1;
        }
        frames
    }

    /// Number of tasks currently consuming ticks.
    pub fn active_count(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of ticks run so far.
    pub fn frame(&self) -> u64 {
        self.inner.borrow().frame
    }
}

/// Converts wall-clock instants into scheduler ticks.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick `scheduler` with the time elapsed since the previous call.
    ///
    /// The first call ticks with a zero delta.
    pub fn tick(&mut self, scheduler: &FrameScheduler, now: Instant) -> bool {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        scheduler.tick(dt)
    }
}
