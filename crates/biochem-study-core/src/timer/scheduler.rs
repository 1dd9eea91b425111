//! Repeating-task scheduling.
//!
//! The timer never owns a thread. It asks a [`Scheduler`] for a repeating
//! task and holds the returned [`ScheduledTask`]; dropping that handle stops
//! the task.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;

pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// Run `task` every `interval` until the returned handle is dropped.
    /// The first run happens one interval after scheduling.
    fn schedule_repeating(&self, interval: Duration, task: RepeatingTask) -> ScheduledTask;
}

/// Cancels its task when dropped.
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(self) {}
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs tasks on a tokio runtime via `tokio::time::interval`.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler for the runtime the caller is running on, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, interval: Duration, mut task: RepeatingTask) -> ScheduledTask {
        let period = interval.max(Duration::from_millis(1));
        let join = self.handle.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                task();
            }
        });
        ScheduledTask::new(move || join.abort())
    }
}

type SharedTask = Arc<Mutex<RepeatingTask>>;

#[derive(Default)]
struct ManualState {
    next_id: u64,
    tasks: BTreeMap<u64, (Duration, SharedTask)>,
}

/// Test scheduler: tasks run only when [`ManualScheduler::fire`] is called.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every active task once, in scheduling order. Returns how many ran.
    ///
    /// A task cancelled by an earlier task in the same round is skipped.
    pub fn fire(&self) -> usize {
        let snapshot: Vec<(u64, SharedTask)> = lock(&self.state)
            .tasks
            .iter()
            .map(|(id, (_, task))| (*id, Arc::clone(task)))
            .collect();

        let mut ran = 0;
        for (id, task) in snapshot {
            if !lock(&self.state).tasks.contains_key(&id) {
                continue;
            }
            let mut task = lock(&task);
            (*task)();
            ran += 1;
        }
        ran
    }

    pub fn active_tasks(&self) -> usize {
        lock(&self.state).tasks.len()
    }

    /// Intervals of the active tasks, in scheduling order.
    pub fn intervals(&self) -> Vec<Duration> {
        lock(&self.state)
            .tasks
            .values()
            .map(|(interval, _)| *interval)
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, task: RepeatingTask) -> ScheduledTask {
        let id = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.tasks.insert(id, (interval, Arc::new(Mutex::new(task))));
            id
        };
        let state = Arc::clone(&self.state);
        ScheduledTask::new(move || {
            lock(&state).tasks.remove(&id);
        })
    }
}
