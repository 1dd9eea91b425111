mod clock;
mod engine;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    DriftHook, HookHandle, SessionTimer, TimerHook, TimerOptions, TimerSnapshot, TimerState,
    DEFAULT_DRIFT_THRESHOLD_SECS, DEFAULT_TICK_INTERVAL,
};
pub use scheduler::{ManualScheduler, RepeatingTask, ScheduledTask, Scheduler, TokioScheduler};
