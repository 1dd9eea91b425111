//! Session timer implementation.
//!
//! A count-up timer toward a fixed duration, reconciled against an external
//! authoritative elapsed value. It owns no thread: it asks an injected
//! [`Scheduler`] for one repeating task while running and reads time from an
//! injected [`Clock`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!         Running -> Completed   (elapsed reaches duration)
//! any     -> Idle                (reset)
//! ```
//!
//! ## Hooks
//!
//! - ui hooks fire on every tick, command and server sync
//! - network hooks fire on every tick and command, never on server sync
//!
//! Hooks run after the internal lock is released, so they may call back into
//! the timer.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::scheduler::{ScheduledTask, Scheduler};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_DRIFT_THRESHOLD_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Terminal until reset.
    Completed,
}

/// Read-only view of a timer. `remaining_seconds` is derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub session_id: String,
    pub state: TimerState,
    pub duration_seconds: u64,
    pub elapsed_seconds: f64,
    pub remaining_seconds: f64,
    pub last_updated: DateTime<Utc>,
}

pub type TimerHook = Arc<dyn Fn(&TimerSnapshot) + Send + Sync>;
pub type DriftHook = Arc<dyn Fn(f64, &TimerSnapshot) + Send + Sync>;

/// Construction parameters for [`SessionTimer`].
pub struct TimerOptions {
    pub session_id: String,
    pub duration_seconds: u64,
    pub tick_interval: Duration,
    /// Drift magnitude (seconds) above which `on_drift_detected` fires.
    pub drift_threshold_seconds: f64,
    /// Registered as the first ui hook.
    pub on_tick: Option<TimerHook>,
    pub on_state_change: Option<TimerHook>,
    pub on_drift_detected: Option<DriftHook>,
}

impl TimerOptions {
    pub fn new(session_id: impl Into<String>, duration_seconds: u64) -> Self {
        Self {
            session_id: session_id.into(),
            duration_seconds,
            tick_interval: DEFAULT_TICK_INTERVAL,
            drift_threshold_seconds: DEFAULT_DRIFT_THRESHOLD_SECS,
            on_tick: None,
            on_state_change: None,
            on_drift_detected: None,
        }
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn drift_threshold(mut self, seconds: f64) -> Self {
        self.drift_threshold_seconds = seconds;
        self
    }

    pub fn on_tick(mut self, hook: impl Fn(&TimerSnapshot) + Send + Sync + 'static) -> Self {
        self.on_tick = Some(Arc::new(hook));
        self
    }

    pub fn on_state_change(
        mut self,
        hook: impl Fn(&TimerSnapshot) + Send + Sync + 'static,
    ) -> Self {
        self.on_state_change = Some(Arc::new(hook));
        self
    }

    pub fn on_drift_detected(
        mut self,
        hook: impl Fn(f64, &TimerSnapshot) + Send + Sync + 'static,
    ) -> Self {
        self.on_drift_detected = Some(Arc::new(hook));
        self
    }
}

impl std::fmt::Debug for TimerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerOptions")
            .field("session_id", &self.session_id)
            .field("duration_seconds", &self.duration_seconds)
            .field("tick_interval", &self.tick_interval)
            .field("drift_threshold_seconds", &self.drift_threshold_seconds)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookKind {
    Ui,
    Network,
}

enum Notification {
    Snapshot(TimerHook, TimerSnapshot),
    Drift(DriftHook, f64, TimerSnapshot),
}

struct TimerInner {
    session_id: String,
    state: TimerState,
    duration_seconds: u64,
    elapsed_seconds: f64,
    last_tick_ms: u64,
    task: Option<ScheduledTask>,
    next_hook_id: u64,
    ui_hooks: BTreeMap<u64, TimerHook>,
    network_hooks: BTreeMap<u64, TimerHook>,
}

struct Shared {
    clock: Arc<dyn Clock>,
    scheduler: Arc<dyn Scheduler>,
    tick_interval: Duration,
    drift_threshold_seconds: f64,
    on_state_change: Option<TimerHook>,
    on_drift_detected: Option<DriftHook>,
    inner: Mutex<TimerInner>,
}

fn lock(inner: &Mutex<TimerInner>) -> MutexGuard<'_, TimerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn dispatch(notifications: Vec<Notification>) {
    for notification in notifications {
        match notification {
            Notification::Snapshot(hook, snapshot) => hook(&snapshot),
            Notification::Drift(hook, drift, snapshot) => hook(drift, &snapshot),
        }
    }
}

/// Handle to one timer. Clones share the same timer; the repeating task is
/// cancelled when the last clone is dropped.
#[derive(Clone)]
pub struct SessionTimer {
    shared: Arc<Shared>,
}

impl SessionTimer {
    pub fn new(
        options: TimerOptions,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let mut ui_hooks = BTreeMap::new();
        let mut next_hook_id = 0;
        if let Some(on_tick) = options.on_tick {
            ui_hooks.insert(next_hook_id, on_tick);
            next_hook_id += 1;
        }
        let last_tick_ms = clock.now_ms();

        Self {
            shared: Arc::new(Shared {
                clock,
                scheduler,
                tick_interval: options.tick_interval,
                drift_threshold_seconds: options.drift_threshold_seconds,
                on_state_change: options.on_state_change,
                on_drift_detected: options.on_drift_detected,
                inner: Mutex::new(TimerInner {
                    session_id: options.session_id,
                    state: TimerState::Idle,
                    duration_seconds: options.duration_seconds,
                    elapsed_seconds: 0.0,
                    last_tick_ms,
                    task: None,
                    next_hook_id,
                    ui_hooks,
                    network_hooks: BTreeMap::new(),
                }),
            }),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        let inner = lock(&self.shared.inner);
        self.snapshot_of(&inner)
    }

    pub fn state(&self) -> TimerState {
        lock(&self.shared.inner).state
    }

    pub fn is_ticking(&self) -> bool {
        lock(&self.shared.inner).task.is_some()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idle -> Running. No-op in any other state.
    pub fn start(&self) {
        self.command(|timer, inner, out| {
            if inner.state != TimerState::Idle {
                return;
            }
            timer.update_state(inner, TimerState::Running, out);
            timer.start_internal(inner);
            timer.emit(inner, out, true);
        });
    }

    /// Running -> Paused. No-op in any other state.
    pub fn pause(&self) {
        self.command(|timer, inner, out| {
            if inner.state != TimerState::Running {
                return;
            }
            inner.task = None;
            timer.update_state(inner, TimerState::Paused, out);
            timer.emit(inner, out, true);
        });
    }

    /// Paused -> Running. Time spent paused is not counted.
    pub fn resume(&self) {
        self.command(|timer, inner, out| {
            if inner.state != TimerState::Paused {
                return;
            }
            timer.update_state(inner, TimerState::Running, out);
            timer.start_internal(inner);
            timer.emit(inner, out, true);
        });
    }

    /// Back to Idle from any state, optionally with a new duration.
    pub fn reset(&self, duration_seconds: Option<u64>) {
        self.command(|timer, inner, out| {
            inner.task = None;
            if let Some(duration) = duration_seconds {
                inner.duration_seconds = duration;
            }
            inner.elapsed_seconds = 0.0;
            timer.update_state(inner, TimerState::Idle, out);
            timer.emit(inner, out, true);
        });
    }

    /// Overwrite local elapsed time with an authoritative value.
    ///
    /// The value is clamped to `[0, duration]`. Drift is measured against the
    /// previous local value. Only ui hooks are notified.
    pub fn sync_with_server(&self, authoritative_elapsed: f64) {
        if authoritative_elapsed.is_nan() {
            tracing::warn!("ignoring NaN authoritative elapsed value");
            return;
        }
        self.command(|timer, inner, out| {
            let drift = authoritative_elapsed - inner.elapsed_seconds;
            let duration = inner.duration_seconds as f64;
            inner.elapsed_seconds = authoritative_elapsed.clamp(0.0, duration);

            if drift.abs() > timer.shared.drift_threshold_seconds {
                tracing::warn!(
                    session_id = %inner.session_id,
                    drift_seconds = drift,
                    "timer drift detected"
                );
                if let Some(hook) = &timer.shared.on_drift_detected {
                    out.push(Notification::Drift(
                        Arc::clone(hook),
                        drift,
                        timer.snapshot_of(inner),
                    ));
                }
            }
            timer.emit(inner, out, false);
        });
    }

    /// Advance by the wall-clock time since the previous tick.
    ///
    /// Called by the scheduled task; tests may call it directly. Does nothing
    /// unless running.
    ///
    /// Ui and network hooks receive the tick's snapshot before the completion
    /// check, so the final one they see is still `Running` with elapsed equal
    /// to the duration. Only `on_state_change` observes `Completed`.
    pub fn tick(&self) {
        self.command(|timer, inner, out| {
            if inner.state != TimerState::Running {
                return;
            }
            let now = timer.shared.clock.now_ms();
            let delta = now.saturating_sub(inner.last_tick_ms) as f64 / 1000.0;
            inner.last_tick_ms = now;

            let duration = inner.duration_seconds as f64;
            inner.elapsed_seconds = (inner.elapsed_seconds + delta).min(duration);
            timer.emit(inner, out, true);

            if inner.elapsed_seconds >= duration {
                inner.task = None;
                timer.update_state(inner, TimerState::Completed, out);
            }
        });
    }

    pub fn register_ui_hook(
        &self,
        hook: impl Fn(&TimerSnapshot) + Send + Sync + 'static,
    ) -> HookHandle {
        self.register(HookKind::Ui, Arc::new(hook))
    }

    /// Network hooks typically push the snapshot to a server; they are kept
    /// out of server-driven resyncs to avoid echo loops.
    pub fn register_network_hook(
        &self,
        hook: impl Fn(&TimerSnapshot) + Send + Sync + 'static,
    ) -> HookHandle {
        self.register(HookKind::Network, Arc::new(hook))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn command(&self, f: impl FnOnce(&Self, &mut TimerInner, &mut Vec<Notification>)) {
        let mut out = Vec::new();
        {
            let mut inner = lock(&self.shared.inner);
            f(self, &mut inner, &mut out);
        }
        dispatch(out);
    }

    fn register(&self, kind: HookKind, hook: TimerHook) -> HookHandle {
        let mut inner = lock(&self.shared.inner);
        let id = inner.next_hook_id;
        inner.next_hook_id += 1;
        match kind {
            HookKind::Ui => inner.ui_hooks.insert(id, hook),
            HookKind::Network => inner.network_hooks.insert(id, hook),
        };
        HookHandle {
            shared: Arc::downgrade(&self.shared),
            kind,
            id,
        }
    }

    fn snapshot_of(&self, inner: &TimerInner) -> TimerSnapshot {
        let duration = inner.duration_seconds as f64;
        let now_ms = i64::try_from(self.shared.clock.now_ms()).unwrap_or(i64::MAX);
        TimerSnapshot {
            session_id: inner.session_id.clone(),
            state: inner.state,
            duration_seconds: inner.duration_seconds,
            elapsed_seconds: inner.elapsed_seconds,
            remaining_seconds: (duration - inner.elapsed_seconds).max(0.0),
            last_updated: DateTime::from_timestamp_millis(now_ms).unwrap_or_default(),
        }
    }

    fn update_state(&self, inner: &mut TimerInner, next: TimerState, out: &mut Vec<Notification>) {
        if inner.state == next {
            return;
        }
        tracing::debug!(
            session_id = %inner.session_id,
            from = ?inner.state,
            to = ?next,
            "timer state changed"
        );
        inner.state = next;
        if let Some(hook) = &self.shared.on_state_change {
            out.push(Notification::Snapshot(Arc::clone(hook), self.snapshot_of(inner)));
        }
    }

    fn emit(&self, inner: &TimerInner, out: &mut Vec<Notification>, network: bool) {
        let snapshot = self.snapshot_of(inner);
        for hook in inner.ui_hooks.values() {
            out.push(Notification::Snapshot(Arc::clone(hook), snapshot.clone()));
        }
        if network {
            for hook in inner.network_hooks.values() {
                out.push(Notification::Snapshot(Arc::clone(hook), snapshot.clone()));
            }
        }
    }

    fn start_internal(&self, inner: &mut TimerInner) {
        if inner.task.is_some() {
            return;
        }
        inner.last_tick_ms = self.shared.clock.now_ms();
        let weak = Arc::downgrade(&self.shared);
        let task = self.shared.scheduler.schedule_repeating(
            self.shared.tick_interval,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    SessionTimer { shared }.tick();
                }
            }),
        );
        inner.task = Some(task);
    }
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

/// De-registration handle returned by the `register_*_hook` methods.
#[derive(Debug)]
pub struct HookHandle {
    shared: Weak<Shared>,
    kind: HookKind,
    id: u64,
}

impl HookHandle {
    /// Remove the hook. Returns false if it was already gone or the timer
    /// has been dropped.
    pub fn unregister(self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let mut inner = lock(&shared.inner);
        match self.kind {
            HookKind::Ui => inner.ui_hooks.remove(&self.id).is_some(),
            HookKind::Network => inner.network_hooks.remove(&self.id).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{ManualClock, ManualScheduler};
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Rig {
        clock: ManualClock,
        scheduler: ManualScheduler,
        timer: SessionTimer,
    }

    impl Rig {
        fn new(options: TimerOptions) -> Self {
            let clock = ManualClock::new(1_700_000_000_000);
            let scheduler = ManualScheduler::new();
            let timer = SessionTimer::new(
                options,
                Arc::new(clock.clone()),
                Arc::new(scheduler.clone()),
            );
            Self {
                clock,
                scheduler,
                timer,
            }
        }

        fn advance(&self, millis: u64) {
            self.clock.advance(Duration::from_millis(millis));
            self.scheduler.fire();
        }
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&TimerSnapshot) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let hook_count = Arc::clone(&count);
        (count, move |_: &TimerSnapshot| {
            hook_count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn start_pause_resume() {
        let rig = Rig::new(TimerOptions::new("s", 60));
        assert_eq!(rig.timer.state(), TimerState::Idle);

        rig.timer.start();
        assert_eq!(rig.timer.state(), TimerState::Running);
        assert_eq!(rig.scheduler.active_tasks(), 1);
        assert_eq!(rig.scheduler.intervals(), vec![DEFAULT_TICK_INTERVAL]);

        rig.timer.pause();
        assert_eq!(rig.timer.state(), TimerState::Paused);
        assert_eq!(rig.scheduler.active_tasks(), 0);

        rig.timer.resume();
        assert_eq!(rig.timer.state(), TimerState::Running);
        assert!(rig.timer.is_ticking());
    }

    #[test]
    fn commands_in_wrong_state_are_noops() {
        let rig = Rig::new(TimerOptions::new("s", 60));
        rig.timer.pause();
        rig.timer.resume();
        assert_eq!(rig.timer.state(), TimerState::Idle);

        rig.timer.start();
        rig.timer.start();
        assert_eq!(rig.scheduler.active_tasks(), 1);
        rig.timer.resume();
        assert_eq!(rig.timer.state(), TimerState::Running);
    }

    #[test]
    fn completion_reaches_state_change_hook_only() {
        let seen: Arc<Mutex<Vec<(TimerState, f64)>>> = Arc::default();
        let completed: Arc<Mutex<Vec<TimerState>>> = Arc::default();
        let changes = Arc::clone(&completed);
        let rig = Rig::new(TimerOptions::new("done", 2).on_state_change(move |s| {
            changes.lock().unwrap().push(s.state);
        }));
        let network = Arc::clone(&seen);
        let _handle = rig.timer.register_network_hook(move |s| {
            network.lock().unwrap().push((s.state, s.elapsed_seconds));
        });

        rig.timer.start();
        rig.advance(2_000);

        assert_eq!(rig.timer.state(), TimerState::Completed);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(TimerState::Running, 0.0), (TimerState::Running, 2.0)]
        );
        assert_eq!(
            *completed.lock().unwrap(),
            vec![TimerState::Running, TimerState::Completed]
        );
    }

    #[test]
    fn ticks_use_actual_wall_clock_delta() {
        let rig = Rig::new(TimerOptions::new("s", 60));
        rig.timer.start();
        rig.advance(1_500);
        rig.advance(700);
        let snap = rig.timer.snapshot();
        assert!((snap.elapsed_seconds - 2.2).abs() < 1e-9);
        assert!((snap.remaining_seconds - 57.8).abs() < 1e-9);
    }

    #[test]
    fn paused_time_is_not_counted() {
        let rig = Rig::new(TimerOptions::new("s", 60));
        rig.timer.start();
        rig.advance(2_000);
        rig.timer.pause();
        rig.clock.advance(Duration::from_secs(30));
        rig.timer.resume();
        rig.advance(1_000);
        assert!((rig.timer.snapshot().elapsed_seconds - 3.0).abs() < 1e-9);
    }

    #[test]
    fn completes_at_duration_and_stops_ticking() {
        let rig = Rig::new(TimerOptions::new("s", 3));
        rig.timer.start();
        rig.advance(2_000);
        rig.advance(5_000);

        let snap = rig.timer.snapshot();
        assert_eq!(snap.state, TimerState::Completed);
        assert_eq!(snap.elapsed_seconds, 3.0);
        assert_eq!(snap.remaining_seconds, 0.0);
        assert_eq!(rig.scheduler.active_tasks(), 0);

        rig.clock.advance(Duration::from_secs(10));
        rig.timer.tick();
        assert_eq!(rig.timer.snapshot().elapsed_seconds, 3.0);
        rig.timer.start();
        assert_eq!(rig.timer.state(), TimerState::Completed);
    }

    #[test]
    fn reset_returns_to_idle_with_new_duration() {
        let rig = Rig::new(TimerOptions::new("s", 10));
        rig.timer.start();
        rig.advance(4_000);
        rig.timer.reset(Some(20));

        let snap = rig.timer.snapshot();
        assert_eq!(snap.state, TimerState::Idle);
        assert_eq!(snap.duration_seconds, 20);
        assert_eq!(snap.elapsed_seconds, 0.0);
        assert_eq!(rig.scheduler.active_tasks(), 0);

        rig.timer.reset(None);
        assert_eq!(rig.timer.snapshot().duration_seconds, 20);
    }

    #[test]
    fn drift_fires_once_with_signed_value() {
        let drifts = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&drifts);
        let rig = Rig::new(TimerOptions::new("s", 60).on_drift_detected(move |drift, snap| {
            seen.lock().unwrap().push((drift, snap.elapsed_seconds));
        }));
        rig.timer.start();
        rig.advance(5_000);

        rig.timer.sync_with_server(8.5);
        assert_eq!(*drifts.lock().unwrap(), vec![(3.5, 8.5)]);

        // Within threshold: no notification.
        rig.timer.sync_with_server(9.0);
        assert_eq!(drifts.lock().unwrap().len(), 1);
    }

    #[test]
    fn sync_clamps_to_duration_and_zero() {
        let rig = Rig::new(TimerOptions::new("s", 30));
        rig.timer.sync_with_server(90.0);
        assert_eq!(rig.timer.snapshot().elapsed_seconds, 30.0);
        rig.timer.sync_with_server(-4.0);
        assert_eq!(rig.timer.snapshot().elapsed_seconds, 0.0);
    }

    #[test]
    fn sync_skips_network_hooks() {
        let rig = Rig::new(TimerOptions::new("s", 60));
        let (ui_count, ui_hook) = counter();
        let (net_count, net_hook) = counter();
        let _ui = rig.timer.register_ui_hook(ui_hook);
        let _net = rig.timer.register_network_hook(net_hook);

        rig.timer.sync_with_server(12.0);
        assert_eq!(ui_count.load(Ordering::SeqCst), 1);
        assert_eq!(net_count.load(Ordering::SeqCst), 0);

        rig.timer.start();
        rig.advance(1_000);
        assert_eq!(ui_count.load(Ordering::SeqCst), 3);
        assert_eq!(net_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unregistered_hooks_stop_firing() {
        let rig = Rig::new(TimerOptions::new("s", 60));
        let (count, hook) = counter();
        let handle = rig.timer.register_network_hook(hook);
        rig.timer.start();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(handle.unregister());
        rig.advance(1_000);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn on_tick_and_state_change_hooks() {
        let (ticks, tick_hook) = counter();
        let states = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&states);
        let rig = Rig::new(
            TimerOptions::new("s", 2)
                .on_tick(tick_hook)
                .on_state_change(move |snap| seen.lock().unwrap().push(snap.state)),
        );
        rig.timer.start();
        rig.advance(1_000);
        rig.advance(1_000);

        assert_eq!(
            *states.lock().unwrap(),
            vec![TimerState::Running, TimerState::Completed]
        );
        // start + two ticks
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn hooks_may_read_the_timer() {
        let rig = Rig::new(TimerOptions::new("s", 60));
        let timer = rig.timer.clone();
        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        let _h = rig.timer.register_ui_hook(move |_| {
            *slot.lock().unwrap() = Some(timer.state());
        });
        rig.timer.start();
        assert_eq!(*seen.lock().unwrap(), Some(TimerState::Running));
    }

    #[test]
    fn dropping_timer_cancels_task() {
        let rig = Rig::new(TimerOptions::new("s", 60));
        rig.timer.start();
        assert_eq!(rig.scheduler.active_tasks(), 1);
        let Rig {
            scheduler, timer, ..
        } = rig;
        drop(timer);
        assert_eq!(scheduler.active_tasks(), 0);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let rig = Rig::new(TimerOptions::new("abc", 60));
        let json = serde_json::to_value(rig.timer.snapshot()).unwrap();
        assert_eq!(json["sessionId"], "abc");
        assert_eq!(json["state"], "idle");
        assert_eq!(json["remainingSeconds"], 60.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        Pause,
        Resume,
        Reset(Option<u64>),
        Advance(u64),
        Sync(f64),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Start),
            Just(Op::Pause),
            Just(Op::Resume),
            proptest::option::of(0u64..120).prop_map(Op::Reset),
            (0u64..20_000).prop_map(Op::Advance),
            (-50.0f64..200.0).prop_map(Op::Sync),
        ]
    }

    proptest! {
        #[test]
        fn elapsed_plus_remaining_is_duration(ops in proptest::collection::vec(arb_op(), 0..40)) {
            let rig = Rig::new(TimerOptions::new("p", 45));
            for op in ops {
                match op {
                    Op::Start => rig.timer.start(),
                    Op::Pause => rig.timer.pause(),
                    Op::Resume => rig.timer.resume(),
                    Op::Reset(d) => rig.timer.reset(d),
                    Op::Advance(ms) => rig.advance(ms),
                    Op::Sync(v) => rig.timer.sync_with_server(v),
                }
                let snap = rig.timer.snapshot();
                let duration = snap.duration_seconds as f64;
                prop_assert!(snap.elapsed_seconds >= 0.0);
                prop_assert!(snap.elapsed_seconds <= duration);
                let sum = snap.elapsed_seconds + snap.remaining_seconds;
                prop_assert!((sum - duration).abs() < 1e-9);
                prop_assert_eq!(rig.timer.is_ticking(), snap.state == TimerState::Running);
            }
        }
    }
}
