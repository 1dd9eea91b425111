use std::sync::Arc;

use biochem_study_core::session::new_token;
use biochem_study_core::storage::TimerConfig;
use biochem_study_core::timer::{SessionTimer, SystemClock, TokioScheduler};
use biochem_study_core::{Config, TimerSnapshot, TimerState};
use clap::Subcommand;
use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a session timer to completion, printing one JSON event per line
    Run {
        /// Session length in seconds (defaults to timer.duration_seconds)
        #[arg(long)]
        duration: Option<u64>,
        /// Tick interval in milliseconds (defaults to timer.tick_interval_ms)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Authoritative elapsed seconds applied after the first tick
        #[arg(long)]
        sync_elapsed: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
enum EventKind {
    Tick,
    State,
    Drift,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimerEvent {
    event: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    drift_seconds: Option<f64>,
    snapshot: TimerSnapshot,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            duration,
            interval_ms,
            sync_elapsed,
        } => {
            let mut timer_config = Config::load()?.timer;
            if let Some(duration) = duration {
                timer_config.duration_seconds = duration;
            }
            if let Some(interval_ms) = interval_ms {
                timer_config.tick_interval_ms = interval_ms;
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_to_completion(timer_config, sync_elapsed))
        }
    }
}

async fn run_to_completion(
    timer_config: TimerConfig,
    sync_elapsed: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = TokioScheduler::try_current().ok_or("no tokio runtime available")?;
    let (tx, mut rx) = mpsc::unbounded_channel::<TimerEvent>();

    let state_tx = tx.clone();
    let drift_tx = tx.clone();
    let options = timer_config
        .options(new_token())
        .on_state_change(move |snapshot| {
            let _ = state_tx.send(TimerEvent {
                event: EventKind::State,
                drift_seconds: None,
                snapshot: snapshot.clone(),
            });
        })
        .on_drift_detected(move |drift, snapshot| {
            let _ = drift_tx.send(TimerEvent {
                event: EventKind::Drift,
                drift_seconds: Some(drift),
                snapshot: snapshot.clone(),
            });
        });

    let timer = SessionTimer::new(options, Arc::new(SystemClock), Arc::new(scheduler));
    let _ui = timer.register_ui_hook(move |snapshot| {
        let _ = tx.send(TimerEvent {
            event: EventKind::Tick,
            drift_seconds: None,
            snapshot: snapshot.clone(),
        });
    });

    let mut pending_sync = sync_elapsed;
    timer.start();

    while let Some(event) = rx.recv().await {
        println!("{}", serde_json::to_string(&event)?);

        if event.snapshot.state == TimerState::Completed {
            break;
        }
        if event.snapshot.elapsed_seconds > 0.0 {
            if let Some(elapsed) = pending_sync.take() {
                timer.sync_with_server(elapsed);
            }
        }
    }

    tracing::debug!(snapshot = ?timer.snapshot(), "timer finished");
    Ok(())
}
