//! Cancellable accrual ticker.
//!
//! Drives [`VScoreEngine::tick`] on a fixed cadence while the subject is
//! active. Cancellation is a watch-channel signal consumed inside the task's
//! select loop, so a stopped ticker can never deliver another tick; an
//! inactive subject simply never starts one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::VScoreEngine;

/// Default accrual cadence: one tick per minute of active engagement.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(60);

/// Handle to a running accrual tick task.
pub struct AccrualTicker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl AccrualTicker {
    /// Spawn the tick task. The first tick fires one period after start.
    pub fn start(engine: Arc<VScoreEngine>, period: Duration) -> Self {
        let (shutdown, mut signal) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick completes immediately; swallow it so
            // starting the ticker is not itself an accrual event.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        engine.tick();
                    }
                    changed = signal.changed() => {
                        if changed.is_err() || *signal.borrow() {
                            debug!(subject = engine.subject(), "accrual ticker stopped");
                            break;
                        }
                    }
                }
            }
        });
        Self { shutdown, handle }
    }

    /// Spawn with the default one-minute cadence.
    pub fn start_default(engine: Arc<VScoreEngine>) -> Self {
        Self::start(engine, DEFAULT_TICK_PERIOD)
    }

    /// Stop the ticker and wait for the task to wind down. No tick fires
    /// after this returns.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
