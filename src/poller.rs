use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::error;

use crate::api::health::HealthState;
use crate::runner::{unix_now, AppRunner};
use crate::types::RunOutcome;

/// Optional background trigger: runs the digest on a fixed period, sharing
/// the HTTP trigger's run lock so the two can never overlap.
pub struct Poller {
    runner: Arc<AppRunner>,
    run_lock: Arc<tokio::sync::Mutex<()>>,
    health: Arc<HealthState>,
    interval_secs: u64,
}

impl Poller {
    pub fn new(
        runner: Arc<AppRunner>,
        run_lock: Arc<tokio::sync::Mutex<()>>,
        health: Arc<HealthState>,
        interval_secs: u64,
    ) -> Self {
        Self { runner, run_lock, health, interval_secs }
    }

    pub async fn run(self) {
        let mut ticker = interval(Duration::from_secs(self.interval_secs));

        // The first tick fires immediately, so one run happens at startup.
        loop {
            ticker.tick().await;
            let _guard = self.run_lock.lock().await;
            match self.runner.run_once().await {
                Ok(RunOutcome::NoActivity) => self.health.record_empty(unix_now()),
                Ok(RunOutcome::Delivered { .. }) => self.health.record_delivered(unix_now()),
                Err(e) => {
                    // A failed run never advances the watermark; the next
                    // tick retries the same window.
                    self.health.record_failure(unix_now());
                    error!("Scheduled run failed: {e}");
                }
            }
        }
    }
}
