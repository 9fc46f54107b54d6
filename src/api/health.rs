//! Shared health state for the /health endpoint.
//! Updated by the trigger handler and the background poller.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

#[derive(Default)]
pub struct HealthState {
    /// Epoch seconds of the most recent run attempt (0 = none yet).
    pub last_run_at: AtomicI64,
    pub runs_delivered: AtomicU64,
    pub runs_empty: AtomicU64,
    pub runs_failed: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_delivered(&self, at: i64) {
        self.last_run_at.store(at, Ordering::Relaxed);
        self.runs_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty(&self, at: i64) {
        self.last_run_at.store(at, Ordering::Relaxed);
        self.runs_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, at: i64) {
        self.last_run_at.store(at, Ordering::Relaxed);
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn last_run_at(&self) -> i64 {
        self.last_run_at.load(Ordering::Relaxed)
    }

    pub fn runs_delivered(&self) -> u64 {
        self.runs_delivered.load(Ordering::Relaxed)
    }

    pub fn runs_empty(&self) -> u64 {
        self.runs_empty.load(Ordering::Relaxed)
    }

    pub fn runs_failed(&self) -> u64 {
        self.runs_failed.load(Ordering::Relaxed)
    }
}
