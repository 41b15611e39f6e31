use std::sync::Mutex;

/// Session counters for the simulation driver.
pub struct MetricsRecorder {
    inner: Mutex<RunCounts>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub scenarios_simulated: usize,
    pub configs_rejected: usize,
    pub rows_repaired: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RunCounts::default()),
        }
    }

    pub fn record_scenarios(&self, count: usize) {
        if let Ok(mut counts) = self.inner.lock() {
            counts.scenarios_simulated += count;
        }
    }

    pub fn record_rejection(&self) {
        if let Ok(mut counts) = self.inner.lock() {
            counts.configs_rejected += 1;
        }
    }

    pub fn record_repairs(&self, count: usize) {
        if let Ok(mut counts) = self.inner.lock() {
            counts.rows_repaired += count;
        }
    }

    pub fn snapshot(&self) -> RunCounts {
        self.inner.lock().map(|counts| *counts).unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
