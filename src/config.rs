//! Configuration types.

use serde::{Deserialize, Serialize};

/// Scheduler construction parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Worker thread count. `None` derives it from hardware concurrency.
    pub workers: Option<usize>,
}

impl SchedulerConfig {
    /// Fix the worker count explicitly.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: Some(workers),
        }
    }

    /// Effective worker count: the configured value, or one worker per
    /// available hardware thread.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(default_workers)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_derives_from_hardware() {
        let config = SchedulerConfig::default();
        assert!(config.worker_count() > 0);
    }

    #[test]
    fn test_explicit_worker_count() {
        assert_eq!(SchedulerConfig::with_workers(3).worker_count(), 3);
    }
}
