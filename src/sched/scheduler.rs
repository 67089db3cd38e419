//! Thread-pool scheduler backed by a shared FIFO task queue.
//!
//! Workers block on the queue while it is empty; submitting a task wakes one
//! of them. Execution happens off the queue, so one slow task never blocks
//! the others from dequeuing. Tasks are dequeued in FIFO submission order
//! across the pool, but completion order across workers is unconstrained.
//!
//! Lifecycle is stopped → running → stopped, and the final state is
//! terminal: a stopped scheduler cannot be restarted. `stop` drains every
//! task enqueued before it was called, then joins all workers; submitting
//! after `stop` is rejected with [`SchedulerError::Stopped`].

use crate::config::SchedulerConfig;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::JoinHandle;
use thiserror::Error;

type Task = Box<dyn FnOnce() + Send + 'static>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler is stopped")]
    Stopped,
}

/// Fixed pool of worker threads draining one shared unbounded FIFO queue.
///
/// Invariant: the pool holds at least one worker for the scheduler's
/// running lifetime.
pub struct Scheduler {
    /// `None` once stopped; dropping the sender closes the queue.
    tx: Option<Sender<Task>>,
    /// Kept for queue-depth snapshots; never consumed from.
    rx: Receiver<Task>,
    workers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Spawn the worker pool. Worker count comes from the config, derived
    /// from hardware concurrency when unset. A zero-sized pool is a
    /// programmer error.
    pub fn new(config: SchedulerConfig) -> Self {
        let count = config.worker_count();
        assert!(count > 0, "scheduler requires at least one worker");

        let (tx, rx) = unbounded::<Task>();
        let workers = (0..count)
            .map(|_| {
                let rx = rx.clone();
                std::thread::spawn(move || {
                    // recv() fails only after every sender is gone and the
                    // queue is empty, so pending tasks are drained on stop.
                    while let Ok(task) = rx.recv() {
                        task();
                    }
                })
            })
            .collect();

        tracing::info!(workers = count, "scheduler started");
        Self {
            tx: Some(tx),
            rx,
            workers,
        }
    }

    /// Enqueue a task and wake one waiting worker. Never blocks beyond the
    /// queue insert; there is no upper bound on queue depth.
    pub fn add_task(&self, task: impl FnOnce() + Send + 'static) -> Result<(), SchedulerError> {
        match &self.tx {
            Some(tx) => tx.send(Box::new(task)).map_err(|_| SchedulerError::Stopped),
            None => {
                tracing::warn!("task submitted after stop; rejecting");
                Err(SchedulerError::Stopped)
            }
        }
    }

    /// Close the queue, let workers drain every task already enqueued, and
    /// join them. Idempotent; the scheduler is not restartable afterwards.
    pub fn stop(&mut self) {
        if self.tx.take().is_none() {
            return;
        }
        let workers = self.workers.len();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        tracing::info!(workers, "scheduler stopped");
    }

    /// Point-in-time queue depth snapshot; not a synchronization guarantee.
    pub fn nr_of_waiting_tasks(&self) -> usize {
        self.rx.len()
    }

    /// Number of worker threads in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn is_stopped(&self) -> bool {
        self.tx.is_none()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_tasks_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut sched = Scheduler::new(SchedulerConfig {
            workers: Some(2),
        });
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            sched
                .add_task(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        sched.stop();
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut sched = Scheduler::new(SchedulerConfig {
            workers: Some(1),
        });
        sched.stop();
        assert!(sched.is_stopped());
        sched.stop();
        assert!(sched.is_stopped());
    }

    #[test]
    fn test_add_after_stop_is_rejected() {
        let mut sched = Scheduler::new(SchedulerConfig {
            workers: Some(1),
        });
        sched.stop();
        assert_eq!(sched.add_task(|| {}), Err(SchedulerError::Stopped));
    }

    #[test]
    #[should_panic(expected = "at least one worker")]
    fn test_zero_workers_is_a_programmer_error() {
        let _ = Scheduler::new(SchedulerConfig { workers: Some(0) });
    }
}
