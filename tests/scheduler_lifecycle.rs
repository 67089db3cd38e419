//! Scheduler lifecycle and draining behavior.

use flowlink::{Scheduler, SchedulerConfig, SchedulerError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn all_submitted_tasks_run_exactly_once() {
    init_tracing();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut sched = Scheduler::new(SchedulerConfig::with_workers(4));

    const N: usize = 200;
    for i in 0..N {
        let seen = Arc::clone(&seen);
        sched
            .add_task(move || seen.lock().unwrap().push(i))
            .unwrap();
    }
    sched.stop();

    let mut got = seen.lock().unwrap().clone();
    got.sort_unstable();
    // No duplicates, no omissions; completion order across workers is free.
    assert_eq!(got, (0..N).collect::<Vec<_>>());
}

#[test]
fn stop_drains_tasks_enqueued_before_it() {
    let counter = Arc::new(Mutex::new(0usize));
    let mut sched = Scheduler::new(SchedulerConfig::with_workers(1));

    for _ in 0..20 {
        let counter = Arc::clone(&counter);
        sched
            .add_task(move || {
                std::thread::sleep(Duration::from_millis(1));
                *counter.lock().unwrap() += 1;
            })
            .unwrap();
    }
    sched.stop();
    assert_eq!(*counter.lock().unwrap(), 20);
}

#[test]
fn waiting_task_snapshot_is_bounded_by_submissions() {
    let sched = Scheduler::new(SchedulerConfig::with_workers(2));

    const K: usize = 32;
    for _ in 0..K {
        sched
            .add_task(|| std::thread::sleep(Duration::from_millis(1)))
            .unwrap();
    }
    // Some tasks may already have been picked up by workers.
    let waiting = sched.nr_of_waiting_tasks();
    assert!(waiting <= K);
}

#[test]
fn add_task_after_stop_is_rejected() {
    let mut sched = Scheduler::new(SchedulerConfig::with_workers(1));
    sched.stop();
    assert_eq!(sched.add_task(|| {}), Err(SchedulerError::Stopped));
    assert!(sched.is_stopped());
}

#[test]
fn stop_twice_is_a_no_op() {
    let mut sched = Scheduler::new(SchedulerConfig::with_workers(2));
    sched.add_task(|| {}).unwrap();
    sched.stop();
    sched.stop();
    assert!(sched.is_stopped());
}

#[test]
fn drop_with_pending_tasks_joins_without_hanging() {
    let counter = Arc::new(Mutex::new(0usize));
    {
        let sched = Scheduler::new(SchedulerConfig::with_workers(2));
        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            sched
                .add_task(move || {
                    std::thread::sleep(Duration::from_micros(100));
                    *counter.lock().unwrap() += 1;
                })
                .unwrap();
        }
        // Dropping behaves as an implicit stop: drain, then join.
    }
    assert_eq!(*counter.lock().unwrap(), 50);
}

#[test]
fn default_pool_uses_hardware_concurrency() {
    let sched = Scheduler::default();
    assert!(sched.worker_count() > 0);
    assert_eq!(sched.worker_count(), SchedulerConfig::default().worker_count());
}
