//! Worker-pool task scheduler.

mod scheduler;

pub use scheduler::{Scheduler, SchedulerError};
