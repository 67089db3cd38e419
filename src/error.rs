//! Crate-level error type and Result alias.

use crate::graph::error::{ChainError, ClassifyError, ConnectError};
use crate::sched::SchedulerError;
use thiserror::Error;

/// Aggregate error for flowlink operations.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("classification error: {0}")]
    Classify(#[from] ClassifyError),

    #[error("connection error: {0}")]
    Connect(#[from] ConnectError),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Result type alias for flowlink operations.
pub type Result<T> = std::result::Result<T, FlowError>;
