//! Graph-specific error types.
//!
//! Classification and connection errors are raised while a chain is being
//! built, before any value flows. Chain errors are deterministic misuse
//! errors raised at the point of the offending call.

use crate::graph::role::Role;
use thiserror::Error;

/// Failure to assign a role to an entity's call shape.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("entity is not callable")]
    NotCallable,

    #[error("call surface is overloaded and no result type is declared")]
    Ambiguous,

    #[error("call shape fits no role (expected nullary-returning or unary-void)")]
    NoRole,
}

/// Failure to build a connection between two endpoints.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("cannot connect {lhs:?} to {rhs:?}")]
    IllegalPair { lhs: Role, rhs: Role },

    #[error("type mismatch after '{label}': produces {produced}, downstream expects {expected}")]
    TypeMismatch {
        label: String,
        produced: &'static str,
        expected: &'static str,
    },

    #[error("left side '{0}' has no output to connect from")]
    NoOutput(String),

    #[error("right side '{0}' has no input to connect into")]
    NoInput(String),

    #[error("chain is already closed by a terminal sink")]
    AlreadyClosed,

    #[error("cannot connect an empty endpoint")]
    Empty,
}

/// Misuse of an established chain.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("chain head is {0:?}, not a pullable passive source")]
    NotPullable(Role),

    #[error("chain head is {0:?}, not an active source mailbox")]
    NotDrainable(Role),

    #[error("chain head does not accept pushed values")]
    NotPushable,

    #[error("pushed value type {pushed} does not match head input {expected}")]
    PushTypeMismatch {
        pushed: &'static str,
        expected: &'static str,
    },

    #[error("chain has no terminal sink")]
    Open,

    #[error("chain has no readable accumulator tail")]
    NoAccumulator,

    #[error("accumulator holds {held}, not {requested}")]
    ReadTypeMismatch {
        held: &'static str,
        requested: &'static str,
    },

    #[error("chain endpoint is detached")]
    Detached,
}
