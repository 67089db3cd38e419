//! # flowlink: typed dataflow/event wiring
//!
//! Independent computational nodes expose typed ports — sources that emit
//! values, sinks that consume them — and `flowlink` wires arbitrary closures
//! and port adapters into pipelines without adapter code at the call site.
//! Every endpoint is classified into one of four roles (passive source,
//! passive sink, active source, active sink); the connection engine uses the
//! classification to validate a chain end to end before any value flows.
//!
//! ## Architecture
//!
//! - **Classification**: [`graph::role`] assigns roles from call shapes;
//!   active roles are always declared, never inferred
//! - **Connection engine**: [`graph::chain`] builds arena-backed chains and
//!   routes pushed or pulled values through them
//! - **Stream operators**: [`graph::ops`] provides filter/map/fold steps
//!   that compose through repeated `connect` calls
//! - **Scheduler**: [`sched`] runs tasks on a worker pool so active
//!   endpoints can decouple event production from consumption
//!
//! ## Example
//!
//! ```
//! use flowlink::{connect, filter, map, source_iter, sum};
//!
//! # fn main() -> Result<(), flowlink::FlowError> {
//! let source = source_iter(vec![-4, -3, -2, -1, 0, 1, 2, 3, 4]);
//! let mut chain = connect(
//!     connect(connect(source, filter(|i: &i32| *i < 0))?, map(|i: i32| i * 2))?,
//!     sum(0i32),
//! )?;
//!
//! chain.pull_all()?;
//! assert_eq!(chain.read::<i32>()?, -20);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod sched;

// Re-export commonly used types
pub use config::SchedulerConfig;
pub use error::{FlowError, Result};
pub use graph::{
    active_sink, active_source, classify, connect, filter, fold, map, sink_fn, source_fn,
    source_iter, sum, AnySink, Chain, Connectable, EventSink, Role, SharedChain, Signature,
    TriggerSink,
};
pub use sched::{Scheduler, SchedulerError};
