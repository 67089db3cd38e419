//! Event wiring graph: capability classification, port adapters, stream
//! operators, and the connection engine.

pub mod chain;
pub mod endpoint;
pub mod error;
pub mod id;
pub mod link;
pub mod ops;
pub mod ports;
pub mod role;

pub use chain::{connect, Chain, SharedChain};
pub use endpoint::{sink_fn, source_fn, source_iter};
pub use error::{ChainError, ClassifyError, ConnectError};
pub use id::LinkId;
pub use link::{AnyToken, Connectable, LinkSpec};
pub use ops::{filter, fold, map, sum};
pub use ports::{
    active_sink, active_source, ActiveSinkPort, ActiveSourcePort, AnySink, Drain, Emitter,
    EventSink, TriggerSink,
};
pub use role::{classify, ActiveKind, PortType, Role, Signature, TypeTag};
