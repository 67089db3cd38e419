//! Port adapters: named event inputs for nodes, plus the explicitly-active
//! endpoints backed by crossbeam mailboxes.
//!
//! The passive adapters wrap a forwarding handler and are classified as
//! passive sinks. An adapter always owns a callable handler; there is no
//! empty-handler state to guard against at construction.

use crate::graph::error::{ChainError, ConnectError};
use crate::graph::link::{AnyToken, Connectable, LinkSpec};
use crate::graph::role::PortType;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::marker::PhantomData;

/// Minimal input port for events of type `E`. Forwards each received event
/// to its handler by move.
pub struct EventSink<E, H> {
    handler: H,
    _marker: PhantomData<fn(E)>,
}

impl<E, H> EventSink<E, H>
where
    E: Send + 'static,
    H: FnMut(E) + Send + 'static,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

impl<E, H> Connectable for EventSink<E, H>
where
    E: Send + 'static,
    H: FnMut(E) + Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        Ok(vec![LinkSpec::consumer("event_sink", self.handler)?])
    }
}

/// Void-event specialization of [`EventSink`]: a sink that only signals
/// "something happened", with no payload. Its token is the unit value.
pub struct TriggerSink<H> {
    handler: H,
}

impl<H> TriggerSink<H>
where
    H: FnMut() + Send + 'static,
{
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H> Connectable for TriggerSink<H>
where
    H: FnMut() + Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        let mut handler = self.handler;
        Ok(vec![LinkSpec::consumer("trigger_sink", move |(): ()| {
            handler()
        })?])
    }
}

/// Generic-handler sink: one named port accepting heterogeneous event types,
/// deferring concrete-type handling to the handler itself.
pub struct AnySink<H> {
    handler: H,
}

impl<H> AnySink<H>
where
    H: FnMut(AnyToken) + Send + 'static,
{
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

impl<H> Connectable for AnySink<H>
where
    H: FnMut(AnyToken) + Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        Ok(vec![LinkSpec::consumer_any("any_sink", self.handler)?])
    }
}

/// Create an explicitly-active source: the returned [`Emitter`] decides when
/// values enter the chain; the port is the connectable head.
///
/// Emitted values sit in an unbounded mailbox until the chain is drained,
/// either directly via [`Chain::drain`](crate::graph::chain::Chain::drain) or
/// on a worker via [`SharedChain::pump`](crate::graph::chain::SharedChain::pump).
pub fn active_source<T: Send + 'static>() -> (Emitter<T>, ActiveSourcePort<T>) {
    let (tx, rx) = unbounded();
    (Emitter { tx }, ActiveSourcePort { rx })
}

/// Sending half of an active source. Cheap to clone and send across threads.
pub struct Emitter<T> {
    tx: Sender<T>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> Emitter<T> {
    /// Queue a value for the next drain. Never blocks.
    pub fn emit(&self, value: T) -> Result<(), ChainError> {
        self.tx.send(value).map_err(|_| ChainError::Detached)
    }
}

/// Connectable head of an active source.
pub struct ActiveSourcePort<T> {
    rx: Receiver<T>,
}

impl<T: Send + 'static> Connectable for ActiveSourcePort<T> {
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        let rx = self.rx;
        Ok(vec![LinkSpec::intake(
            "active_source",
            PortType::of::<T>(),
            move || rx.try_recv().ok().map(|v| Box::new(v) as AnyToken),
        )?])
    }
}

/// Create an explicitly-active sink: the chain tail enqueues values, the
/// returned [`Drain`] consumes them on the owning endpoint's own schedule.
pub fn active_sink<T: Send + 'static>() -> (ActiveSinkPort<T>, Drain<T>) {
    let (tx, rx) = unbounded();
    (ActiveSinkPort { tx }, Drain { rx })
}

/// Connectable tail of an active sink.
pub struct ActiveSinkPort<T> {
    tx: Sender<T>,
}

impl<T: Send + 'static> Connectable for ActiveSinkPort<T> {
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        let tx = self.tx;
        Ok(vec![LinkSpec::outlet(
            "active_sink",
            PortType::of::<T>(),
            move |token: AnyToken| {
                // Token type was verified at connect time.
                if let Ok(value) = token.downcast::<T>() {
                    let _ = tx.send(*value);
                }
            },
        )?])
    }
}

/// Receiving half of an active sink.
pub struct Drain<T> {
    rx: Receiver<T>,
}

impl<T: Send + 'static> Drain<T> {
    /// Take the next queued value, if any. Never blocks.
    pub fn try_next(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Take every value queued so far.
    pub fn collect_pending(&self) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(v) = self.rx.try_recv() {
            out.push(v);
        }
        out
    }

    /// Queue depth snapshot.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
