//! Erased link representation.
//!
//! Every endpoint and operator lowers into a [`LinkSpec`]: a classified role,
//! an input/output port surface, and an erased invocation. Values travel
//! between links as [`AnyToken`]s; the concrete types are verified once, at
//! connect time, so the downcasts on the data path cannot fail.

use crate::graph::error::ConnectError;
use crate::graph::id::LinkId;
use crate::graph::role::{classify, PortType, Role, Signature};
use std::any::Any;

/// A type-erased value travelling through a chain.
pub type AnyToken = Box<dyn Any + Send>;

/// The erased invocation behavior of one link.
pub(crate) enum LinkKind {
    /// Passive source head: yields a token when pulled, `None` when a finite
    /// source is exhausted.
    Producer(Box<dyn FnMut() -> Option<AnyToken> + Send>),
    /// Active source head: polls its mailbox for queued tokens.
    Intake(Box<dyn FnMut() -> Option<AnyToken> + Send>),
    /// Unary step: token in, token out, `None` when the value is dropped.
    Relay(Box<dyn FnMut(AnyToken) -> Option<AnyToken> + Send>),
    /// Terminal passive sink.
    Consumer(Box<dyn FnMut(AnyToken) + Send>),
    /// Terminal fold whose state is readable on demand.
    Accumulator {
        fold: Box<dyn FnMut(AnyToken) + Send>,
        read: Box<dyn Fn() -> AnyToken + Send>,
    },
    /// Active sink tail: enqueues for the owning endpoint to consume later.
    Outlet(Box<dyn FnMut(AnyToken) + Send>),
}

/// One classified, erased step of a chain.
pub struct LinkSpec {
    pub(crate) role: Role,
    pub(crate) input: PortType,
    pub(crate) output: PortType,
    pub(crate) label: String,
    pub(crate) kind: LinkKind,
}

impl LinkSpec {
    /// A passive source yielding values of type `T`.
    pub fn producer<T, F>(label: impl Into<String>, mut produce: F) -> Result<Self, ConnectError>
    where
        T: Send + 'static,
        F: FnMut() -> Option<T> + Send + 'static,
    {
        let role = classify(&Signature::nullary_value())?;
        Ok(Self {
            role,
            input: PortType::None,
            output: PortType::of::<T>(),
            label: label.into(),
            kind: LinkKind::Producer(Box::new(move || {
                produce().map(|v| Box::new(v) as AnyToken)
            })),
        })
    }

    /// A unary step from `T` to `U`; returning `None` drops the value.
    ///
    /// An operator is a passive sink on its input face; its output face is
    /// advertised through the output port.
    pub fn relay<T, U, F>(label: impl Into<String>, mut step: F) -> Result<Self, ConnectError>
    where
        T: Send + 'static,
        U: Send + 'static,
        F: FnMut(T) -> Option<U> + Send + 'static,
    {
        let role = classify(&Signature::unary_void())?;
        Ok(Self {
            role,
            input: PortType::of::<T>(),
            output: PortType::of::<U>(),
            label: label.into(),
            kind: LinkKind::Relay(Box::new(move |token: AnyToken| {
                // Token type was verified at connect time.
                let value = *token.downcast::<T>().ok()?;
                step(value).map(|v| Box::new(v) as AnyToken)
            })),
        })
    }

    /// A terminal passive sink consuming values of type `T`.
    pub fn consumer<T, F>(label: impl Into<String>, mut consume: F) -> Result<Self, ConnectError>
    where
        T: Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let role = classify(&Signature::unary_void())?;
        Ok(Self {
            role,
            input: PortType::of::<T>(),
            output: PortType::None,
            label: label.into(),
            kind: LinkKind::Consumer(Box::new(move |token: AnyToken| {
                if let Ok(value) = token.downcast::<T>() {
                    consume(*value);
                }
            })),
        })
    }

    /// A terminal sink accepting any token type.
    ///
    /// The call surface is generic rather than a single concrete signature,
    /// so the role is declared (via the declared-result fallback) instead of
    /// inferred structurally.
    pub fn consumer_any<F>(label: impl Into<String>, mut consume: F) -> Result<Self, ConnectError>
    where
        F: FnMut(AnyToken) + Send + 'static,
    {
        let role = classify(&Signature::unary_void().overloaded().with_declared_result())?;
        Ok(Self {
            role,
            input: PortType::Any,
            output: PortType::None,
            label: label.into(),
            kind: LinkKind::Consumer(Box::new(move |token| consume(token))),
        })
    }

    pub(crate) fn intake<F>(label: impl Into<String>, output: PortType, mut poll: F) -> Result<Self, ConnectError>
    where
        F: FnMut() -> Option<AnyToken> + Send + 'static,
    {
        let role = classify(&Signature::active_source())?;
        Ok(Self {
            role,
            input: PortType::None,
            output,
            label: label.into(),
            kind: LinkKind::Intake(Box::new(move || poll())),
        })
    }

    pub(crate) fn outlet<F>(label: impl Into<String>, input: PortType, mut enqueue: F) -> Result<Self, ConnectError>
    where
        F: FnMut(AnyToken) + Send + 'static,
    {
        let role = classify(&Signature::active_sink())?;
        Ok(Self {
            role,
            input,
            output: PortType::None,
            label: label.into(),
            kind: LinkKind::Outlet(Box::new(move |token| enqueue(token))),
        })
    }

    pub(crate) fn accumulator(
        label: impl Into<String>,
        input: PortType,
        output: PortType,
        fold: Box<dyn FnMut(AnyToken) + Send>,
        read: Box<dyn Fn() -> AnyToken + Send>,
    ) -> Result<Self, ConnectError> {
        let role = classify(&Signature::unary_void())?;
        Ok(Self {
            role,
            input,
            output,
            label: label.into(),
            kind: LinkKind::Accumulator { fold, read },
        })
    }

    /// True for link kinds that end a chain.
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            LinkKind::Consumer(_) | LinkKind::Accumulator { .. } | LinkKind::Outlet(_)
        )
    }

    /// True for link kinds that can only stand at the head of a chain.
    pub(crate) fn is_head_only(&self) -> bool {
        matches!(self.kind, LinkKind::Producer(_) | LinkKind::Intake(_))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Arena slot: a link plus the id of its successor.
pub(crate) struct Link {
    pub(crate) spec: LinkSpec,
    pub(crate) next: LinkId,
}

/// Anything that can take part in a connection: port adapters, stream
/// operators, and chains themselves.
pub trait Connectable {
    /// Lower into classified links. Classification failures surface here,
    /// before any value flows.
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError>;
}
