//! Connection engine: builds and invokes chains.
//!
//! `connect` joins two connectables into a [`Chain`], validating role
//! adjacency and end-to-end token types entirely before any value flows.
//! A chain stores its links in an arena; each link holds only the id of its
//! successor, so ownership is single and cycles cannot form. Invoking a
//! chain is synchronous and runs on the calling thread; handing execution to
//! a worker pool goes through [`SharedChain::pump`].

use crate::graph::error::{ChainError, ConnectError};
use crate::graph::id::LinkId;
use crate::graph::link::{AnyToken, Connectable, Link, LinkKind, LinkSpec};
use crate::graph::role::{PortType, Role};
use crate::sched::{Scheduler, SchedulerError};
use std::any::TypeId;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Join two endpoints (or chains) into a new chain.
///
/// Legality is checked at the junction: the left tail must still be open,
/// the right head must not be head-only (a source can only stand at the
/// head), and the produced token type must match the expected input type.
/// Both sides were classified when they were built, so a successful connect
/// guarantees the whole chain is type-correct end to end.
pub fn connect(
    lhs: impl Connectable,
    rhs: impl Connectable,
) -> Result<Chain, ConnectError> {
    let mut links = lhs.into_links()?;
    let right = rhs.into_links()?;

    let (Some(tail), Some(head)) = (links.last(), right.first()) else {
        return Err(ConnectError::Empty);
    };
    check_junction(tail, head)?;

    links.extend(right);
    let count = links.len();
    let links: Vec<Link> = links
        .into_iter()
        .enumerate()
        .map(|(i, spec)| Link {
            spec,
            next: if i + 1 < count {
                LinkId(i as u32 + 1)
            } else {
                LinkId::INVALID
            },
        })
        .collect();

    let chain = Chain {
        links,
        head: LinkId(0),
    };
    tracing::debug!(
        role = ?chain.role(),
        links = chain.len(),
        closed = chain.is_closed(),
        "connected chain"
    );
    Ok(chain)
}

fn check_junction(upstream: &LinkSpec, downstream: &LinkSpec) -> Result<(), ConnectError> {
    if upstream.is_terminal() {
        return Err(ConnectError::AlreadyClosed);
    }
    if downstream.is_head_only() {
        return Err(ConnectError::IllegalPair {
            lhs: upstream.role(),
            rhs: downstream.role(),
        });
    }
    match (upstream.output, downstream.input) {
        (PortType::None, _) => Err(ConnectError::NoOutput(upstream.label().to_string())),
        (_, PortType::None) => Err(ConnectError::NoInput(downstream.label().to_string())),
        (PortType::Any, _) | (_, PortType::Any) => Ok(()),
        (PortType::Of(produced), PortType::Of(expected)) => {
            if produced.id == expected.id {
                Ok(())
            } else {
                Err(ConnectError::TypeMismatch {
                    label: upstream.label().to_string(),
                    produced: produced.name,
                    expected: expected.name,
                })
            }
        }
    }
}

/// An established connection: `source → op₁ → … → sink`.
///
/// A chain is itself connectable, so partial chains (an open operator
/// pipeline, or a sink-rooted suffix) compose left-to-right through repeated
/// [`connect`] calls. Once built, a chain is fixed; there is no rewiring.
pub struct Chain {
    links: Vec<Link>,
    head: LinkId,
}

impl Chain {
    /// The chain's own role: that of its head link.
    pub fn role(&self) -> Role {
        self.links[self.head.index()].spec.role()
    }

    /// True once the tail is a terminal sink (consumer, accumulator, or
    /// active outlet).
    pub fn is_closed(&self) -> bool {
        self.links
            .last()
            .is_some_and(|link| link.spec.is_terminal())
    }

    /// Number of links in the chain.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Link labels in order, for diagnostics.
    pub fn labels(&self) -> Vec<&str> {
        self.links.iter().map(|l| l.spec.label()).collect()
    }

    /// Pull one value from a passive-source-rooted chain through every link.
    ///
    /// Returns `Ok(false)` once a finite source is exhausted. A value dropped
    /// by a filter still counts as a successful pull.
    pub fn pull(&mut self) -> Result<bool, ChainError> {
        if !self.is_closed() {
            return Err(ChainError::Open);
        }
        let role = self.role();
        let head = self.head.index();
        let next = self.links[head].next;
        let token = match &mut self.links[head].spec.kind {
            LinkKind::Producer(produce) => produce(),
            _ => return Err(ChainError::NotPullable(role)),
        };
        match token {
            Some(token) => {
                self.feed(next, token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pull until the source is exhausted; returns the number of values
    /// produced. Only meaningful for finite sources.
    pub fn pull_all(&mut self) -> Result<usize, ChainError> {
        let mut count = 0;
        while self.pull()? {
            count += 1;
        }
        Ok(count)
    }

    /// Push a value into a sink-rooted chain (one with no source head).
    /// This is the entry point an active source calls into.
    pub fn push<T: Send + 'static>(&mut self, value: T) -> Result<(), ChainError> {
        if !self.is_closed() {
            return Err(ChainError::Open);
        }
        let head = self.head.index();
        if self.links[head].spec.is_head_only() {
            return Err(ChainError::NotPushable);
        }
        match self.links[head].spec.input {
            PortType::None => return Err(ChainError::NotPushable),
            PortType::Any => {}
            PortType::Of(tag) => {
                if tag.id != TypeId::of::<T>() {
                    return Err(ChainError::PushTypeMismatch {
                        pushed: std::any::type_name::<T>(),
                        expected: tag.name,
                    });
                }
            }
        }
        self.feed(self.head, Box::new(value));
        Ok(())
    }

    /// Route every event queued in an active source's mailbox through the
    /// chain. Returns the number of events delivered into the chain.
    pub fn drain(&mut self) -> Result<usize, ChainError> {
        if !self.is_closed() {
            return Err(ChainError::Open);
        }
        let role = self.role();
        let head = self.head.index();
        let mut count = 0;
        loop {
            let next = self.links[head].next;
            let token = match &mut self.links[head].spec.kind {
                LinkKind::Intake(poll) => poll(),
                _ => return Err(ChainError::NotDrainable(role)),
            };
            match token {
                Some(token) => {
                    self.feed(next, token);
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    /// Snapshot the current state of a terminal accumulator.
    pub fn read<T: Clone + 'static>(&self) -> Result<T, ChainError> {
        let Some(tail) = self.links.last() else {
            return Err(ChainError::NoAccumulator);
        };
        match &tail.spec.kind {
            LinkKind::Accumulator { read, .. } => {
                let token = read();
                token
                    .downcast::<T>()
                    .map(|boxed| *boxed)
                    .map_err(|_| ChainError::ReadTypeMismatch {
                        held: tail.spec.output.name(),
                        requested: std::any::type_name::<T>(),
                    })
            }
            _ => Err(ChainError::NoAccumulator),
        }
    }

    /// Wrap the chain for shared, scheduler-driven invocation.
    pub fn into_shared(self) -> SharedChain {
        SharedChain {
            inner: Arc::new(Mutex::new(self)),
        }
    }

    /// Walk a token through successive links until it is consumed, dropped,
    /// or falls off an open tail (connect-time checks prevent the latter for
    /// closed chains).
    fn feed(&mut self, mut cursor: LinkId, mut token: AnyToken) {
        while cursor.is_valid() {
            let link = &mut self.links[cursor.index()];
            match &mut link.spec.kind {
                LinkKind::Relay(step) => match step(token) {
                    Some(out) => {
                        token = out;
                        cursor = link.next;
                    }
                    None => return,
                },
                LinkKind::Consumer(consume) => {
                    consume(token);
                    return;
                }
                LinkKind::Accumulator { fold, .. } => {
                    fold(token);
                    return;
                }
                LinkKind::Outlet(enqueue) => {
                    enqueue(token);
                    return;
                }
                // Heads are never successors; connect rejects them mid-chain.
                LinkKind::Producer(_) | LinkKind::Intake(_) => return,
            }
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("role", &self.role())
            .field("links", &self.labels())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Connectable for Chain {
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        Ok(self.links.into_iter().map(|link| link.spec).collect())
    }
}

/// A chain behind `Arc<Mutex<_>>`, so active endpoints can hand its
/// invocation to a [`Scheduler`] worker instead of the emitting thread.
///
/// The framework serializes chain invocations through the mutex but makes no
/// ordering promise across concurrent emitters; callers that need a total
/// order must serialize externally.
#[derive(Clone)]
pub struct SharedChain {
    inner: Arc<Mutex<Chain>>,
}

impl SharedChain {
    /// Submit a task that drains the chain's mailbox on a worker thread.
    pub fn pump(&self, scheduler: &Scheduler) -> Result<(), SchedulerError> {
        let inner = Arc::clone(&self.inner);
        scheduler.add_task(move || {
            let mut chain = match inner.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            match chain.drain() {
                Ok(count) => tracing::trace!(events = count, "pumped chain"),
                Err(err) => tracing::warn!("pump failed: {err}"),
            }
        })
    }

    /// Run `f` with exclusive access to the chain on the calling thread.
    pub fn with<R>(&self, f: impl FnOnce(&mut Chain) -> R) -> R {
        let mut chain = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::endpoint::{sink_fn, source_fn, source_iter};
    use crate::graph::ops::{filter, map, sum};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_source_to_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let out = Arc::clone(&seen);
        let mut chain = connect(
            source_iter(vec![1, 2, 3]),
            sink_fn(move |v: i32| out.lock().unwrap().push(v)),
        )
        .unwrap();

        assert_eq!(chain.role(), Role::PassiveSource);
        assert!(chain.is_closed());
        assert_eq!(chain.pull_all().unwrap(), 3);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_connect_rejects_source_after_source() {
        let err = connect(source_fn(|| 1i32), source_fn(|| 2i32)).unwrap_err();
        assert!(matches!(
            err,
            ConnectError::IllegalPair {
                lhs: Role::PassiveSource,
                rhs: Role::PassiveSource,
            }
        ));
    }

    #[test]
    fn test_connect_rejects_closed_lhs() {
        let closed = connect(source_fn(|| 1i32), sink_fn(|_: i32| {})).unwrap();
        let err = connect(closed, sink_fn(|_: i32| {})).unwrap_err();
        assert!(matches!(err, ConnectError::AlreadyClosed));
    }

    #[test]
    fn test_connect_rejects_type_mismatch() {
        let err = connect(source_fn(|| 1i32), sink_fn(|_: String| {})).unwrap_err();
        match err {
            ConnectError::TypeMismatch {
                produced, expected, ..
            } => {
                assert_eq!(produced, "i32");
                assert!(expected.contains("String"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_operator_chain_is_composable() {
        let ops = connect(filter(|v: &i32| *v > 0), map(|v: i32| v * 10)).unwrap();
        assert!(!ops.is_closed());
        assert_eq!(ops.role(), Role::PassiveSink);

        let mut chain = connect(connect(source_iter(vec![-1, 2]), ops).unwrap(), sum(0i32))
            .unwrap();
        chain.pull_all().unwrap();
        assert_eq!(chain.read::<i32>().unwrap(), 20);
    }

    #[test]
    fn test_push_into_sink_rooted_chain() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let out = Arc::clone(&seen);
        let mut chain = connect(
            map(|v: i32| v + 1),
            sink_fn(move |v: i32| out.lock().unwrap().push(v)),
        )
        .unwrap();

        chain.push(1i32).unwrap();
        chain.push(2i32).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![2, 3]);

        let err = chain.push("nope".to_string()).unwrap_err();
        assert!(matches!(err, ChainError::PushTypeMismatch { .. }));
    }

    #[test]
    fn test_pull_requires_source_head() {
        let mut chain = connect(map(|v: i32| v), sink_fn(|_: i32| {})).unwrap();
        let err = chain.pull().unwrap_err();
        assert!(matches!(err, ChainError::NotPullable(Role::PassiveSink)));
    }

    #[test]
    fn test_read_requires_accumulator_tail() {
        let chain = connect(source_iter(vec![1]), sink_fn(|_: i32| {})).unwrap();
        assert!(matches!(
            chain.read::<i32>(),
            Err(ChainError::NoAccumulator)
        ));
    }

    #[test]
    fn test_read_type_mismatch() {
        let mut chain = connect(source_iter(vec![1i32, 2]), sum(0i32)).unwrap();
        chain.pull_all().unwrap();
        assert!(matches!(
            chain.read::<String>(),
            Err(ChainError::ReadTypeMismatch { .. })
        ));
        assert_eq!(chain.read::<i32>().unwrap(), 3);
    }

    #[test]
    fn test_labels() {
        let chain = connect(
            connect(source_iter(vec![1i32]), map(|v: i32| v)).unwrap(),
            sink_fn(|_: i32| {}),
        )
        .unwrap();
        assert_eq!(chain.labels(), vec!["source_iter", "map", "sink_fn"]);
    }
}
