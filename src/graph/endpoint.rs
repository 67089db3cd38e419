//! Closure-lifting endpoint constructors.
//!
//! Plain closures carry no role of their own; these constructors lift them
//! into classified endpoints so they can be wired without adapter code.

use crate::graph::error::ConnectError;
use crate::graph::link::{Connectable, LinkSpec};
use std::marker::PhantomData;

/// Lift a nullary closure into an infinite passive source.
pub fn source_fn<T, F>(f: F) -> SourceFn<T, F>
where
    T: Send + 'static,
    F: FnMut() -> T + Send + 'static,
{
    SourceFn {
        f,
        _marker: PhantomData,
    }
}

/// Passive source created by [`source_fn`].
pub struct SourceFn<T, F> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F> Connectable for SourceFn<T, F>
where
    T: Send + 'static,
    F: FnMut() -> T + Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        let mut f = self.f;
        Ok(vec![LinkSpec::producer("source_fn", move || Some(f()))?])
    }
}

/// Lift an iterator into a finite passive source. Pulling past the end
/// reports exhaustion instead of a value.
pub fn source_iter<I>(iter: I) -> SourceIter<I::IntoIter>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    SourceIter {
        iter: iter.into_iter(),
    }
}

/// Passive source created by [`source_iter`].
pub struct SourceIter<I> {
    iter: I,
}

impl<I> Connectable for SourceIter<I>
where
    I: Iterator + Send + 'static,
    I::Item: Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        let mut iter = self.iter;
        Ok(vec![LinkSpec::producer("source_iter", move || iter.next())?])
    }
}

/// Lift a unary closure into a terminal passive sink.
pub fn sink_fn<T, F>(f: F) -> SinkFn<T, F>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    SinkFn {
        f,
        _marker: PhantomData,
    }
}

/// Passive sink created by [`sink_fn`].
pub struct SinkFn<T, F> {
    f: F,
    _marker: PhantomData<fn(T)>,
}

impl<T, F> Connectable for SinkFn<T, F>
where
    T: Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        Ok(vec![LinkSpec::consumer("sink_fn", self.f)?])
    }
}
