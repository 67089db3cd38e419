//! Stream operators: composable unary steps usable inside any chain.
//!
//! Each operator is a passive sink on its input face and a passive source on
//! its output face, so operators compose uniformly through
//! [`connect`](crate::graph::chain::connect).

use crate::graph::error::ConnectError;
use crate::graph::link::{AnyToken, Connectable, LinkSpec};
use crate::graph::role::PortType;
use std::marker::PhantomData;
use std::ops::AddAssign;
use std::sync::{Arc, Mutex};

/// Forward the input unchanged iff the predicate holds; drop it otherwise.
/// A dropped value produces no downstream call and no error.
pub fn filter<T, P>(pred: P) -> Filter<T, P>
where
    T: Send + 'static,
    P: FnMut(&T) -> bool + Send + 'static,
{
    Filter {
        pred,
        _marker: PhantomData,
    }
}

pub struct Filter<T, P> {
    pred: P,
    _marker: PhantomData<fn(T)>,
}

impl<T, P> Connectable for Filter<T, P>
where
    T: Send + 'static,
    P: FnMut(&T) -> bool + Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        let mut pred = self.pred;
        Ok(vec![LinkSpec::relay("filter", move |value: T| {
            if pred(&value) {
                Some(value)
            } else {
                None
            }
        })?])
    }
}

/// Forward `f(input)` downstream unconditionally.
pub fn map<T, U, F>(f: F) -> Map<T, U, F>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Send + 'static,
{
    Map {
        f,
        _marker: PhantomData,
    }
}

pub struct Map<T, U, F> {
    f: F,
    _marker: PhantomData<fn(T) -> U>,
}

impl<T, U, F> Connectable for Map<T, U, F>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        let mut f = self.f;
        Ok(vec![LinkSpec::relay("map", move |value: T| Some(f(value)))?])
    }
}

/// Terminal fold: each received value is folded into an accumulator seeded
/// with `init`. The accumulator doubles as a pull source of its current
/// state, read through [`Chain::read`](crate::graph::chain::Chain::read).
pub fn fold<T, A, F>(init: A, f: F) -> Fold<T, A, F>
where
    T: Send + 'static,
    A: Clone + Send + 'static,
    F: FnMut(&mut A, T) + Send + 'static,
{
    Fold {
        init,
        f,
        _marker: PhantomData,
    }
}

pub struct Fold<T, A, F> {
    init: A,
    f: F,
    _marker: PhantomData<fn(T)>,
}

impl<T, A, F> Connectable for Fold<T, A, F>
where
    T: Send + 'static,
    A: Clone + Send + 'static,
    F: FnMut(&mut A, T) + Send + 'static,
{
    fn into_links(self) -> Result<Vec<LinkSpec>, ConnectError> {
        let state = Arc::new(Mutex::new(self.init));
        let mut f = self.f;

        let fold_state = Arc::clone(&state);
        let fold = Box::new(move |token: AnyToken| {
            // Token type was verified at connect time.
            if let Ok(value) = token.downcast::<T>() {
                let mut acc = match fold_state.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                f(&mut *acc, *value);
            }
        });

        let read = Box::new(move || {
            let acc = match state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            Box::new(acc.clone()) as AnyToken
        });

        Ok(vec![LinkSpec::accumulator(
            "fold",
            PortType::of::<T>(),
            PortType::of::<A>(),
            fold,
            read,
        )?])
    }
}

/// `fold` specialization with `+=` semantics.
pub fn sum<T>(init: T) -> Fold<T, T, impl FnMut(&mut T, T) + Send + 'static>
where
    T: AddAssign + Clone + Send + 'static,
{
    fold(init, |acc: &mut T, value: T| *acc += value)
}
