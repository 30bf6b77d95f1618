// Copyright (c) 2025 - Cowboy AI, Inc.
//! Discrete Update Sequences
//!
//! An `Updates<T>` is the future of a signal: a lazily produced sequence of
//! `(time, Option<T>)` changes in strictly increasing time order. `None`
//! marks the signal inactive from that instant.
//!
//! # Stepping
//!
//! Consumers never materialize the sequence. They step it up to a bound:
//!
//! ```text
//! step(bound) ──> Done                      no changes, ever again
//!            ──> Wait                      nothing at or before `bound`
//!            ──> Next(t, v, continuation)  next change, t <= bound
//! ```
//!
//! # Sharing
//!
//! Every node memoizes the result of its first pull. Cloning an `Updates`
//! clones an `Arc`, so any number of consumers can read the same upstream
//! sequence and each ends up holding its own position. Forcing a node is
//! invisible to other holders; they observe the same changes either way.
//!
//! # Producers
//!
//! Resource adapters and the combinators in this crate produce sequences by
//! implementing [`UpdateSource`]. A source is consumed by `pull` and hands
//! back its own continuation.

use super::time::{DeltaTime, Time};
use super::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Result of stepping a sequence up to a bound
pub enum Step<T> {
    /// The sequence has terminated
    Done,
    /// No change at or before the bound
    Wait,
    /// The next change and the remainder of the sequence
    Next(Time, Option<T>, Updates<T>),
}

/// Result of pulling a source once
pub enum Pull<T> {
    /// The source has terminated
    Done,
    /// Nothing up to the bound; pull this source again later
    Wait(Box<dyn UpdateSource<T>>),
    /// A change. It may lie beyond the requested bound; the node holds it
    /// back until a consumer asks far enough.
    Next(Time, Option<T>, Updates<T>),
    /// From here on the sequence is exactly `Updates`
    Become(Updates<T>),
}

/// Producer of a discrete update sequence
pub trait UpdateSource<T>: Send {
    /// Produce the next change, resolving at least up to `bound`
    fn pull(self: Box<Self>, bound: Time) -> Pull<T>;
}

enum Node<T> {
    Pending(Box<dyn UpdateSource<T>>),
    Next(Time, Option<T>, Updates<T>),
    Alias(Updates<T>),
    Done,
    Pulling,
}

/// Lazily produced, memoized sequence of signal changes
pub struct Updates<T> {
    node: Arc<Mutex<Node<T>>>,
}

impl<T> Clone for Updates<T> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T> std::fmt::Debug for Updates<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Updates<{}>", std::any::type_name::<T>())
    }
}

impl<T: Value> Updates<T> {
    /// A sequence with no further changes
    pub fn done() -> Self {
        Self::with_node(Node::Done)
    }

    /// Wrap a producer
    pub fn from_source<S>(source: S) -> Self
    where
        S: UpdateSource<T> + 'static,
    {
        Self::with_node(Node::Pending(Box::new(source)))
    }

    /// Sequence backed by an explicit list of changes
    ///
    /// Times must be strictly increasing. This is checked in debug builds
    /// only; a malformed list is a bug in the producer.
    pub fn from_list(changes: Vec<(Time, Option<T>)>) -> Self {
        debug_assert!(
            changes.windows(2).all(|w| w[0].0 < w[1].0),
            "update times must be strictly increasing"
        );
        if changes.is_empty() {
            return Self::done();
        }
        Self::from_source(ListSource {
            changes: changes.into(),
        })
    }

    fn with_node(node: Node<T>) -> Self {
        Self {
            node: Arc::new(Mutex::new(node)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Node<T>> {
        self.node.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Step forward to the first change at or before `bound`
    pub fn step(&self, bound: Time) -> Step<T> {
        let mut node = self.lock();
        loop {
            match std::mem::replace(&mut *node, Node::Pulling) {
                Node::Done => {
                    *node = Node::Done;
                    return Step::Done;
                }
                Node::Next(t, value, rest) => {
                    let step = if t <= bound {
                        Step::Next(t, value.clone(), rest.clone())
                    } else {
                        Step::Wait
                    };
                    *node = Node::Next(t, value, rest);
                    return step;
                }
                Node::Alias(target) => {
                    *node = Node::Alias(target.clone());
                    drop(node);
                    return target.step(bound);
                }
                Node::Pending(source) => match source.pull(bound) {
                    Pull::Done => *node = Node::Done,
                    Pull::Wait(source) => {
                        *node = Node::Pending(source);
                        return Step::Wait;
                    }
                    Pull::Next(t, value, rest) => *node = Node::Next(t, value, rest),
                    Pull::Become(target) => *node = Node::Alias(target),
                },
                // A source panicked during an earlier pull. Its future is
                // unknown, so never report it as terminated.
                Node::Pulling => return Step::Wait,
            }
        }
    }

    /// Evaluate the spine up to `bound` so pending producers are released
    pub fn force_until(&self, bound: Time) {
        let mut cursor = self.clone();
        while let Step::Next(_, _, rest) = cursor.step(bound) {
            cursor = rest;
        }
    }

    /// Apply `f` to every change, including inactivity
    pub fn map_full<U, F>(self, f: Arc<F>) -> Updates<U>
    where
        U: Value,
        F: Fn(Option<T>) -> Option<U> + Send + Sync + 'static + ?Sized,
    {
        Updates::from_source(MapSource { source: self, f })
    }

    /// Shift every change by `dt`
    pub fn delay(self, dt: DeltaTime) -> Updates<T> {
        if dt == DeltaTime::ZERO {
            return self;
        }
        Updates::from_source(DelaySource { source: self, dt })
    }

    /// Drop a change when `eq` holds against the change before it
    ///
    /// The first change is always kept.
    pub fn dedup_by<F>(self, eq: Arc<F>) -> Updates<T>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static + ?Sized,
    {
        Updates::from_source(DedupSource {
            source: self,
            eq,
            last: None,
        })
    }

    /// Drop inactive changes that follow inactivity
    pub fn drop_adjacent_inactive(self, active: bool) -> Updates<T> {
        Updates::from_source(InactiveRunSource {
            source: self,
            active,
        })
    }

    /// Force the spine up to each requested bound before yielding
    pub fn strict(self) -> Updates<T> {
        Updates::from_source(StrictSource { source: self })
    }
}

struct ListSource<T> {
    changes: VecDeque<(Time, Option<T>)>,
}

impl<T: Value> UpdateSource<T> for ListSource<T> {
    fn pull(mut self: Box<Self>, _bound: Time) -> Pull<T> {
        match self.changes.pop_front() {
            None => Pull::Done,
            Some((t, value)) => {
                let rest = if self.changes.is_empty() {
                    Updates::done()
                } else {
                    Updates::with_node(Node::Pending(self))
                };
                Pull::Next(t, value, rest)
            }
        }
    }
}

struct MapSource<T, F: ?Sized> {
    source: Updates<T>,
    f: Arc<F>,
}

impl<T, U, F> UpdateSource<U> for MapSource<T, F>
where
    T: Value,
    U: Value,
    F: Fn(Option<T>) -> Option<U> + Send + Sync + 'static + ?Sized,
{
    fn pull(self: Box<Self>, bound: Time) -> Pull<U> {
        match self.source.step(bound) {
            Step::Done => Pull::Done,
            Step::Wait => Pull::Wait(self),
            Step::Next(t, value, rest) => {
                let mapped = (self.f)(value);
                Pull::Next(t, mapped, rest.map_full(self.f))
            }
        }
    }
}

struct DelaySource<T> {
    source: Updates<T>,
    dt: DeltaTime,
}

impl<T: Value> UpdateSource<T> for DelaySource<T> {
    fn pull(self: Box<Self>, bound: Time) -> Pull<T> {
        match self.source.step(bound - self.dt) {
            Step::Done => Pull::Done,
            Step::Wait => Pull::Wait(self),
            Step::Next(t, value, rest) => Pull::Next(t + self.dt, value, rest.delay(self.dt)),
        }
    }
}

struct DedupSource<T, F: ?Sized> {
    source: Updates<T>,
    eq: Arc<F>,
    last: Option<Option<T>>,
}

impl<T, F> DedupSource<T, F>
where
    T: Value,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static + ?Sized,
{
    fn redundant(&self, value: &Option<T>) -> bool {
        match (&self.last, value) {
            (Some(None), None) => true,
            (Some(Some(prev)), Some(next)) => (self.eq)(prev, next),
            _ => false,
        }
    }
}

impl<T, F> UpdateSource<T> for DedupSource<T, F>
where
    T: Value,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static + ?Sized,
{
    fn pull(mut self: Box<Self>, bound: Time) -> Pull<T> {
        loop {
            match self.source.step(bound) {
                Step::Done => return Pull::Done,
                Step::Wait => return Pull::Wait(self),
                Step::Next(t, value, rest) => {
                    if self.redundant(&value) {
                        self.source = rest;
                        continue;
                    }
                    let next = DedupSource {
                        source: rest,
                        eq: self.eq,
                        last: Some(value.clone()),
                    };
                    return Pull::Next(t, value, Updates::from_source(next));
                }
            }
        }
    }
}

struct InactiveRunSource<T> {
    source: Updates<T>,
    active: bool,
}

impl<T: Value> UpdateSource<T> for InactiveRunSource<T> {
    fn pull(mut self: Box<Self>, bound: Time) -> Pull<T> {
        loop {
            match self.source.step(bound) {
                Step::Done => return Pull::Done,
                Step::Wait => return Pull::Wait(self),
                Step::Next(_, None, rest) if !self.active => self.source = rest,
                Step::Next(t, value, rest) => {
                    let active = value.is_some();
                    return Pull::Next(t, value, rest.drop_adjacent_inactive(active));
                }
            }
        }
    }
}

struct StrictSource<T> {
    source: Updates<T>,
}

impl<T: Value> UpdateSource<T> for StrictSource<T> {
    fn pull(self: Box<Self>, bound: Time) -> Pull<T> {
        self.source.force_until(bound);
        match self.source.step(bound) {
            Step::Done => Pull::Done,
            Step::Wait => Pull::Wait(self),
            Step::Next(t, value, rest) => Pull::Next(t, value, rest.strict()),
        }
    }
}

/// Mapping with speculative pre-computation of the following change
///
/// When a change is pulled, the change after it (if it lies within
/// `horizon`) is evaluated on the tokio blocking pool. The consumer joins
/// the shared cell, so a value is computed at most once. Without an ambient
/// tokio runtime this is a plain map.
pub(crate) struct SpeculativeSource<T, U> {
    pub(crate) source: Updates<T>,
    pub(crate) f: Arc<dyn Fn(T) -> U + Send + Sync>,
    pub(crate) horizon: DeltaTime,
    pub(crate) ahead: Option<(Time, Arc<OnceLock<Option<U>>>)>,
}

impl<T: Value, U: Value> UpdateSource<U> for SpeculativeSource<T, U> {
    fn pull(self: Box<Self>, bound: Time) -> Pull<U> {
        let (t, value, rest) = match self.source.step(bound) {
            Step::Done => return Pull::Done,
            Step::Wait => return Pull::Wait(self),
            Step::Next(t, value, rest) => (t, value, rest),
        };

        let cell = match self.ahead {
            Some((at, cell)) if at == t => cell,
            _ => Arc::new(OnceLock::new()),
        };
        let f = Arc::clone(&self.f);
        let mapped = cell.get_or_init(|| value.map(|v| f(v))).clone();

        let ahead = match (tokio::runtime::Handle::try_current(), rest.step(t + self.horizon)) {
            (Ok(handle), Step::Next(next_t, next_value, _)) => {
                let cell = Arc::new(OnceLock::new());
                let shared = Arc::clone(&cell);
                let f = Arc::clone(&self.f);
                handle.spawn_blocking(move || {
                    shared.get_or_init(|| next_value.map(|v| f(v)));
                });
                Some((next_t, cell))
            }
            _ => None,
        };

        let next = SpeculativeSource {
            source: rest,
            f: self.f,
            horizon: self.horizon,
            ahead,
        };
        Pull::Next(t, mapped, Updates::from_source(next))
    }
}
