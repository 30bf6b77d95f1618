// Copyright (c) 2025 - Cowboy AI, Inc.
//! Signal - Discretely Varying Optional Values
//!
//! A `Signal<T>` is a total function from time to `Option<T>`, piecewise
//! constant between changes. It is the pair of the value before the first
//! pending change (the head) and the future of changes:
//!
//! ```text
//! Time:   ─────────5────────9──────────20────────→
//! Value:  (none)   │  1     │  (none)   │  2
//! ```
//!
//! # Ownership
//!
//! Every operation consumes its inputs and returns a new signal. Cloning is
//! cheap and the clones share the memoized future, so independent consumers
//! can sample the same upstream signal without coordinating.
//!
//! # Trimming
//!
//! `sample` and `trim` discard history strictly before the query point. A
//! trimmed signal retains only its current value and the unqueried future.
//!
//! # Example
//!
//! ```rust
//! use cim_reactive::frp::{Signal, Time};
//!
//! let s = Signal::from_updates(None, vec![
//!     (Time::from_nanos(5), Some(1)),
//!     (Time::from_nanos(9), None),
//! ]);
//! let (value, _rest) = s.sample(Time::from_nanos(7));
//! assert_eq!(value, Some(1));
//! ```

use super::time::{DeltaTime, Time};
use super::updates::{Step, Updates};
use super::Value;
use std::sync::Arc;

/// Discretely varying optional value
#[derive(Clone)]
pub struct Signal<T> {
    head: Option<T>,
    tail: Updates<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}

impl<T: Value> Signal<T> {
    /// Assemble a signal from its head and future
    pub fn new(head: Option<T>, tail: Updates<T>) -> Self {
        Self { head, tail }
    }

    /// Permanently inactive signal
    pub fn never() -> Self {
        Self::new(None, Updates::done())
    }

    /// Permanently active constant signal
    pub fn always(value: T) -> Self {
        Self::new(Some(value), Updates::done())
    }

    /// Signal from an initial value and a list of changes
    pub fn from_updates(head: Option<T>, changes: Vec<(Time, Option<T>)>) -> Self {
        Self::new(head, Updates::from_list(changes))
    }

    /// The value before the first pending change
    pub fn head(&self) -> Option<&T> {
        self.head.as_ref()
    }

    pub fn into_parts(self) -> (Option<T>, Updates<T>) {
        (self.head, self.tail)
    }

    /// Advance past every change at or before `t`
    ///
    /// Returns the trimmed signal and whether the sequence is known to
    /// have terminated.
    fn advance(self, t: Time) -> (Signal<T>, bool) {
        let Signal { mut head, mut tail } = self;
        loop {
            match tail.step(t) {
                Step::Next(_, value, rest) => {
                    head = value;
                    tail = rest;
                }
                Step::Wait => return (Signal { head, tail }, false),
                Step::Done => return (Signal { head, tail }, true),
            }
        }
    }

    /// Value active at `t`, plus the signal restricted to `[t, ∞)`
    pub fn sample(self, t: Time) -> (Option<T>, Signal<T>) {
        let (trimmed, _) = self.advance(t);
        (trimmed.head.clone(), trimmed)
    }

    /// Discard history strictly before `t`
    pub fn trim(self, t: Time) -> Signal<T> {
        self.advance(t).0
    }

    /// First change strictly after `low` and at or before `high`
    ///
    /// The returned signal is positioned at the reported change (or at
    /// `low` when there is none), so forward scans never re-derive history.
    /// Requires `low < high`.
    pub fn sample_change(self, low: Time, high: Time) -> (Option<(Time, Option<T>)>, Signal<T>) {
        debug_assert!(low < high, "sample_change requires low < high");
        let trimmed = self.trim(low);
        if low >= high {
            return (None, trimmed);
        }
        match trimmed.tail.step(high) {
            Step::Next(t, value, rest) => (Some((t, value.clone())), Signal::new(value, rest)),
            Step::Wait | Step::Done => (None, trimmed),
        }
    }

    /// Changes in `(low, high]`, preceded by the value at `low`
    pub fn to_event_list(self, low: Time, high: Time) -> Vec<(Time, Option<T>)> {
        let (value, trimmed) = self.sample(low);
        let mut events = vec![(low, value)];
        let mut tail = trimmed.tail;
        while let Step::Next(t, value, rest) = tail.step(high) {
            events.push((t, value));
            tail = rest;
        }
        events
    }

    /// True when no change exists after `t`
    ///
    /// Conservative: a `false` answer may be wrong, a `true` answer never is.
    pub fn is_final(&self, t: Time) -> bool {
        self.clone().advance(t).1
    }

    /// Final and inactive at `t`
    pub fn is_terminated(&self, t: Time) -> bool {
        let (trimmed, done) = self.clone().advance(t);
        done && trimmed.head.is_none()
    }

    /// Force the memoized spine up to `t`
    pub fn force_until(&self, t: Time) {
        self.tail.force_until(t);
    }

    /// Transform active values
    pub fn map_values<U, F>(self, f: F) -> Signal<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.map_full(move |value: Option<T>| value.map(&f))
    }

    /// Transform the optional value, including inactivity
    pub fn map_full<U, F>(self, f: F) -> Signal<U>
    where
        U: Value,
        F: Fn(Option<T>) -> Option<U> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let head = f(self.head);
        Signal::new(head, self.tail.map_full(f))
    }

    /// Shift every change by `dt`
    ///
    /// Purely representational: the window of the head moves with the
    /// first change, nothing waits.
    pub fn delay(self, dt: DeltaTime) -> Signal<T> {
        Signal::new(self.head, self.tail.delay(dt))
    }

    /// Drop a change that repeats the inactivity before it
    pub fn drop_adjacent_inactive(self) -> Signal<T> {
        let active = self.head.is_some();
        Signal::new(self.head, self.tail.drop_adjacent_inactive(active))
    }

    /// Drop a change when `eq` holds against the immediately preceding change
    ///
    /// An optimization only: a redundant change may survive, the first
    /// change always does, and no new value is ever introduced.
    pub fn dedup_by<F>(self, eq: F) -> Signal<T>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Signal::new(self.head, self.tail.dedup_by(Arc::new(eq)))
    }

    /// Evaluate the spine up to each requested bound before yielding
    pub fn strict(self) -> Signal<T> {
        Signal::new(self.head, self.tail.strict())
    }
}

impl<T: Value + PartialEq> Signal<T> {
    /// [`Signal::dedup_by`] with `==`
    pub fn dedup(self) -> Signal<T> {
        self.dedup_by(|a: &T, b: &T| a == b)
    }
}
