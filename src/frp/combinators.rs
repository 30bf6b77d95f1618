// Copyright (c) 2025 - Cowboy AI, Inc.
//! Signal Combinators
//!
//! Binary and higher-order operations over signals. All of them are pure
//! and lazy: nothing is evaluated until a consumer steps the result.
//!
//! # Available Combinators
//!
//! - `combine` / `combine_full` - pointwise product of two signals
//! - `mask` - left values with the right signal's activity
//! - `merge` - left value where active, else right (left wins ties)
//! - `switch_at` / `switch_at_strict` - replace a signal's future
//! - `join` - flatten a signal of signals
//! - `peek` - bounded lookahead
//!
//! # Simultaneous Changes
//!
//! When both inputs change at the same instant the result changes once,
//! computed from both new values. `merge` therefore favors the left signal
//! at every instant, including the instant of a tie.
//!
//! # Examples
//!
//! ```rust
//! use cim_reactive::frp::{combinators::merge, Signal, Time};
//!
//! let left = Signal::from_updates(None, vec![(Time::from_nanos(2), Some("a"))]);
//! let merged = merge(left, Signal::always("b"));
//! assert_eq!(merged.clone().sample(Time::from_nanos(0)).0, Some("b"));
//! assert_eq!(merged.sample(Time::from_nanos(3)).0, Some("a"));
//! ```

use super::signal::Signal;
use super::time::{DeltaTime, Time};
use super::updates::{Pull, Step, UpdateSource, Updates};
use super::Value;
use std::cmp::Ordering;
use std::sync::Arc;

/// Value seen through [`peek`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookahead<T> {
    /// The signal will carry this value `dt` from now
    Value(T),
    /// The signal will be inactive `dt` from now
    Inactive,
}

type ZipFn<A, B, C> = Arc<dyn Fn(Option<A>, Option<B>) -> Option<C> + Send + Sync>;

struct ZipSource<A, B, C> {
    left: Updates<A>,
    right: Updates<B>,
    current_left: Option<A>,
    current_right: Option<B>,
    f: ZipFn<A, B, C>,
}

impl<A: Value, B: Value, C: Value> UpdateSource<C> for ZipSource<A, B, C> {
    fn pull(self: Box<Self>, bound: Time) -> Pull<C> {
        let ZipSource {
            left,
            right,
            current_left,
            current_right,
            f,
        } = *self;

        let steps = (left.step(bound), right.step(bound));
        let (t, left, right, current_left, current_right) = match steps {
            (Step::Done, Step::Done) => return Pull::Done,
            (Step::Next(tl, vl, rl), Step::Next(tr, vr, rr)) => match tl.cmp(&tr) {
                Ordering::Less => (tl, rl, right, vl, current_right),
                Ordering::Greater => (tr, left, rr, current_left, vr),
                Ordering::Equal => (tl, rl, rr, vl, vr),
            },
            (Step::Next(tl, vl, rl), _) => (tl, rl, right, vl, current_right),
            (_, Step::Next(tr, vr, rr)) => (tr, left, rr, current_left, vr),
            _ => {
                return Pull::Wait(Box::new(ZipSource {
                    left,
                    right,
                    current_left,
                    current_right,
                    f,
                }))
            }
        };

        let value = f(current_left.clone(), current_right.clone());
        let next = ZipSource {
            left,
            right,
            current_left,
            current_right,
            f,
        };
        Pull::Next(t, value, Updates::from_source(next))
    }
}

/// Combine the optional values of two signals at every instant
///
/// `f` sees inactivity on either side. Where both sides are active it must
/// agree with whatever `combine` would compute.
pub fn combine_full<A, B, C, F>(f: F, left: Signal<A>, right: Signal<B>) -> Signal<C>
where
    A: Value,
    B: Value,
    C: Value,
    F: Fn(Option<A>, Option<B>) -> Option<C> + Send + Sync + 'static,
{
    let f: ZipFn<A, B, C> = Arc::new(f);
    let (head_left, left) = left.into_parts();
    let (head_right, right) = right.into_parts();
    let head = f(head_left.clone(), head_right.clone());

    let source = ZipSource {
        left,
        right,
        current_left: head_left,
        current_right: head_right,
        f,
    };
    Signal::new(head, Updates::from_source(source))
}

/// Combine two signals, active only where both are active
pub fn combine<A, B, C, F>(f: F, left: Signal<A>, right: Signal<B>) -> Signal<C>
where
    A: Value,
    B: Value,
    C: Value,
    F: Fn(A, B) -> C + Send + Sync + 'static,
{
    combine_full(
        move |a, b| match (a, b) {
            (Some(a), Some(b)) => Some(f(a, b)),
            _ => None,
        },
        left,
        right,
    )
}

/// Values of `values`, activity of `activity`
pub fn mask<A, B>(values: Signal<A>, activity: Signal<B>) -> Signal<A>
where
    A: Value,
    B: Value,
{
    combine_full(|a, b: Option<B>| b.and(a), values, activity)
}

/// Left value where the left signal is active, right value otherwise
pub fn merge<T: Value>(left: Signal<T>, right: Signal<T>) -> Signal<T> {
    combine_full(|a: Option<T>, b| a.or(b), left, right)
}

struct JoinSource<T> {
    outer: Updates<Signal<T>>,
    inner: Option<Updates<T>>,
}

impl<T: Value> JoinSource<T> {
    fn resume(outer: Updates<Signal<T>>, inner: Option<Updates<T>>) -> Updates<T> {
        Updates::from_source(JoinSource { outer, inner })
    }
}

impl<T: Value> UpdateSource<T> for JoinSource<T> {
    fn pull(self: Box<Self>, bound: Time) -> Pull<T> {
        match self.outer.step(bound) {
            Step::Next(switch, signal, outer_rest) => {
                // Inner changes strictly before the switch still count.
                if let Some(inner) = &self.inner {
                    if let Step::Next(t, value, inner_rest) = inner.step(bound) {
                        if t < switch {
                            return Pull::Next(t, value, Self::resume(self.outer, Some(inner_rest)));
                        }
                    }
                }
                match signal {
                    Some(signal) => {
                        let (value, trimmed) = signal.sample(switch);
                        let (_, inner) = trimmed.into_parts();
                        Pull::Next(switch, value, Self::resume(outer_rest, Some(inner)))
                    }
                    None => Pull::Next(switch, None, Self::resume(outer_rest, None)),
                }
            }
            Step::Done => match self.inner {
                Some(inner) => Pull::Become(inner),
                None => Pull::Done,
            },
            Step::Wait => {
                let step = match &self.inner {
                    Some(inner) => inner.step(bound),
                    None => Step::Wait,
                };
                match step {
                    Step::Next(t, value, inner_rest) => {
                        Pull::Next(t, value, Self::resume(self.outer, Some(inner_rest)))
                    }
                    Step::Wait | Step::Done => Pull::Wait(self),
                }
            }
        }
    }
}

/// Flatten a signal of signals
///
/// At each change of `outer` the result switches to the new inner signal,
/// taking the inner signal's own value at the switch instant. Where `outer`
/// is inactive the result is inactive.
pub fn join<T: Value>(outer: Signal<Signal<T>>) -> Signal<T> {
    let (head, outer) = outer.into_parts();
    let (value, inner) = match head {
        Some(signal) => {
            let (value, inner) = signal.into_parts();
            (value, Some(inner))
        }
        None => (None, None),
    };
    Signal::new(value, JoinSource::resume(outer, inner))
}

/// `before` strictly before `at`, `after` from `at` onward
pub fn switch_at<T: Value>(before: Signal<T>, at: Time, after: Signal<T>) -> Signal<T> {
    join(Signal::from_updates(Some(before), vec![(at, Some(after))]))
}

/// [`switch_at`], forcing `before`'s spine up to `at` first
///
/// The discarded part of `before` is fully evaluated and can be released
/// instead of being retained by pending producers.
pub fn switch_at_strict<T: Value>(before: Signal<T>, at: Time, after: Signal<T>) -> Signal<T> {
    before.force_until(at);
    switch_at(before, at, after)
}

/// Look `dt` ahead without changing the signal's own activity
///
/// Active exactly where `signal` is active; carries what `signal` will be
/// `dt` later.
pub fn peek<T: Value>(dt: DeltaTime, signal: Signal<T>) -> Signal<Lookahead<T>> {
    let future = signal.clone().delay(-dt);
    combine_full(
        |ahead: Option<T>, now: Option<T>| {
            now.map(|_| match ahead {
                Some(value) => Lookahead::Value(value),
                None => Lookahead::Inactive,
            })
        },
        future,
        signal,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(n: i64) -> Time {
        Time::from_nanos(n)
    }

    fn trace<T: Value>(signal: Signal<T>, until: i64) -> Vec<Option<T>> {
        let mut out = Vec::new();
        let mut signal = signal;
        for at in 0..=until {
            let (value, rest) = signal.sample(t(at));
            out.push(value);
            signal = rest;
        }
        out
    }

    #[test]
    fn test_combine_only_where_both_active() {
        let a = Signal::from_updates(Some(1), vec![(t(2), None), (t(4), Some(3))]);
        let b = Signal::from_updates(None, vec![(t(1), Some(10))]);

        let sum = combine(|x: i32, y: i32| x + y, a, b);
        assert_eq!(trace(sum, 5), vec![None, Some(11), None, None, Some(13), Some(13)]);
    }

    #[test]
    fn test_simultaneous_changes_yield_one_event() {
        let a = Signal::from_updates(Some(1), vec![(t(3), Some(2))]);
        let b = Signal::from_updates(Some(10), vec![(t(3), Some(20))]);

        let events = combine(|x: i32, y: i32| x + y, a, b).to_event_list(t(0), t(10));
        assert_eq!(events, vec![(t(0), Some(11)), (t(3), Some(22))]);
    }

    #[test]
    fn test_merge_is_left_favoring_on_ties() {
        let a = Signal::from_updates(None, vec![(t(3), Some("left"))]);
        let b = Signal::from_updates(Some("right"), vec![(t(3), Some("right-again"))]);

        assert_eq!(merge(a, b).sample(t(3)).0, Some("left"));
    }

    #[test]
    fn test_mask_uses_activity_profile() {
        let values = Signal::from_updates(Some('x'), vec![(t(4), Some('y'))]);
        let activity = Signal::from_updates(None, vec![(t(2), Some(())), (t(5), None)]);

        assert_eq!(
            trace(mask(values, activity), 5),
            vec![None, None, Some('x'), Some('x'), Some('y'), None]
        );
    }

    #[test]
    fn test_switch_at_discards_old_change_at_switch() {
        let before = Signal::from_updates(Some(0), vec![(t(1), Some(1)), (t(3), Some(3))]);
        let after = Signal::from_updates(Some(100), vec![(t(2), Some(200)), (t(4), Some(400))]);

        assert_eq!(
            trace(switch_at(before, t(3), after), 5),
            vec![Some(0), Some(1), Some(1), Some(200), Some(400), Some(400)]
        );
    }

    #[test]
    fn test_switch_at_strict_matches_lazy_switch() {
        let before = || {
            Signal::from_updates(Some(0), vec![(t(1), Some(1)), (t(3), Some(3)), (t(6), Some(6))])
        };
        let after = || Signal::from_updates(None, vec![(t(2), Some(20)), (t(5), Some(50))]);

        let strict = switch_at_strict(before(), t(4), after());
        let lazy = switch_at(before(), t(4), after());

        assert_eq!(strict.clone().to_event_list(t(0), t(8)), lazy.to_event_list(t(0), t(8)));
        assert_eq!(
            trace(strict, 6),
            vec![Some(0), Some(1), Some(1), Some(3), Some(20), Some(50), Some(50)]
        );
    }

    #[test]
    fn test_join_follows_outer_activity() {
        let inner_a = Signal::from_updates(Some(1), vec![(t(2), Some(2))]);
        let inner_b = Signal::always(7);
        let outer = Signal::from_updates(Some(inner_a), vec![(t(3), None), (t(4), Some(inner_b))]);

        assert_eq!(
            trace(join(outer), 5),
            vec![Some(1), Some(1), Some(2), None, Some(7), Some(7)]
        );
    }

    #[test]
    fn test_peek_predicts_future_within_activity() {
        let s = Signal::from_updates(None, vec![(t(1), Some(1)), (t(3), Some(2)), (t(5), None)]);

        assert_eq!(
            trace(peek(DeltaTime::from_nanos(2), s), 5),
            vec![
                None,
                Some(Lookahead::Value(2)),
                Some(Lookahead::Value(2)),
                Some(Lookahead::Inactive),
                Some(Lookahead::Inactive),
                None,
            ]
        );
    }
}
