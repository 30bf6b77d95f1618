// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure transforms over a single signal
//!
//! The annotated variants change evaluation strategy only. Each of them
//! is observationally equal to [`map_values`] with the same function.

use std::sync::Arc;

use super::space::{Wire, S};
use super::{Behavior, Term};
use crate::frp::updates::SpeculativeSource;
use crate::frp::{DeltaTime, Signal, Updates, Value};
use crate::runtime::Partition;

fn lift<P, X, Y, G>(name: &'static str, g: G) -> Behavior<S<P, X>, S<P, Y>>
where
    P: Partition,
    X: Value,
    Y: Value,
    G: Fn(Signal<X>) -> Signal<Y> + Send + Sync + 'static,
{
    Behavior::build(Term::Primitive(name), DeltaTime::ZERO, move |wire: Wire<X>| {
        Wire::with_latency(g(wire.signal), wire.latency)
    })
}

/// Transform active values
pub fn map_values<P, X, Y, F>(f: F) -> Behavior<S<P, X>, S<P, Y>>
where
    P: Partition,
    X: Value,
    Y: Value,
    F: Fn(X) -> Y + Send + Sync + 'static,
{
    let f = Arc::new(f);
    lift("map_values", move |signal: Signal<X>| {
        let f = Arc::clone(&f);
        signal.map_values(move |x| f(x))
    })
}

/// Transform the optional value, including inactivity
pub fn map_full<P, X, Y, F>(f: F) -> Behavior<S<P, X>, S<P, Y>>
where
    P: Partition,
    X: Value,
    Y: Value,
    F: Fn(Option<X>) -> Option<Y> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    lift("map_full", move |signal: Signal<X>| {
        let f = Arc::clone(&f);
        signal.map_full(move |x| f(x))
    })
}

/// Replace every active value with `value`
pub fn constant<P, X, Y>(value: Y) -> Behavior<S<P, X>, S<P, Y>>
where
    P: Partition,
    X: Value,
    Y: Value,
{
    lift("constant", move |signal: Signal<X>| {
        let value = value.clone();
        signal.map_values(move |_| value.clone())
    })
}

/// [`map_values`] that forces the upstream spine before each change is
/// observed downstream
pub fn map_strict<P, X, Y, F>(f: F) -> Behavior<S<P, X>, S<P, Y>>
where
    P: Partition,
    X: Value,
    Y: Value,
    F: Fn(X) -> Y + Send + Sync + 'static,
{
    let f = Arc::new(f);
    lift("map_strict", move |signal: Signal<X>| {
        let f = Arc::clone(&f);
        signal.strict().map_values(move |x| f(x))
    })
}

/// [`map_values`] that pre-computes the next change within `horizon`
///
/// Pre-computation runs on the blocking pool of the ambient tokio runtime
/// and is skipped when there is none.
pub fn map_speculative<P, X, Y, F>(horizon: DeltaTime, f: F) -> Behavior<S<P, X>, S<P, Y>>
where
    P: Partition,
    X: Value,
    Y: Value,
    F: Fn(X) -> Y + Send + Sync + 'static,
{
    let f: Arc<dyn Fn(X) -> Y + Send + Sync> = Arc::new(f);
    lift("map_speculative", move |signal: Signal<X>| {
        let (head, tail) = signal.into_parts();
        let source = SpeculativeSource {
            source: tail,
            f: Arc::clone(&f),
            horizon,
            ahead: None,
        };
        Signal::new(head.map(|x| f(x)), Updates::from_source(source))
    })
}

/// [`map_values`] that suppresses outputs `eq` declares redundant
pub fn map_dedup<P, X, Y, E, F>(eq: E, f: F) -> Behavior<S<P, X>, S<P, Y>>
where
    P: Partition,
    X: Value,
    Y: Value,
    E: Fn(&Y, &Y) -> bool + Send + Sync + 'static,
    F: Fn(X) -> Y + Send + Sync + 'static,
{
    let eq = Arc::new(eq);
    let f = Arc::new(f);
    lift("map_dedup", move |signal: Signal<X>| {
        let f = Arc::clone(&f);
        let eq = Arc::clone(&eq);
        signal.map_values(move |x| f(x)).dedup_by(move |a, b| eq(a, b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frp::Time;
    use crate::runtime::Main;
    use pretty_assertions::assert_eq;

    fn t(n: i64) -> Time {
        Time::from_nanos(n)
    }

    fn input() -> Wire<i32> {
        Wire::new(Signal::from_updates(
            Some(1),
            vec![(t(2), Some(2)), (t(4), None), (t(6), Some(3))],
        ))
    }

    fn events(wire: Wire<i32>) -> Vec<(Time, Option<i32>)> {
        wire.signal.to_event_list(t(0), t(10))
    }

    #[test]
    fn test_annotated_maps_agree_with_map_values() {
        let plain = map_values::<Main, _, _, _>(|x: i32| x * 10).run(input());
        let strict = map_strict::<Main, _, _, _>(|x: i32| x * 10).run(input());
        let horizon = DeltaTime::from_nanos(3);
        let speculative = map_speculative::<Main, _, _, _>(horizon, |x: i32| x * 10).run(input());

        assert_eq!(events(strict), events(plain.clone()));
        assert_eq!(events(speculative), events(plain));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_speculative_map_inside_runtime() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let f = map_speculative::<Main, _, _, _>(DeltaTime::from_nanos(10), move |x: i32| {
            counted.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            x + 1
        });

        let out = events(f.run(input()));
        assert_eq!(out, vec![(t(0), Some(2)), (t(2), Some(3)), (t(4), None), (t(6), Some(4))]);
        // the head and two active changes, each computed at most once
        assert!(calls.load(std::sync::atomic::Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_map_dedup_keeps_first_change() {
        let parity =
            map_dedup::<Main, _, _, _, _>(|a: &bool, b: &bool| a == b, |x: i32| x % 2 == 0);
        let wire = Wire::new(Signal::from_updates(
            Some(1),
            vec![(t(1), Some(2)), (t(2), Some(4)), (t(3), Some(5))],
        ));

        let out = parity.run(wire).signal.to_event_list(t(0), t(5));
        assert_eq!(out, vec![(t(0), Some(false)), (t(1), Some(true)), (t(3), Some(false))]);
    }

    #[test]
    fn test_map_full_sees_inactivity() {
        let fill = map_full::<Main, _, _, _>(|x: Option<i32>| Some(x.unwrap_or(0)));
        let out = fill.run(input()).signal;

        assert_eq!(out.sample(t(5)).0, Some(0));
    }

    #[test]
    fn test_constant_keeps_activity() {
        let out = constant::<Main, i32, &str>("on").run(input()).signal;

        assert_eq!(out.clone().sample(t(3)).0, Some("on"));
        assert_eq!(out.sample(t(5)).0, None);
    }
}
