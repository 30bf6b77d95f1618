// Copyright (c) 2025 - Cowboy AI, Inc.
//! Dynamic Evaluation
//!
//! Runs behavior descriptions discovered at runtime. The description
//! arrives as a signal co-located with the input; each new description
//! replaces the running one from the instant it appears.
//!
//! ```text
//!   descriptions ──┬── valid ────> run over x, aligned to input + bound ──> Y
//!                  │
//!   x ─────────────┘── rejected ──> EvalError ──────────────────────────> error branch
//! ```
//!
//! A description is rejected when its latency exceeds the bound or when it
//! contains an unavailable term. Rejection never stops the pipeline; the
//! output branch is inactive for as long as the rejected description is
//! current.

use thiserror::Error;
use tracing::debug;

use super::space::{And, InPartition, Or, Space, Wire, S};
use super::{Behavior, Term};
use crate::frp::{DeltaTime, Pull, Signal, Step, Time, UpdateSource, Updates};
use crate::runtime::Partition;

/// Why a description could not be installed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Description latency {latency} exceeds bound {bound}")]
    LatencyExceeded { latency: DeltaTime, bound: DeltaTime },

    #[error("Description cannot be installed: {0}")]
    Install(String),
}

type Checked<X, Y> = Result<Behavior<X, Y>, EvalError>;

fn check<X: Space, Y: Space>(
    descriptions: Signal<Behavior<X, Y>>,
    bound: DeltaTime,
) -> Signal<Checked<X, Y>> {
    descriptions.map_values(move |description: Behavior<X, Y>| {
        match description.validate(bound) {
            Ok(()) => Ok(description),
            Err(e) => {
                debug!(term = %description, %bound, "Rejected dynamic description: {}", e);
                Err(e)
            }
        }
    })
}

/// Output of one checked description over `x`
fn output<X: Space, Y: Space>(
    checked: Option<Checked<X, Y>>,
    x: X::Live,
    target: DeltaTime,
) -> Option<Y::Live> {
    checked.map(|checked| match checked {
        Ok(description) => Y::align(description.run(x), target),
        Err(_) => Y::inactive(),
    })
}

/// Installs each description over the input as of its switch instant
///
/// The input is trimmed in step with the description sequence, so only
/// the history a description can still observe (its `target` window) is
/// retained between switches.
struct Installer<X: Space, Y: Space> {
    descriptions: Updates<Checked<X, Y>>,
    x: X::Live,
    target: DeltaTime,
}

impl<X: Space, Y: Space> UpdateSource<Y::Live> for Installer<X, Y> {
    fn pull(self: Box<Self>, bound: Time) -> Pull<Y::Live> {
        let Installer {
            descriptions,
            x,
            target,
        } = *self;
        match descriptions.step(bound) {
            Step::Done => Pull::Done,
            // The next switch lies after `bound`.
            Step::Wait => Pull::Wait(Box::new(Installer {
                descriptions,
                x: X::trim(x, bound - target),
                target,
            })),
            Step::Next(switch, checked, rest) => {
                let x = X::trim(x, switch - target);
                let installed = output::<X, Y>(checked, x.clone(), target);
                let next = Installer {
                    descriptions: rest,
                    x,
                    target,
                };
                Pull::Next(switch, installed, Updates::from_source(next))
            }
        }
    }
}

/// Output and error wires for one description signal
fn install<P, X, Y>(
    descriptions: Wire<Behavior<X, Y>>,
    x: X::Live,
    bound: DeltaTime,
) -> (Y::Live, Wire<EvalError>)
where
    P: Partition,
    X: InPartition<P>,
    Y: Space,
{
    let target = descriptions.latency.max(X::latency(&x)) + bound;
    let decision_latency = descriptions.latency;
    let checked = check(descriptions.signal, bound);

    let (head, tail) = Wire::with_latency(checked.clone(), decision_latency)
        .aligned(target)
        .signal
        .into_parts();
    let head = output::<X, Y>(head, x.clone(), target);
    let installer = Installer {
        descriptions: tail,
        x,
        target,
    };
    let outputs = Signal::new(head, Updates::from_source(installer));
    let output = Y::join(outputs, target);

    let errors = checked.map_full(|checked: Option<Checked<X, Y>>| checked.and_then(Result::err));
    (output, Wire::with_latency(errors, decision_latency))
}

/// Run the current description over `x`
///
/// Accepted output is aligned to exactly the input latency plus `bound`.
/// Errors are reported at the latency of the description signal.
pub fn eval<P, X, Y>(
    bound: DeltaTime,
) -> Behavior<And<S<P, Behavior<X, Y>>, X>, Or<Y, S<P, EvalError>>>
where
    P: Partition,
    X: InPartition<P>,
    Y: Space,
{
    let bound = bound.max(DeltaTime::ZERO);
    Behavior::build(
        Term::Primitive("eval"),
        bound,
        move |(descriptions, x): (Wire<Behavior<X, Y>>, X::Live)| {
            install::<P, X, Y>(descriptions, x, bound)
        },
    )
}

/// [`eval`], also returning the untouched input while a description is
/// rejected
pub fn eval_or_fallback<P, X, Y>(
    bound: DeltaTime,
) -> Behavior<And<S<P, Behavior<X, Y>>, X>, Or<Y, And<S<P, EvalError>, X>>>
where
    P: Partition,
    X: InPartition<P>,
    Y: Space,
{
    let bound = bound.max(DeltaTime::ZERO);
    Behavior::build(
        Term::Primitive("eval_or_fallback"),
        bound,
        move |(descriptions, x): (Wire<Behavior<X, Y>>, X::Live)| {
            let (output, errors) = install::<P, X, Y>(descriptions, x.clone(), bound);
            let latency = errors.latency.max(X::latency(&x));
            let errors = errors.aligned(latency);
            let fallback = X::gate(X::align(x, latency), &errors.signal);
            (output, (errors, fallback))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{identity, pure, temporal};
    use crate::runtime::Main;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type Num = S<Main, i32>;

    fn t(n: i64) -> Time {
        Time::from_nanos(n)
    }

    fn add(n: i32) -> Behavior<Num, Num> {
        pure::map_values(move |x: i32| x + n)
    }

    fn at<X: crate::frp::Value>(wire: &Wire<X>, n: i64) -> Option<X> {
        wire.signal.clone().sample(t(n)).0
    }

    #[test]
    fn test_switches_between_descriptions() {
        let descriptions =
            Wire::new(Signal::from_updates(Some(add(1)), vec![(t(10), Some(add(100)))]));
        let x = Wire::new(Signal::always(5));

        let (out, errors) = eval::<Main, Num, Num>(DeltaTime::ZERO).run((descriptions, x));

        assert_eq!(out.latency, DeltaTime::ZERO);
        assert_eq!(at(&out, 9), Some(6));
        assert_eq!(at(&out, 10), Some(105));
        assert_eq!(at(&errors, 10), None);
    }

    #[test]
    fn test_output_aligned_to_bound() {
        let descriptions = Wire::new(Signal::always(add(1)));
        let x = Wire::new(Signal::from_updates(None, vec![(t(2), Some(1))]));

        let (out, _) = eval::<Main, Num, Num>(DeltaTime::from_nanos(5)).run((descriptions, x));

        assert_eq!(out.latency, DeltaTime::from_nanos(5));
        assert_eq!(at(&out, 6), None);
        assert_eq!(at(&out, 7), Some(2));
    }

    #[test]
    fn test_rejected_description_takes_error_branch() {
        let slow = temporal::delay::<Num>(DeltaTime::from_nanos(50));
        let descriptions = Wire::new(Signal::from_updates(Some(add(1)), vec![(t(4), Some(slow))]));
        let x = Wire::new(Signal::always(1));

        let (out, errors) =
            eval::<Main, Num, Num>(DeltaTime::from_nanos(10)).run((descriptions, x));

        assert_eq!(at(&out, 3), Some(2));
        assert_eq!(at(&out, 20), None);
        assert_eq!(
            at(&errors, 4),
            Some(EvalError::LatencyExceeded {
                latency: DeltaTime::from_nanos(50),
                bound: DeltaTime::from_nanos(10),
            })
        );
    }

    #[test]
    fn test_fallback_returns_input_while_rejected() {
        let descriptions = Wire::new(Signal::from_updates(
            Some(Behavior::<Num, Num>::unavailable("no codec")),
            vec![(t(6), Some(add(1)))],
        ));
        let x = Wire::new(Signal::from_updates(Some(1), vec![(t(3), Some(2))]));

        let (out, (errors, fallback)) =
            eval_or_fallback::<Main, Num, Num>(DeltaTime::ZERO).run((descriptions, x));

        assert_eq!(at(&errors, 0), Some(EvalError::Install("no codec".to_string())));
        assert_eq!((at(&fallback, 0), at(&fallback, 4)), (Some(1), Some(2)));
        assert_eq!(at(&out, 4), None);

        assert_eq!(at(&errors, 6), None);
        assert_eq!(at(&fallback, 6), None);
        assert_eq!(at(&out, 6), Some(3));
    }

    /// Payload that counts its live copies
    struct Tracked(Arc<AtomicUsize>);

    impl Tracked {
        fn new(live: &Arc<AtomicUsize>) -> Self {
            live.fetch_add(1, Ordering::SeqCst);
            Self(Arc::clone(live))
        }
    }

    impl Clone for Tracked {
        fn clone(&self) -> Self {
            Self::new(&self.0)
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_input_history_released_while_description_pending() {
        type Payload = S<Main, Tracked>;
        const CHANGES: i64 = 5_000;

        let live = Arc::new(AtomicUsize::new(0));
        let x = Signal::from_updates(
            Some(Tracked::new(&live)),
            (1..=CHANGES).map(|n| (t(n), Some(Tracked::new(&live)))).collect(),
        );
        let descriptions = Signal::from_updates(
            Some(identity::<Payload>()),
            vec![(t(1_000_000), Some(identity::<Payload>()))],
        );

        let inputs = (Wire::new(descriptions), Wire::new(x));
        let (out, _errors) = eval::<Main, Payload, Payload>(DeltaTime::ZERO).run(inputs);

        let mut signal = out.signal;
        for n in (0..=CHANGES + 1).step_by(100) {
            signal = signal.trim(t(n));
        }
        signal = signal.trim(t(CHANGES + 1));

        assert!(signal.head().is_some());
        assert!(live.load(Ordering::SeqCst) <= 2, "live payloads: {}", live.load(Ordering::SeqCst));
    }

    #[test]
    fn test_switch_sees_input_as_of_switch_with_delayed_description() {
        let slow = temporal::delay::<Num>(DeltaTime::from_nanos(3));
        let descriptions = Wire::new(Signal::from_updates(Some(add(0)), vec![(t(10), Some(slow))]));
        let x = Wire::new(Signal::from_updates(
            Some(0),
            (1..=20).map(|n| (t(n), Some(n as i32))).collect(),
        ));

        let (out, _) = eval::<Main, Num, Num>(DeltaTime::from_nanos(5)).run((descriptions, x));

        // Output lags the input by exactly the bound, before and after the switch.
        assert_eq!(at(&out, 14), Some(9));
        assert_eq!(at(&out, 15), Some(10));
        assert_eq!(at(&out, 22), Some(17));
    }
}
