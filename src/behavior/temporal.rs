// Copyright (c) 2025 - Cowboy AI, Inc.
//! Temporal operators

use super::space::{Space, Wire, S};
use super::{Behavior, Term};
use crate::frp::{self, DeltaTime, Lookahead, Value};
use crate::runtime::Partition;

/// Add `dt` of logical latency to every wire
///
/// A negative `dt` is treated as zero; behaviors cannot move a signal
/// into its own past.
pub fn delay<A: Space>(dt: DeltaTime) -> Behavior<A, A> {
    let dt = dt.max(DeltaTime::ZERO);
    Behavior::build(Term::Delay(dt), dt, move |a| A::delay(a, dt))
}

/// Align every wire of the space to its slowest wire
pub fn synch<A: Space>() -> Behavior<A, A> {
    Behavior::build(Term::Primitive("synch"), DeltaTime::ZERO, |a: A::Live| {
        let latency = A::latency(&a);
        A::align(a, latency)
    })
}

/// What the signal will be `dt` from now, wherever it is active now
pub fn peek<P: Partition, X: Value>(dt: DeltaTime) -> Behavior<S<P, X>, S<P, Lookahead<X>>> {
    Behavior::build(Term::Primitive("peek"), DeltaTime::ZERO, move |wire: Wire<X>| {
        Wire::with_latency(frp::peek(dt, wire.signal), wire.latency)
    })
}
