// Copyright (c) 2025 - Cowboy AI, Inc.
//! Structural operators
//!
//! Rearrange products and sums without touching values. Every operator
//! here has zero latency except where it has to synchronize wires
//! (`zip`, `unsplit`, `disjoin`), and even then the static latency stays
//! zero: alignment only waits for the slowest input.
//!
//! # Distribution
//!
//! ```text
//! And<X, Or<And<S<P, ()>, Y>, Z>>
//!     │
//!     │  disjoin: X gated by the decision u
//!     ▼
//! Or<And<X, Y>, And<X, Z>>
//!       u active ─┘      └─ u inactive
//! ```

use super::space::{And, InPartition, Or, Space, Unit, Void, Wire, S};
use super::{parallel, Behavior, Either, Term};
use crate::frp::{combine, merge as merge_signals, DeltaTime, Value};
use crate::runtime::Partition;

fn structural<A: Space, B: Space, F>(name: &'static str, run: F) -> Behavior<A, B>
where
    F: Fn(A::Live) -> B::Live + Send + Sync + 'static,
{
    Behavior::build(Term::Primitive(name), DeltaTime::ZERO, run)
}

// Products

pub fn dup<A: Space>() -> Behavior<A, And<A, A>> {
    structural("dup", |a: A::Live| (a.clone(), a))
}

/// Feed one input to two behaviors
pub fn fanout<A: Space, B: Space, C: Space>(
    f: Behavior<A, B>,
    g: Behavior<A, C>,
) -> Behavior<A, And<B, C>> {
    dup().then(parallel(f, g))
}

pub fn fst<A: Space, B: Space>() -> Behavior<And<A, B>, A> {
    structural("fst", |(a, _): (A::Live, B::Live)| a)
}

pub fn snd<A: Space, B: Space>() -> Behavior<And<A, B>, B> {
    structural("snd", |(_, b): (A::Live, B::Live)| b)
}

pub fn swap<A: Space, B: Space>() -> Behavior<And<A, B>, And<B, A>> {
    structural("swap", |(a, b): (A::Live, B::Live)| (b, a))
}

pub fn assoc_left<A, B, C>() -> Behavior<And<A, And<B, C>>, And<And<A, B>, C>>
where
    A: Space,
    B: Space,
    C: Space,
{
    structural("assoc_left", |(a, (b, c)): (A::Live, (B::Live, C::Live))| ((a, b), c))
}

pub fn assoc_right<A, B, C>() -> Behavior<And<And<A, B>, C>, And<A, And<B, C>>>
where
    A: Space,
    B: Space,
    C: Space,
{
    structural("assoc_right", |((a, b), c): ((A::Live, B::Live), C::Live)| (a, (b, c)))
}

pub fn unit_intro<A: Space>() -> Behavior<A, And<A, Unit>> {
    structural("unit_intro", |a: A::Live| (a, ()))
}

pub fn unit_elim<A: Space>() -> Behavior<And<A, Unit>, A> {
    structural("unit_elim", |(a, ()): (A::Live, ())| a)
}

/// Pair two co-located signals into one
///
/// The result is active where both inputs are.
pub fn zip<P: Partition, X: Value, Y: Value>() -> Behavior<And<S<P, X>, S<P, Y>>, S<P, (X, Y)>> {
    structural("zip", |(x, y): (Wire<X>, Wire<Y>)| {
        let latency = x.latency.max(y.latency);
        let x = x.aligned(latency);
        let y = y.aligned(latency);
        Wire::with_latency(combine(|a, b| (a, b), x.signal, y.signal), latency)
    })
}

pub fn unzip<P: Partition, X: Value, Y: Value>() -> Behavior<S<P, (X, Y)>, And<S<P, X>, S<P, Y>>> {
    structural("unzip", |pair: Wire<(X, Y)>| {
        let latency = pair.latency;
        let x = pair.signal.clone().map_values(|(x, _): (X, Y)| x);
        let y = pair.signal.map_values(|(_, y): (X, Y)| y);
        (Wire::with_latency(x, latency), Wire::with_latency(y, latency))
    })
}

// Sums

pub fn mirror<A: Space, B: Space>() -> Behavior<Or<A, B>, Or<B, A>> {
    structural("mirror", |(a, b): (A::Live, B::Live)| (b, a))
}

/// Collapse both branches of a sum into one
pub fn merge<A: Space>() -> Behavior<Or<A, A>, A> {
    structural("merge", |(l, r): (A::Live, A::Live)| A::merge(l, r))
}

pub fn inject_left<A: Space, B: Space>() -> Behavior<A, Or<A, B>> {
    structural("inject_left", |a: A::Live| (a, B::inactive()))
}

pub fn inject_right<A: Space, B: Space>() -> Behavior<B, Or<A, B>> {
    structural("inject_right", |b: B::Live| (A::inactive(), b))
}

pub fn sum_assoc_left<A, B, C>() -> Behavior<Or<A, Or<B, C>>, Or<Or<A, B>, C>>
where
    A: Space,
    B: Space,
    C: Space,
{
    structural("sum_assoc_left", |(a, (b, c)): (A::Live, (B::Live, C::Live))| ((a, b), c))
}

pub fn sum_assoc_right<A, B, C>() -> Behavior<Or<Or<A, B>, C>, Or<A, Or<B, C>>>
where
    A: Space,
    B: Space,
    C: Space,
{
    structural("sum_assoc_right", |((a, b), c): ((A::Live, B::Live), C::Live)| (a, (b, c)))
}

pub fn void_intro<A: Space>() -> Behavior<A, Or<A, Void>> {
    structural("void_intro", |a: A::Live| (a, ()))
}

pub fn void_elim<A: Space>() -> Behavior<Or<A, Void>, A> {
    structural("void_elim", |(a, ()): (A::Live, ())| a)
}

/// Route each value of a choice signal to its own branch
pub fn split<P, X, Y>() -> Behavior<S<P, Either<X, Y>>, Or<S<P, X>, S<P, Y>>>
where
    P: Partition,
    X: Value,
    Y: Value,
{
    structural("split", |wire: Wire<Either<X, Y>>| {
        let latency = wire.latency;
        let left = wire.signal.clone().map_full(|value: Option<Either<X, Y>>| match value {
            Some(Either::Left(x)) => Some(x),
            _ => None,
        });
        let right = wire.signal.map_full(|value: Option<Either<X, Y>>| match value {
            Some(Either::Right(y)) => Some(y),
            _ => None,
        });
        (Wire::with_latency(left, latency), Wire::with_latency(right, latency))
    })
}

pub fn unsplit<P, X, Y>() -> Behavior<Or<S<P, X>, S<P, Y>>, S<P, Either<X, Y>>>
where
    P: Partition,
    X: Value,
    Y: Value,
{
    structural("unsplit", |(x, y): (Wire<X>, Wire<Y>)| {
        let latency = x.latency.max(y.latency);
        let x = x.aligned(latency).signal.map_values(Either::Left);
        let y = y.aligned(latency).signal.map_values(Either::Right);
        Wire::with_latency(merge_signals(x, y), latency)
    })
}

// Relocation and distribution

/// Move a signal's home partition from `P1` to `P2`
///
/// The value is untouched; transport is the runtime's concern.
pub fn cross<P1: Partition, P2: Partition, X: Value>() -> Behavior<S<P1, X>, S<P2, X>> {
    Behavior::build(Term::Cross(P1::ID, P2::ID), DeltaTime::ZERO, |wire: Wire<X>| wire)
}

/// Distribute a product over a sum, splitting `X` by the decision signal
///
/// Decision and `X` are first aligned to a common latency, so the gate
/// never pairs values from different logical instants.
pub fn disjoin<P, X, Y, Z>() -> Behavior<And<X, Or<And<S<P, ()>, Y>, Z>>, Or<And<X, Y>, And<X, Z>>>
where
    P: Partition,
    X: InPartition<P>,
    Y: Space,
    Z: Space,
{
    structural(
        "disjoin",
        |(x, ((u, y), z)): (X::Live, ((Wire<()>, Y::Live), Z::Live))| {
            let latency = X::latency(&x).max(u.latency);
            let x = X::align(x, latency);
            let decision = u.aligned(latency).signal;
            let complement = decision.clone().map_full(|u: Option<()>| match u {
                Some(()) => None,
                None => Some(()),
            });
            let chosen = X::gate(x.clone(), &decision);
            let other = X::gate(x, &complement);
            ((chosen, y), (other, z))
        },
    )
}
