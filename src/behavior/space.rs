// Copyright (c) 2025 - Cowboy AI, Inc.
//! Signal Spaces
//!
//! A space is a type-level description of the signals a behavior consumes
//! or produces. Spaces are never instantiated; each one names the live
//! form a behavior is interpreted over.
//!
//! ```text
//! S<P, X>      one signal of X homed in partition P   Live = Wire<X>
//! And<A, B>    synchronous product                    Live = (A::Live, B::Live)
//! Or<A, B>     exclusive sum                          Live = (A::Live, B::Live)
//! Unit         empty product                          Live = ()
//! Void         empty sum                              Live = ()
//! ```
//!
//! In an `Or` both sides are present at runtime, but at most one is active
//! at any instant.

use std::marker::PhantomData;

use crate::frp::{self, mask, DeltaTime, Signal, Time, Value};
use crate::runtime::Partition;

/// A signal and the logical latency accumulated upstream of it
#[derive(Clone, Debug)]
pub struct Wire<X> {
    pub signal: Signal<X>,
    pub latency: DeltaTime,
}

impl<X: Value> Wire<X> {
    pub fn new(signal: Signal<X>) -> Self {
        Self::with_latency(signal, DeltaTime::ZERO)
    }

    pub fn with_latency(signal: Signal<X>, latency: DeltaTime) -> Self {
        Self { signal, latency }
    }

    /// Shift the signal by `dt` and account for it
    pub fn delayed(self, dt: DeltaTime) -> Self {
        Self {
            signal: self.signal.delay(dt),
            latency: self.latency + dt,
        }
    }

    /// Delay up to `target`; wires already at or past it are untouched
    pub fn aligned(self, target: DeltaTime) -> Self {
        if target > self.latency {
            let dt = target - self.latency;
            self.delayed(dt)
        } else {
            self
        }
    }
}

/// Interpretation of a space over live signals
pub trait Space: 'static {
    type Live: Clone + Send + Sync + 'static;

    /// Every wire permanently inactive
    fn inactive() -> Self::Live;

    /// Wire-wise merge, left value where active
    fn merge(left: Self::Live, right: Self::Live) -> Self::Live;

    /// Restrict every wire to the activity of `activity`
    fn gate<U: Value>(live: Self::Live, activity: &Signal<U>) -> Self::Live;

    fn delay(live: Self::Live, dt: DeltaTime) -> Self::Live;

    /// Largest latency over all wires
    fn latency(live: &Self::Live) -> DeltaTime;

    /// Delay every wire up to `target`
    fn align(live: Self::Live, target: DeltaTime) -> Self::Live;

    /// Release every wire's history before `t`
    fn trim(live: Self::Live, t: Time) -> Self::Live;

    /// Follow whichever live value `outer` currently carries
    ///
    /// Every inner live value must already be aligned to `latency`.
    fn join(outer: Signal<Self::Live>, latency: DeltaTime) -> Self::Live;
}

/// A signal of `X` homed in partition `P`
pub struct S<P, X>(PhantomData<fn() -> (P, X)>);

/// Synchronous product
pub struct And<A, B>(PhantomData<fn() -> (A, B)>);

/// Exclusive sum
pub struct Or<A, B>(PhantomData<fn() -> (A, B)>);

pub struct Unit;

pub struct Void;

impl<P: Partition, X: Value> Space for S<P, X> {
    type Live = Wire<X>;

    fn inactive() -> Self::Live {
        Wire::new(Signal::never())
    }

    fn merge(left: Self::Live, right: Self::Live) -> Self::Live {
        let latency = left.latency.max(right.latency);
        let left = left.aligned(latency);
        let right = right.aligned(latency);
        Wire::with_latency(frp::merge(left.signal, right.signal), latency)
    }

    fn gate<U: Value>(live: Self::Live, activity: &Signal<U>) -> Self::Live {
        Wire::with_latency(mask(live.signal, activity.clone()), live.latency)
    }

    fn delay(live: Self::Live, dt: DeltaTime) -> Self::Live {
        live.delayed(dt)
    }

    fn latency(live: &Self::Live) -> DeltaTime {
        live.latency
    }

    fn align(live: Self::Live, target: DeltaTime) -> Self::Live {
        live.aligned(target)
    }

    fn trim(live: Self::Live, t: Time) -> Self::Live {
        Wire::with_latency(live.signal.trim(t), live.latency)
    }

    fn join(outer: Signal<Self::Live>, latency: DeltaTime) -> Self::Live {
        Wire::with_latency(frp::join(outer.map_values(|wire: Wire<X>| wire.signal)), latency)
    }
}

impl<A: Space, B: Space> Space for And<A, B> {
    type Live = (A::Live, B::Live);

    fn inactive() -> Self::Live {
        (A::inactive(), B::inactive())
    }

    fn merge(left: Self::Live, right: Self::Live) -> Self::Live {
        (A::merge(left.0, right.0), B::merge(left.1, right.1))
    }

    fn gate<U: Value>(live: Self::Live, activity: &Signal<U>) -> Self::Live {
        (A::gate(live.0, activity), B::gate(live.1, activity))
    }

    fn delay(live: Self::Live, dt: DeltaTime) -> Self::Live {
        (A::delay(live.0, dt), B::delay(live.1, dt))
    }

    fn latency(live: &Self::Live) -> DeltaTime {
        A::latency(&live.0).max(B::latency(&live.1))
    }

    fn align(live: Self::Live, target: DeltaTime) -> Self::Live {
        (A::align(live.0, target), B::align(live.1, target))
    }

    fn trim(live: Self::Live, t: Time) -> Self::Live {
        (A::trim(live.0, t), B::trim(live.1, t))
    }

    fn join(outer: Signal<Self::Live>, latency: DeltaTime) -> Self::Live {
        let a = A::join(outer.clone().map_values(|(a, _): Self::Live| a), latency);
        let b = B::join(outer.map_values(|(_, b): Self::Live| b), latency);
        (a, b)
    }
}

// Same live form as `And`; the difference is the exclusivity every
// operator producing an `Or` maintains.
impl<A: Space, B: Space> Space for Or<A, B> {
    type Live = (A::Live, B::Live);

    fn inactive() -> Self::Live {
        (A::inactive(), B::inactive())
    }

    fn merge(left: Self::Live, right: Self::Live) -> Self::Live {
        (A::merge(left.0, right.0), B::merge(left.1, right.1))
    }

    fn gate<U: Value>(live: Self::Live, activity: &Signal<U>) -> Self::Live {
        (A::gate(live.0, activity), B::gate(live.1, activity))
    }

    fn delay(live: Self::Live, dt: DeltaTime) -> Self::Live {
        (A::delay(live.0, dt), B::delay(live.1, dt))
    }

    fn latency(live: &Self::Live) -> DeltaTime {
        A::latency(&live.0).max(B::latency(&live.1))
    }

    fn align(live: Self::Live, target: DeltaTime) -> Self::Live {
        (A::align(live.0, target), B::align(live.1, target))
    }

    fn trim(live: Self::Live, t: Time) -> Self::Live {
        (A::trim(live.0, t), B::trim(live.1, t))
    }

    fn join(outer: Signal<Self::Live>, latency: DeltaTime) -> Self::Live {
        let a = A::join(outer.clone().map_values(|(a, _): Self::Live| a), latency);
        let b = B::join(outer.map_values(|(_, b): Self::Live| b), latency);
        (a, b)
    }
}

impl Space for Unit {
    type Live = ();

    fn inactive() -> Self::Live {}

    fn merge(_: Self::Live, _: Self::Live) -> Self::Live {}

    fn gate<U: Value>(_: Self::Live, _: &Signal<U>) -> Self::Live {}

    fn delay(_: Self::Live, _: DeltaTime) -> Self::Live {}

    fn latency(_: &Self::Live) -> DeltaTime {
        DeltaTime::ZERO
    }

    fn align(_: Self::Live, _: DeltaTime) -> Self::Live {}

    fn trim(_: Self::Live, _: Time) -> Self::Live {}

    fn join(_: Signal<Self::Live>, _: DeltaTime) -> Self::Live {}
}

impl Space for Void {
    type Live = ();

    fn inactive() -> Self::Live {}

    fn merge(_: Self::Live, _: Self::Live) -> Self::Live {}

    fn gate<U: Value>(_: Self::Live, _: &Signal<U>) -> Self::Live {}

    fn delay(_: Self::Live, _: DeltaTime) -> Self::Live {}

    fn latency(_: &Self::Live) -> DeltaTime {
        DeltaTime::ZERO
    }

    fn align(_: Self::Live, _: DeltaTime) -> Self::Live {}

    fn trim(_: Self::Live, _: Time) -> Self::Live {}

    fn join(_: Signal<Self::Live>, _: DeltaTime) -> Self::Live {}
}

/// Every signal of the space is homed in `P`
pub trait InPartition<P: Partition>: Space {}

impl<P: Partition, X: Value> InPartition<P> for S<P, X> {}

impl<P: Partition, A: InPartition<P>, B: InPartition<P>> InPartition<P> for And<A, B> {}

impl<P: Partition, A: InPartition<P>, B: InPartition<P>> InPartition<P> for Or<A, B> {}

impl<P: Partition> InPartition<P> for Unit {}

impl<P: Partition> InPartition<P> for Void {}
