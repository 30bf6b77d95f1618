// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared generators and observation helpers

use cim_reactive::frp::{Signal, Time, Value};
use proptest::prelude::*;

/// Changes fall inside `1..HORIZON`; observations run to `WINDOW`.
pub const HORIZON: i64 = 100;
pub const WINDOW: i64 = 140;

pub fn t(n: i64) -> Time {
    Time::from_nanos(n)
}

/// An optional payload, inactive about a quarter of the time
pub fn value() -> impl Strategy<Value = Option<i32>> {
    prop_oneof![
        1 => Just(None),
        3 => (-50i32..50).prop_map(Some),
    ]
}

/// Change lists with unique, strictly increasing instants
pub fn changes() -> impl Strategy<Value = Vec<(Time, Option<i32>)>> {
    prop::collection::btree_map(1i64..HORIZON, value(), 0..20)
        .prop_map(|changes| changes.into_iter().map(|(at, v)| (t(at), v)).collect())
}

/// Arbitrary finite signal
pub fn signal() -> impl Strategy<Value = Signal<i32>> {
    (value(), changes()).prop_map(|(head, changes)| Signal::from_updates(head, changes))
}

/// Instants with `a < b < c` inside the window
pub fn ordered_instants() -> impl Strategy<Value = (i64, i64, i64)> {
    (0i64..WINDOW - 2)
        .prop_flat_map(|a| (Just(a), a + 1..WINDOW - 1))
        .prop_flat_map(|(a, b)| (Just(a), Just(b), b + 1..WINDOW))
}

/// Sampled value at every integer instant of the window
pub fn trace<T: Value>(signal: Signal<T>) -> Vec<Option<T>> {
    let mut out = Vec::with_capacity(WINDOW as usize + 1);
    let mut signal = signal;
    for at in 0..=WINDOW {
        let (value, rest) = signal.sample(t(at));
        out.push(value);
        signal = rest;
    }
    out
}

/// Exact event list over the window
pub fn events<T: Value>(signal: Signal<T>) -> Vec<(Time, Option<T>)> {
    signal.to_event_list(t(0), t(WINDOW))
}
