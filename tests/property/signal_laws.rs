// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Signal Algebra

use cim_reactive::frp::{mask, merge, switch_at, DeltaTime, Signal, Time};
use proptest::prelude::*;

use super::strategies::{events, ordered_instants, signal, t, trace, WINDOW};

proptest! {
    /// Property: trimming is transitive
    ///
    /// Trimming to t1 and then to t3 leaves the same signal as trimming
    /// straight to t3.
    #[test]
    fn prop_trim_in_two_steps((t1, t2, t3) in ordered_instants(), s in signal()) {
        let stepped = s.clone().trim(t(t1)).trim(t(t2)).trim(t(t3));
        let direct = s.trim(t(t3));

        prop_assert_eq!(
            stepped.to_event_list(t(t3), t(WINDOW)),
            direct.to_event_list(t(t3), t(WINDOW))
        );
    }

    /// Property: sample agrees with the event list
    #[test]
    fn prop_sample_matches_event_list(at in 0i64..WINDOW, s in signal()) {
        let (value, _) = s.clone().sample(t(at));
        let list = s.to_event_list(t(at), t(at));

        prop_assert_eq!(list.len(), 1);
        prop_assert_eq!(list.last().map(|(_, v)| *v), Some(value));
    }

    /// Property: never is the identity of merge
    #[test]
    fn prop_merge_never_is_identity(s in signal()) {
        prop_assert_eq!(events(merge(s.clone(), Signal::never())), events(s));
    }

    /// Property: mask by an always-active signal changes nothing
    #[test]
    fn prop_mask_always_is_identity(s in signal(), c in any::<u8>()) {
        prop_assert_eq!(events(mask(s.clone(), Signal::always(c))), events(s));
    }

    /// Property: switch_at splices at exactly the switch instant
    #[test]
    fn prop_switch_at_splices(before in signal(), after in signal(), at in 0i64..WINDOW) {
        let switched = trace(switch_at(before.clone(), t(at), after.clone()));
        let before = trace(before);
        let after = trace(after);

        for (n, value) in switched.iter().enumerate() {
            let expected = if (n as i64) < at { &before[n] } else { &after[n] };
            prop_assert_eq!(value, expected, "at t{}", n);
        }
    }

    /// Property: dedup never invents values and keeps the first change
    #[test]
    fn prop_dedup_is_conservative(s in signal()) {
        let original = events(s.clone());
        let deduped = events(s.dedup());

        for (_, value) in &deduped {
            prop_assert!(original.iter().any(|(_, v)| v == value));
        }
        prop_assert_eq!(original.get(1), deduped.get(1));
        prop_assert!(deduped.len() <= original.len());
    }

    /// Property: delays compose additively
    #[test]
    fn prop_delay_composes(s in signal(), d1 in -20i64..20, d2 in -20i64..20) {
        let nested = s.clone().delay(DeltaTime::from_nanos(d2)).delay(DeltaTime::from_nanos(d1));
        let direct = s.delay(DeltaTime::from_nanos(d1 + d2));

        prop_assert_eq!(
            nested.to_event_list(Time::from_nanos(-50), t(WINDOW)),
            direct.to_event_list(Time::from_nanos(-50), t(WINDOW))
        );
    }

    /// Property: drop_adjacent_inactive preserves the observed values
    #[test]
    fn prop_drop_adjacent_inactive_is_observationally_equal(s in signal()) {
        prop_assert_eq!(trace(s.clone().drop_adjacent_inactive()), trace(s));
    }

    /// Property: strict evaluation is observationally equal
    #[test]
    fn prop_strict_is_observationally_equal(s in signal()) {
        prop_assert_eq!(events(s.clone().strict()), events(s));
    }
}

#[test]
fn merge_of_nevers_is_never() {
    let merged: Signal<i32> = merge(Signal::never(), Signal::never());

    assert!(merged.is_terminated(t(0)));
    assert_eq!(events(merged), vec![(t(0), None)]);
}
