// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Behavior Algebra
//!
//! Every law is an observational equivalence: both sides are run on the
//! same live input and sampled at every instant of the window.

use cim_reactive::behavior::space::{And, Unit, Wire, S};
use cim_reactive::behavior::{choice, identity, parallel, pure, structural, Behavior};
use cim_reactive::frp::Signal;
use cim_reactive::runtime::Main;
use proptest::prelude::*;

use super::strategies::{signal, trace};

type Num = S<Main, i32>;
type Flag = S<Main, ()>;

fn add(k: i32) -> Behavior<Num, Num> {
    pure::map_values(move |x: i32| x.wrapping_add(k))
}

fn scale(k: i32) -> Behavior<Num, Num> {
    pure::map_values(move |x: i32| x.wrapping_mul(k))
}

fn observe(f: &Behavior<Num, Num>, s: &Signal<i32>) -> Vec<Option<i32>> {
    trace(f.run(Wire::new(s.clone())).signal)
}

fn observe_pair(
    f: &Behavior<And<Num, Num>, And<Num, Num>>,
    a: &Signal<i32>,
    b: &Signal<i32>,
) -> (Vec<Option<i32>>, Vec<Option<i32>>) {
    let (x, y) = f.run((Wire::new(a.clone()), Wire::new(b.clone())));
    (trace(x.signal), trace(y.signal))
}

/// Activity of `s` as a decision signal
fn decision(s: &Signal<i32>) -> Signal<()> {
    s.clone().map_values(|_| ())
}

proptest! {
    /// Property: identity is neutral on both sides of composition
    #[test]
    fn prop_identity_is_neutral(s in signal(), k in -10i32..10) {
        let f = add(k);
        let expected = observe(&f, &s);

        prop_assert_eq!(observe(&identity().then(f.clone()), &s), expected.clone());
        prop_assert_eq!(observe(&f.then(identity()), &s), expected);
    }

    /// Property: sequential composition is associative
    #[test]
    fn prop_composition_is_associative(
        s in signal(),
        a in -10i32..10,
        b in -5i32..5,
        c in -10i32..10,
    ) {
        let grouped_left = add(a).then(scale(b)).then(add(c));
        let grouped_right = add(a).then(scale(b).then(add(c)));

        prop_assert_eq!(observe(&grouped_left, &s), observe(&grouped_right, &s));
        prop_assert_eq!(grouped_left.latency(), grouped_right.latency());
    }

    /// Property: pure transforms fuse
    ///
    /// map_values(f) then map_values(g) equals map_values(g . f).
    #[test]
    fn prop_map_fusion(s in signal(), a in -10i32..10, b in -5i32..5) {
        let separate = add(a).then(scale(b));
        let fused =
            pure::map_values::<Main, i32, i32, _>(move |x: i32| x.wrapping_add(a).wrapping_mul(b));

        prop_assert_eq!(observe(&separate, &s), observe(&fused, &s));
    }

    /// Property: swap is its own inverse
    #[test]
    fn prop_swap_round_trip(a in signal(), b in signal()) {
        let round_trip = structural::swap::<Num, Num>().then(structural::swap());
        prop_assert_eq!(observe_pair(&round_trip, &a, &b), (trace(a), trace(b)));
    }

    /// Property: product re-association round-trips
    #[test]
    fn prop_assoc_round_trip(a in signal(), b in signal(), c in signal()) {
        let round_trip = structural::assoc_left::<Num, Num, Num>().then(structural::assoc_right());
        let (x, (y, z)) = round_trip.run((
            Wire::new(a.clone()),
            (Wire::new(b.clone()), Wire::new(c.clone())),
        ));

        prop_assert_eq!(trace(x.signal), trace(a));
        prop_assert_eq!(trace(y.signal), trace(b));
        prop_assert_eq!(trace(z.signal), trace(c));
    }

    /// Property: sum re-association and mirroring round-trip
    #[test]
    fn prop_sum_round_trips(a in signal(), b in signal(), c in signal()) {
        let assoc =
            structural::sum_assoc_left::<Num, Num, Num>().then(structural::sum_assoc_right());
        let (x, (y, z)) = assoc.run((
            Wire::new(a.clone()),
            (Wire::new(b.clone()), Wire::new(c.clone())),
        ));
        prop_assert_eq!(trace(x.signal), trace(a.clone()));
        prop_assert_eq!(trace(y.signal), trace(b.clone()));
        prop_assert_eq!(trace(z.signal), trace(c));

        let mirror = structural::mirror::<Num, Num>().then(structural::mirror());
        let (x, y) = mirror.run((Wire::new(a.clone()), Wire::new(b.clone())));
        prop_assert_eq!((trace(x.signal), trace(y.signal)), (trace(a), trace(b)));
    }

    /// Property: unit introduction and elimination cancel
    #[test]
    fn prop_unit_round_trip(s in signal()) {
        let round_trip = structural::unit_intro::<Num>().then(structural::unit_elim());
        prop_assert_eq!(observe(&round_trip, &s), trace(s));
    }

    /// Property: duplicate-then-transform-both equals transform-then-duplicate
    #[test]
    fn prop_dup_commutes_with_transform(s in signal(), k in -10i32..10) {
        let before = structural::dup::<Num>().then(parallel(add(k), add(k)));
        let after = add(k).then(structural::dup());

        let (a1, b1) = before.run(Wire::new(s.clone()));
        let (a2, b2) = after.run(Wire::new(s));
        prop_assert_eq!(trace(a1.signal), trace(a2.signal));
        prop_assert_eq!(trace(b1.signal), trace(b2.signal));
    }

    /// Property: zip then unzip returns inputs masked by joint activity,
    /// and unzip then zip is the identity
    #[test]
    fn prop_zip_unzip(a in signal(), b in signal()) {
        let pairs =
            structural::zip::<Main, i32, i32>().run((Wire::new(a.clone()), Wire::new(b.clone())));
        let expected = trace(pairs.signal.clone());

        let round_trip = structural::unzip::<Main, i32, i32>().then(structural::zip());
        prop_assert_eq!(trace(round_trip.run(pairs).signal), expected.clone());

        let (x, _) = structural::unzip::<Main, i32, i32>().run(Wire::new(
            cim_reactive::frp::combine(|x, y| (x, y), a.clone(), b.clone()),
        ));
        let a_where_both: Vec<Option<i32>> = expected.iter().map(|p| p.map(|(x, _)| x)).collect();
        prop_assert_eq!(trace(x.signal), a_where_both);
    }

    /// Property: distribution is dual to combination
    ///
    /// Splitting by a decision and merging the branches recovers the input.
    #[test]
    fn prop_disjoin_then_merge_is_identity(x in signal(), u in signal()) {
        let distribute = structural::disjoin::<Main, Num, Unit, Unit>()
            .then(choice(structural::fst::<Num, Unit>(), structural::fst::<Num, Unit>()))
            .then(structural::merge());

        let out = distribute.run((Wire::new(x.clone()), ((Wire::new(decision(&u)), ()), ())));
        prop_assert_eq!(trace(out.signal), trace(x));
    }

    /// Property: the branches of a distribution are exclusive
    #[test]
    fn prop_disjoin_branches_exclusive(x in signal(), u in signal()) {
        let distribute = structural::disjoin::<Main, Num, Unit, Unit>();
        let ((chosen, ()), (other, ())) =
            distribute.run((Wire::new(x), ((Wire::new(decision(&u)), ()), ())));

        for (l, r) in trace(chosen.signal).into_iter().zip(trace(other.signal)) {
            prop_assert!(l.is_none() || r.is_none());
        }
    }

    /// Property: split then unsplit is the identity on choice signals
    #[test]
    fn prop_split_round_trip(s in signal()) {
        use cim_reactive::behavior::Either;

        let choices = s.map_values(|x| if x % 2 == 0 { Either::Left(x) } else { Either::Right(x) });
        let round_trip = structural::split::<Main, i32, i32>().then(structural::unsplit());

        let out = round_trip.run(Wire::new(choices.clone()));
        prop_assert_eq!(trace(out.signal), trace(choices));
    }

    /// Property: injection lands in one branch and merge takes it back
    #[test]
    fn prop_inject_then_merge(s in signal()) {
        let left = structural::inject_left::<Num, Num>().then(structural::merge());
        let right = structural::inject_right::<Num, Num>().then(structural::merge());

        prop_assert_eq!(observe(&left, &s), trace(s.clone()));
        prop_assert_eq!(observe(&right, &s), trace(s));
    }
}

#[test]
fn snd_projects_second_component() {
    let f = structural::snd::<Num, Flag>();
    let out = f.run((Wire::new(Signal::always(1)), Wire::new(Signal::always(()))));
    assert_eq!(out.signal.sample(cim_reactive::Time::EPOCH).0, Some(()));
}

#[test]
fn void_round_trip_keeps_left() {
    let f = structural::void_intro::<Num>().then(structural::void_elim());
    let out = f.run(Wire::new(Signal::always(3)));
    assert_eq!(out.signal.sample(cim_reactive::Time::EPOCH).0, Some(3));
}
