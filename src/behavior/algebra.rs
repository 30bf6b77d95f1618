// Copyright (c) 2025 - Cowboy AI, Inc.
//! Capability Traits
//!
//! The combinator algebra grouped by capability, so an execution strategy
//! can implement exactly the groups it supports. Strategies are selected
//! statically through the arrow type family; nothing is dispatched at
//! runtime.
//!
//! [`Lazy`] is the reference strategy: pull-based interpretation over
//! [`Behavior`].
//!
//! ```rust
//! use cim_reactive::behavior::algebra::{Category, PureTransform};
//! use cim_reactive::behavior::space::S;
//! use cim_reactive::behavior::Lazy;
//! use cim_reactive::runtime::Main;
//!
//! type Num = S<Main, i32>;
//!
//! fn doubled<K: PureTransform>() -> K::Arrow<Num, Num> {
//!     let double = K::map_values::<Main, i32, i32, _>(|x| x * 2);
//!     K::compose::<Num, Num, Num>(K::identity::<Num>(), double)
//! }
//!
//! let f = doubled::<Lazy>();
//! assert_eq!(f.to_string(), "identity >>> map_values");
//! ```

use super::dynamic::{self, EvalError};
use super::space::{And, InPartition, Or, Space, Unit, Void, S};
use super::{pure, structural, temporal, Behavior, Either};
use crate::frp::{DeltaTime, Lookahead, Value};
use crate::runtime::Partition;

/// Sequential composition
pub trait Category {
    type Arrow<A: Space, B: Space>: Clone + Send + Sync + 'static;

    fn identity<A: Space>() -> Self::Arrow<A, A>;

    fn compose<A: Space, B: Space, C: Space>(
        f: Self::Arrow<A, B>,
        g: Self::Arrow<B, C>,
    ) -> Self::Arrow<A, C>;
}

pub trait PureTransform: Category {
    fn map_values<P, X, Y, F>(f: F) -> Self::Arrow<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        F: Fn(X) -> Y + Send + Sync + 'static;

    fn map_full<P, X, Y, F>(f: F) -> Self::Arrow<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        F: Fn(Option<X>) -> Option<Y> + Send + Sync + 'static;

    fn constant<P: Partition, X: Value, Y: Value>(value: Y) -> Self::Arrow<S<P, X>, S<P, Y>>;

    fn map_strict<P, X, Y, F>(f: F) -> Self::Arrow<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        F: Fn(X) -> Y + Send + Sync + 'static;

    fn map_speculative<P, X, Y, F>(horizon: DeltaTime, f: F) -> Self::Arrow<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        F: Fn(X) -> Y + Send + Sync + 'static;

    fn map_dedup<P, X, Y, E, F>(eq: E, f: F) -> Self::Arrow<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        E: Fn(&Y, &Y) -> bool + Send + Sync + 'static,
        F: Fn(X) -> Y + Send + Sync + 'static;
}

pub trait ProductStructure: Category {
    fn first<A: Space, B: Space, C: Space>(
        f: Self::Arrow<A, B>,
    ) -> Self::Arrow<And<A, C>, And<B, C>>;
    fn second<A: Space, B: Space, C: Space>(
        f: Self::Arrow<A, B>,
    ) -> Self::Arrow<And<C, A>, And<C, B>>;
    fn parallel<A: Space, B: Space, C: Space, D: Space>(
        f: Self::Arrow<A, B>,
        g: Self::Arrow<C, D>,
    ) -> Self::Arrow<And<A, C>, And<B, D>>;
    fn dup<A: Space>() -> Self::Arrow<A, And<A, A>>;
    fn fst<A: Space, B: Space>() -> Self::Arrow<And<A, B>, A>;
    fn snd<A: Space, B: Space>() -> Self::Arrow<And<A, B>, B>;
    fn swap<A: Space, B: Space>() -> Self::Arrow<And<A, B>, And<B, A>>;
    fn assoc_left<A, B, C>() -> Self::Arrow<And<A, And<B, C>>, And<And<A, B>, C>>
    where
        A: Space,
        B: Space,
        C: Space;
    fn assoc_right<A, B, C>() -> Self::Arrow<And<And<A, B>, C>, And<A, And<B, C>>>
    where
        A: Space,
        B: Space,
        C: Space;
    fn unit_intro<A: Space>() -> Self::Arrow<A, And<A, Unit>>;
    fn unit_elim<A: Space>() -> Self::Arrow<And<A, Unit>, A>;
    fn zip<P: Partition, X: Value, Y: Value>() -> Self::Arrow<And<S<P, X>, S<P, Y>>, S<P, (X, Y)>>;
    fn unzip<P, X, Y>() -> Self::Arrow<S<P, (X, Y)>, And<S<P, X>, S<P, Y>>>
    where
        P: Partition,
        X: Value,
        Y: Value;

    fn fanout<A: Space, B: Space, C: Space>(
        f: Self::Arrow<A, B>,
        g: Self::Arrow<A, C>,
    ) -> Self::Arrow<A, And<B, C>> {
        let both = Self::parallel::<A, B, A, C>(f, g);
        Self::compose::<A, And<A, A>, And<B, C>>(Self::dup::<A>(), both)
    }
}

pub trait SumStructure: Category {
    fn left<A: Space, B: Space, C: Space>(f: Self::Arrow<A, B>) -> Self::Arrow<Or<A, C>, Or<B, C>>;
    fn right<A: Space, B: Space, C: Space>(f: Self::Arrow<A, B>) -> Self::Arrow<Or<C, A>, Or<C, B>>;
    fn choice<A: Space, B: Space, C: Space, D: Space>(
        f: Self::Arrow<A, B>,
        g: Self::Arrow<C, D>,
    ) -> Self::Arrow<Or<A, C>, Or<B, D>>;
    fn mirror<A: Space, B: Space>() -> Self::Arrow<Or<A, B>, Or<B, A>>;
    fn merge<A: Space>() -> Self::Arrow<Or<A, A>, A>;
    fn inject_left<A: Space, B: Space>() -> Self::Arrow<A, Or<A, B>>;
    fn inject_right<A: Space, B: Space>() -> Self::Arrow<B, Or<A, B>>;
    fn sum_assoc_left<A, B, C>() -> Self::Arrow<Or<A, Or<B, C>>, Or<Or<A, B>, C>>
    where
        A: Space,
        B: Space,
        C: Space;
    fn sum_assoc_right<A, B, C>() -> Self::Arrow<Or<Or<A, B>, C>, Or<A, Or<B, C>>>
    where
        A: Space,
        B: Space,
        C: Space;
    fn void_intro<A: Space>() -> Self::Arrow<A, Or<A, Void>>;
    fn void_elim<A: Space>() -> Self::Arrow<Or<A, Void>, A>;
    fn split<P, X, Y>() -> Self::Arrow<S<P, Either<X, Y>>, Or<S<P, X>, S<P, Y>>>
    where
        P: Partition,
        X: Value,
        Y: Value;
    fn unsplit<P, X, Y>() -> Self::Arrow<Or<S<P, X>, S<P, Y>>, S<P, Either<X, Y>>>
    where
        P: Partition,
        X: Value,
        Y: Value;
}

pub trait Distribution: ProductStructure + SumStructure {
    #[allow(clippy::type_complexity)]
    fn disjoin<P, X, Y, Z>(
    ) -> Self::Arrow<And<X, Or<And<S<P, ()>, Y>, Z>>, Or<And<X, Y>, And<X, Z>>>
    where
        P: Partition,
        X: InPartition<P>,
        Y: Space,
        Z: Space;

    fn cross<P1: Partition, P2: Partition, X: Value>() -> Self::Arrow<S<P1, X>, S<P2, X>>;
}

pub trait TemporalOps: Category {
    fn delay<A: Space>(dt: DeltaTime) -> Self::Arrow<A, A>;
    fn synch<A: Space>() -> Self::Arrow<A, A>;
    fn peek<P: Partition, X: Value>(dt: DeltaTime) -> Self::Arrow<S<P, X>, S<P, Lookahead<X>>>;
}

/// Interpreting descriptions carried by a signal
///
/// The descriptions are arrows of the same strategy.
pub trait DynamicEval: Category {
    #[allow(clippy::type_complexity)]
    fn eval<P, X, Y>(
        bound: DeltaTime,
    ) -> Self::Arrow<And<S<P, Self::Arrow<X, Y>>, X>, Or<Y, S<P, EvalError>>>
    where
        P: Partition,
        X: InPartition<P>,
        Y: Space;

    #[allow(clippy::type_complexity)]
    fn eval_or_fallback<P, X, Y>(
        bound: DeltaTime,
    ) -> Self::Arrow<And<S<P, Self::Arrow<X, Y>>, X>, Or<Y, And<S<P, EvalError>, X>>>
    where
        P: Partition,
        X: InPartition<P>,
        Y: Space;
}

/// Lazy pull-based interpretation
#[derive(Debug, Clone, Copy, Default)]
pub struct Lazy;

impl Category for Lazy {
    type Arrow<A: Space, B: Space> = Behavior<A, B>;

    fn identity<A: Space>() -> Behavior<A, A> {
        super::identity()
    }

    fn compose<A: Space, B: Space, C: Space>(
        f: Behavior<A, B>,
        g: Behavior<B, C>,
    ) -> Behavior<A, C> {
        f.then(g)
    }
}

impl PureTransform for Lazy {
    fn map_values<P, X, Y, F>(f: F) -> Behavior<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        F: Fn(X) -> Y + Send + Sync + 'static,
    {
        pure::map_values(f)
    }

    fn map_full<P, X, Y, F>(f: F) -> Behavior<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        F: Fn(Option<X>) -> Option<Y> + Send + Sync + 'static,
    {
        pure::map_full(f)
    }

    fn constant<P: Partition, X: Value, Y: Value>(value: Y) -> Behavior<S<P, X>, S<P, Y>> {
        pure::constant(value)
    }

    fn map_strict<P, X, Y, F>(f: F) -> Behavior<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        F: Fn(X) -> Y + Send + Sync + 'static,
    {
        pure::map_strict(f)
    }

    fn map_speculative<P, X, Y, F>(horizon: DeltaTime, f: F) -> Behavior<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        F: Fn(X) -> Y + Send + Sync + 'static,
    {
        pure::map_speculative(horizon, f)
    }

    fn map_dedup<P, X, Y, E, F>(eq: E, f: F) -> Behavior<S<P, X>, S<P, Y>>
    where
        P: Partition,
        X: Value,
        Y: Value,
        E: Fn(&Y, &Y) -> bool + Send + Sync + 'static,
        F: Fn(X) -> Y + Send + Sync + 'static,
    {
        pure::map_dedup(eq, f)
    }
}

impl ProductStructure for Lazy {
    fn first<A: Space, B: Space, C: Space>(f: Behavior<A, B>) -> Behavior<And<A, C>, And<B, C>> {
        super::first(f)
    }

    fn second<A: Space, B: Space, C: Space>(f: Behavior<A, B>) -> Behavior<And<C, A>, And<C, B>> {
        super::second(f)
    }

    fn parallel<A: Space, B: Space, C: Space, D: Space>(
        f: Behavior<A, B>,
        g: Behavior<C, D>,
    ) -> Behavior<And<A, C>, And<B, D>> {
        super::parallel(f, g)
    }

    fn dup<A: Space>() -> Behavior<A, And<A, A>> {
        structural::dup()
    }

    fn fst<A: Space, B: Space>() -> Behavior<And<A, B>, A> {
        structural::fst()
    }

    fn snd<A: Space, B: Space>() -> Behavior<And<A, B>, B> {
        structural::snd()
    }

    fn swap<A: Space, B: Space>() -> Behavior<And<A, B>, And<B, A>> {
        structural::swap()
    }

    fn assoc_left<A, B, C>() -> Behavior<And<A, And<B, C>>, And<And<A, B>, C>>
    where
        A: Space,
        B: Space,
        C: Space,
    {
        structural::assoc_left()
    }

    fn assoc_right<A, B, C>() -> Behavior<And<And<A, B>, C>, And<A, And<B, C>>>
    where
        A: Space,
        B: Space,
        C: Space,
    {
        structural::assoc_right()
    }

    fn unit_intro<A: Space>() -> Behavior<A, And<A, Unit>> {
        structural::unit_intro()
    }

    fn unit_elim<A: Space>() -> Behavior<And<A, Unit>, A> {
        structural::unit_elim()
    }

    fn zip<P: Partition, X: Value, Y: Value>() -> Behavior<And<S<P, X>, S<P, Y>>, S<P, (X, Y)>> {
        structural::zip()
    }

    fn unzip<P: Partition, X: Value, Y: Value>() -> Behavior<S<P, (X, Y)>, And<S<P, X>, S<P, Y>>> {
        structural::unzip()
    }
}

impl SumStructure for Lazy {
    fn left<A: Space, B: Space, C: Space>(f: Behavior<A, B>) -> Behavior<Or<A, C>, Or<B, C>> {
        super::left(f)
    }

    fn right<A: Space, B: Space, C: Space>(f: Behavior<A, B>) -> Behavior<Or<C, A>, Or<C, B>> {
        super::right(f)
    }

    fn choice<A: Space, B: Space, C: Space, D: Space>(
        f: Behavior<A, B>,
        g: Behavior<C, D>,
    ) -> Behavior<Or<A, C>, Or<B, D>> {
        super::choice(f, g)
    }

    fn mirror<A: Space, B: Space>() -> Behavior<Or<A, B>, Or<B, A>> {
        structural::mirror()
    }

    fn merge<A: Space>() -> Behavior<Or<A, A>, A> {
        structural::merge()
    }

    fn inject_left<A: Space, B: Space>() -> Behavior<A, Or<A, B>> {
        structural::inject_left()
    }

    fn inject_right<A: Space, B: Space>() -> Behavior<B, Or<A, B>> {
        structural::inject_right()
    }

    fn sum_assoc_left<A, B, C>() -> Behavior<Or<A, Or<B, C>>, Or<Or<A, B>, C>>
    where
        A: Space,
        B: Space,
        C: Space,
    {
        structural::sum_assoc_left()
    }

    fn sum_assoc_right<A, B, C>() -> Behavior<Or<Or<A, B>, C>, Or<A, Or<B, C>>>
    where
        A: Space,
        B: Space,
        C: Space,
    {
        structural::sum_assoc_right()
    }

    fn void_intro<A: Space>() -> Behavior<A, Or<A, Void>> {
        structural::void_intro()
    }

    fn void_elim<A: Space>() -> Behavior<Or<A, Void>, A> {
        structural::void_elim()
    }

    fn split<P, X, Y>() -> Behavior<S<P, Either<X, Y>>, Or<S<P, X>, S<P, Y>>>
    where
        P: Partition,
        X: Value,
        Y: Value,
    {
        structural::split()
    }

    fn unsplit<P, X, Y>() -> Behavior<Or<S<P, X>, S<P, Y>>, S<P, Either<X, Y>>>
    where
        P: Partition,
        X: Value,
        Y: Value,
    {
        structural::unsplit()
    }
}

impl Distribution for Lazy {
    fn disjoin<P, X, Y, Z>() -> Behavior<And<X, Or<And<S<P, ()>, Y>, Z>>, Or<And<X, Y>, And<X, Z>>>
    where
        P: Partition,
        X: InPartition<P>,
        Y: Space,
        Z: Space,
    {
        structural::disjoin()
    }

    fn cross<P1: Partition, P2: Partition, X: Value>() -> Behavior<S<P1, X>, S<P2, X>> {
        structural::cross()
    }
}

impl TemporalOps for Lazy {
    fn delay<A: Space>(dt: DeltaTime) -> Behavior<A, A> {
        temporal::delay(dt)
    }

    fn synch<A: Space>() -> Behavior<A, A> {
        temporal::synch()
    }

    fn peek<P: Partition, X: Value>(dt: DeltaTime) -> Behavior<S<P, X>, S<P, Lookahead<X>>> {
        temporal::peek(dt)
    }
}

impl DynamicEval for Lazy {
    fn eval<P, X, Y>(
        bound: DeltaTime,
    ) -> Behavior<And<S<P, Behavior<X, Y>>, X>, Or<Y, S<P, EvalError>>>
    where
        P: Partition,
        X: InPartition<P>,
        Y: Space,
    {
        dynamic::eval(bound)
    }

    fn eval_or_fallback<P, X, Y>(
        bound: DeltaTime,
    ) -> Behavior<And<S<P, Behavior<X, Y>>, X>, Or<Y, And<S<P, EvalError>, X>>>
    where
        P: Partition,
        X: InPartition<P>,
        Y: Space,
    {
        dynamic::eval_or_fallback(bound)
    }
}
