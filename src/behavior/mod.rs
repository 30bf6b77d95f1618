// Copyright (c) 2025 - Cowboy AI, Inc.
//! Behaviors - Composable Signal Transformations
//!
//! A [`Behavior<A, B>`] describes how signals in space `A` become signals
//! in space `B`. It holds no live signals: interpreting it with
//! [`Behavior::run`] wires a live input into a live output, lazily.
//!
//! # Composition
//!
//! ```text
//! f.then(g)          A ──f──> B ──g──> C
//! first(f)           (A, C) ──(f, id)──> (B, C)
//! parallel(f, g)     (A, C) ──(f, g)──> (B, D)
//! left(f)            A | C ──(f | id)──> B | C
//! choice(f, g)       A | C ──(f | g)──> B | D
//! ```
//!
//! The remaining operators live in [`pure`], [`structural`], [`temporal`]
//! and [`dynamic`]; [`algebra`] groups all of them into capability traits.
//!
//! # Latency
//!
//! Every behavior carries a static worst-case logical latency: the sum
//! along a sequence, the maximum across parallel branches. Dynamic
//! evaluation refuses descriptions whose latency exceeds the caller's bound.
//!
//! # Example
//!
//! ```rust
//! use cim_reactive::behavior::{pure, space::{Wire, S}};
//! use cim_reactive::frp::{Signal, Time};
//! use cim_reactive::runtime::Main;
//!
//! let double = pure::map_values::<Main, i32, i32, _>(|x| x * 2);
//! let shown = double.then(pure::map_values::<Main, i32, String, _>(|x| x.to_string()));
//!
//! let out = shown.run(Wire::new(Signal::always(21)));
//! assert_eq!(out.signal.sample(Time::EPOCH).0.as_deref(), Some("42"));
//! ```

pub mod algebra;
pub mod dynamic;
pub mod pure;
pub mod space;
pub mod structural;
pub mod temporal;

pub use algebra::Lazy;
pub use dynamic::EvalError;
pub use space::{And, InPartition, Or, Space, Unit, Void, Wire, S};

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::frp::DeltaTime;
use crate::runtime::PartitionId;

/// A value of one of two types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

/// Description tree of a behavior
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Primitive(&'static str),
    Delay(DeltaTime),
    Cross(PartitionId, PartitionId),
    Sequence(Arc<Term>, Arc<Term>),
    Lifted(&'static str, Arc<Term>),
    Parallel(&'static str, Arc<Term>, Arc<Term>),
    /// A description that cannot be installed
    Unavailable(Arc<str>),
}

impl Term {
    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        match self {
            Term::Sequence(a, b) | Term::Parallel(_, a, b) => 1 + a.size() + b.size(),
            Term::Lifted(_, a) => 1 + a.size(),
            _ => 1,
        }
    }

    /// First installation fault, left to right
    pub fn fault(&self) -> Option<&str> {
        match self {
            Term::Unavailable(reason) => Some(reason.as_ref()),
            Term::Sequence(a, b) | Term::Parallel(_, a, b) => a.fault().or_else(|| b.fault()),
            Term::Lifted(_, a) => a.fault(),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Primitive(name) => f.write_str(name),
            Term::Delay(dt) => write!(f, "delay({dt})"),
            Term::Cross(from, to) => write!(f, "cross({from} -> {to})"),
            Term::Sequence(a, b) => write!(f, "{a} >>> {b}"),
            Term::Lifted(name, a) => write!(f, "{name}({a})"),
            Term::Parallel(name, a, b) => write!(f, "{name}({a}, {b})"),
            Term::Unavailable(reason) => write!(f, "unavailable({reason})"),
        }
    }
}

type Interpretation<A, B> = Arc<dyn Fn(<A as Space>::Live) -> <B as Space>::Live + Send + Sync>;

/// Description of a transformation from space `A` to space `B`
pub struct Behavior<A: Space, B: Space> {
    run: Interpretation<A, B>,
    latency: DeltaTime,
    term: Arc<Term>,
    _spaces: PhantomData<fn(A) -> B>,
}

impl<A: Space, B: Space> Clone for Behavior<A, B> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
            latency: self.latency,
            term: Arc::clone(&self.term),
            _spaces: PhantomData,
        }
    }
}

impl<A: Space, B: Space> fmt::Debug for Behavior<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("term", &self.term.to_string())
            .field("latency", &self.latency)
            .finish()
    }
}

impl<A: Space, B: Space> fmt::Display for Behavior<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.term.fmt(f)
    }
}

impl<A: Space, B: Space> Behavior<A, B> {
    pub(crate) fn build<F>(term: Term, latency: DeltaTime, run: F) -> Self
    where
        F: Fn(A::Live) -> B::Live + Send + Sync + 'static,
    {
        Self {
            run: Arc::new(run),
            latency,
            term: Arc::new(term),
            _spaces: PhantomData,
        }
    }

    /// A named primitive with zero latency
    ///
    /// Adapters use this to wrap their own live wiring.
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: Fn(A::Live) -> B::Live + Send + Sync + 'static,
    {
        Self::build(Term::Primitive(name), DeltaTime::ZERO, run)
    }

    /// A description that failed to compile
    ///
    /// Interpreting it directly yields inactive output; dynamic evaluation
    /// routes it to the error branch.
    pub fn unavailable(reason: impl Into<Arc<str>>) -> Self {
        Self::build(Term::Unavailable(reason.into()), DeltaTime::ZERO, |_| B::inactive())
    }

    /// Wire `input` through the behavior
    pub fn run(&self, input: A::Live) -> B::Live {
        (self.run)(input)
    }

    pub fn latency(&self) -> DeltaTime {
        self.latency
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    /// Sequential composition
    pub fn then<C: Space>(self, next: Behavior<B, C>) -> Behavior<A, C> {
        let term = Term::Sequence(Arc::clone(&self.term), Arc::clone(&next.term));
        let latency = self.latency + next.latency;
        Behavior::build(term, latency, move |a| next.run(self.run(a)))
    }

    /// Check the description can be installed within `bound`
    pub fn validate(&self, bound: DeltaTime) -> Result<(), EvalError> {
        if let Some(reason) = self.term.fault() {
            return Err(EvalError::Install(reason.to_string()));
        }
        if self.latency > bound {
            return Err(EvalError::LatencyExceeded {
                latency: self.latency,
                bound,
            });
        }
        Ok(())
    }
}

pub fn identity<A: Space>() -> Behavior<A, A> {
    Behavior::new("identity", |a| a)
}

/// Apply `f` to the first component of a product
pub fn first<A: Space, B: Space, C: Space>(f: Behavior<A, B>) -> Behavior<And<A, C>, And<B, C>> {
    let term = Term::Lifted("first", Arc::clone(&f.term));
    let latency = f.latency;
    Behavior::build(term, latency, move |(a, c)| (f.run(a), c))
}

/// Apply `f` to the second component of a product
pub fn second<A: Space, B: Space, C: Space>(f: Behavior<A, B>) -> Behavior<And<C, A>, And<C, B>> {
    let term = Term::Lifted("second", Arc::clone(&f.term));
    let latency = f.latency;
    Behavior::build(term, latency, move |(c, a)| (c, f.run(a)))
}

/// Apply `f` and `g` to the components of a product
pub fn parallel<A: Space, B: Space, C: Space, D: Space>(
    f: Behavior<A, B>,
    g: Behavior<C, D>,
) -> Behavior<And<A, C>, And<B, D>> {
    let term = Term::Parallel("parallel", Arc::clone(&f.term), Arc::clone(&g.term));
    let latency = f.latency.max(g.latency);
    Behavior::build(term, latency, move |(a, c)| (f.run(a), g.run(c)))
}

/// Apply `f` to the left branch of a sum
pub fn left<A: Space, B: Space, C: Space>(f: Behavior<A, B>) -> Behavior<Or<A, C>, Or<B, C>> {
    let term = Term::Lifted("left", Arc::clone(&f.term));
    let latency = f.latency;
    Behavior::build(term, latency, move |(a, c)| (f.run(a), c))
}

/// Apply `f` to the right branch of a sum
pub fn right<A: Space, B: Space, C: Space>(f: Behavior<A, B>) -> Behavior<Or<C, A>, Or<C, B>> {
    let term = Term::Lifted("right", Arc::clone(&f.term));
    let latency = f.latency;
    Behavior::build(term, latency, move |(c, a)| (c, f.run(a)))
}

/// Apply `f` to the left branch and `g` to the right
pub fn choice<A: Space, B: Space, C: Space, D: Space>(
    f: Behavior<A, B>,
    g: Behavior<C, D>,
) -> Behavior<Or<A, C>, Or<B, D>> {
    let term = Term::Parallel("choice", Arc::clone(&f.term), Arc::clone(&g.term));
    let latency = f.latency.max(g.latency);
    Behavior::build(term, latency, move |(a, c)| (f.run(a), g.run(c)))
}
