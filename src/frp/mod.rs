// Copyright (c) 2025 - Cowboy AI, Inc.
//! Functional Reactive Programming (FRP) Abstractions
//!
//! This module provides the discrete-varying signal model every behavior
//! ultimately manipulates.
//!
//! # Core Concepts
//!
//! ## Time
//!
//! [`Time`] is a totally ordered instant, [`DeltaTime`] a signed offset.
//!
//! ## Updates<T> (Discrete Update Sequence)
//!
//! A lazily produced, strictly increasing sequence of changes. It is stepped
//! forward up to a bound and never materialized.
//!
//! ```text
//! Time: ────────────────────────────→
//! Changes:    ●       ●   ●       ●
//! ```
//!
//! ## Signal<T>
//!
//! The current value plus the pending changes: an optional value at every
//! instant, constant between changes.
//!
//! ```text
//! Time:  ────────────────────────────→
//! Value:  ────────┐   ┌────   ┌──────
//!                 └───┘       (inactive gaps)
//! ```
//!
//! # Laws
//!
//! ```text
//! merge(s, never) = s
//! mask(s, always(c)) = s
//! delay(a, delay(b, s)) = delay(a + b, s)
//! trim(trim(s, t1), t2) = trim(s, t2)          for t1 < t2
//! map_values(g) . map_values(f) = map_values(g . f)
//! ```

pub mod combinators;
pub mod signal;
pub mod time;
pub mod updates;

pub use combinators::{
    combine, combine_full, join, mask, merge, peek, switch_at, switch_at_strict, Lookahead,
};
pub use signal::Signal;
pub use time::{DeltaTime, Time};
pub use updates::{Pull, Step, UpdateSource, Updates};

/// Payload carried by signals
///
/// Payloads are shared between consumers and may cross partitions, so they
/// must be cheap to clone and thread-safe.
pub trait Value: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Value for T {}
