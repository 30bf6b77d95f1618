// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reactive behaviors for the Composable Information Machine
//!
//! This crate provides a declarative model for continuous, effectful
//! behavior over time:
//!
//! - [`frp`]: discrete-varying signals and their temporal algebra
//! - [`behavior`]: the combinator algebra over product and sum signal spaces
//! - [`runtime`]: partitions, step loops and snapshot-consistent crossings
//! - [`state_machine`]: the partition lifecycle
//!
//! Pipelines are described once as [`Behavior`] values and interpreted
//! lazily; nothing is evaluated until a consumer samples an output.

pub mod behavior;
pub mod config;
pub mod errors;
pub mod frp;
pub mod runtime;
pub mod state_machine;

// Re-export commonly used types
pub use behavior::{Behavior, EvalError, Space};
pub use config::RuntimeConfig;
pub use errors::{ReactiveError, ReactiveResult};
pub use frp::{DeltaTime, Signal, Time};
pub use runtime::{Partition, PartitionId, Runtime};
