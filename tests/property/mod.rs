// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Signal laws are checked on exact event lists wherever an operator keeps
//! event counts. Behavior laws are observational and compare sampled
//! values at every integer instant of the test window.

mod behavior_laws;
mod signal_laws;
mod strategies;
