// Copyright (c) 2025 - Cowboy AI, Inc.
//! Partition Lifecycle State Machine
//!
//! # States
//!
//! - Uninitialized: identity known, no execution context yet
//! - Active: accepting work and stepping
//! - Stopping: stop requested, finishing the current step
//! - Stopped: terminal, resources released
//!
//! # Inputs
//!
//! - Start: Uninitialized → Active
//! - RequestStop: Active → Stopping, Uninitialized → Stopped,
//!   Stopping → Stopping (repeated requests are harmless)
//! - Finish: Stopping → Stopped

use super::{StateMachine, TransitionError, TransitionResult};
use std::fmt;

/// Lifecycle state of a partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionState {
    Uninitialized,
    Active,
    Stopping,
    Stopped,
}

impl PartitionState {
    /// Whether new batches and step hooks are admitted
    pub fn accepts_work(self) -> bool {
        matches!(self, PartitionState::Active)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PartitionState::Stopped)
    }
}

impl fmt::Display for PartitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartitionState::Uninitialized => "uninitialized",
            PartitionState::Active => "active",
            PartitionState::Stopping => "stopping",
            PartitionState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Lifecycle command (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionCommand {
    Start,
    RequestStop,
    Finish,
}

impl StateMachine for PartitionState {
    type Input = PartitionCommand;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use PartitionCommand::*;
        use PartitionState::*;

        match (self, input) {
            (Uninitialized, Start) => Ok((Active, ())),
            (Uninitialized, RequestStop) => Ok((Stopped, ())),
            (Active, RequestStop) => Ok((Stopping, ())),
            (Stopping, RequestStop) => Ok((Stopping, ())),
            (Stopping, Finish) => Ok((Stopped, ())),
            (Stopped, _) => Err(TransitionError::Terminal(self.to_string())),
            _ => Err(TransitionError::InvalidTransition {
                from: self.to_string(),
                input: format!("{:?}", input),
            }),
        }
    }
}
