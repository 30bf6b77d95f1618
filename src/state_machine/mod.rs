// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic, pure state machine types. Transitions are deterministic
//! functions with no side effects; callers decide what to do with the
//! resulting state.
//!
//! # Mealy Machine
//!
//! Output depends on both current state and input:
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! The partition lifecycle in [`partition_lifecycle`] is the machine the
//! runtime drives.
//!
//! # Example
//!
//! ```rust
//! use cim_reactive::state_machine::{PartitionCommand, PartitionState, StateMachine};
//!
//! let (state, _) = PartitionState::Uninitialized
//!     .transition(&PartitionCommand::Start)
//!     .unwrap();
//! assert_eq!(state, PartitionState::Active);
//! ```

pub mod partition_lifecycle;

pub use partition_lifecycle::{PartitionCommand, PartitionState};

use crate::frp::Time;

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition from current state to target state is not allowed
    #[error("Invalid transition from {from} on {input}")]
    InvalidTransition { from: String, input: String },

    /// The machine is in a terminal state
    #[error("State {0} is terminal")]
    Terminal(String),
}

/// Trait for finite state machines
///
/// Implement this trait to define a state machine with typed states,
/// inputs, and outputs.
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    ///
    /// # Returns
    /// - Ok((new_state, output)) if transition is valid
    /// - Err(TransitionError) if transition is invalid
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }
}

/// Transition metadata
#[derive(Debug, Clone)]
pub struct Transition<S, I> {
    /// State before transition
    pub from: S,

    /// State after transition
    pub to: S,

    /// Input that triggered transition
    pub input: I,

    /// Instant of transition
    pub at: Time,
}

/// State machine with history
///
/// Wraps a state machine and tracks transition history.
#[derive(Debug, Clone)]
pub struct StateMachineWithHistory<FSM: StateMachine> {
    current: FSM,
    history: Vec<Transition<FSM, FSM::Input>>,
}

impl<FSM: StateMachine> StateMachineWithHistory<FSM> {
    /// Create a new state machine with history tracking
    pub fn new(initial: FSM) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    /// Transition with history recording
    ///
    /// On error the state and history are left untouched.
    pub fn transition_with_history(
        &mut self,
        input: FSM::Input,
        at: Time,
    ) -> TransitionResult<FSM::Output> {
        let (to, output) = self.current.transition(&input)?;
        let from = std::mem::replace(&mut self.current, to.clone());
        self.history.push(Transition { from, to, input, at });
        Ok(output)
    }

    /// Get transition history
    pub fn history(&self) -> &[Transition<FSM, FSM::Input>] {
        &self.history
    }

    /// Get current state
    pub fn current(&self) -> &FSM {
        &self.current
    }
}
