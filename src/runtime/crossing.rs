// Copyright (c) 2025 - Cowboy AI, Inc.
//! Crossings - Moving Signal Updates Between Partitions
//!
//! ```text
//! Partition A (step n)                    Partition B (next step)
//! ────────────────────                    ───────────────────────
//! sender_1.send(u1) ─┐                    ┌─> port_1.apply(u1)
//! sender_2.send(u2) ─┼─> Batch(A, n) ─────┼─> port_2.apply(u2)
//!                    │   (one delivery)   │
//! end of step ───────┘                    └─> hooks observe both
//! ```
//!
//! Updates sent during one step of A travel together and are applied
//! together at the start of a step of B. Two ports read in B therefore
//! always reflect the same completed step of A.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::errors::{ReactiveError, ReactiveResult};
use crate::frp::{switch_at, Signal, Time, Value};
use crate::runtime::partition::{PartitionContext, PartitionId};

/// Replacement of a signal's future from an instant onward
#[derive(Clone, Debug)]
pub struct Update<X> {
    pub from: Time,
    pub signal: Signal<X>,
}

impl<X: Value> Update<X> {
    pub fn new(from: Time, signal: Signal<X>) -> Self {
        Self { from, signal }
    }

    /// Constant value from `from` onward
    pub fn constant(from: Time, value: X) -> Self {
        Self::new(from, Signal::always(value))
    }

    /// Inactive from `from` onward
    pub fn inactive(from: Time) -> Self {
        Self::new(from, Signal::never())
    }
}

struct PortState<X> {
    signal: Signal<X>,
    applied: u64,
    spliced: Option<Time>,
}

/// Receiving end of a crossing, read inside its home partition
///
/// Reads are forward scans: sampling at `t` releases history before `t`,
/// and applying an update releases history before the previous splice.
/// The retained signal is therefore a bounded number of splices deep no
/// matter how many updates a long-running crossing delivers.
pub struct Port<X> {
    home: PartitionId,
    state: Arc<Mutex<PortState<X>>>,
}

impl<X> Clone for Port<X> {
    fn clone(&self) -> Self {
        Self {
            home: self.home,
            state: Arc::clone(&self.state),
        }
    }
}

impl<X: Value> Port<X> {
    /// Inactive port homed in `home`
    pub fn new(home: PartitionId) -> Self {
        Self {
            home,
            state: Arc::new(Mutex::new(PortState {
                signal: Signal::never(),
                applied: 0,
                spliced: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PortState<X>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn home(&self) -> PartitionId {
        self.home
    }

    /// Splice `update` into the port's signal
    ///
    /// An update at or after the previous splice collapses that splice
    /// first. Out-of-order updates are spliced as they come and collapse
    /// with the next in-order one.
    pub fn apply(&self, update: Update<X>) {
        let mut state = self.lock();
        let mut current = std::mem::replace(&mut state.signal, Signal::never());
        if let Some(previous) = state.spliced {
            if update.from >= previous {
                current = current.trim(previous);
            }
        }
        state.signal = switch_at(current, update.from, update.signal);
        state.spliced = Some(update.from);
        state.applied += 1;
    }

    /// The signal as of the last applied batch
    pub fn signal(&self) -> Signal<X> {
        self.lock().signal.clone()
    }

    /// Value at `t`, releasing history before `t`
    pub fn sample(&self, t: Time) -> Option<X> {
        let mut state = self.lock();
        let current = std::mem::replace(&mut state.signal, Signal::never());
        let (value, trimmed) = current.sample(t);
        state.signal = trimmed;
        value
    }

    /// Updates applied so far
    pub fn applied(&self) -> u64 {
        self.lock().applied
    }

    /// Release history before `t`
    pub fn trim(&self, t: Time) {
        let mut state = self.lock();
        let current = std::mem::replace(&mut state.signal, Signal::never());
        state.signal = current.trim(t);
    }
}

/// Sending end of a crossing, used inside the source partition
pub struct CrossSender<X> {
    source: Arc<PartitionContext>,
    destination: Arc<PartitionContext>,
    port: Port<X>,
}

impl<X> Clone for CrossSender<X> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            destination: Arc::clone(&self.destination),
            port: self.port.clone(),
        }
    }
}

impl<X: Value> CrossSender<X> {
    pub(crate) fn new(
        source: Arc<PartitionContext>,
        destination: Arc<PartitionContext>,
        port: Port<X>,
    ) -> Self {
        Self {
            source,
            destination,
            port,
        }
    }

    pub fn source(&self) -> PartitionId {
        self.source.id()
    }

    pub fn destination(&self) -> PartitionId {
        self.destination.id()
    }

    /// Stage `update` for delivery at the end of the source's current step
    pub fn send(&self, update: Update<X>) -> ReactiveResult<()> {
        let state = self.destination.state();
        if !state.accepts_work() {
            warn!(
                source = %self.source.id(),
                destination = %self.destination.id(),
                %state,
                "Crossing into a partition that is not active"
            );
            return Err(ReactiveError::PartitionUnavailable {
                partition: self.destination.id(),
                state,
            });
        }
        let port = self.port.clone();
        self.source
            .stage(&self.destination, Box::new(move || port.apply(update)));
        Ok(())
    }
}
