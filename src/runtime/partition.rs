// Copyright (c) 2025 - Cowboy AI, Inc.
//! Partitions - Sequential Execution Contexts
//!
//! A partition owns a step queue. Each step:
//!
//! ```text
//! ┌────────────┐   ┌──────────────────┐   ┌──────────────┐   ┌─────────────┐
//! │ reset the  │──>│ apply inbox      │──>│ run step     │──>│ flush staged│
//! │ instant    │   │ batches in order │   │ hooks        │   │ crossings   │
//! └────────────┘   └──────────────────┘   └──────────────┘   └─────────────┘
//! ```
//!
//! A partition blocks only while its queue is empty, waiting on its step
//! trigger. It never waits on another partition in the middle of a step.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::errors::{ReactiveError, ReactiveResult};
use crate::frp::Time;
use crate::state_machine::{
    PartitionCommand, PartitionState, StateMachineWithHistory, Transition,
};

/// Enumerable identity of a partition
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionId(&'static str);

impl PartitionId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A partition type
///
/// Behaviors name partitions at the type level (`S<P, X>`); the runtime
/// resolves them through [`Partition::ID`].
///
/// ```rust
/// use cim_reactive::runtime::{Partition, PartitionId};
///
/// pub struct Renderer;
///
/// impl Partition for Renderer {
///     const ID: PartitionId = PartitionId::new("renderer");
/// }
/// ```
pub trait Partition: Send + Sync + 'static {
    const ID: PartitionId;

    /// Start the execution context
    ///
    /// Invoked once per partition identity, on first reference. The
    /// default runs the standard step loop as a task on `executor`.
    fn start(context: Arc<PartitionContext>, executor: &Handle) -> StopHandle {
        StopHandle::spawn(context, executor)
    }
}

/// The top-level partition, stepped by the host
pub struct Main;

impl Partition for Main {
    const ID: PartitionId = PartitionId::new("main");

    fn start(context: Arc<PartitionContext>, _executor: &Handle) -> StopHandle {
        StopHandle::hosted(context)
    }
}

type Hook = Box<dyn FnOnce() + Send>;
type RecurringHook = Arc<dyn Fn() + Send + Sync>;
type Delivery = Box<dyn FnOnce() + Send>;

/// One source step's worth of crossing updates for one destination
pub(crate) struct Batch {
    source: PartitionId,
    source_step: u64,
    deliveries: Vec<Delivery>,
}

struct Staged {
    destination: Arc<PartitionContext>,
    deliveries: Vec<Delivery>,
}

/// Execution context of a single partition
pub struct PartitionContext {
    id: PartitionId,
    lifecycle: Mutex<StateMachineWithHistory<PartitionState>>,
    inbox: Mutex<VecDeque<Batch>>,
    trigger: Notify,
    next_step: Mutex<Vec<Hook>>,
    each_step: Mutex<Vec<RecurringHook>>,
    instant: Mutex<Option<Time>>,
    outbox: Mutex<HashMap<PartitionId, Staged>>,
    steps: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PartitionContext {
    pub(crate) fn new(id: PartitionId) -> Arc<Self> {
        Arc::new(Self {
            id,
            lifecycle: Mutex::new(StateMachineWithHistory::new(PartitionState::Uninitialized)),
            inbox: Mutex::new(VecDeque::new()),
            trigger: Notify::new(),
            next_step: Mutex::new(Vec::new()),
            each_step: Mutex::new(Vec::new()),
            instant: Mutex::new(None),
            outbox: Mutex::new(HashMap::new()),
            steps: AtomicU64::new(0),
        })
    }

    pub fn id(&self) -> PartitionId {
        self.id
    }

    pub fn state(&self) -> PartitionState {
        *lock(&self.lifecycle).current()
    }

    /// Completed steps so far
    pub fn steps(&self) -> u64 {
        self.steps.load(Ordering::SeqCst)
    }

    pub fn lifecycle_history(&self) -> Vec<Transition<PartitionState, PartitionCommand>> {
        lock(&self.lifecycle).history().to_vec()
    }

    pub(crate) fn apply(&self, command: PartitionCommand) -> ReactiveResult<PartitionState> {
        let mut lifecycle = lock(&self.lifecycle);
        lifecycle.transition_with_history(command, Time::now())?;
        let state = *lifecycle.current();
        debug!(partition = %self.id, ?command, %state, "Partition lifecycle transition");
        Ok(state)
    }

    fn ensure_accepting(&self) -> ReactiveResult<()> {
        let state = self.state();
        if state.accepts_work() {
            Ok(())
        } else {
            warn!(partition = %self.id, %state, "Work offered to a partition that is not active");
            Err(ReactiveError::PartitionUnavailable {
                partition: self.id,
                state,
            })
        }
    }

    /// Signal that new work has arrived
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    /// Wait for the step trigger
    pub async fn triggered(&self) {
        self.trigger.notified().await;
    }

    /// Ask the partition to stop at its next step boundary
    pub fn request_stop(&self) -> ReactiveResult<()> {
        self.apply(PartitionCommand::RequestStop)?;
        self.trigger();
        Ok(())
    }

    /// Run `hook` once, during the next step
    pub fn on_next_step<F>(&self, hook: F) -> ReactiveResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.ensure_accepting()?;
        lock(&self.next_step).push(Box::new(hook));
        self.trigger();
        Ok(())
    }

    /// Run `hook` during every step, after inbound batches are applied
    pub fn on_each_step<F>(&self, hook: F) -> ReactiveResult<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.ensure_accepting()?;
        lock(&self.each_step).push(Arc::new(hook));
        Ok(())
    }

    /// Wall-clock instant of the step in progress
    ///
    /// Read once per step and cached; the next step reads it afresh.
    pub fn current_step_instant(&self) -> Time {
        *lock(&self.instant).get_or_insert_with(Time::now)
    }

    pub(crate) fn deliver(&self, batch: Batch) -> ReactiveResult<()> {
        self.ensure_accepting()?;
        debug!(
            partition = %self.id,
            source = %batch.source,
            source_step = batch.source_step,
            updates = batch.deliveries.len(),
            "Batch delivered"
        );
        lock(&self.inbox).push_back(batch);
        self.trigger();
        Ok(())
    }

    pub(crate) fn stage(&self, destination: &Arc<PartitionContext>, delivery: Delivery) {
        lock(&self.outbox)
            .entry(destination.id)
            .or_insert_with(|| Staged {
                destination: Arc::clone(destination),
                deliveries: Vec::new(),
            })
            .deliveries
            .push(delivery);
    }

    /// Run one step
    ///
    /// Returns `false`, without doing any work, once a stop has been
    /// requested.
    pub fn run_step(&self) -> bool {
        if !self.state().accepts_work() {
            return false;
        }
        *lock(&self.instant) = None;
        let step = self.steps.fetch_add(1, Ordering::SeqCst) + 1;

        let batches: Vec<Batch> = lock(&self.inbox).drain(..).collect();
        trace!(partition = %self.id, step, batches = batches.len(), "Step started");
        for batch in batches {
            for delivery in batch.deliveries {
                delivery();
            }
        }

        let hooks = std::mem::take(&mut *lock(&self.next_step));
        for hook in hooks {
            hook();
        }
        let recurring = lock(&self.each_step).clone();
        for hook in recurring.iter() {
            hook();
        }

        self.flush(step);
        true
    }

    fn flush(&self, step: u64) {
        let staged = std::mem::take(&mut *lock(&self.outbox));
        for (_, Staged { destination, deliveries }) in staged {
            let batch = Batch {
                source: self.id,
                source_step: step,
                deliveries,
            };
            if let Err(e) = destination.deliver(batch) {
                warn!(
                    partition = %self.id,
                    destination = %destination.id,
                    "Dropped crossing batch: {}",
                    e
                );
            }
        }
    }

    /// Record that the step loop has exited
    pub fn finish(&self) -> ReactiveResult<()> {
        self.apply(PartitionCommand::Finish)?;
        info!(partition = %self.id, steps = self.steps(), "Partition stopped");
        Ok(())
    }
}

impl fmt::Debug for PartitionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionContext")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("steps", &self.steps())
            .finish()
    }
}

/// Handle returned by [`Partition::start`]
pub struct StopHandle {
    context: Arc<PartitionContext>,
    task: Option<JoinHandle<()>>,
}

impl StopHandle {
    /// Run the standard step loop on `executor`
    pub fn spawn(context: Arc<PartitionContext>, executor: &Handle) -> Self {
        let task = executor.spawn(step_loop(Arc::clone(&context)));
        Self {
            context,
            task: Some(task),
        }
    }

    /// For partitions stepped by their host
    pub fn hosted(context: Arc<PartitionContext>) -> Self {
        Self {
            context,
            task: None,
        }
    }

    pub fn context(&self) -> &Arc<PartitionContext> {
        &self.context
    }

    pub fn request_stop(&self) -> ReactiveResult<()> {
        self.context.request_stop()
    }

    pub(crate) fn into_task(self) -> Option<JoinHandle<()>> {
        self.task
    }
}

async fn step_loop(context: Arc<PartitionContext>) {
    info!(partition = %context.id(), "Partition started");
    loop {
        context.triggered().await;
        if !context.run_step() {
            break;
        }
    }
    if let Err(e) = context.finish() {
        warn!(partition = %context.id(), "Partition finished out of order: {}", e);
    }
}
