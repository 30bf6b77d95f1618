// Copyright (c) 2025 - Cowboy AI, Inc.
//! Partition Runtime
//!
//! Hosts the partitions a running pipeline is bound to and moves signal
//! updates between them.
//!
//! ```text
//!                 ┌──────────── Runtime ────────────┐
//!   host loop ──> │ Main (stepped by process_step)  │
//!                 │   │  CrossSender ─ Batch ─┐     │
//!                 │   ▼                       ▼     │
//!                 │ Partition A (task) ──> Partition B (task)
//!                 └─────────────────────────────────┘
//! ```
//!
//! Non-main partitions are started lazily, on first reference, as tasks on
//! a multi-threaded tokio runtime owned by [`Runtime`]. Shutdown is
//! cooperative: every partition finishes its current step, then stops.
//!
//! # Example
//!
//! ```rust
//! use cim_reactive::config::RuntimeConfig;
//! use cim_reactive::runtime::{Main, Partition, PartitionId, Runtime, Update};
//! use cim_reactive::frp::Time;
//!
//! struct Sensors;
//!
//! impl Partition for Sensors {
//!     const ID: PartitionId = PartitionId::new("sensors");
//! }
//!
//! let runtime = Runtime::new(RuntimeConfig::default()).unwrap();
//! let (sender, port) = runtime.crossing::<Main, Sensors, f64>().unwrap();
//!
//! sender.send(Update::constant(Time::EPOCH, 21.5)).unwrap();
//! runtime.process_step();
//!
//! runtime.shutdown().unwrap();
//! # let _ = port;
//! ```

pub mod crossing;
pub mod partition;

pub use crossing::{CrossSender, Port, Update};
pub use partition::{Main, Partition, PartitionContext, PartitionId, StopHandle};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::config::RuntimeConfig;
use crate::errors::{ReactiveError, ReactiveResult};
use crate::frp::{Time, Value};
use crate::state_machine::{PartitionCommand, PartitionState};

struct Registration {
    context: Arc<PartitionContext>,
    stop: StopHandle,
}

/// Driver for every partition of one process
pub struct Runtime {
    config: RuntimeConfig,
    executor: tokio::runtime::Runtime,
    main: Arc<PartitionContext>,
    registry: Mutex<HashMap<PartitionId, Registration>>,
}

impl Runtime {
    /// Build the executor and activate [`Main`]
    pub fn new(config: RuntimeConfig) -> ReactiveResult<Self> {
        config.validate()?;
        let executor = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .thread_name(config.thread_name.clone())
            .enable_all()
            .build()?;

        let runtime = Self {
            config,
            main: PartitionContext::new(Main::ID),
            executor,
            registry: Mutex::new(HashMap::new()),
        };
        {
            let mut registry = runtime.lock_registry();
            runtime.start::<Main>(&mut registry, Arc::clone(&runtime.main))?;
        }
        info!(
            worker_threads = runtime.config.worker_threads,
            "Partition runtime started"
        );
        Ok(runtime)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    fn lock_registry(&self) -> MutexGuard<'_, HashMap<PartitionId, Registration>> {
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn start<P: Partition>(
        &self,
        registry: &mut HashMap<PartitionId, Registration>,
        context: Arc<PartitionContext>,
    ) -> ReactiveResult<()> {
        context.apply(PartitionCommand::Start)?;
        let stop = P::start(Arc::clone(&context), self.executor.handle());
        registry.insert(P::ID, Registration { context, stop });
        info!(partition = %P::ID, "Partition registered");
        Ok(())
    }

    /// The context of partition `P`, starting it on first reference
    pub fn partition<P: Partition>(&self) -> ReactiveResult<Arc<PartitionContext>> {
        let mut registry = self.lock_registry();
        if let Some(registration) = registry.get(&P::ID) {
            let state = registration.context.state();
            return if state.accepts_work() {
                Ok(Arc::clone(&registration.context))
            } else {
                Err(ReactiveError::PartitionUnavailable {
                    partition: P::ID,
                    state,
                })
            };
        }

        let context = PartitionContext::new(P::ID);
        self.start::<P>(&mut registry, Arc::clone(&context))?;
        Ok(context)
    }

    /// Open a crossing from `From` into `To`
    ///
    /// The sender is used inside `From`; the port is read inside `To`.
    pub fn crossing<From, To, X>(&self) -> ReactiveResult<(CrossSender<X>, Port<X>)>
    where
        From: Partition,
        To: Partition,
        X: Value,
    {
        let source = self.partition::<From>()?;
        let destination = self.partition::<To>()?;
        let port = Port::new(To::ID);
        Ok((CrossSender::new(source, destination, port.clone()), port))
    }

    pub fn main(&self) -> &Arc<PartitionContext> {
        &self.main
    }

    /// Run one step of [`Main`]
    ///
    /// Returns `false` once a stop is pending.
    pub fn process_step(&self) -> bool {
        self.main.run_step()
    }

    /// Ask every partition to stop at its next step boundary
    pub fn request_stop(&self) -> ReactiveResult<()> {
        let contexts: Vec<Arc<PartitionContext>> = self
            .lock_registry()
            .values()
            .map(|registration| Arc::clone(&registration.context))
            .collect();
        for context in contexts {
            match context.request_stop() {
                Ok(()) => {}
                Err(_) if context.state().is_terminal() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Cached instant of [`Main`]'s step in progress
    pub fn current_step_instant(&self) -> Time {
        self.main.current_step_instant()
    }

    /// True once every registered partition has stopped
    pub fn is_stopped(&self) -> bool {
        self.lock_registry()
            .values()
            .all(|registration| registration.context.state().is_terminal())
    }

    /// Stop every partition and wait for their step loops to exit
    ///
    /// Blocks the calling thread; do not call it from inside an async
    /// context.
    pub fn shutdown(self) -> ReactiveResult<()> {
        self.request_stop()?;

        let registrations: Vec<Registration> =
            self.lock_registry().drain().map(|(_, r)| r).collect();
        let mut tasks = Vec::new();
        for Registration { context, stop } in registrations {
            match stop.into_task() {
                Some(task) => tasks.push(task),
                None if context.state() == PartitionState::Stopping => context.finish()?,
                None => {}
            }
        }

        let timeout = self.config.shutdown_timeout;
        let joined = self
            .executor
            .block_on(async move {
                tokio::time::timeout(timeout, futures::future::join_all(tasks)).await
            })
            .map_err(|_| {
                ReactiveError::Timeout(format!("partitions still running after {timeout:?}"))
            })?;

        for result in joined {
            result.map_err(|e| ReactiveError::Executor(e.to_string()))?;
        }
        info!("Partition runtime stopped");
        Ok(())
    }
}
