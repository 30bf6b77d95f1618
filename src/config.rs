// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{ReactiveError, ReactiveResult};

/// Configuration for the partition runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Worker threads backing the non-main partitions
    pub worker_threads: usize,
    /// Name prefix for worker threads
    pub thread_name: String,
    /// How long `shutdown` waits for partitions to report stopped
    pub shutdown_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            thread_name: "cim-partition".to_string(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables
    ///
    /// - `REACTIVE_WORKER_THREADS`
    /// - `REACTIVE_THREAD_NAME`
    /// - `REACTIVE_SHUTDOWN_TIMEOUT_MS`
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> ReactiveResult<Self> {
        let defaults = Self::default();

        let worker_threads = match std::env::var("REACTIVE_WORKER_THREADS") {
            Ok(raw) => raw.parse().map_err(|e| {
                ReactiveError::Configuration(format!("REACTIVE_WORKER_THREADS={raw}: {e}"))
            })?,
            Err(_) => defaults.worker_threads,
        };

        let thread_name = std::env::var("REACTIVE_THREAD_NAME").unwrap_or(defaults.thread_name);

        let shutdown_timeout = match std::env::var("REACTIVE_SHUTDOWN_TIMEOUT_MS") {
            Ok(raw) => Duration::from_millis(raw.parse().map_err(|e| {
                ReactiveError::Configuration(format!("REACTIVE_SHUTDOWN_TIMEOUT_MS={raw}: {e}"))
            })?),
            Err(_) => defaults.shutdown_timeout,
        };

        let config = Self {
            worker_threads,
            thread_name,
            shutdown_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReactiveResult<()> {
        if self.worker_threads == 0 {
            return Err(ReactiveError::Configuration(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.thread_name.is_empty() {
            return Err(ReactiveError::Configuration(
                "thread_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
