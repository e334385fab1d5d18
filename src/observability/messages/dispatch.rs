// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for actions fanned out across hosts.
//!
//! This module contains message types for logging events related to:
//! * Dispatch start and completion
//! * Per-host action outcomes
//! * Worker tasks that ended without reporting

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// An action is about to run on a set of hosts.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use docker_env::observability::messages::dispatch::DispatchStarted;
///
/// let msg = DispatchStarted {
///     action: "stop",
///     host_count: 12,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct DispatchStarted<'a> {
    pub action: &'a str,
    pub host_count: usize,
    pub max_concurrency: usize,
}

impl Display for DispatchStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running '{}' on {} hosts, max_concurrency={}",
            self.action, self.host_count, self.max_concurrency
        )
    }
}

impl StructuredLog for DispatchStarted<'_> {
    fn log(&self) {
        tracing::info!(
            action = self.action,
            host_count = self.host_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch",
            span_name = name,
            action = self.action,
            host_count = self.host_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// The action finished on one host.
///
/// # Log Level
/// `debug!`
pub struct ActionSucceeded<'a> {
    pub action: &'a str,
    pub host: &'a str,
    pub duration: Duration,
}

impl Display for ActionSucceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}' succeeded on '{}' in {:?}",
            self.action, self.host, self.duration
        )
    }
}

impl StructuredLog for ActionSucceeded<'_> {
    fn log(&self) {
        tracing::debug!(
            action = self.action,
            host = self.host,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("action", span_name = name, action = self.action, host = self.host)
    }
}

/// The action failed on one host.
///
/// # Log Level
/// `warn!` - The remaining hosts still run
pub struct ActionFailed<'a> {
    pub action: &'a str,
    pub host: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ActionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "'{}' failed on '{}': {}", self.action, self.host, self.error)
    }
}

impl StructuredLog for ActionFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            action = self.action,
            host = self.host,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("action", span_name = name, action = self.action, host = self.host)
    }
}

/// A worker task ended without reporting a result (it panicked).
///
/// # Log Level
/// `error!`
pub struct ActionTaskLost<'a> {
    pub action: &'a str,
    pub host: &'a str,
}

impl Display for ActionTaskLost<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "'{}' on '{}' ended without a result", self.action, self.host)
    }
}

impl StructuredLog for ActionTaskLost<'_> {
    fn log(&self) {
        tracing::error!(action = self.action, host = self.host, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("action", span_name = name, action = self.action, host = self.host)
    }
}

/// Every host has reported.
///
/// # Log Level
/// `info!`
pub struct DispatchCompleted<'a> {
    pub action: &'a str,
    pub host_count: usize,
    pub failed: usize,
    pub duration: Duration,
}

impl Display for DispatchCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}' completed on {} hosts in {:?}: {} failed",
            self.action, self.host_count, self.duration, self.failed
        )
    }
}

impl StructuredLog for DispatchCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            action = self.action,
            host_count = self.host_count,
            failed = self.failed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "dispatch",
            span_name = name,
            action = self.action,
            host_count = self.host_count,
        )
    }
}
