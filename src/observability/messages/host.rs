// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for driver loading and the host store.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// The local machine store was opened with the given settings. Only the
/// presence of the GitHub token is reported.
///
/// # Log Level
/// `debug!`
pub struct StoreOpened<'a> {
    pub storage_path: &'a Path,
    pub native_ssh: bool,
    pub github_api_token: bool,
}

impl Display for StoreOpened<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Using machine store {} (native SSH: {}, GitHub token: {})",
            self.storage_path.display(),
            self.native_ssh,
            if self.github_api_token { "set" } else { "unset" }
        )
    }
}

impl StructuredLog for StoreOpened<'_> {
    fn log(&self) {
        tracing::debug!(
            storage_path = %self.storage_path.display(),
            native_ssh = self.native_ssh,
            github_api_token = self.github_api_token,
            "{}",
            self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "store",
            span_name = name,
            storage_path = %self.storage_path.display()
        )
    }
}

/// A driver plugin is being loaded for a machine.
///
/// # Log Level
/// `debug!`
pub struct DriverLoading<'a> {
    pub driver: &'a str,
    pub machine: &'a str,
}

impl Display for DriverLoading<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Creating plugin driver '{}' for '{}'", self.driver, self.machine)
    }
}

impl StructuredLog for DriverLoading<'_> {
    fn log(&self) {
        tracing::debug!(driver = self.driver, machine = self.machine, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("driver", span_name = name, driver = self.driver, machine = self.machine)
    }
}

/// A create flag was resolved, either from the configuration or its default.
///
/// # Log Level
/// `debug!`
pub struct DriverFlagSet<'a> {
    pub flag: &'a str,
    pub value: &'a serde_yaml::Value,
    pub is_default: bool,
}

impl Display for DriverFlagSet<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Setting {} = {:?}", self.flag, self.value)?;
        if self.is_default {
            write!(f, " (default)")?;
        }
        Ok(())
    }
}

impl StructuredLog for DriverFlagSet<'_> {
    fn log(&self) {
        tracing::debug!(flag = self.flag, is_default = self.is_default, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("driver_flag", span_name = name, flag = self.flag)
    }
}

/// A host named in the environment is not in the store.
///
/// # Log Level
/// `warn!`
pub struct HostMissing<'a> {
    pub name: &'a str,
}

impl Display for HostMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Machine '{}' does not exist", self.name)
    }
}

impl StructuredLog for HostMissing<'_> {
    fn log(&self) {
        tracing::warn!(host = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("host", span_name = name, host = self.name)
    }
}

/// A host operation outside the dispatcher failed and was skipped.
///
/// # Log Level
/// `error!`
pub struct HostOperationFailed<'a> {
    pub operation: &'a str,
    pub host: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for HostOperationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Error during {} of '{}': {}", self.operation, self.host, self.error)
    }
}

impl StructuredLog for HostOperationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            operation = self.operation,
            host = self.host,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("host", span_name = name, operation = self.operation, host = self.host)
    }
}

/// A host was created at the provider and stored.
///
/// # Log Level
/// `info!`
pub struct HostCreated<'a> {
    pub name: &'a str,
    pub driver: &'a str,
}

impl Display for HostCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Machine '{}' created with the '{}' driver", self.name, self.driver)
    }
}

impl StructuredLog for HostCreated<'_> {
    fn log(&self) {
        tracing::info!(host = self.name, driver = self.driver, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("host", span_name = name, host = self.name, driver = self.driver)
    }
}

/// A host was removed from the provider and the store.
///
/// # Log Level
/// `info!`
pub struct HostRemoved<'a> {
    pub name: &'a str,
}

impl Display for HostRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Successfully removed '{}'", self.name)
    }
}

impl StructuredLog for HostRemoved<'_> {
    fn log(&self) {
        tracing::info!(host = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("host", span_name = name, host = self.name)
    }
}
