// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors reported by the host provider: plugin loading, the machine store
//! and remote operations on a host.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// No plugin with this name can be loaded.
    #[error("driver '{0}' is not loadable")]
    NotLoadable(String),

    /// The machine resolved without any `driver` section.
    #[error("no driver configured for machine '{0}'")]
    NoDriver(String),

    #[error("host already exists: \"{0}\"")]
    HostAlreadyExists(String),

    #[error("host does not exist: \"{0}\"")]
    HostDoesNotExist(String),

    /// Some hosts of the environment are missing from the store.
    #[error("could not load {0} hosts")]
    MissingHosts(usize),

    #[error("host is not running")]
    HostNotRunning,

    #[error("error setting machine configuration from flags provided: {0}")]
    InvalidFlags(String),

    #[error("{operation} is not supported by the '{driver}' driver")]
    NotSupported {
        driver: String,
        operation: &'static str,
    },

    #[error("{operation} failed on '{host}': {reason}")]
    Operation {
        host: String,
        operation: &'static str,
        reason: String,
    },

    #[error("store error at {}: {source}", .path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize host data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// Whether this is the "host does not exist" condition, which some
    /// commands treat as ignorable.
    pub fn is_not_exist(&self) -> bool {
        matches!(self, ProviderError::HostDoesNotExist(_))
    }
}
