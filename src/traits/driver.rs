// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::ProviderError;
use crate::host::{AuthOptions, EngineOptions};

/// Observed state of a remote machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostState {
    None,
    Running,
    Paused,
    Saved,
    Stopped,
    Stopping,
    Starting,
    Error,
    Timeout,
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HostState::None => "",
            HostState::Running => "Running",
            HostState::Paused => "Paused",
            HostState::Saved => "Saved",
            HostState::Stopped => "Stopped",
            HostState::Stopping => "Stopping",
            HostState::Starting => "Starting",
            HostState::Error => "Error",
            HostState::Timeout => "Timeout",
        };
        f.write_str(s)
    }
}

/// A create-time option declared by a driver.
///
/// Names are always namespaced by the driver, e.g. `openstack-flavor-name`.
/// A flag without a default is a boolean switch.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateFlag {
    pub name: String,
    pub default: Option<Value>,
}

impl CreateFlag {
    pub fn new(name: impl Into<String>, default: Option<Value>) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

/// Resolved flag values handed to a driver, keyed by full flag name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverFlags(pub BTreeMap<String, Value>);

impl DriverFlags {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String value of a flag; numbers and booleans are rendered as text.
    pub fn string(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.0.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn u64(&self, name: &str) -> Option<u64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A provider handle bound to one machine.
///
/// Every remote operation reports success or a descriptive failure. The
/// handle is owned exclusively by whoever drives it, so the lifecycle
/// operations take `&mut self`.
#[async_trait]
pub trait Driver: Send + Sync + fmt::Debug {
    /// Provider name, e.g. `openstack`.
    fn driver_name(&self) -> &str;

    fn machine_name(&self) -> &str;

    fn create_flags(&self) -> Vec<CreateFlag>;

    fn set_config_from_flags(&mut self, flags: &DriverFlags) -> Result<(), ProviderError>;

    /// The flag values currently applied, for persisting the host.
    fn flags(&self) -> DriverFlags;

    async fn create(&mut self) -> Result<(), ProviderError>;

    async fn start(&mut self) -> Result<(), ProviderError>;

    async fn stop(&mut self) -> Result<(), ProviderError>;

    async fn restart(&mut self) -> Result<(), ProviderError>;

    async fn kill(&mut self) -> Result<(), ProviderError>;

    async fn remove(&mut self) -> Result<(), ProviderError>;

    async fn upgrade(&mut self, engine: &EngineOptions) -> Result<(), ProviderError>;

    async fn configure_auth(&mut self, auth: &AuthOptions) -> Result<(), ProviderError>;

    async fn get_ip(&self) -> Result<String, ProviderError>;

    async fn get_url(&self) -> Result<String, ProviderError>;

    async fn get_state(&self) -> Result<HostState, ProviderError>;
}
