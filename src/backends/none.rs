// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_yaml::Value;
use url::Url;

use crate::errors::ProviderError;
use crate::host::{AuthOptions, EngineOptions};
use crate::traits::{CreateFlag, Driver, DriverFlags, HostState};

const URL_FLAG: &str = "none-url";

/// Driver for a Docker host that already exists somewhere else.
///
/// Only knows the engine URL (`none-url`). Nothing can be provisioned or
/// controlled through it: creating and removing are bookkeeping only, and
/// every other lifecycle operation is reported as unsupported.
#[derive(Debug)]
pub struct NoneDriver {
    machine_name: String,
    url: String,
}

impl NoneDriver {
    pub fn new(machine_name: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            url: String::new(),
        }
    }

    fn unsupported(operation: &'static str) -> ProviderError {
        ProviderError::NotSupported {
            driver: "none".to_string(),
            operation,
        }
    }
}

#[async_trait]
impl Driver for NoneDriver {
    fn driver_name(&self) -> &str {
        "none"
    }

    fn machine_name(&self) -> &str {
        &self.machine_name
    }

    fn create_flags(&self) -> Vec<CreateFlag> {
        vec![CreateFlag::new(URL_FLAG, Some(Value::String(String::new())))]
    }

    fn set_config_from_flags(&mut self, flags: &DriverFlags) -> Result<(), ProviderError> {
        let url = flags.string(URL_FLAG).unwrap_or_default();
        if url.is_empty() {
            return Err(ProviderError::InvalidFlags(format!(
                "--{} option is required when the none driver is selected",
                URL_FLAG
            )));
        }
        Url::parse(&url)
            .map_err(|e| ProviderError::InvalidFlags(format!("{}: '{}': {}", URL_FLAG, url, e)))?;
        self.url = url;
        Ok(())
    }

    fn flags(&self) -> DriverFlags {
        let mut flags = DriverFlags::new();
        flags.insert(URL_FLAG, Value::String(self.url.clone()));
        flags
    }

    async fn create(&mut self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn start(&mut self) -> Result<(), ProviderError> {
        Err(Self::unsupported("start"))
    }

    async fn stop(&mut self) -> Result<(), ProviderError> {
        Err(Self::unsupported("stop"))
    }

    async fn restart(&mut self) -> Result<(), ProviderError> {
        Err(Self::unsupported("restart"))
    }

    async fn kill(&mut self) -> Result<(), ProviderError> {
        Err(Self::unsupported("kill"))
    }

    async fn remove(&mut self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn upgrade(&mut self, _engine: &EngineOptions) -> Result<(), ProviderError> {
        Err(Self::unsupported("upgrade"))
    }

    async fn configure_auth(&mut self, _auth: &AuthOptions) -> Result<(), ProviderError> {
        Err(Self::unsupported("configureAuth"))
    }

    async fn get_ip(&self) -> Result<String, ProviderError> {
        let url = Url::parse(&self.url).map_err(|e| ProviderError::Operation {
            host: self.machine_name.clone(),
            operation: "ip",
            reason: e.to_string(),
        })?;
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Operation {
                host: self.machine_name.clone(),
                operation: "ip",
                reason: format!("no host in '{}'", self.url),
            })
    }

    async fn get_url(&self) -> Result<String, ProviderError> {
        Ok(self.url.clone())
    }

    async fn get_state(&self) -> Result<HostState, ProviderError> {
        Ok(HostState::Running)
    }
}
