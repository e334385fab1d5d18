// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod options;

pub use options::{AuthOptions, EngineOptions, HostOptions, SwarmOptions};

use serde::{Deserialize, Serialize};

use crate::engine::Action;
use crate::errors::ProviderError;
use crate::traits::{BaseDriverOptions, Driver, DriverFlags, HostProvider};

/// A named machine bound to its driver handle.
#[derive(Debug)]
pub struct Host {
    pub name: String,
    pub driver_name: String,
    pub driver: Box<dyn Driver>,
    pub options: HostOptions,
}

impl Host {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        let driver_name = driver.driver_name().to_string();
        Self {
            name: driver.machine_name().to_string(),
            options: HostOptions::new(driver_name.clone()),
            driver_name,
            driver,
        }
    }

    pub async fn start(&mut self) -> Result<(), ProviderError> {
        self.driver.start().await
    }

    pub async fn stop(&mut self) -> Result<(), ProviderError> {
        self.driver.stop().await
    }

    pub async fn restart(&mut self) -> Result<(), ProviderError> {
        self.driver.restart().await
    }

    pub async fn kill(&mut self) -> Result<(), ProviderError> {
        self.driver.kill().await
    }

    pub async fn upgrade(&mut self) -> Result<(), ProviderError> {
        self.driver.upgrade(&self.options.engine).await
    }

    pub async fn configure_auth(&mut self) -> Result<(), ProviderError> {
        self.driver.configure_auth(&self.options.auth).await
    }

    pub async fn ip(&self) -> Result<String, ProviderError> {
        self.driver.get_ip().await
    }

    /// Run one action against this host. `Ip` prints the address to stdout.
    pub async fn run(&mut self, action: Action) -> Result<(), ProviderError> {
        match action {
            Action::ConfigureAuth => self.configure_auth().await,
            Action::Start => self.start().await,
            Action::Stop => self.stop().await,
            Action::Restart => self.restart().await,
            Action::Kill => self.kill().await,
            Action::Upgrade => self.upgrade().await,
            Action::Ip => {
                let ip = self.ip().await?;
                println!("{}", ip);
                Ok(())
            }
        }
    }

    pub fn to_record(&self) -> HostRecord {
        HostRecord {
            name: self.name.clone(),
            driver_name: self.driver_name.clone(),
            driver_flags: self.driver.flags(),
            options: self.options.clone(),
        }
    }
}

/// The persisted form of a [`Host`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    pub name: String,
    pub driver_name: String,
    pub driver_flags: DriverFlags,
    pub options: HostOptions,
}

impl HostRecord {
    /// Rebuild a live host by reloading its driver plugin and re-applying
    /// the saved flags.
    pub fn into_host(self, api: &dyn HostProvider) -> Result<Host, ProviderError> {
        let base = BaseDriverOptions {
            machine_name: self.name.clone(),
            store_path: api.store_path().to_path_buf(),
        };
        let bare_driver_data = serde_json::to_vec(&base)?;
        let mut driver = api.load_plugin(&self.driver_name, &bare_driver_data)?;
        driver.set_config_from_flags(&self.driver_flags)?;

        Ok(Host {
            name: self.name,
            driver_name: self.driver_name,
            driver,
            options: self.options,
        })
    }
}
