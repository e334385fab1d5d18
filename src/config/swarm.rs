// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::consts::{DEFAULT_SWARM_HOST, DEFAULT_SWARM_IMAGE, DEFAULT_SWARM_STRATEGY};
use crate::config::options::{overlay, OptionsMap};
use crate::config::substitution::Substitute;
use crate::errors::ConfigError;
use crate::host::SwarmOptions;
use crate::traits::{Populate, PopulateContext};

/// Clustering options.
///
/// Writing a `swarm` section at all enables clustering for the machines it
/// applies to, even an empty one (`swarm:`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwarmConfig {
    #[serde(skip)]
    pub is_swarm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl SwarmConfig {
    /// A disabled swarm section with the default address, image and strategy.
    pub fn new() -> Self {
        let mut swarm = Self::default();
        swarm.fill_defaults();
        swarm
    }

    fn fill_defaults(&mut self) {
        self.host.get_or_insert_with(|| DEFAULT_SWARM_HOST.to_string());
        self.image.get_or_insert_with(|| DEFAULT_SWARM_IMAGE.to_string());
        self.strategy
            .get_or_insert_with(|| DEFAULT_SWARM_STRATEGY.to_string());
    }

    pub fn merge(&mut self, other: SwarmConfig) {
        self.is_swarm |= other.is_swarm;
        overlay(&mut self.master, other.master);
        overlay(&mut self.host, other.host);
        overlay(&mut self.discovery, other.discovery);
        overlay(&mut self.image, other.image);
        overlay(&mut self.strategy, other.strategy);
    }

    pub fn to_options(&self) -> SwarmOptions {
        SwarmOptions {
            is_swarm: self.is_swarm,
            master: self.master.unwrap_or_default(),
            host: self.host.clone().unwrap_or_default(),
            discovery: self.discovery.clone().unwrap_or_default(),
            image: self.image.clone().unwrap_or_default(),
            strategy: self.strategy.clone().unwrap_or_default(),
        }
    }
}

impl Populate for SwarmConfig {
    fn populate(&mut self, _ctx: &PopulateContext<'_>) -> Result<(), ConfigError> {
        self.fill_defaults();
        Ok(())
    }
}

impl Substitute for SwarmConfig {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        Self {
            is_swarm: self.is_swarm,
            master: self.master,
            host: self.host.substitute(replacer),
            discovery: self.discovery.substitute(replacer),
            image: self.image.substitute(replacer),
            strategy: self.strategy.substitute(replacer),
        }
    }
}

impl<'de> Deserialize<'de> for SwarmConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = OptionsMap::deserialize_section(deserializer)?;
        let string = |key: &str| c.string(key).map_err(D::Error::custom);

        Ok(Self {
            is_swarm: true,
            master: c.bool("master").map_err(D::Error::custom)?,
            host: string("host")?,
            discovery: string("discovery")?,
            image: string("image")?,
            strategy: string("strategy")?,
        })
    }
}
