// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::auth::AuthConfig;
use crate::config::consts::INDEX_VAR;
use crate::config::driver::{deserialize_named, DriverConfig};
use crate::config::engine::EngineConfig;
use crate::config::machine::MachineConfigMap;
use crate::config::options::{deserialize_present, deserialize_scalar_map, merge_section};
use crate::config::substitution::replace_all_string_map;
use crate::config::swarm::SwarmConfig;
use crate::errors::ConfigError;
use crate::observability::messages::config::VariableOverridden;
use crate::observability::messages::StructuredLog;
use crate::traits::{HostProvider, Populate, PopulateContext};

/// Global variables, `NAME` to value.
pub type VarsMap = HashMap<String, String>;

/// A whole environment: global variables, global section defaults and the
/// machines.
///
/// Built by merging documents one after the other, then resolved once with
/// [`RootConfig::populate`].
///
/// # Example
/// ```yaml
/// vars:
///   NUM_WORKERS: 3
/// driver:
///   openstack:
///     flavor-name: tiny
/// machines:
///   master:
///     swarm:
///       master: true
///   worker:
///     instances: $(NUM_WORKERS)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootConfig {
    #[serde(
        default,
        deserialize_with = "deserialize_scalar_map",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub vars: VarsMap,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth: Option<AuthConfig>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub engine: Option<EngineConfig>,
    #[serde(
        default,
        deserialize_with = "deserialize_named",
        skip_serializing_if = "Option::is_none"
    )]
    pub driver: Option<DriverConfig>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub swarm: Option<SwarmConfig>,
    #[serde(default, skip_serializing_if = "MachineConfigMap::is_empty")]
    pub machines: MachineConfigMap,
}

impl RootConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a later document over this one.
    ///
    /// Options it specifies win; variables and machines merge key by key.
    pub fn merge(&mut self, other: RootConfig) {
        self.vars.extend(other.vars);
        merge_section(&mut self.auth, other.auth, AuthConfig::merge);
        merge_section(&mut self.engine, other.engine, EngineConfig::merge);
        merge_section(&mut self.driver, other.driver, DriverConfig::merge);
        merge_section(&mut self.swarm, other.swarm, SwarmConfig::merge);
        self.machines.merge(other.machines);
    }

    /// Parse one YAML document and merge it. An empty document is a no-op.
    pub fn merge_document(&mut self, yaml: &str) -> Result<(), ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(());
        }
        if let Some(document) = serde_yaml::from_str::<Option<RootConfig>>(yaml)? {
            self.merge(document);
        }
        Ok(())
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Apply `NAME=VALUE` overrides. The value may itself contain `=`.
    pub fn apply_var_definitions<S: AsRef<str>>(&mut self, definitions: &[S]) -> Result<(), ConfigError> {
        for definition in definitions {
            let definition = definition.as_ref();
            let (name, value) = definition
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidVarDefinition(definition.to_string()))?;

            VariableOverridden { name, value }.log();
            self.set_var(name, value);
        }
        Ok(())
    }

    /// The variables substituted before instance expansion: the root
    /// variables, with `$(#)` mapped to itself so it survives for each
    /// replica to fill in.
    pub(crate) fn substitution_vars(&self) -> VarsMap {
        let mut vars = self.vars.clone();
        vars.insert(INDEX_VAR.to_string(), format!("$({})", INDEX_VAR));
        vars
    }

    /// Resolve the environment: create missing global sections, substitute
    /// variables in them and populate them, then substitute, populate and
    /// expand every machine.
    pub fn populate(&mut self, api: &dyn HostProvider) -> Result<(), ConfigError> {
        let ctx = PopulateContext::global(api);
        let vars = self.substitution_vars();

        let auth = self.auth.take().unwrap_or_else(|| AuthConfig::new(api));
        let mut auth = replace_all_string_map(&auth, &vars);
        auth.populate(&ctx)?;
        self.auth = Some(auth);

        let engine = self.engine.take().unwrap_or_else(EngineConfig::new);
        let mut engine = replace_all_string_map(&engine, &vars);
        engine.populate(&ctx)?;
        self.engine = Some(engine);

        let driver = self.driver.take().unwrap_or_default();
        let mut driver = replace_all_string_map(&driver, &vars);
        driver.populate(&ctx)?;
        self.driver = Some(driver);

        let swarm = self.swarm.take().unwrap_or_else(SwarmConfig::new);
        let mut swarm = replace_all_string_map(&swarm, &vars);
        swarm.populate(&ctx)?;
        self.swarm = Some(swarm);

        let mut machines = std::mem::take(&mut self.machines);
        let result = machines.populate(api, self);
        self.machines = machines;
        result
    }
}
