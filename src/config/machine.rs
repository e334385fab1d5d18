// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::btree_map::{self, Entry};
use std::collections::{BTreeMap, HashMap};

use crate::config::auth::AuthConfig;
use crate::config::consts::INDEX_VAR;
use crate::config::driver::{deserialize_named, DriverConfig};
use crate::config::engine::EngineConfig;
use crate::config::options::{deserialize_present, deserialize_scalar_opt, merge_section, overlay};
use crate::config::root::RootConfig;
use crate::config::substitution::{
    has_var, has_vars, replace_all_string_map, replace_vars, Substitute,
};
use crate::config::swarm::SwarmConfig;
use crate::errors::{ConfigError, ProviderError};
use crate::host::{Host, HostOptions};
use crate::observability::messages::config::{MachineElided, MachineExpanded};
use crate::observability::messages::host::HostMissing;
use crate::observability::messages::StructuredLog;
use crate::traits::{HostProvider, Populate, PopulateContext};

/// One named machine of the environment.
///
/// `instances` is kept as text until it is resolved: it may hold `$(NAME)`
/// tokens. Sections left out inherit the whole global section at populate
/// time; a section given here, even partially, is never replaced by the
/// global one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(skip)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_scalar_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub instances: Option<String>,
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
}

impl MachineConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Overlay a later document's definition of the same machine.
    pub fn merge(&mut self, other: MachineConfig) {
        overlay(&mut self.instances, other.instances);
        merge_section(&mut self.auth, other.auth, AuthConfig::merge);
        merge_section(&mut self.engine, other.engine, EngineConfig::merge);
        merge_section(&mut self.driver, other.driver, DriverConfig::merge);
        merge_section(&mut self.swarm, other.swarm, SwarmConfig::merge);
    }

    /// Inherit the absent sections from `root`, then populate all four.
    ///
    /// An absent instance count means one instance. A driver without a
    /// provider name counts as absent.
    pub fn populate(&mut self, api: &dyn HostProvider, root: &RootConfig) -> Result<(), ConfigError> {
        self.instances.get_or_insert_with(|| "1".to_string());
        self.driver = self.driver.take().filter(|driver| !driver.name.is_empty());

        let auth = self
            .auth
            .get_or_insert_with(|| root.auth.clone().unwrap_or_default());
        let engine = self
            .engine
            .get_or_insert_with(|| root.engine.clone().unwrap_or_default());
        let driver = self
            .driver
            .get_or_insert_with(|| root.driver.clone().unwrap_or_default());
        let swarm = self
            .swarm
            .get_or_insert_with(|| root.swarm.clone().unwrap_or_default());

        let ctx = PopulateContext::for_machine(api, &self.name);
        let sections: [&mut dyn Populate; 4] = [auth, engine, driver, swarm];
        for section in sections {
            section.populate(&ctx)?;
        }
        Ok(())
    }

    /// Resolved options handed to the provider along with the driver.
    pub fn host_options(&self, driver_name: &str) -> HostOptions {
        let mut options = HostOptions::new(driver_name);
        if let Some(engine) = &self.engine {
            options.engine = engine.to_options();
        }
        if let Some(swarm) = &self.swarm {
            options.swarm = swarm.to_options();
        }
        if let Some(auth) = &self.auth {
            options.auth = auth.to_options();
        }
        options
    }

    /// Build a new host for this machine.
    ///
    /// Fails with [`ProviderError::HostAlreadyExists`] when the store already
    /// has a host of this name.
    pub fn new_host(&self, api: &dyn HostProvider) -> Result<Host, ProviderError> {
        let driver = self
            .driver
            .as_ref()
            .ok_or_else(|| ProviderError::NoDriver(self.name.clone()))?
            .get(api, &self.name)?;

        let mut host = api.new_host(driver)?;
        host.options = self.host_options(&host.driver_name);

        if api.exists(&host.name)? {
            return Err(ProviderError::HostAlreadyExists(host.name));
        }
        Ok(host)
    }

    /// Load this machine's host from the store.
    pub fn load_host(&self, api: &dyn HostProvider) -> Result<Host, ProviderError> {
        api.load(&self.name)
    }

    /// The `index`-th replica of an expanded machine, fully populated.
    ///
    /// `self` has been substituted with the root variables already, with
    /// `$(#)` kept as written; only `$(#)` is replaced here.
    fn instance(
        &self,
        index: usize,
        api: &dyn HostProvider,
        root: &RootConfig,
    ) -> Result<MachineConfig, ConfigError> {
        let vars = HashMap::from([(INDEX_VAR.to_string(), index.to_string())]);

        let mut instance = replace_all_string_map(self, &vars);
        instance.name =
            replace_vars(&self.name, &vars).map_err(|source| ConfigError::IndexSubstitution {
                name: self.name.clone(),
                source,
            })?;
        instance.instances = Some("1".to_string());
        instance.populate(api, root)?;
        Ok(instance)
    }
}

impl Substitute for MachineConfig {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        Self {
            name: self.name.substitute(replacer),
            instances: self.instances.substitute(replacer),
            auth: self.auth.substitute(replacer),
            engine: self.engine.substitute(replacer),
            driver: self.driver.substitute(replacer),
            swarm: self.swarm.substitute(replacer),
        }
    }
}

fn parse_instances(raw: &str) -> Result<usize, ConfigError> {
    raw.parse().map_err(|_| {
        if has_vars(raw) {
            ConfigError::UndefinedInstanceVars(raw.to_string())
        } else {
            ConfigError::InvalidInstances(raw.to_string())
        }
    })
}

fn insert_unique(
    machines: &mut BTreeMap<String, MachineConfig>,
    machine: MachineConfig,
) -> Result<(), ConfigError> {
    match machines.entry(machine.name.clone()) {
        Entry::Occupied(entry) => Err(ConfigError::DuplicateMachine(entry.key().clone())),
        Entry::Vacant(entry) => {
            entry.insert(machine);
            Ok(())
        }
    }
}

/// The machines of an environment, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MachineConfigMap(BTreeMap<String, MachineConfig>);

impl MachineConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MachineConfig> {
        self.0.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, MachineConfig> {
        self.0.values()
    }

    /// Insert `machine` under `name`, which also becomes its name.
    pub fn insert(&mut self, name: impl Into<String>, mut machine: MachineConfig) {
        machine.name = name.into();
        self.0.insert(machine.name.clone(), machine);
    }

    /// Merge key by key; machines in both maps are overlaid.
    pub fn merge(&mut self, other: MachineConfigMap) {
        for (name, machine) in other.0 {
            match self.0.entry(name) {
                Entry::Occupied(mut entry) => entry.get_mut().merge(machine),
                Entry::Vacant(entry) => {
                    entry.insert(machine);
                }
            }
        }
    }

    /// Substitute, populate and expand every machine.
    ///
    /// A machine with `N` instances becomes `N` machines named by replacing
    /// `$(#)` in its name with `1..=N` (`-$(#)` is appended when the name
    /// has none); a machine with 0 instances is dropped. Every remaining
    /// machine has `instances == "1"`. The map is left untouched on error.
    pub fn populate(&mut self, api: &dyn HostProvider, root: &RootConfig) -> Result<(), ConfigError> {
        let vars = root.substitution_vars();
        let mut resolved = BTreeMap::new();

        for (key, machine) in &self.0 {
            let mut named = machine.clone();
            named.name = key.clone();

            let mut machine = replace_all_string_map(&named, &vars);
            machine.populate(api, root)?;

            let count = parse_instances(machine.instances.as_deref().unwrap_or("1"))?;
            match count {
                0 => MachineElided { name: key }.log(),
                1 => {
                    machine.instances = Some("1".to_string());
                    insert_unique(&mut resolved, machine)?;
                }
                n => {
                    if !has_var(&machine.name, INDEX_VAR) {
                        machine.name = format!("{}-$({})", machine.name, INDEX_VAR);
                    }
                    for index in 1..=n {
                        insert_unique(&mut resolved, machine.instance(index, api, root)?)?;
                    }
                    MachineExpanded {
                        name: key,
                        instances: n,
                    }
                    .log();
                }
            }
        }

        self.0 = resolved;
        Ok(())
    }

    /// Build a new host for every machine; the first failure aborts.
    pub fn new_hosts(&self, api: &dyn HostProvider) -> Result<Vec<Host>, ProviderError> {
        self.iter().map(|machine| machine.new_host(api)).collect()
    }

    /// Load the hosts present in the store. Missing ones are reported to
    /// `on_missing` and skipped; any other failure aborts.
    pub fn load_existing_hosts(
        &self,
        api: &dyn HostProvider,
        mut on_missing: impl FnMut(&str),
    ) -> Result<Vec<Host>, ProviderError> {
        let mut hosts = Vec::with_capacity(self.len());
        for machine in self.iter() {
            match machine.load_host(api) {
                Ok(host) => hosts.push(host),
                Err(e) if e.is_not_exist() => on_missing(&machine.name),
                Err(e) => return Err(e),
            }
        }
        Ok(hosts)
    }

    /// Load every host; all of them must be in the store.
    pub fn load_hosts(&self, api: &dyn HostProvider) -> Result<Vec<Host>, ProviderError> {
        let mut missing = 0;
        let hosts = self.load_existing_hosts(api, |name| {
            HostMissing { name }.log();
            missing += 1;
        })?;

        if missing > 0 {
            return Err(ProviderError::MissingHosts(missing));
        }
        Ok(hosts)
    }
}

impl<'de> Deserialize<'de> for MachineConfigMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Option<MachineConfig>>>::deserialize(deserializer)?
            .unwrap_or_default();

        Ok(Self(
            raw.into_iter()
                .map(|(name, machine)| {
                    let mut machine = machine.unwrap_or_default();
                    machine.name = name.clone();
                    (name, machine)
                })
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubProvider;

    fn root(yaml: &str) -> RootConfig {
        let mut root = RootConfig::default();
        root.merge_document(yaml).unwrap();
        root
    }

    #[test]
    fn test_clone_does_not_alias_sections() {
        let api = StubProvider::new("/store");
        let root = root("driver:\n  stub:\n    ip: 10.0.0.1\n");
        let mut original = MachineConfig::new("db");
        original.populate(&api, &root).unwrap();

        let mut copy = original.clone();
        copy.swarm.as_mut().unwrap().discovery = Some("token://changed".to_string());
        copy.engine.as_mut().unwrap().dns = Some(vec!["9.9.9.9".to_string()]);
        copy.driver
            .as_mut()
            .unwrap()
            .options
            .insert("ip".to_string(), serde_yaml::Value::String("10.0.0.2".to_string()));

        assert_eq!(original.swarm.as_ref().unwrap().discovery, None);
        assert_eq!(original.engine.as_ref().unwrap().dns, None);
        assert_eq!(
            original.driver.as_ref().unwrap().options.get("ip"),
            Some(&serde_yaml::Value::String("10.0.0.1".to_string()))
        );
    }

    #[test]
    fn test_populate_inherits_only_absent_sections() {
        let api = StubProvider::new("/store");
        let root = root(
            r#"
swarm:
  strategy: binpack
  discovery: token://1234
engine:
  log-level: warn
"#,
        );
        let mut machine: MachineConfig = serde_yaml::from_str("swarm:\n  master: true\n").unwrap();
        machine.name = "manager".to_string();

        machine.populate(&api, &root).unwrap();

        let swarm = machine.swarm.as_ref().unwrap();
        assert_eq!(swarm.master, Some(true));
        assert_eq!(swarm.discovery, None);
        assert_eq!(swarm.strategy.as_deref(), Some("spread"));

        let engine = machine.engine.as_ref().unwrap();
        assert_eq!(engine.log_level.as_deref(), Some("warn"));
        assert_eq!(machine.instances.as_deref(), Some("1"));
        assert!(machine.auth.is_some());
        assert!(machine.driver.is_some());
    }

    #[test]
    fn test_parse_instances_errors() {
        assert_eq!(parse_instances("3").unwrap(), 3);
        assert!(matches!(
            parse_instances("$(NUM_WORKERS)"),
            Err(ConfigError::UndefinedInstanceVars(ref raw)) if raw == "$(NUM_WORKERS)"
        ));
        assert!(matches!(
            parse_instances("three"),
            Err(ConfigError::InvalidInstances(ref raw)) if raw == "three"
        ));
        assert!(matches!(parse_instances("-1"), Err(ConfigError::InvalidInstances(_))));
    }

    #[test]
    fn test_expansion_uses_index_placeholder_in_name() {
        let api = StubProvider::new("/store");
        let mut root = root(
            r#"
vars:
  REGION: eu
machines:
  $(REGION)-node-$(#)-x:
    instances: 2
"#,
        );
        root.populate(&api).unwrap();

        let names: Vec<&str> = root.machines.names().collect();
        assert_eq!(names, vec!["eu-node-1-x", "eu-node-2-x"]);
    }

    #[test]
    fn test_index_substituted_in_options() {
        let api = StubProvider::new("/store");
        let mut root = root(
            r#"
machines:
  web:
    instances: 2
    driver:
      stub:
        ip: 10.0.0.$(#)
"#,
        );
        root.populate(&api).unwrap();

        let ip = |name: &str| {
            root.machines.get(name).unwrap().driver.as_ref().unwrap().options["ip"].clone()
        };
        assert_eq!(ip("web-1"), serde_yaml::Value::String("10.0.0.1".to_string()));
        assert_eq!(ip("web-2"), serde_yaml::Value::String("10.0.0.2".to_string()));
    }

    #[test]
    fn test_index_and_variables_in_one_option() {
        let api = StubProvider::new("/store");
        let mut root = root(
            r#"
vars:
  SUBNET: 10.1.0
driver:
  stub:
    ip: $(SUBNET).$(#)
machines:
  web:
    instances: 2
  db:
    instances: 2
    driver:
      stub:
        ip: $(SUBNET).1$(#)
"#,
        );
        root.populate(&api).unwrap();

        let ip = |name: &str| {
            root.machines.get(name).unwrap().driver.as_ref().unwrap().options["ip"].clone()
        };
        assert_eq!(ip("web-1"), serde_yaml::Value::String("10.1.0.1".to_string()));
        assert_eq!(ip("web-2"), serde_yaml::Value::String("10.1.0.2".to_string()));
        assert_eq!(ip("db-1"), serde_yaml::Value::String("10.1.0.11".to_string()));
        assert_eq!(ip("db-2"), serde_yaml::Value::String("10.1.0.12".to_string()));
    }

    #[test]
    fn test_bare_driver_section_inherits_global_driver() {
        let api = StubProvider::new("/store");
        let mut root = root("driver:\n  stub:\n    ip: 10.0.0.9\nmachines:\n  db:\n    driver:\n");
        root.merge_document("driver:\n").unwrap();
        root.populate(&api).unwrap();

        let driver = root.machines.get("db").unwrap().driver.as_ref().unwrap();
        assert_eq!(driver.name, "stub");
        assert_eq!(
            driver.options.get("ip"),
            Some(&serde_yaml::Value::String("10.0.0.9".to_string()))
        );
        assert!(root.machines.get("db").unwrap().new_host(&api).is_ok());
    }

    #[test]
    fn test_name_collision_after_expansion() {
        let api = StubProvider::new("/store");
        let mut root = root(
            r#"
machines:
  web:
    instances: 2
  web-2:
    instances: 1
"#,
        );

        let err = root.populate(&api).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateMachine(ref name) if name == "web-2"));
        assert_eq!(root.machines.len(), 2);
        assert!(root.machines.contains_key("web"));
    }

    #[test]
    fn test_undefined_variable_in_instances() {
        let api = StubProvider::new("/store");
        let mut root = root("machines:\n  db:\n    instances: $(NUM_DATABASES)\n");

        let err = root.populate(&api).unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedInstanceVars(_)));
    }

    #[test]
    fn test_new_host_refuses_existing() {
        let api = StubProvider::new("/store");
        let mut root = root("driver:\n  stub:\n    ip: 10.0.0.7\nmachines:\n  db:\n");
        root.populate(&api).unwrap();
        let machine = root.machines.get("db").unwrap();

        let host = machine.new_host(&api).unwrap();
        assert_eq!(host.name, "db");
        assert_eq!(host.driver_name, "stub");
        assert_eq!(host.options.engine.storage_driver, "aufs");
        assert_eq!(host.options.auth.ca_cert_path, "/store/certs/ca.pem");
        api.save(&host).unwrap();

        let err = machine.new_host(&api).unwrap_err();
        assert!(matches!(err, ProviderError::HostAlreadyExists(ref name) if name == "db"));
    }

    #[test]
    fn test_new_host_without_driver() {
        let api = StubProvider::new("/store");
        let mut root = root("machines:\n  db:\n");
        root.populate(&api).unwrap();

        let err = root.machines.get("db").unwrap().new_host(&api).unwrap_err();
        assert!(matches!(err, ProviderError::NoDriver(ref name) if name == "db"));
    }

    #[test]
    fn test_load_hosts_reports_missing() {
        let api = StubProvider::new("/store");
        let mut root = root("driver:\n  stub:\nmachines:\n  a:\n  b:\n  c:\n");
        root.populate(&api).unwrap();

        let host = root.machines.get("b").unwrap().new_host(&api).unwrap();
        api.save(&host).unwrap();

        let mut missing = Vec::new();
        let hosts = root
            .machines
            .load_existing_hosts(&api, |name| missing.push(name.to_string()))
            .unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].name, "b");
        assert_eq!(missing, vec!["a".to_string(), "c".to_string()]);

        let err = root.machines.load_hosts(&api).unwrap_err();
        assert!(matches!(err, ProviderError::MissingHosts(2)));
        assert_eq!(err.to_string(), "could not load 2 hosts");
    }
}
