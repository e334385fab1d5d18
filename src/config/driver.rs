// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::config::substitution::Substitute;
use crate::errors::{ConfigError, ProviderError};
use crate::observability::messages::host::{DriverFlagSet, DriverLoading};
use crate::observability::messages::StructuredLog;
use crate::traits::{BaseDriverOptions, CreateFlag, Driver, DriverFlags, HostProvider};
use crate::traits::{Populate, PopulateContext};

/// The provider a machine is created with, plus its options.
///
/// Written as a mapping with exactly one provider key. Option names drop the
/// provider prefix: `flavor-name` here is the `openstack-flavor-name` flag.
///
/// ```yaml
/// driver:
///   openstack:
///     flavor-name: m1.small
///     image-name:  ubuntu-16.04
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverConfig {
    pub name: String,
    pub options: BTreeMap<String, Value>,
}

impl DriverConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    /// Overlay `other` onto this section.
    ///
    /// The same provider overlays option by option; a different provider
    /// replaces the section; an empty `driver:` changes nothing.
    pub fn merge(&mut self, other: DriverConfig) {
        if other.name.is_empty() {
            return;
        }
        if other.name == self.name {
            self.options.extend(other.options);
        } else {
            *self = other;
        }
    }

    /// Load the provider's plugin for `machine_name` and apply the resolved
    /// create flags to it.
    pub fn get(
        &self,
        api: &dyn HostProvider,
        machine_name: &str,
    ) -> Result<Box<dyn Driver>, ProviderError> {
        if self.name.is_empty() {
            return Err(ProviderError::NoDriver(machine_name.to_string()));
        }

        let bare_driver_data = serde_json::to_vec(&BaseDriverOptions {
            machine_name: machine_name.to_string(),
            store_path: api.store_path().to_path_buf(),
        })?;

        DriverLoading {
            driver: &self.name,
            machine: machine_name,
        }
        .log();
        let mut driver = api.load_plugin(&self.name, &bare_driver_data)?;

        let flags = self.resolve_flags(&driver.create_flags());
        driver.set_config_from_flags(&flags)?;
        Ok(driver)
    }

    /// Merge the configured options over the defaults of every declared flag.
    ///
    /// A flag with no default is a switch and resolves to `false`.
    ///
    /// # Panics
    /// When a declared flag is not namespaced by this provider's name: the
    /// driver itself is broken.
    pub(crate) fn resolve_flags(&self, declared: &[CreateFlag]) -> DriverFlags {
        let prefix = format!("{}-", self.name);
        let mut flags = DriverFlags::new();

        for flag in declared {
            let Some(option) = flag.name.strip_prefix(&prefix) else {
                panic!("Flag '{}' does not start with '{}'", flag.name, prefix);
            };

            let (value, is_default) = match self.options.get(option) {
                Some(value) => (value.clone(), false),
                None => (flag.default.clone().unwrap_or(Value::Bool(false)), true),
            };
            DriverFlagSet {
                flag: &flag.name,
                value: &value,
                is_default,
            }
            .log();
            flags.insert(flag.name.clone(), value);
        }

        flags
    }
}

impl Populate for DriverConfig {
    fn populate(&mut self, _ctx: &PopulateContext<'_>) -> Result<(), ConfigError> {
        Ok(())
    }
}

impl Substitute for DriverConfig {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        Self {
            name: self.name.substitute(replacer),
            options: self.options.substitute(replacer),
        }
    }
}

impl<'de> Deserialize<'de> for DriverConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let providers =
            Option::<BTreeMap<String, Option<BTreeMap<String, Value>>>>::deserialize(deserializer)?
                .unwrap_or_default();

        if providers.len() > 1 {
            let names: Vec<&str> = providers.keys().map(String::as_str).collect();
            return Err(D::Error::custom(format!(
                "only one driver can be specified, found: {}",
                names.join(", ")
            )));
        }

        Ok(providers
            .into_iter()
            .next()
            .map(|(name, options)| Self {
                name,
                options: options.unwrap_or_default(),
            })
            .unwrap_or_default())
    }
}

/// Read an optional `driver` section. One without a provider key, such as a
/// bare `driver:`, is absent.
pub(crate) fn deserialize_named<'de, D>(deserializer: D) -> Result<Option<DriverConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let driver = DriverConfig::deserialize(deserializer)?;
    Ok(Some(driver).filter(|driver| !driver.name.is_empty()))
}

impl Serialize for DriverConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.name.is_empty() {
            return serializer.serialize_map(Some(0))?.end();
        }
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.options)?;
        map.end()
    }
}
