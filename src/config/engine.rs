// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::consts::{
    DEFAULT_ENGINE_INSTALL_URL, DEFAULT_ENGINE_STORAGE_DRIVER, DEFAULT_ENGINE_TLS_VERIFY,
};
use crate::config::options::{overlay, OptionsMap};
use crate::config::substitution::Substitute;
use crate::errors::ConfigError;
use crate::host::EngineOptions;
use crate::traits::{Populate, PopulateContext};

/// Options for the Docker engine installed on each machine.
///
/// List options accept a YAML sequence or a string holding one:
///
/// ```yaml
/// engine:
///   opt:          [ "log-driver=journald" ]
///   environment:  "[HTTP_PROXY=http://proxy:3128]"
///   storage-driver: overlay2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EngineConfig {
    #[serde(rename = "opt", skip_serializing_if = "Option::is_none")]
    pub arbitrary_flags: Option<Vec<String>>,
    #[serde(rename = "environment", skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(rename = "insecure-registry", skip_serializing_if = "Option::is_none")]
    pub insecure_registry: Option<Vec<String>>,
    #[serde(rename = "registry-mirror", skip_serializing_if = "Option::is_none")]
    pub registry_mirror: Option<Vec<String>>,
    #[serde(rename = "storage-driver", skip_serializing_if = "Option::is_none")]
    pub storage_driver: Option<String>,
    #[serde(rename = "se-linux-enabled", skip_serializing_if = "Option::is_none")]
    pub selinux_enabled: Option<bool>,
    #[serde(rename = "tls-verify", skip_serializing_if = "Option::is_none")]
    pub tls_verify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<bool>,
    #[serde(rename = "install-url", skip_serializing_if = "Option::is_none")]
    pub install_url: Option<String>,
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl EngineConfig {
    /// An engine section with every default filled in.
    pub fn new() -> Self {
        let mut engine = Self::default();
        engine.fill_defaults();
        engine
    }

    fn fill_defaults(&mut self) {
        self.install_url
            .get_or_insert_with(|| DEFAULT_ENGINE_INSTALL_URL.to_string());
        self.storage_driver
            .get_or_insert_with(|| DEFAULT_ENGINE_STORAGE_DRIVER.to_string());
        self.tls_verify.get_or_insert(DEFAULT_ENGINE_TLS_VERIFY);
    }

    /// Overlay the options present in `other`; absent options keep their
    /// current value.
    pub fn merge(&mut self, other: EngineConfig) {
        overlay(&mut self.arbitrary_flags, other.arbitrary_flags);
        overlay(&mut self.env, other.env);
        overlay(&mut self.dns, other.dns);
        overlay(&mut self.labels, other.labels);
        overlay(&mut self.insecure_registry, other.insecure_registry);
        overlay(&mut self.registry_mirror, other.registry_mirror);
        overlay(&mut self.storage_driver, other.storage_driver);
        overlay(&mut self.selinux_enabled, other.selinux_enabled);
        overlay(&mut self.tls_verify, other.tls_verify);
        overlay(&mut self.ipv6, other.ipv6);
        overlay(&mut self.install_url, other.install_url);
        overlay(&mut self.log_level, other.log_level);
    }

    pub fn to_options(&self) -> EngineOptions {
        EngineOptions {
            arbitrary_flags: self.arbitrary_flags.clone().unwrap_or_default(),
            env: self.env.clone().unwrap_or_default(),
            dns: self.dns.clone().unwrap_or_default(),
            labels: self.labels.clone().unwrap_or_default(),
            insecure_registry: self.insecure_registry.clone().unwrap_or_default(),
            registry_mirror: self.registry_mirror.clone().unwrap_or_default(),
            storage_driver: self.storage_driver.clone().unwrap_or_default(),
            selinux_enabled: self.selinux_enabled.unwrap_or_default(),
            tls_verify: self.tls_verify.unwrap_or(DEFAULT_ENGINE_TLS_VERIFY),
            ipv6: self.ipv6.unwrap_or_default(),
            install_url: self.install_url.clone().unwrap_or_default(),
            log_level: self.log_level.clone().unwrap_or_default(),
        }
    }
}

impl Populate for EngineConfig {
    fn populate(&mut self, _ctx: &PopulateContext<'_>) -> Result<(), ConfigError> {
        self.fill_defaults();
        Ok(())
    }
}

impl Substitute for EngineConfig {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        Self {
            arbitrary_flags: self.arbitrary_flags.substitute(replacer),
            env: self.env.substitute(replacer),
            dns: self.dns.substitute(replacer),
            labels: self.labels.substitute(replacer),
            insecure_registry: self.insecure_registry.substitute(replacer),
            registry_mirror: self.registry_mirror.substitute(replacer),
            storage_driver: self.storage_driver.substitute(replacer),
            selinux_enabled: self.selinux_enabled,
            tls_verify: self.tls_verify,
            ipv6: self.ipv6,
            install_url: self.install_url.substitute(replacer),
            log_level: self.log_level.substitute(replacer),
        }
    }
}

impl<'de> Deserialize<'de> for EngineConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = OptionsMap::deserialize_section(deserializer)?;
        let list = |key: &str| c.list(key).map_err(D::Error::custom);
        let string = |key: &str| c.string(key).map_err(D::Error::custom);
        let boolean = |key: &str| c.bool(key).map_err(D::Error::custom);

        Ok(Self {
            arbitrary_flags: list("opt")?,
            env: list("environment")?,
            dns: list("dns")?,
            labels: list("labels")?,
            insecure_registry: list("insecure-registry")?,
            registry_mirror: list("registry-mirror")?,
            storage_driver: string("storage-driver")?,
            selinux_enabled: boolean("se-linux-enabled")?,
            tls_verify: boolean("tls-verify")?,
            ipv6: boolean("ipv6")?,
            install_url: string("install-url")?,
            log_level: string("log-level")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::StubProvider;

    fn decode(yaml: &str) -> EngineConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_new_has_defaults() {
        let engine = EngineConfig::new();
        assert_eq!(engine.install_url.as_deref(), Some("https://get.docker.com"));
        assert_eq!(engine.storage_driver.as_deref(), Some("aufs"));
        assert_eq!(engine.tls_verify, Some(true));
        assert_eq!(engine.dns, None);
    }

    #[test]
    fn test_decode_leaves_absent_options_unset() {
        let engine = decode("log-level: debug");
        assert_eq!(engine.log_level.as_deref(), Some("debug"));
        assert_eq!(engine.install_url, None);
        assert_eq!(engine.storage_driver, None);
        assert_eq!(engine.tls_verify, None);
    }

    #[test]
    fn test_decode_list_shapes() {
        let engine = decode(
            r#"
opt: [ "log-driver=journald" ]
environment: "[HTTP_PROXY=http://proxy:3128, NO_PROXY=localhost]"
dns:
  - 8.8.8.8
labels: ""
"#,
        );
        assert_eq!(engine.arbitrary_flags, Some(vec!["log-driver=journald".to_string()]));
        assert_eq!(
            engine.env,
            Some(vec![
                "HTTP_PROXY=http://proxy:3128".to_string(),
                "NO_PROXY=localhost".to_string()
            ])
        );
        assert_eq!(engine.dns, Some(vec!["8.8.8.8".to_string()]));
        assert_eq!(engine.labels, Some(Vec::new()));
    }

    #[test]
    fn test_decode_rejects_bad_bool() {
        let result: Result<EngineConfig, _> = serde_yaml::from_str("tls-verify: sometimes");
        assert!(result.is_err());
    }

    #[test]
    fn test_later_partial_document_overlays_instead_of_resetting() {
        let api = StubProvider::new("/store");
        let mut engine = decode("storage-driver: overlay2\ntls-verify: false\n");
        engine.merge(decode("log-level: warn"));
        engine.populate(&PopulateContext::global(&api)).unwrap();

        assert_eq!(engine.storage_driver.as_deref(), Some("overlay2"));
        assert_eq!(engine.tls_verify, Some(false));
        assert_eq!(engine.log_level.as_deref(), Some("warn"));
        assert_eq!(engine.install_url.as_deref(), Some("https://get.docker.com"));
    }

    #[test]
    fn test_respecified_option_overrides() {
        let mut engine = decode("storage-driver: overlay2");
        engine.merge(decode("storage-driver: btrfs"));
        assert_eq!(engine.storage_driver.as_deref(), Some("btrfs"));
    }

    #[test]
    fn test_to_options() {
        let mut engine = decode("ipv6: true\ndns: [1.1.1.1]\n");
        engine.fill_defaults();
        let options = engine.to_options();

        assert!(options.ipv6);
        assert!(options.tls_verify);
        assert!(!options.selinux_enabled);
        assert_eq!(options.dns, vec!["1.1.1.1".to_string()]);
        assert_eq!(options.storage_driver, "aufs");
    }
}
