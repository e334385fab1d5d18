// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::config::consts::{
    CA_CERT_FILE, CA_KEY_FILE, CLIENT_CERT_FILE, CLIENT_KEY_FILE, SERVER_CERT_FILE, SERVER_KEY_FILE,
};
use crate::config::options::{overlay, OptionsMap};
use crate::config::substitution::Substitute;
use crate::errors::ConfigError;
use crate::host::AuthOptions;
use crate::traits::{HostProvider, Populate, PopulateContext};

/// TLS material for talking to a machine's engine.
///
/// Unset paths are derived from the certificate directory at populate time,
/// never at decode time: a later document may still change `cert-dir`.
///
/// # Example
/// ```yaml
/// auth:
///   cert-dir:     /etc/docker-env/certs
///   tls-ca-cert:  /my/ca.pem
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthConfig {
    #[serde(rename = "cert-dir", skip_serializing_if = "Option::is_none")]
    pub cert_dir: Option<String>,
    #[serde(rename = "tls-ca-cert", skip_serializing_if = "Option::is_none")]
    pub ca_cert_path: Option<String>,
    #[serde(rename = "tls-ca-key", skip_serializing_if = "Option::is_none")]
    pub ca_private_key_path: Option<String>,
    #[serde(rename = "tls-ca-cert-remote", skip_serializing_if = "Option::is_none")]
    pub ca_cert_remote_path: Option<String>,
    #[serde(rename = "tls-client-cert", skip_serializing_if = "Option::is_none")]
    pub client_cert_path: Option<String>,
    #[serde(rename = "tls-client-key", skip_serializing_if = "Option::is_none")]
    pub client_key_path: Option<String>,
    #[serde(rename = "server-cert-path", skip_serializing_if = "Option::is_none")]
    pub server_cert_path: Option<String>,
    #[serde(rename = "server-key-path", skip_serializing_if = "Option::is_none")]
    pub server_key_path: Option<String>,
    #[serde(rename = "server-cert-remote-path", skip_serializing_if = "Option::is_none")]
    pub server_cert_remote_path: Option<String>,
    #[serde(rename = "server-key-remote-path", skip_serializing_if = "Option::is_none")]
    pub server_key_remote_path: Option<String>,
    #[serde(rename = "server-cert-SANs", skip_serializing_if = "Option::is_none")]
    pub server_cert_sans: Option<Vec<String>>,
}

fn cert_path(dir: &str, file: &str) -> String {
    Path::new(dir).join(file).to_string_lossy().into_owned()
}

fn fill_path(field: &mut Option<String>, dir: &str, file: &str) {
    if field.as_deref().map_or(true, str::is_empty) {
        *field = Some(cert_path(dir, file));
    }
}

impl AuthConfig {
    /// All paths derived from the provider's certificate directory.
    pub fn new(api: &dyn HostProvider) -> Self {
        let cert_dir = api.cert_dir().to_string_lossy().into_owned();
        let mut auth = Self {
            cert_dir: Some(cert_dir.clone()),
            ..Self::default()
        };
        auth.derive_paths(&cert_dir);
        auth
    }

    fn derive_paths(&mut self, dir: &str) {
        fill_path(&mut self.ca_cert_path, dir, CA_CERT_FILE);
        fill_path(&mut self.ca_private_key_path, dir, CA_KEY_FILE);
        fill_path(&mut self.client_cert_path, dir, CLIENT_CERT_FILE);
        fill_path(&mut self.client_key_path, dir, CLIENT_KEY_FILE);
        fill_path(&mut self.server_cert_path, dir, SERVER_CERT_FILE);
        fill_path(&mut self.server_key_path, dir, SERVER_KEY_FILE);
    }

    /// Overlay the options present in `other`.
    pub fn merge(&mut self, other: AuthConfig) {
        overlay(&mut self.cert_dir, other.cert_dir);
        overlay(&mut self.ca_cert_path, other.ca_cert_path);
        overlay(&mut self.ca_private_key_path, other.ca_private_key_path);
        overlay(&mut self.ca_cert_remote_path, other.ca_cert_remote_path);
        overlay(&mut self.client_cert_path, other.client_cert_path);
        overlay(&mut self.client_key_path, other.client_key_path);
        overlay(&mut self.server_cert_path, other.server_cert_path);
        overlay(&mut self.server_key_path, other.server_key_path);
        overlay(&mut self.server_cert_remote_path, other.server_cert_remote_path);
        overlay(&mut self.server_key_remote_path, other.server_key_remote_path);
        overlay(&mut self.server_cert_sans, other.server_cert_sans);
    }

    pub fn to_options(&self) -> AuthOptions {
        AuthOptions {
            cert_dir: self.cert_dir.clone().unwrap_or_default(),
            ca_cert_path: self.ca_cert_path.clone().unwrap_or_default(),
            ca_private_key_path: self.ca_private_key_path.clone().unwrap_or_default(),
            ca_cert_remote_path: self.ca_cert_remote_path.clone().unwrap_or_default(),
            client_cert_path: self.client_cert_path.clone().unwrap_or_default(),
            client_key_path: self.client_key_path.clone().unwrap_or_default(),
            server_cert_path: self.server_cert_path.clone().unwrap_or_default(),
            server_key_path: self.server_key_path.clone().unwrap_or_default(),
            server_cert_remote_path: self.server_cert_remote_path.clone().unwrap_or_default(),
            server_key_remote_path: self.server_key_remote_path.clone().unwrap_or_default(),
            server_cert_sans: self.server_cert_sans.clone().unwrap_or_default(),
        }
    }
}

impl Populate for AuthConfig {
    fn populate(&mut self, ctx: &PopulateContext<'_>) -> Result<(), ConfigError> {
        if self.cert_dir.as_deref().map_or(true, str::is_empty) {
            self.cert_dir = Some(ctx.api.cert_dir().to_string_lossy().into_owned());
        }
        let dir = self.cert_dir.clone().unwrap_or_default();
        self.derive_paths(&dir);
        Ok(())
    }
}

impl Substitute for AuthConfig {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        Self {
            cert_dir: self.cert_dir.substitute(replacer),
            ca_cert_path: self.ca_cert_path.substitute(replacer),
            ca_private_key_path: self.ca_private_key_path.substitute(replacer),
            ca_cert_remote_path: self.ca_cert_remote_path.substitute(replacer),
            client_cert_path: self.client_cert_path.substitute(replacer),
            client_key_path: self.client_key_path.substitute(replacer),
            server_cert_path: self.server_cert_path.substitute(replacer),
            server_key_path: self.server_key_path.substitute(replacer),
            server_cert_remote_path: self.server_cert_remote_path.substitute(replacer),
            server_key_remote_path: self.server_key_remote_path.substitute(replacer),
            server_cert_sans: self.server_cert_sans.substitute(replacer),
        }
    }
}

impl<'de> Deserialize<'de> for AuthConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = OptionsMap::deserialize_section(deserializer)?;
        let string = |key: &str| c.string(key).map_err(D::Error::custom);

        Ok(Self {
            cert_dir: string("cert-dir")?,
            ca_cert_path: string("tls-ca-cert")?,
            ca_private_key_path: string("tls-ca-key")?,
            ca_cert_remote_path: string("tls-ca-cert-remote")?,
            client_cert_path: string("tls-client-cert")?,
            client_key_path: string("tls-client-key")?,
            server_cert_path: string("server-cert-path")?,
            server_key_path: string("server-key-path")?,
            server_cert_remote_path: string("server-cert-remote-path")?,
            server_key_remote_path: string("server-key-remote-path")?,
            server_cert_sans: c.list("server-cert-SANs").map_err(D::Error::custom)?,
        })
    }
}
