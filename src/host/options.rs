// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fully resolved option sets as the host provider receives them.
//!
//! These are plain values produced from populated section configs at the
//! provider boundary, so nothing on the provider side depends on how the
//! environment documents were written or merged.

use serde::{Deserialize, Serialize};

use crate::config::consts::{DEFAULT_MACHINE_CPUS, DEFAULT_MACHINE_MEMORY};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthOptions {
    pub cert_dir: String,
    pub ca_cert_path: String,
    pub ca_private_key_path: String,
    pub ca_cert_remote_path: String,
    pub client_cert_path: String,
    pub client_key_path: String,
    pub server_cert_path: String,
    pub server_key_path: String,
    pub server_cert_remote_path: String,
    pub server_key_remote_path: String,
    pub server_cert_sans: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub arbitrary_flags: Vec<String>,
    pub env: Vec<String>,
    pub dns: Vec<String>,
    pub labels: Vec<String>,
    pub insecure_registry: Vec<String>,
    pub registry_mirror: Vec<String>,
    pub storage_driver: String,
    pub selinux_enabled: bool,
    pub tls_verify: bool,
    pub ipv6: bool,
    pub install_url: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmOptions {
    pub is_swarm: bool,
    pub master: bool,
    pub host: String,
    pub discovery: String,
    pub image: String,
    pub strategy: String,
}

/// Everything the provider needs to know about a host besides its driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostOptions {
    pub driver: String,
    pub cpus: u32,
    pub memory: u32,
    pub engine: EngineOptions,
    pub swarm: SwarmOptions,
    pub auth: AuthOptions,
}

impl HostOptions {
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            cpus: DEFAULT_MACHINE_CPUS,
            memory: DEFAULT_MACHINE_MEMORY,
            engine: EngineOptions::default(),
            swarm: SwarmOptions::default(),
            auth: AuthOptions::default(),
        }
    }
}
