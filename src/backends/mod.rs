// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Host provider implementations.
//!
//! The configuration engine and the dispatcher only talk to the
//! [`HostProvider`](crate::traits::HostProvider) and
//! [`Driver`](crate::traits::Driver) seams. This module holds the concrete
//! providers behind them.
//!
//! # Available Backends
//!
//! ## Filestore
//! [`filestore::LocalProvider`] keeps one JSON record per host under
//! `<storage>/machines/<name>/config.json`. It is what the binary uses.
//!
//! ## None Driver
//! [`none::NoneDriver`] describes a Docker host that was provisioned
//! elsewhere. It knows the engine URL and nothing else:
//! - **Address**: IP and URL are taken from `none-url`
//! - **Lifecycle**: start, stop, restart, kill and upgrade are unsupported
//!
//! ## Stub Backend (Test-Only)
//! Testing utilities for the dispatcher and the commands (only available in
//! test builds):
//! - **StubDriver**: records every call, with optional latency and failures
//! - **FailingDriver**: every operation fails
//! - **StubProvider**: in-memory store with a driver registry
//!
//! # Example
//!
//! ```rust,no_run
//! use docker_env::backends::filestore::{LocalProvider, ProviderSettings};
//! use docker_env::config::load_config;
//!
//! let api = LocalProvider::new(ProviderSettings::new("/home/me/.docker/machine"));
//! let mut config = load_config(".", &["staging"])?;
//! config.populate(&api)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod filestore;
pub mod none;
#[cfg(test)]
pub mod stub;
