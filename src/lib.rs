// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // host providers and drivers
pub mod commands;      // CLI command bodies
pub mod config;        // documents, substitution, expansion
pub mod engine;        // action dispatch
pub mod errors;        // error handling
pub mod host;          // hosts and provider-facing options
pub mod observability;
pub mod traits;        // provider, driver and populate seams
