// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for docker-env.
//!
//! Every diagnostic the library emits is a small message struct under
//! [`messages`], implementing `Display` for the human-readable text and
//! [`messages::StructuredLog`] to emit it with structured fields. Stdout is
//! reserved for command output; all logging goes to stderr.
//!
//! Messages are organized by subsystem:
//! * `messages::config` - document loading, variable overrides, instance expansion
//! * `messages::dispatch` - fan-out of actions across hosts
//! * `messages::host` - driver loading, host store and removal events

pub mod messages;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "docker_env=debug"
    } else {
        "docker_env=info"
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `debug`.
pub fn init_tracing(debug: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
