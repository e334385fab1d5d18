// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Usage Pattern
//!
//! ```rust
//! use docker_env::observability::messages::dispatch::DispatchStarted;
//! use docker_env::observability::messages::StructuredLog;
//!
//! let msg = DispatchStarted {
//!     action: "start",
//!     host_count: 3,
//!     max_concurrency: 8,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod config;
pub mod dispatch;
pub mod host;

/// A message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// A span carrying the message's fields, for work done on its behalf.
    fn span(&self, name: &str) -> Span;
}
