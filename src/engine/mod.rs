// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Fan-out of host actions.
//!
//! [`ActionDispatcher`] runs one [`Action`] on every host of a set with a
//! bounded number of concurrent workers and aggregates the per-host
//! failures. Persisting the hosts afterwards is left to the caller.

pub mod action;
pub mod dispatcher;

pub use action::Action;
pub use dispatcher::{ActionDispatcher, DispatchReport};
