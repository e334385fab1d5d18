// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod command;
mod config;
mod dispatch;
mod provider;

pub use command::CommandError;
pub use config::{ConfigError, UnknownVariables};
pub use dispatch::{ActionError, ActionErrors};
pub use provider::ProviderError;
