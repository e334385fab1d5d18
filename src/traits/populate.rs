// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use crate::traits::HostProvider;

/// What a section can see while it fills in its unset options.
pub struct PopulateContext<'a> {
    pub api: &'a dyn HostProvider,
    /// Name of the machine owning the section; `None` for global sections.
    pub machine: Option<&'a str>,
}

impl<'a> PopulateContext<'a> {
    pub fn global(api: &'a dyn HostProvider) -> Self {
        Self { api, machine: None }
    }

    pub fn for_machine(api: &'a dyn HostProvider, machine: &'a str) -> Self {
        Self {
            api,
            machine: Some(machine),
        }
    }
}

/// Fill every option that was left unset after decoding and merging.
///
/// Must be idempotent: a populated section populated again is unchanged.
pub trait Populate {
    fn populate(&mut self, ctx: &PopulateContext<'_>) -> Result<(), ConfigError>;
}
