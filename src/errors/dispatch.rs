// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

use crate::engine::Action;
use crate::errors::ProviderError;

/// An action that failed against one host.
#[derive(Debug, Error)]
#[error("error running {action} on '{host}': {source}")]
pub struct ActionError {
    pub action: Action,
    pub host: String,
    #[source]
    pub source: ProviderError,
}

/// Every per-host failure of one dispatched action, in no particular order.
///
/// Displays as the member errors joined by newlines.
#[derive(Debug, Default)]
pub struct ActionErrors(pub Vec<ActionError>);

impl ActionErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, error: ActionError) {
        self.0.push(error);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing failed, otherwise the aggregate as an error.
    pub fn into_result(self) -> Result<(), ActionErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ActionErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ActionErrors {}
