// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io;
use thiserror::Error;

use crate::errors::{ActionErrors, ProviderError};

/// Errors surfaced by the environment commands (`create`, `start`, ...).
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Aggregated per-host failures of a dispatched action.
    #[error("{0}")]
    Actions(#[from] ActionErrors),

    #[error("error attempting to create {name}: {source}")]
    Create {
        name: String,
        #[source]
        source: ProviderError,
    },

    #[error("error saving host to store: {0}")]
    Save(#[source] ProviderError),

    #[error("could not write output: {0}")]
    Output(#[from] io::Error),

    #[error("could not render configuration: {0}")]
    Render(#[from] serde_yaml::Error),
}
