// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// One or more `$(NAME)` tokens could not be resolved.
///
/// The partially substituted text is carried along so callers doing
/// best-effort substitution can still use it: every known token has been
/// replaced and every unknown one is left verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variable(s): {}", .names.join(", "))]
pub struct UnknownVariables {
    /// Unresolved names, in order of appearance.
    pub names: Vec<String>,
    /// The input with all known tokens replaced.
    pub partial: String,
}

/// Errors raised while loading, merging and resolving environment documents.
///
/// All of these are fatal: they abort before any host is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A document on disk is not valid YAML, or violates a section rule
    /// (e.g. more than one provider inside a `driver` block).
    #[error("parse error when reading {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An in-memory document could not be decoded.
    #[error("could not parse document: {0}")]
    Document(#[from] serde_yaml::Error),

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no configuration files found in {}", .0.display())]
    NoConfigFiles(PathBuf),

    /// A document explicitly requested on the command line does not exist.
    #[error("no configuration file for '{name}' found in {}", .dir.display())]
    MissingConfigFile { name: String, dir: PathBuf },

    /// A `NAME=VALUE` override without the `=`.
    #[error("could not parse variable definition '{0}'")]
    InvalidVarDefinition(String),

    /// The instance count still contains `$(NAME)` tokens after substitution.
    #[error("undefined variable(s) in the instances number, '{0}'")]
    UndefinedInstanceVars(String),

    #[error("cannot parse the number of instances from '{0}'")]
    InvalidInstances(String),

    #[error("could not replace the $(#) variable in '{name}': {source}")]
    IndexSubstitution {
        name: String,
        #[source]
        source: UnknownVariables,
    },

    /// Two machines resolved to the same name during instance expansion.
    #[error("machine name '{0}' is defined more than once after expansion")]
    DuplicateMachine(String),
}
