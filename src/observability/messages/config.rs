// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for environment document loading and resolution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// An environment document was parsed and merged.
///
/// # Log Level
/// `debug!`
pub struct DocumentLoaded<'a> {
    pub path: &'a Path,
}

impl Display for DocumentLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Loaded environment document {}", self.path.display())
    }
}

impl StructuredLog for DocumentLoaded<'_> {
    fn log(&self) {
        tracing::debug!(path = %self.path.display(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("document", span_name = name, path = %self.path.display())
    }
}

/// A `NAME=VALUE` override was applied on top of the documents.
///
/// # Log Level
/// `debug!`
pub struct VariableOverridden<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl Display for VariableOverridden<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Variable '{}' set to '{}' from the command line", self.name, self.value)
    }
}

impl StructuredLog for VariableOverridden<'_> {
    fn log(&self) {
        tracing::debug!(variable = self.name, value = self.value, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("variable", span_name = name, variable = self.name)
    }
}

/// A string leaf kept its original text because some tokens were unknown.
///
/// # Log Level
/// `debug!` - Unknown names are only fatal where a value must resolve
pub struct SubstitutionIncomplete<'a> {
    pub value: &'a str,
    pub unknown: &'a [String],
}

impl Display for SubstitutionIncomplete<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Keeping '{}' unsubstituted: unknown variable(s) {}",
            self.value,
            self.unknown.join(", ")
        )
    }
}

impl StructuredLog for SubstitutionIncomplete<'_> {
    fn log(&self) {
        tracing::debug!(value = self.value, unknown = ?self.unknown, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("substitution", span_name = name, value = self.value)
    }
}

/// A machine was replicated into several instances.
///
/// # Log Level
/// `debug!`
pub struct MachineExpanded<'a> {
    pub name: &'a str,
    pub instances: usize,
}

impl Display for MachineExpanded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Machine '{}' expanded into {} instances", self.name, self.instances)
    }
}

impl StructuredLog for MachineExpanded<'_> {
    fn log(&self) {
        tracing::debug!(machine = self.name, instances = self.instances, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("expansion", span_name = name, machine = self.name)
    }
}

/// A machine resolved to zero instances and was dropped.
///
/// # Log Level
/// `info!` - The operator may not expect the machine to vanish
pub struct MachineElided<'a> {
    pub name: &'a str,
}

impl Display for MachineElided<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Machine '{}' has 0 instances: skipped", self.name)
    }
}

impl StructuredLog for MachineElided<'_> {
    fn log(&self) {
        tracing::info!(machine = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("expansion", span_name = name, machine = self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_display() {
        let unknown = vec!["A".to_string(), "B".to_string()];
        let incomplete = SubstitutionIncomplete {
            value: "$(A)-$(B)",
            unknown: &unknown,
        };
        assert_eq!(
            incomplete.to_string(),
            "Keeping '$(A)-$(B)' unsubstituted: unknown variable(s) A, B"
        );

        let expanded = MachineExpanded {
            name: "worker",
            instances: 3,
        };
        assert_eq!(expanded.to_string(), "Machine 'worker' expanded into 3 instances");
    }
}
