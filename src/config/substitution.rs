// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `$(NAME)` token substitution over whole configuration trees.
//!
//! A token is `$(` followed by the shortest run of characters up to the next
//! `)` on the same line. [`replace_vars`] resolves the tokens of one string
//! against a variable map. [`Substitute`] is the visitor that walks an
//! arbitrary tree (records, sequences, mappings, optional and boxed values,
//! YAML values) and produces a deep copy with every string leaf rewritten.
//! Non-string leaves are copied unchanged and absent branches stay absent.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml::value::TaggedValue;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::errors::UnknownVariables;
use crate::observability::messages::config::SubstitutionIncomplete;
use crate::observability::messages::StructuredLog;

/// `$(NAME)`, non-greedy; `.` stops at a newline.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\((.*?)\)").expect("Invalid variable token pattern"));

/// Whether `s` contains at least one `$(...)` token.
pub fn has_vars(s: &str) -> bool {
    TOKEN_PATTERN.is_match(s)
}

/// Whether `s` contains the token `$(name)`.
pub fn has_var(s: &str, name: &str) -> bool {
    TOKEN_PATTERN
        .captures_iter(s)
        .any(|caps| &caps[1] == name)
}

/// Replace every `$(NAME)` in `s` with its value from `vars`.
///
/// Unknown names are left verbatim. If there were any, the error lists them
/// all and still carries the partially substituted string.
pub fn replace_vars(s: &str, vars: &HashMap<String, String>) -> Result<String, UnknownVariables> {
    let mut unknown = Vec::new();

    let replaced = TOKEN_PATTERN.replace_all(s, |caps: &Captures| match vars.get(&caps[1]) {
        Some(value) => value.clone(),
        None => {
            unknown.push(caps[1].to_string());
            caps[0].to_string()
        }
    });

    if unknown.is_empty() {
        Ok(replaced.into_owned())
    } else {
        Err(UnknownVariables {
            names: unknown,
            partial: replaced.into_owned(),
        })
    }
}

/// Deep copy of a configuration tree with every string leaf passed through a
/// rewrite function.
///
/// Inputs are trees: there is no cycle detection.
pub trait Substitute: Sized {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self;
}

/// Rewrite every string leaf of `obj` with `replacer`.
pub fn replace_all_string_func<T: Substitute>(obj: &T, replacer: &dyn Fn(&str) -> String) -> T {
    obj.substitute(replacer)
}

/// Best-effort variable substitution over a whole tree: a leaf with any
/// unknown token keeps its original text.
pub fn replace_all_string_map<T: Substitute>(obj: &T, vars: &HashMap<String, String>) -> T {
    obj.substitute(&|s: &str| match replace_vars(s, vars) {
        Ok(replaced) => replaced,
        Err(e) => {
            SubstitutionIncomplete {
                value: s,
                unknown: &e.names,
            }
            .log();
            s.to_string()
        }
    })
}

impl Substitute for String {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        replacer(self)
    }
}

impl<T: Substitute> Substitute for Option<T> {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        self.as_ref().map(|v| v.substitute(replacer))
    }
}

impl<T: Substitute> Substitute for Box<T> {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        Box::new(self.as_ref().substitute(replacer))
    }
}

impl<T: Substitute> Substitute for Vec<T> {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        self.iter().map(|v| v.substitute(replacer)).collect()
    }
}

// Mapping keys are identifiers, only values are rewritten.
impl<K: Clone + Eq + Hash, V: Substitute> Substitute for HashMap<K, V> {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        self.iter()
            .map(|(k, v)| (k.clone(), v.substitute(replacer)))
            .collect()
    }
}

impl<K: Clone + Ord, V: Substitute> Substitute for BTreeMap<K, V> {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        self.iter()
            .map(|(k, v)| (k.clone(), v.substitute(replacer)))
            .collect()
    }
}

impl Substitute for Value {
    fn substitute(&self, replacer: &dyn Fn(&str) -> String) -> Self {
        match self {
            Value::String(s) => Value::String(replacer(s)),
            Value::Sequence(items) => Value::Sequence(items.substitute(replacer)),
            Value::Mapping(map) => Value::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.substitute(replacer)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
                tag: tagged.tag.clone(),
                value: tagged.value.substitute(replacer),
            })),
            other => other.clone(),
        }
    }
}

macro_rules! copied_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Substitute for $ty {
                fn substitute(&self, _replacer: &dyn Fn(&str) -> String) -> Self {
                    *self
                }
            }
        )*
    };
}

copied_leaf!(bool, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
