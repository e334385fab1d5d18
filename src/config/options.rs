// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Decoding of section bodies from a string-keyed option map.
//!
//! Sections are written as flat YAML mappings. Scalars (numbers, booleans)
//! are read as their text form so `instances: 2` and `instances: "2"` mean
//! the same thing. List options take either a YAML sequence or a string
//! holding one (`"[a, b]"`).

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::collections::HashMap;

/// A section body: option name to raw YAML value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct OptionsMap(HashMap<String, Value>);

impl OptionsMap {
    /// Decode a possibly empty (`swarm:` with no body) section.
    pub fn deserialize_section<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<OptionsMap>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn string(&self, key: &str) -> Result<Option<String>, String> {
        self.0
            .get(key)
            .map(|value| scalar_string(value).map_err(|e| invalid(key, e)))
            .transpose()
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>, String> {
        self.0
            .get(key)
            .map(|value| {
                let text = scalar_string(value).map_err(|e| invalid(key, e))?;
                parse_bool(&text).ok_or_else(|| invalid(key, format!("'{}' is not a boolean", text)))
            })
            .transpose()
    }

    pub fn list(&self, key: &str) -> Result<Option<Vec<String>>, String> {
        self.0
            .get(key)
            .map(|value| string_list(value).map_err(|e| invalid(key, e)))
            .transpose()
    }
}

fn invalid(key: &str, reason: String) -> String {
    format!("invalid value for '{}': {}", key, reason)
}

/// Text form of a YAML scalar; null reads as the empty string.
pub fn scalar_string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err("expected a scalar value".to_string()),
    }
}

/// Parse a list option from a YAML sequence or from a string holding one.
pub fn parse_string_list(s: &str) -> Result<Vec<String>, String> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Option<Vec<Value>> = serde_yaml::from_str(s).map_err(|e| e.to_string())?;
    items
        .unwrap_or_default()
        .iter()
        .map(scalar_string)
        .collect()
}

fn string_list(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Sequence(items) => items.iter().map(scalar_string).collect(),
        Value::String(s) => parse_string_list(s),
        Value::Null => Ok(Vec::new()),
        _ => Err("expected a list".to_string()),
    }
}

/// Accepts `1`/`0`, `t`/`f` and `true`/`false` in lower, upper or title case.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Overlay `src` onto `dst` when it is present.
pub(crate) fn overlay<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() {
        *dst = src;
    }
}

/// Merge an optional section: present in both is merged with `merge`,
/// present only in `src` is taken as is.
pub(crate) fn merge_section<T>(dst: &mut Option<T>, src: Option<T>, merge: impl FnOnce(&mut T, T)) {
    let Some(other) = src else {
        return;
    };
    *dst = Some(match dst.take() {
        Some(mut current) => {
            merge(&mut current, other);
            current
        }
        None => other,
    });
}

/// Deserialize a section that counts as present even with an empty body.
///
/// Plain `Option<T>` reads `swarm:` (a YAML null) as absent; use with
/// `#[serde(default)]` so only a missing key is `None`.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Deserialize a mapping of scalars (e.g. `vars`) into strings.
pub(crate) fn deserialize_scalar_map<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|(k, v)| {
            scalar_string(&v)
                .map(|s| (k.clone(), s))
                .map_err(|e| serde::de::Error::custom(invalid(&k, e)))
        })
        .collect()
}

/// Deserialize an optional scalar (e.g. `instances`) into a string.
pub(crate) fn deserialize_scalar_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => scalar_string(&value).map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(yaml: &str) -> OptionsMap {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_parse_bool_spellings() {
        let test_cases = vec![
            ("true", Some(true)),
            ("True", Some(true)),
            ("1", Some(true)),
            ("t", Some(true)),
            ("false", Some(false)),
            ("FALSE", Some(false)),
            ("0", Some(false)),
            ("yes", None),
            ("", None),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse_bool(input), expected, "parse_bool({:?})", input);
        }
    }

    #[test]
    fn test_scalars_read_as_text() {
        let opts = options("count: 3\nenabled: true\nname: tiny\nempty:\n");
        assert_eq!(opts.string("count").unwrap().as_deref(), Some("3"));
        assert_eq!(opts.string("enabled").unwrap().as_deref(), Some("true"));
        assert_eq!(opts.string("name").unwrap().as_deref(), Some("tiny"));
        assert_eq!(opts.string("empty").unwrap().as_deref(), Some(""));
        assert_eq!(opts.string("absent").unwrap(), None);
    }

    #[test]
    fn test_bool_option() {
        let opts = options("a: true\nb: \"false\"\nc: maybe\n");
        assert_eq!(opts.bool("a").unwrap(), Some(true));
        assert_eq!(opts.bool("b").unwrap(), Some(false));
        assert_eq!(opts.bool("absent").unwrap(), None);

        let err = opts.bool("c").unwrap_err();
        assert!(err.contains("'c'"), "unexpected error: {}", err);
    }

    #[test]
    fn test_list_option_shapes() {
        let opts = options(
            r#"
sequence: [aaa, bbb]
flow_string: "[ccc, 4]"
block:
  - ddd
nested: [[x]]
"#,
        );
        assert_eq!(opts.list("sequence").unwrap(), Some(vec!["aaa".to_string(), "bbb".to_string()]));
        assert_eq!(opts.list("flow_string").unwrap(), Some(vec!["ccc".to_string(), "4".to_string()]));
        assert_eq!(opts.list("block").unwrap(), Some(vec!["ddd".to_string()]));
        assert!(opts.list("nested").is_err());
    }

    #[test]
    fn test_string_option_rejects_mapping() {
        let opts = options("nested:\n  a: b\n");
        assert!(opts.string("nested").is_err());
    }

    #[test]
    fn test_overlay_only_replaces_present_values() {
        let mut dst = Some("old".to_string());
        overlay(&mut dst, None);
        assert_eq!(dst.as_deref(), Some("old"));
        overlay(&mut dst, Some("new".to_string()));
        assert_eq!(dst.as_deref(), Some("new"));
    }
}
