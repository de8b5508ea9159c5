//! Variable bindings: the values a template is rendered against

use crate::template::error::TemplateError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// A bound value: either a plain string or a nested mapping
///
/// Nested mappings are addressed from templates with dotted paths
/// (`{$user.name}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    Nested(BTreeMap<String, Value>),
}

impl Value {
    /// Get the string if this is a scalar
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Nested(_) => None,
        }
    }

    /// Convert a JSON value
    ///
    /// Objects become nested mappings, arrays become mappings keyed by
    /// index, and other scalars are stringified (`null` is empty).
    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Scalar(String::new()),
            Json::Bool(b) => Value::Scalar(b.to_string()),
            Json::Number(n) => Value::Scalar(n.to_string()),
            Json::String(s) => Value::Scalar(s),
            Json::Array(items) => Value::Nested(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), Value::from_json(v)))
                    .collect(),
            ),
            Json::Object(map) => Value::Nested(
                map.into_iter()
                    .filter(|(k, _)| reachable_key(k))
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a TOML value, with the same rules as [`Value::from_json`]
    pub fn from_toml(toml: toml::Value) -> Self {
        use toml::Value as Toml;

        match toml {
            Toml::String(s) => Value::Scalar(s),
            Toml::Integer(i) => Value::Scalar(i.to_string()),
            Toml::Float(f) => Value::Scalar(f.to_string()),
            Toml::Boolean(b) => Value::Scalar(b.to_string()),
            Toml::Datetime(dt) => Value::Scalar(dt.to_string()),
            Toml::Array(items) => Value::Nested(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), Value::from_toml(v)))
                    .collect(),
            ),
            Toml::Table(table) => Value::Nested(
                table
                    .into_iter()
                    .filter(|(k, _)| reachable_key(k))
                    .map(|(k, v)| (k, Value::from_toml(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Nested(map)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Value {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Value::Nested(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), Value::from(v)))
                .collect(),
        )
    }
}

/// How an assignment combines with an existing binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignMode {
    /// `name`: replace
    Replace,
    /// `++name`: new value goes in front of the existing one
    Prepend,
    /// `name++`: new value goes after the existing one
    Append,
}

impl AssignMode {
    /// Split `++` decorations off a variable name
    pub fn parse(name: &str) -> (Self, &str) {
        if let Some(rest) = name.strip_prefix("++") {
            (AssignMode::Prepend, rest)
        } else if let Some(rest) = name.strip_suffix("++") {
            (AssignMode::Append, rest)
        } else {
            (AssignMode::Replace, name)
        }
    }
}

/// Characters allowed in a variable name segment
pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Nested keys must be a single identifier segment to be reachable from a
/// placeholder; others are dropped
fn reachable_key(key: &str) -> bool {
    let ok = !key.is_empty() && key.chars().all(is_identifier_char);
    if !ok {
        log::debug!("dropping unreachable binding key {:?}", key);
    }
    ok
}

/// Check a (possibly dotted) variable path
pub(crate) fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .split('.')
            .all(|segment| !segment.is_empty() && segment.chars().all(is_identifier_char))
}

/// Outcome of looking up a placeholder path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup<'a> {
    Scalar(&'a str),
    Nested,
    Unbound,
}

/// The variable bindings of one renderer
///
/// Backed by an ordered map so that the serialized form, and therefore the
/// [`fingerprint`](Bindings::fingerprint), is canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings {
    vars: BTreeMap<String, Value>,
}

impl Bindings {
    /// Create an empty binding set
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `name`
    ///
    /// `++name` prepends and `name++` appends to the existing string (unset
    /// counts as empty); any other name replaces. Dotted names write into
    /// nested mappings, creating them as needed.
    pub fn assign(&mut self, name: &str, value: impl Into<Value>) -> Result<(), TemplateError> {
        let (mode, path) = AssignMode::parse(name);
        if !is_valid_path(path) {
            return Err(TemplateError::InvalidName {
                name: name.to_string(),
            });
        }

        let value = value.into();
        let (parents, leaf) = match path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };

        let mut map = &mut self.vars;
        if let Some(parents) = parents {
            for segment in parents.split('.') {
                let slot = map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Nested(BTreeMap::new()));
                map = match slot {
                    Value::Nested(inner) => inner,
                    Value::Scalar(_) => {
                        return Err(TemplateError::PathConflict {
                            name: path.to_string(),
                            segment: segment.to_string(),
                        })
                    }
                };
            }
        }

        let combined = match mode {
            AssignMode::Replace => value,
            AssignMode::Prepend | AssignMode::Append => {
                let not_scalar = || TemplateError::NotAScalar {
                    name: path.to_string(),
                };
                let existing = match map.get(leaf) {
                    None => "",
                    Some(v) => v.as_scalar().ok_or_else(not_scalar)?,
                };
                let added = value.as_scalar().ok_or_else(not_scalar)?;
                if mode == AssignMode::Prepend {
                    Value::Scalar(format!("{}{}", added, existing))
                } else {
                    Value::Scalar(format!("{}{}", existing, added))
                }
            }
        };

        map.insert(leaf.to_string(), combined);
        Ok(())
    }

    /// Get the value bound at a dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.vars.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Nested(map) => map.get(segment)?,
                Value::Scalar(_) => return None,
            };
        }
        Some(current)
    }

    /// Resolve a placeholder path
    ///
    /// A scalar reached before the path is exhausted satisfies the
    /// placeholder (`{$title.upper}` prints `title`).
    pub(crate) fn lookup(&self, path: &str) -> Lookup<'_> {
        let mut map = &self.vars;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            match map.get(segment) {
                None => return Lookup::Unbound,
                Some(Value::Scalar(s)) => return Lookup::Scalar(s),
                Some(Value::Nested(inner)) => {
                    if segments.peek().is_none() {
                        return Lookup::Nested;
                    }
                    map = inner;
                }
            }
        }

        Lookup::Unbound
    }

    /// Remove every binding
    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Iterate top-level bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// SHA-256 over the canonical JSON encoding of the bindings
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        // BTreeMap<String, Value> serialization cannot fail
        let canonical = serde_json::to_vec(&self.vars).unwrap_or_default();
        hasher.update(&canonical);
        format!("{:x}", hasher.finalize())
    }
}
