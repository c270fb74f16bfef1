//! Keyword argument binding and coercion.
//!
//! The host engine passes loosely-typed values: booleans arrive as `"False"`,
//! timeouts as `"5"`, dictionaries as JSON objects. Binding checks them
//! against the keyword's signature; the typed getters convert each value
//! once, at this boundary, and fail with `InvalidArgument` on anything they
//! cannot interpret.

use super::keywords::KeywordSpec;
use crate::auth::BasicAuth;
use crate::config::MAX_TIMEOUT_SECS;
use crate::error::{KeywordError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Positional and named arguments of one keyword invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordArgs {
    pub positional: Vec<Value>,
    pub named: Map<String, Value>,
}

impl KeywordArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a named argument.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    /// Matches the arguments to `spec`'s parameters.
    pub(crate) fn bind(&self, spec: &KeywordSpec) -> Result<BoundArgs> {
        let params: Vec<(&'static str, bool)> = spec
            .args
            .iter()
            .map(|&arg| match arg.split_once('=') {
                Some((name, _)) => (name, false),
                None => (arg, true),
            })
            .collect();

        if self.positional.len() > params.len() {
            return Err(KeywordError::invalid_argument(
                spec.name,
                format!(
                    "expected at most {} arguments, got {}",
                    params.len(),
                    self.positional.len()
                ),
            ));
        }

        let mut values: HashMap<&'static str, Value> = HashMap::new();
        for (&(name, _), value) in params.iter().zip(&self.positional) {
            values.insert(name, value.clone());
        }

        for (name, value) in &self.named {
            let param = params
                .iter()
                .find(|(p, _)| *p == name.as_str())
                .map(|&(p, _)| p)
                .ok_or_else(|| KeywordError::invalid_argument(name, "unexpected argument"))?;
            if values.insert(param, value.clone()).is_some() {
                return Err(KeywordError::invalid_argument(name, "got multiple values"));
            }
        }

        for &(name, required) in &params {
            if required && !values.contains_key(name) {
                return Err(KeywordError::invalid_argument(name, "missing value"));
            }
        }

        Ok(BoundArgs { values })
    }
}

/// Arguments matched to parameter names.
#[derive(Debug)]
pub(crate) struct BoundArgs {
    values: HashMap<&'static str, Value>,
}

impl BoundArgs {
    fn present(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    /// A required text argument; numbers are accepted and rendered.
    pub fn string(&self, name: &str) -> Result<String> {
        self.opt_string(name)?
            .ok_or_else(|| KeywordError::invalid_argument(name, "missing value"))
    }

    pub fn opt_string(&self, name: &str) -> Result<Option<String>> {
        match self.present(name) {
            None => Ok(None),
            Some(value) => scalar_to_string(value)
                .map(Some)
                .ok_or_else(|| KeywordError::invalid_argument(name, "expected text")),
        }
    }

    /// A body argument. Only strings qualify; other values are a caller error.
    pub fn text(&self, name: &str) -> Result<Option<String>> {
        match self.present(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(KeywordError::invalid_argument(name, "must be text")),
        }
    }

    /// A dictionary argument as ordered pairs. Accepts an object or a list of
    /// two-element lists.
    pub fn pairs(&self, name: &str) -> Result<Vec<(String, String)>> {
        let invalid = || KeywordError::invalid_argument(name, "expected a dictionary of text values");
        match self.present(name) {
            None => Ok(Vec::new()),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| scalar_to_string(v).map(|v| (k.clone(), v)).ok_or_else(invalid))
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item.as_array().map(Vec::as_slice) {
                    Some([k, v]) => match (scalar_to_string(k), scalar_to_string(v)) {
                        (Some(k), Some(v)) => Ok((k, v)),
                        _ => Err(invalid()),
                    },
                    _ => Err(invalid()),
                })
                .collect(),
            Some(_) => Err(invalid()),
        }
    }

    /// A boolean-like argument, see [`parse_bool`].
    pub fn flag(&self, name: &str, default: bool) -> Result<bool> {
        match self.present(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => parse_bool(name, s),
            Some(Value::Number(n)) => match n.as_u64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(KeywordError::invalid_argument(name, format!("'{}' is not a boolean", n))),
            },
            Some(_) => Err(KeywordError::invalid_argument(name, "expected a boolean")),
        }
    }

    /// A timeout in whole seconds.
    pub fn timeout(&self, name: &str) -> Result<Option<Duration>> {
        let seconds = match self.present(name) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            Some(_) => None,
        };
        match seconds {
            Some(secs) if secs > 0 && secs <= MAX_TIMEOUT_SECS => {
                Ok(Some(Duration::from_secs(secs)))
            }
            _ => Err(KeywordError::invalid_argument(
                name,
                format!("expected between 1 and {} seconds", MAX_TIMEOUT_SECS),
            )),
        }
    }

    /// Basic auth as a `[username, password]` list.
    pub fn auth(&self, name: &str) -> Result<Option<BasicAuth>> {
        match self.present(name) {
            None => Ok(None),
            Some(Value::Array(items)) => match items.as_slice() {
                [Value::String(user), Value::String(pass)] => Ok(Some(BasicAuth::new(user, pass))),
                _ => Err(KeywordError::invalid_argument(name, "expected [username, password]")),
            },
            Some(_) => Err(KeywordError::invalid_argument(name, "expected [username, password]")),
        }
    }

    /// File triples `(field, path, mime)`. Each entry is a three-element list
    /// or an object as produced by `Convert To Multipart Encoded Files`.
    pub fn file_triples(&self, name: &str) -> Result<Vec<(String, String, String)>> {
        let invalid = || KeywordError::invalid_argument(name, "expected a list of [field, path, mime type]");
        let items = match self.present(name) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(invalid()),
        };

        items
            .iter()
            .map(|item| match item {
                Value::Array(parts) => match parts.as_slice() {
                    [Value::String(f), Value::String(p), Value::String(m)] => {
                        Ok((f.clone(), p.clone(), m.clone()))
                    }
                    _ => Err(invalid()),
                },
                Value::Object(obj) => {
                    let field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
                    match (field("fieldName"), field("path"), field("mimeType")) {
                        (Some(f), Some(p), Some(m)) => Ok((f, p, m)),
                        _ => Err(invalid()),
                    }
                }
                _ => Err(invalid()),
            })
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses a boolean-like keyword argument.
///
/// Accepts `true/yes/on/1` and `false/no/off/0/none`, ignoring case and
/// surrounding whitespace. Anything else is rejected rather than guessed.
pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "none" => Ok(false),
        other => Err(KeywordError::invalid_argument(
            name,
            format!("'{}' is not a boolean", other),
        )),
    }
}
