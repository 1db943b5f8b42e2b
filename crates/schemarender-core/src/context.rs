//! Render context: the variables visible to templates
//!
//! A context is assembled once from variable files and `--set` overrides,
//! then lent read-only to every render pass.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Variable bindings available to the template engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderContext(JsonMap<String, JsonValue>);

impl RenderContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Load variables from a YAML (or JSON) file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse variables from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse variables from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a context from a JSON value; the root must be a mapping (or null)
    pub fn from_value(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            JsonValue::Null => Ok(Self::new()),
            other => Err(CoreError::InvalidContext {
                message: format!("expected a mapping of variables, got {}", json_kind(&other)),
            }),
        }
    }

    /// Deep merge another context into this one
    ///
    /// Mappings merge recursively; any other value in `overlay` replaces the
    /// base value, sequences included.
    pub fn merge(&mut self, overlay: &RenderContext) {
        for (key, overlay_value) in &overlay.0 {
            match self.0.get_mut(key) {
                Some(base_value) => deep_merge(base_value, overlay_value),
                None => {
                    self.0.insert(key.clone(), overlay_value.clone());
                }
            }
        }
    }

    /// Merge multiple contexts in order, later ones winning
    pub fn merge_all(contexts: Vec<RenderContext>) -> Self {
        let mut result = RenderContext::new();
        for ctx in contexts {
            result.merge(&ctx);
        }
        result
    }

    /// Set a variable by dotted path (e.g., "target.schema")
    pub fn set(&mut self, path: &str, value: JsonValue) {
        let parts: Vec<&str> = path.split('.').collect();
        set_nested(&mut self.0, &parts, value);
    }

    /// Get a variable by dotted path
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        let mut parts = path.split('.');
        let first = self.0.get(parts.next()?)?;
        parts.try_fold(first, |value, key| value.get(key))
    }

    /// Top-level variable names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn vars(&self) -> &JsonMap<String, JsonValue> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn deep_merge(base: &mut JsonValue, overlay: &JsonValue) {
    match (base, overlay) {
        (JsonValue::Object(base_map), JsonValue::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

fn set_nested(map: &mut JsonMap<String, JsonValue>, path: &[&str], new_value: JsonValue) {
    let Some((key, remaining)) = path.split_first() else {
        return;
    };

    if remaining.is_empty() {
        map.insert(key.to_string(), new_value);
        return;
    }

    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| JsonValue::Object(JsonMap::new()));

    // Overriding a scalar with a nested path replaces it with a mapping
    if !entry.is_object() {
        *entry = JsonValue::Object(JsonMap::new());
    }

    if let JsonValue::Object(inner) = entry {
        set_nested(inner, remaining, new_value);
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a sequence",
        JsonValue::Object(_) => "a mapping",
    }
}

/// Parse --set arguments (key=value format)
pub fn parse_set_values(set_args: &[String]) -> Result<RenderContext> {
    let mut context = RenderContext::new();

    for arg in set_args {
        let (key, val) = arg.split_once('=').ok_or_else(|| CoreError::InvalidSet {
            message: format!("'{}'. Expected key=value", arg),
        })?;

        if key.is_empty() || key.split('.').any(str::is_empty) {
            return Err(CoreError::InvalidSet {
                message: format!("'{}' has an empty key segment", arg),
            });
        }

        context.set(key, infer_value(val));
    }

    Ok(context)
}

/// Infer a typed value from a --set right-hand side, falling back to a string
fn infer_value(val: &str) -> JsonValue {
    match val {
        "true" => JsonValue::Bool(true),
        "false" => JsonValue::Bool(false),
        "null" => JsonValue::Null,
        _ => {
            if let Ok(num) = val.parse::<i64>() {
                JsonValue::Number(num.into())
            } else if let Some(num) = val
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
            {
                JsonValue::Number(num)
            } else if val.starts_with('[') || val.starts_with('{') {
                serde_json::from_str(val).unwrap_or_else(|_| JsonValue::String(val.to_string()))
            } else {
                JsonValue::String(val.to_string())
            }
        }
    }
}
