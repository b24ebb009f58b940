//! Layered hierarchical configuration
//!
//! Configuration is stacked from up to three layers: common (shared by all
//! shops), shop-specific, and a local/dev override, in that precedence
//! order. Layers are JSON values; associative sub-maps merge recursively
//! while arrays and scalars from a higher layer replace the lower value
//! wholesale.

use serde_json::Value;
use tracing::debug;

/// Read-only view over merged configuration layers.
///
/// Built once (per process or per shop) and then only read; lookups use
/// dotted paths, e.g. `languages.default` or `router.routes_file`.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    merged: Value,
}

impl LayeredConfig {
    /// Empty configuration (lookups all miss).
    pub fn new() -> Self {
        Self {
            merged: Value::Object(serde_json::Map::new()),
        }
    }

    /// Stack layers lowest-precedence first.
    pub fn from_layers<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut config = Self::new();
        for layer in layers {
            config.push_layer(layer);
        }
        config
    }

    /// Merge one more layer on top of the current state.
    pub fn push_layer(&mut self, layer: Value) {
        merge_value(&mut self.merged, layer);
    }

    /// Dotted-path lookup; `None` when any path component is missing.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.merged;
        for key in path.split('.') {
            current = current.as_object()?.get(key)?;
        }
        Some(current)
    }

    /// String lookup with a default for missing or non-string values.
    pub fn get_str(&self, path: &str, default: &str) -> String {
        match self.get(path).and_then(Value::as_str) {
            Some(s) => s.to_string(),
            None => {
                debug!(path, default, "config lookup fell back to default");
                default.to_string()
            }
        }
    }

    pub fn get_i64(&self, path: &str, default: i64) -> i64 {
        self.get(path).and_then(Value::as_i64).unwrap_or(default)
    }

    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or(default)
    }

    /// The fully merged value (for deserializing whole sections).
    pub fn as_value(&self) -> &Value {
        &self.merged
    }
}

/// Recursive merge: objects merge key-wise, everything else replaces.
fn merge_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_entry) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_entry) => merge_value(base_entry, overlay_entry),
                    None => {
                        base_map.insert(key, overlay_entry);
                    }
                }
            }
        }
        (base_slot, overlay_value) => *base_slot = overlay_value,
    }
}
