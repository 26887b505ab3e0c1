//! Deep merge functionality for YAML configurations.
//!
//! Implements key-by-key merging where later layers override earlier ones.
//! Sequences and scalars are replaced entirely, never concatenated.

use super::loader::{DEFAULTS_KEY, MultiEnvConfig};
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};

/// Deep merge two values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Everything else in overlay (arrays, strings, numbers, booleans, nulls)
///   replaces the base value, even when the types differ
///
/// # Example
/// ```
/// use serde_json::json;
/// use envstack::config::deep_merge;
///
/// let base = json!({
///     "db": { "host": "localhost", "port": 5432 },
///     "features": ["a", "b"]
/// });
/// let overlay = json!({
///     "db": { "host": "db.internal" },
///     "features": ["c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(
///     result,
///     json!({ "db": { "host": "db.internal", "port": 5432 }, "features": ["c"] })
/// );
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(merge_maps(base_map, overlay_map))
        }
        (_, overlay) => overlay,
    }
}

/// Merge two mappings key by key, recursing where both sides hold a mapping.
pub fn merge_maps(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_value) in overlay {
        match base.get_mut(&key) {
            // Merged in place so the key keeps its original position
            Some(slot) => {
                let base_value = std::mem::take(slot);
                *slot = deep_merge(base_value, overlay_value);
            }
            None => {
                base.insert(key, overlay_value);
            }
        }
    }
    base
}

/// Merge multiple mappings in order, with later mappings taking precedence.
///
/// Equivalent to folding `merge_maps` over the list, starting from an empty mapping.
pub fn deep_merge_all(maps: impl IntoIterator<Item = Map<String, Value>>) -> Map<String, Value> {
    maps.into_iter().fold(Map::new(), merge_maps)
}

/// Build one file's view of `env`: its `DEFAULTS` section with the environment
/// section merged on top.
///
/// A missing or null section counts as empty. Any other non-mapping section is rejected.
pub fn layer_defaults(config: &MultiEnvConfig, env: &str) -> ConfigResult<Map<String, Value>> {
    let defaults = section_map(config, DEFAULTS_KEY)?;
    let environment = section_map(config, env)?;
    Ok(merge_maps(defaults, environment))
}

fn section_map(config: &MultiEnvConfig, name: &str) -> ConfigResult<Map<String, Value>> {
    match config.section(name) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(ConfigError::InvalidSection {
            file: config.file().to_string(),
            section: name.to_string(),
            found: value_kind(other),
        }),
    }
}

/// Human-readable name of a value's variant, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
