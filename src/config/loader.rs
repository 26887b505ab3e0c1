//! Config file loading.
//!
//! Reads one YAML file into a [`MultiEnvConfig`]: a mapping from environment name
//! to that environment's settings, plus an optional [`DEFAULTS_KEY`] section.
//!
//! Anchors, aliases and `<<` merge keys are resolved while parsing. Scalar
//! mapping keys (numbers, booleans) become their text; values with no
//! counterpart in the config tree, such as `.inf` or `.nan`, are rejected.

use super::merge::value_kind;
use super::options::ConfigOptions;
use crate::error::{ConfigError, ConfigResult};
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;
use tracing::debug;

/// Reserved section merged beneath every environment of the same file.
pub const DEFAULTS_KEY: &str = "DEFAULTS";

/// The raw content of one config file, keyed by environment name.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiEnvConfig {
    file: String,
    sections: Map<String, Value>,
}

impl MultiEnvConfig {
    pub fn new(file: impl Into<String>, sections: Map<String, Value>) -> Self {
        Self {
            file: file.into(),
            sections,
        }
    }

    /// A file that contributes nothing.
    pub fn empty(file: impl Into<String>) -> Self {
        Self::new(file, Map::new())
    }

    /// Parse YAML text. Empty documents yield an empty config.
    pub fn parse(file: impl Into<String>, content: &str) -> ConfigResult<Self> {
        let file = file.into();
        if content.trim().is_empty() {
            return Ok(Self::empty(file));
        }

        let mut document: YamlValue = match serde_yaml::from_str(content) {
            Ok(document) => document,
            Err(source) => return Err(ConfigError::Parse { file, source }),
        };
        if let Err(source) = document.apply_merge() {
            return Err(ConfigError::Parse { file, source });
        }
        let value = to_json(&file, document, &mut Vec::new())?;

        match value {
            Value::Object(sections) => Ok(Self::new(file, sections)),
            // A document holding only comments parses as null
            Value::Null => Ok(Self::empty(file)),
            other => Err(ConfigError::InvalidConfigFormat {
                file,
                found: value_kind(&other),
            }),
        }
    }

    /// Name of the file this config was read from.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    /// Whether the file has its own section for `env` (DEFAULTS does not count).
    pub fn has_environment(&self, env: &str) -> bool {
        env != DEFAULTS_KEY && self.sections.contains_key(env)
    }

    /// Environment names declared in this file.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.sections
            .keys()
            .map(String::as_str)
            .filter(|name| *name != DEFAULTS_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Convert a parsed YAML document into the config tree. `path` tracks the keys
/// leading to `value` for error messages.
fn to_json(file: &str, value: YamlValue, path: &mut Vec<String>) -> ConfigResult<Value> {
    let unsupported = |path: &[String], found: String| ConfigError::UnsupportedValue {
        file: file.to_string(),
        path: path.join("."),
        found,
    };

    let value = match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => match json_number(&n) {
            Some(number) => Value::Number(number),
            None => return Err(unsupported(path, format!("the number {n}"))),
        },
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                path.push(index.to_string());
                out.push(to_json(file, item, path)?);
                path.pop();
            }
            Value::Array(out)
        }
        YamlValue::Mapping(mapping) => {
            let mut out = Map::new();
            for (key, item) in mapping {
                let Some(key) = key_text(&key) else {
                    return Err(unsupported(path, format!("a mapping with {} as a key", yaml_kind(&key))));
                };
                path.push(key.clone());
                let item = to_json(file, item, path)?;
                path.pop();
                out.insert(key, item);
            }
            Value::Object(out)
        }
        // Tags carry no meaning for config values
        YamlValue::Tagged(tagged) => to_json(file, tagged.value, path)?,
    };
    Ok(value)
}

fn json_number(n: &serde_yaml::Number) -> Option<Number> {
    if let Some(i) = n.as_i64() {
        Some(Number::from(i))
    } else if let Some(u) = n.as_u64() {
        Some(Number::from(u))
    } else {
        n.as_f64().and_then(Number::from_f64)
    }
}

fn key_text(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Tagged(tagged) => key_text(&tagged.value),
        YamlValue::Null | YamlValue::Sequence(_) | YamlValue::Mapping(_) => None,
    }
}

fn yaml_kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

/// Load a config file by name, resolved against the options' base directory.
///
/// A file that does not exist yields an empty config.
pub fn load_config_file(options: &ConfigOptions, file: &str) -> ConfigResult<MultiEnvConfig> {
    let full_path = options.full_path(file);
    if !full_path.exists() {
        debug!(file, path = %full_path.display(), "Config file absent, skipping");
        return Ok(MultiEnvConfig::empty(file));
    }

    let content = std::fs::read_to_string(&full_path).map_err(|source| ConfigError::Io {
        path: full_path.clone(),
        source,
    })?;
    let config = MultiEnvConfig::parse(file, &content)?;
    debug!(
        file,
        path = %full_path.display(),
        environments = ?config.environments().collect::<Vec<_>>(),
        "Loaded config file"
    );
    Ok(config)
}

/// Configured files that exist on disk, in declared order.
pub fn existing_config_files(options: &ConfigOptions) -> Vec<String> {
    options
        .config_files
        .iter()
        .filter(|file| options.full_path(file).exists())
        .cloned()
        .collect()
}
