//! Resolution options.

use crate::error::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default name of the environment selector variable.
pub const DEFAULT_ENV_VAR: &str = "APP_ENV";

/// How keys of the merged mapping are presented to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// Keys exactly as written in the files.
    #[default]
    Strings,
    /// Keys are symbols: same spelling, looked up in symbol form.
    Symbols,
    /// Lookups accept a key in string or symbol form.
    Indifferent,
}

/// Options controlling how a configuration is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigOptions {
    /// Directory the config files live under.
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Files to merge, in order. Later files override earlier ones.
    #[serde(default = "default_config_files")]
    pub config_files: Vec<String>,

    /// Files that must never be tracked by version control.
    #[serde(default = "default_local_config_files")]
    pub local_config_files: Vec<String>,

    /// Files that must exist.
    #[serde(default = "default_required_config_files")]
    pub required_config_files: Vec<String>,

    /// Files that should exist; a warning is emitted when absent.
    #[serde(default = "default_suggested_config_files")]
    pub suggested_config_files: Vec<String>,

    /// Variable that selects the active environment.
    #[serde(default = "default_env_var_name")]
    pub env_var_name: String,

    /// Explicit environment; takes precedence over the selector variable.
    #[serde(default)]
    pub env: Option<String>,

    #[serde(default)]
    pub symbol_keys: bool,

    #[serde(default)]
    pub indifferent_keys: bool,

    /// Freeze the merged config after loading.
    #[serde(default)]
    pub read_only: bool,

    /// Suppress failure reporting.
    #[serde(default)]
    pub quiet: bool,

    /// Terminate the process when loading fails.
    #[serde(default)]
    pub exit_on_error: bool,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            config_files: default_config_files(),
            local_config_files: default_local_config_files(),
            required_config_files: default_required_config_files(),
            suggested_config_files: default_suggested_config_files(),
            env_var_name: default_env_var_name(),
            env: None,
            symbol_keys: false,
            indifferent_keys: false,
            read_only: false,
            quiet: false,
            exit_on_error: false,
        }
    }
}

fn default_config_path() -> PathBuf {
    PathBuf::from("./config")
}

fn default_config_files() -> Vec<String> {
    strings(&["config.yml", "config.secret.yml", "config.local.yml"])
}

fn default_local_config_files() -> Vec<String> {
    strings(&["config.secret.yml", "config.local.yml"])
}

fn default_required_config_files() -> Vec<String> {
    strings(&["config.yml", "config.secret.yml"])
}

fn default_suggested_config_files() -> Vec<String> {
    strings(&["config.secret.yml"])
}

fn default_env_var_name() -> String {
    DEFAULT_ENV_VAR.to_string()
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl ConfigOptions {
    /// Load options from a YAML file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidOptions {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn with_config_files<S: Into<String>>(mut self, files: impl IntoIterator<Item = S>) -> Self {
        self.config_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_local_config_files<S: Into<String>>(
        mut self,
        files: impl IntoIterator<Item = S>,
    ) -> Self {
        self.local_config_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_required_config_files<S: Into<String>>(
        mut self,
        files: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required_config_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_suggested_config_files<S: Into<String>>(
        mut self,
        files: impl IntoIterator<Item = S>,
    ) -> Self {
        self.suggested_config_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env_var_name(mut self, name: impl Into<String>) -> Self {
        self.env_var_name = name.into();
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn with_symbol_keys(mut self, enabled: bool) -> Self {
        self.symbol_keys = enabled;
        self
    }

    pub fn with_indifferent_keys(mut self, enabled: bool) -> Self {
        self.indifferent_keys = enabled;
        self
    }

    pub fn with_read_only(mut self, enabled: bool) -> Self {
        self.read_only = enabled;
        self
    }

    pub fn with_quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    pub fn with_exit_on_error(mut self, enabled: bool) -> Self {
        self.exit_on_error = enabled;
        self
    }

    /// The key mode selected by the normalization flags.
    pub fn key_mode(&self) -> ConfigResult<KeyMode> {
        match (self.symbol_keys, self.indifferent_keys) {
            (true, true) => Err(ConfigError::ConflictingOptions),
            (true, false) => Ok(KeyMode::Symbols),
            (false, true) => Ok(KeyMode::Indifferent),
            (false, false) => Ok(KeyMode::Strings),
        }
    }

    /// Path of a config file relative to the working directory.
    pub fn relative_path(&self, file: &str) -> PathBuf {
        self.config_path.join(file)
    }

    /// Absolute path of a config file.
    pub fn full_path(&self, file: &str) -> PathBuf {
        let relative = self.relative_path(file);
        std::path::absolute(&relative).unwrap_or(relative)
    }
}
