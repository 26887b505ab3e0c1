//! Structured error types for configuration resolution.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Setup errors (raised while constructing a resolver)
    ConflictingOptions,
    InvalidOptions,
    MissingRequiredFile,
    LocalFileTracked,
    SuggestedFileMissing,

    // Load errors
    InvalidConfigFormat,
    UnknownEnvironment,
    UndeterminedEnvironment,
    ParseError,
    IoError,

    // Lookup errors
    MissingKey,
}

/// Errors raised while validating, loading or reading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("symbol_keys and indifferent_keys options cannot be used together")]
    ConflictingOptions,

    #[error("Invalid options file {path:?}: {message}")]
    InvalidOptions { path: PathBuf, message: String },

    #[error("Required config file {file:?} does not exist under {path:?}")]
    MissingRequiredFile { file: String, path: PathBuf },

    #[error(
        "Local config file {path:?} exists in the git repo! \
         Remove this file from your git repo and add it to your .gitignore"
    )]
    LocalFileTracked { path: PathBuf },

    /// Non-fatal: collected as a warning, never returned from a fallible call.
    #[error("Config file {file:?} does not exist")]
    SuggestedFileMissing { file: String, path: PathBuf },

    #[error("Config file {file:?} must contain a YAML mapping, but it contains {found}")]
    InvalidConfigFormat { file: String, found: &'static str },

    #[error("Section {section:?} of config file {file:?} must be a YAML mapping, but it is {found}")]
    InvalidSection {
        file: String,
        section: String,
        found: &'static str,
    },

    #[error("Value at {path:?} in config file {file:?} is {found}, which cannot be represented")]
    UnsupportedValue {
        file: String,
        path: String,
        found: String,
    },

    #[error(
        "{env:?} is not a valid environment! None of the loaded configs had a top-level \
         {env:?} key. All configurations should be nested under top level keys \
         corresponding to environment names (e.g. 'test', 'development', ...)"
    )]
    UnknownEnvironment { env: String },

    #[error(
        "Configuration environment couldn't be determined: {var} is not set! \
         Try running with `{var}=yourenvname ...`"
    )]
    UndeterminedEnvironment { var: String },

    #[error("Failed to parse config file {file:?}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key {path:?} not found in config")]
    MissingKey { path: String },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::ConflictingOptions => ErrorCode::ConflictingOptions,
            ConfigError::InvalidOptions { .. } => ErrorCode::InvalidOptions,
            ConfigError::MissingRequiredFile { .. } => ErrorCode::MissingRequiredFile,
            ConfigError::LocalFileTracked { .. } => ErrorCode::LocalFileTracked,
            ConfigError::SuggestedFileMissing { .. } => ErrorCode::SuggestedFileMissing,
            ConfigError::InvalidConfigFormat { .. }
            | ConfigError::InvalidSection { .. }
            | ConfigError::UnsupportedValue { .. } => ErrorCode::InvalidConfigFormat,
            ConfigError::UnknownEnvironment { .. } => ErrorCode::UnknownEnvironment,
            ConfigError::UndeterminedEnvironment { .. } => ErrorCode::UndeterminedEnvironment,
            ConfigError::Parse { .. } => ErrorCode::ParseError,
            ConfigError::Io { .. } => ErrorCode::IoError,
            ConfigError::MissingKey { .. } => ErrorCode::MissingKey,
        }
    }

    /// Whether this error was raised by setup-time validation rather than `load()`.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConflictingOptions
                | ConfigError::InvalidOptions { .. }
                | ConfigError::MissingRequiredFile { .. }
                | ConfigError::LocalFileTracked { .. }
        )
    }
}

/// Serializable error summary for machine-readable output.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&ConfigError> for ErrorReport {
    fn from(err: &ConfigError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
