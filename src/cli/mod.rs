//! CLI command definitions for envstack
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod get;
pub mod show;

use crate::config::ConfigOptions;
use crate::error::ConfigResult;
use clap::{Parser, Subcommand};
use get::GetArgs;
use show::ShowArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Resolve one merged configuration for the active environment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML file with resolution options (flags override its values)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Directory containing the config files
    #[arg(short, long, global = true, value_name = "DIR")]
    pub config_path: Option<PathBuf>,

    /// Config files to merge, in order (comma-separated)
    #[arg(long, global = true, value_name = "LIST", value_delimiter = ',')]
    pub files: Option<Vec<String>>,

    /// Files that must not be tracked by git (comma-separated)
    #[arg(long, global = true, value_name = "LIST", value_delimiter = ',')]
    pub local: Option<Vec<String>>,

    /// Files that must exist (comma-separated)
    #[arg(long, global = true, value_name = "LIST", value_delimiter = ',')]
    pub required: Option<Vec<String>>,

    /// Files that should exist (comma-separated)
    #[arg(long, global = true, value_name = "LIST", value_delimiter = ',')]
    pub suggested: Option<Vec<String>>,

    /// Variable that selects the environment
    #[arg(long, global = true, value_name = "NAME")]
    pub env_var: Option<String>,

    /// Environment to resolve (overrides the selector variable)
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Present keys as symbols (same spelling, symbol-form lookups)
    #[arg(long, global = true, conflicts_with = "indifferent_keys")]
    pub symbol_keys: bool,

    /// Accept keys in string or symbol form on lookup
    #[arg(long, global = true)]
    pub indifferent_keys: bool,

    /// Freeze the merged config
    #[arg(long, global = true)]
    pub read_only: bool,

    /// Suppress failure reporting and logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Exit with a distinct status when loading fails
    #[arg(long, global = true)]
    pub exit_on_error: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the merged config (default if no subcommand given)
    Show(ShowArgs),

    /// Validate the config files without printing the merged result
    Check,

    /// Print one value from the merged config
    Get(GetArgs),
}

impl Cli {
    /// Resolution options: the options file (or defaults) with flags applied on top.
    pub fn resolve_options(&self) -> ConfigResult<ConfigOptions> {
        let mut options = match &self.options {
            Some(path) => ConfigOptions::load(path)?,
            None => ConfigOptions::default(),
        };

        if let Some(path) = &self.config_path {
            options.config_path = path.clone();
        }
        if let Some(files) = &self.files {
            options.config_files = files.clone();
        }
        if let Some(files) = &self.local {
            options.local_config_files = files.clone();
        }
        if let Some(files) = &self.required {
            options.required_config_files = files.clone();
        }
        if let Some(files) = &self.suggested {
            options.suggested_config_files = files.clone();
        }
        if let Some(name) = &self.env_var {
            options.env_var_name = name.clone();
        }
        if let Some(env) = &self.env {
            options.env = Some(env.clone());
        }

        options.symbol_keys |= self.symbol_keys;
        options.indifferent_keys |= self.indifferent_keys;
        options.read_only |= self.read_only;
        options.quiet |= self.quiet;
        options.exit_on_error |= self.exit_on_error;

        Ok(options)
    }

    /// Level logged when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// `RUST_LOG` when set, otherwise the default level.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_log_level()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "envstack",
            "--config-path",
            "foobar",
            "--files",
            "config.yml,local.yml",
            "--required",
            "config.yml",
            "--env-var",
            "FOOBAR_ENV",
            "--indifferent-keys",
            "get",
            "db.adapter",
        ]);
        let options = cli.resolve_options().unwrap();
        assert_eq!(options.config_path, PathBuf::from("foobar"));
        assert_eq!(options.config_files, vec!["config.yml", "local.yml"]);
        assert_eq!(options.required_config_files, vec!["config.yml"]);
        assert_eq!(options.env_var_name, "FOOBAR_ENV");
        assert!(options.indifferent_keys);
        // Untouched lists keep their defaults
        assert_eq!(
            options.local_config_files,
            vec!["config.secret.yml", "config.local.yml"]
        );
        assert!(matches!(cli.command, Some(Command::Get(_))));
    }

    #[test]
    fn test_key_flags_conflict() {
        let result = Cli::try_parse_from(["envstack", "--symbol-keys", "--indifferent-keys"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["envstack", "-e", "test"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.resolve_options().unwrap().env.as_deref(), Some("test"));
    }

    #[test]
    fn test_log_filter_follows_verbose() {
        use tracing_subscriber::filter::LevelFilter;

        let quiet = Cli::parse_from(["envstack"]);
        let verbose = Cli::parse_from(["envstack", "-v", "check"]);
        assert_eq!(quiet.default_log_level(), "info");
        assert_eq!(verbose.default_log_level(), "debug");

        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(quiet.log_filter().max_level_hint(), Some(LevelFilter::INFO));
            assert_eq!(verbose.log_filter().max_level_hint(), Some(LevelFilter::DEBUG));
        }
    }
}
