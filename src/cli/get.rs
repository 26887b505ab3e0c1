//! Get subcommand for envstack CLI
//!
//! Prints a single value addressed by a dotted key path.

use super::show::OutputFormat;
use crate::config::MergedConfig;
use crate::error::ConfigResult;
use clap::Args;
use serde_json::Value;

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted key path, e.g. `db.host`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Output format for non-scalar values: yaml (default) or json
    #[arg(short, long, default_value = "yaml", value_name = "FORMAT")]
    pub format: OutputFormat,
}

impl GetArgs {
    /// Path segments; empty segments are ignored.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('.').filter(|s| !s.is_empty()).collect()
    }
}

/// Fetch the value at the requested path.
pub fn fetch(config: &MergedConfig, args: &GetArgs) -> ConfigResult<Value> {
    config.deep_fetch(&args.segments())
}

/// Strings print bare; everything else is rendered in the requested format.
pub fn render_value(value: &Value, format: OutputFormat) -> anyhow::Result<String> {
    match value {
        Value::String(s) => Ok(format!("{s}\n")),
        other => format.render(other),
    }
}
