//! Show subcommand for envstack CLI
//!
//! Prints the merged configuration.

use crate::config::MergedConfig;
use clap::Args;

/// Arguments for the show subcommand
#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Output format: yaml (default) or json
    #[arg(short, long, default_value = "yaml", value_name = "FORMAT")]
    pub format: OutputFormat,
}

/// Output format for printed values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid format '{}'. Valid options: yaml, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Render any serializable value in this format.
    pub fn render<T: serde::Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<String> {
        Ok(match self {
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Json => {
                let mut out = serde_json::to_string_pretty(value)?;
                out.push('\n');
                out
            }
        })
    }
}

/// Render the merged config for printing.
pub fn render_config(config: &MergedConfig, args: &ShowArgs) -> anyhow::Result<String> {
    args.format.render(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("yaml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("toml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_json() {
        let out = OutputFormat::Json.render(&json!({"env": "test"})).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"env": "test"}));
    }

    #[test]
    fn test_render_yaml() {
        let out = OutputFormat::Yaml.render(&json!({"env": "test"})).unwrap();
        assert_eq!(out.trim(), "env: test");
    }

    #[test]
    fn test_render_keeps_key_order() {
        let value = json!({"zeta": 1, "alpha": {"b": 2, "a": 3}});
        let out = OutputFormat::Yaml.render(&value).unwrap();
        assert_eq!(out.trim(), "zeta: 1\nalpha:\n  b: 2\n  a: 3");
    }
}
