//! Failure reporting and the exit-on-error policy.
//!
//! Sits outside the resolution pipeline: the pipeline only returns errors, and
//! this layer decides whether to log them and whether the process should end.

use crate::config::{ConfigResolver, MergedConfig};
use crate::error::{ConfigError, ConfigResult};
use thiserror::Error;
use tracing::error;

/// Exit status used when loading fails and `exit_on_error` is set (EX_CONFIG).
pub const EXIT_CONFIG_ERROR: i32 = 78;

/// How load failures are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportPolicy {
    /// Do not log failures.
    pub quiet: bool,
    /// Terminate the process after reporting.
    pub exit_on_error: bool,
}

impl ReportPolicy {
    pub fn from_resolver(resolver: &ConfigResolver) -> Self {
        let options = resolver.options();
        Self {
            quiet: options.quiet,
            exit_on_error: options.exit_on_error,
        }
    }
}

/// Banner lines describing a failed load.
pub fn failure_banner(env: Option<&str>, err: &ConfigError) -> Vec<String> {
    let header = match env {
        Some(env) => format!("!!! Couldn't load config for {env:?} environment! !!!"),
        None => "!!! Couldn't load config! !!!".to_string(),
    };
    let rule = "!".repeat(header.len());
    vec![
        rule.clone(),
        header,
        rule.clone(),
        String::new(),
        err.to_string(),
        String::new(),
        rule,
    ]
}

/// Log a failure unless quiet. Exits the process if the policy says so.
pub fn report_failure(policy: ReportPolicy, env: Option<&str>, err: &ConfigError) {
    if !policy.quiet {
        for line in failure_banner(env, err) {
            error!("{}", line);
        }
    }
    if policy.exit_on_error {
        if !policy.quiet {
            error!("Aborting because exit_on_error is set");
        }
        std::process::exit(EXIT_CONFIG_ERROR);
    }
}

/// Load with the resolver's own reporting policy applied.
pub fn load_with_policy(resolver: &ConfigResolver) -> ConfigResult<MergedConfig> {
    resolver.load().inspect_err(|err| {
        report_failure(
            ReportPolicy::from_resolver(resolver),
            resolver.environment().ok(),
            err,
        );
    })
}

/// A failure that has already been reported under its policy.
///
/// Lets the binary exit non-zero without printing the error a second time.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Reported(#[from] pub ConfigError);

/// Report `err` under `policy` and mark it as reported.
pub fn reported(policy: ReportPolicy, env: Option<&str>, err: ConfigError) -> Reported {
    report_failure(policy, env, &err);
    Reported(err)
}

/// Like [`load_with_policy`], marking a failure as already reported.
pub fn load_reported(resolver: &ConfigResolver) -> Result<MergedConfig, Reported> {
    load_with_policy(resolver).map_err(Reported)
}

/// Whether `err` still needs to be printed before the process exits.
pub fn needs_printing(err: &anyhow::Error) -> bool {
    !err.is::<Reported>()
}
