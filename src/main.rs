//! envstack
//!
//! Resolves one merged configuration for the active environment from layered
//! YAML files and prints it.

use anyhow::Result;
use clap::Parser;
use envstack::cli::get::{self, GetArgs};
use envstack::cli::show::{ShowArgs, render_config};
use envstack::cli::{Cli, Command};
use envstack::config::ConfigResolver;
use envstack::error::ErrorReport;
use envstack::report::{self, ReportPolicy};
use std::fs::OpenOptions;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

fn init_logging(cli: &Cli) -> Result<()> {
    if cli.quiet {
        return Ok(());
    }

    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(cli.log_filter())
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(cli.log_filter())
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(cli.log_filter())
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if report::needs_printing(&err) {
                eprintln!("Error: {err:?}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(&cli)?;

    let options = cli.resolve_options()?;
    let policy = ReportPolicy {
        quiet: options.quiet,
        exit_on_error: options.exit_on_error,
    };

    // Setup failures are reported under the same policy as load failures
    let resolver = ConfigResolver::new(options).map_err(|err| report::reported(policy, None, err))?;

    match cli.command {
        Some(Command::Check) => run_check(&resolver),
        Some(Command::Get(args)) => run_get(&resolver, &args),
        Some(Command::Show(args)) => run_show(&resolver, &args),
        None => run_show(&resolver, &ShowArgs::default()),
    }
}

fn run_show(resolver: &ConfigResolver, args: &ShowArgs) -> Result<()> {
    let config = report::load_reported(resolver)?;
    print!("{}", render_config(&config, args)?);
    Ok(())
}

fn run_get(resolver: &ConfigResolver, args: &GetArgs) -> Result<()> {
    let config = report::load_reported(resolver)?;
    let value = get::fetch(&config, args)?;
    print!("{}", get::render_value(&value, args.format)?);
    Ok(())
}

fn run_check(resolver: &ConfigResolver) -> Result<()> {
    for warning in resolver.warnings() {
        warn!("{}", warning);
    }

    let files = resolver.existing_files();
    match report::load_reported(resolver) {
        Ok(config) => {
            info!(files = ?files, env = config.environment(), "Config OK");
            println!(
                "OK: {} file(s) for {:?} environment",
                files.len(),
                config.environment()
            );
            Ok(())
        }
        Err(reported) => {
            println!("{}", serde_json::to_string(&ErrorReport::from(&reported.0))?);
            Err(reported.into())
        }
    }
}
