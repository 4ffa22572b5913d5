//! `retain-gen`: runs the `@Retain` processor over a symbol snapshot.

use clap::{ColorChoice, Parser};
use retain_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{generate_options, run_classify, run_generate};
use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();

    // Options are resolved first: `retain.debugLogging` feeds the log level.
    let options = match &cli.command {
        Command::Generate(args) => match generate_options(args) {
            Ok(options) => Some(options),
            Err(error) => {
                eprintln!("error: {error:#}");
                std::process::exit(1);
            }
        },
        Command::Classify(_) => None,
    };
    let debug_logging = options.as_ref().is_some_and(|options| options.debug_logging);
    let log_config = log_config_from_cli(&cli, debug_logging);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match (&cli.command, options) {
        (Command::Generate(args), Some(options)) => match run_generate(args, options) {
            Ok(result) => {
                print_summary(&result);
                if result.has_errors() { 1 } else { 0 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        (Command::Classify(args), _) => match run_classify(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        (Command::Generate(_), None) => 1,
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli, debug_logging: bool) -> LogConfig {
    let explicit = cli.verbosity.is_present() || cli.log_level.is_some();
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !explicit,
        ..LogConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    if debug_logging && !explicit {
        config = config.with_debug_floor();
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
