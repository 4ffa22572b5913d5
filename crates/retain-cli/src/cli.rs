//! CLI argument definitions for `retain-gen`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "retain-gen",
    version,
    about = "Generate state saving glue for @Retain annotated properties",
    long_about = "Generate state saving glue for @Retain annotated properties.\n\n\
                  Reads a symbol snapshot exported by the build, runs the processor \
                  passes and writes the Kotlin sources of the state saver, its holders \
                  and the runtime base components."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the processor over a symbol snapshot and write the generated sources.
    Generate(GenerateArgs),

    /// Show how types map onto the persisted container.
    Classify(ClassifyArgs),
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// JSON symbol snapshot exported by the build.
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Output directory for generated sources (default: <SNAPSHOT dir>/generated).
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Config file (default: retain.toml next to the snapshot, when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Processor option in host form, e.g. -O retain.isDependency=true.
    #[arg(short = 'O', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Package of the generated saver and runtime components.
    #[arg(long = "package", value_name = "PACKAGE")]
    pub package: Option<String>,

    /// Library build: write a dependency marker instead of a saver.
    #[arg(long = "dependency")]
    pub dependency: bool,

    /// Do not emit the runtime base components.
    #[arg(long = "no-runtime")]
    pub no_runtime: bool,

    /// Run the passes and report without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write the planned artifacts and diagnostics as JSON.
    #[arg(long = "plan-json", value_name = "PATH")]
    pub plan_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// Types in Kotlin notation, e.g. "kotlin.collections.ArrayList<kotlin.String>".
    #[arg(value_name = "TYPE", required = true)]
    pub types: Vec<String>,

    /// Snapshot whose classes are added to the platform classes.
    #[arg(long = "snapshot", value_name = "PATH")]
    pub snapshot: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
