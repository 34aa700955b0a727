//! jsv CLI entry point.
//!
//! Provides command-line tools for working with JSON Schemas:
//! - `jsv validate` - Validate JSON documents against a schema
//! - `jsv check` - Check schema files for errors and unknown keywords
//! - `jsv keywords` - List the supported keywords

mod commands;
mod output;

use std::io::stderr;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{run_check, run_keywords, run_validate, CheckArgs, KeywordsArgs, ValidateArgs};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// JSON Schema validation tools.
#[derive(Debug, Parser)]
#[command(name = "jsv")]
#[command(about = "Streaming JSON Schema validation tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate JSON documents against a schema
    Validate(ValidateArgs),
    /// Check schema files
    Check(CheckArgs),
    /// List supported keywords
    Keywords(KeywordsArgs),
}

impl ColorWhen {
    /// Force colors on or off; `Auto` leaves detection to owo-colors.
    fn apply(self) {
        match self {
            ColorWhen::Auto => owo_colors::unset_override(),
            ColorWhen::Always => owo_colors::set_override(true),
            ColorWhen::Never => owo_colors::set_override(false),
        }
    }
}

/// Log to stderr, honoring `RUST_LOG` when it is set.
fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(stderr)
        .init();
}

fn run(command: Commands) -> miette::Result<i32> {
    match command {
        Commands::Validate(args) => run_validate(args),
        Commands::Check(args) => run_check(args),
        Commands::Keywords(args) => run_keywords(args),
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();
    setup_tracing(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(1)
                .build(),
        )
    }))?;

    debug!(command = ?cli.command, "starting");

    let code = run(cli.command).unwrap_or_else(|report| {
        eprintln!("{report:?}");
        exitcode::SOFTWARE
    });
    exit(code);
}
