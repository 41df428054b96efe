//! # omt CLI entry point
//!
//! Parses command-line arguments, initialises logging and dispatches to
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use omt_cli::check::{run_check, CheckArgs};
use omt_cli::coerce::{run_coerce, CoerceArgs};
use omt_cli::types::{run_types, TypesArgs};

/// Open type toolchain.
///
/// Checks attribute and parameter constraint descriptors against their open
/// types, coerces canonical text, and lists the simple type vocabulary.
#[derive(Parser, Debug)]
#[command(name = "omt", version, about, long_about = None)]
struct Cli {
    /// Log filter directive (e.g. `debug`, `omt_constraint=trace`).
    /// Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the definitions in a manifest.
    Check(CheckArgs),

    /// Coerce text to a simple type and print its canonical rendering.
    Coerce(CoerceArgs),

    /// List the simple types.
    Types(TypesArgs),
}

fn init_tracing(log_level: Option<&str>, json: bool) {
    let filter = match log_level {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("warning: invalid --log-level '{directive}': {e}");
            EnvFilter::new("warn")
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref(), cli.log_json);

    let result = match &cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Coerce(args) => run_coerce(args),
        Commands::Types(args) => run_types(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omt_cli::check::OutputFormat;

    #[test]
    fn cli_parse_check_json() {
        let cli = Cli::try_parse_from(["omt", "check", "beans.yaml", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.manifest.to_str(), Some("beans.yaml"));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_coerce() {
        let cli = Cli::try_parse_from(["omt", "--log-level", "debug", "coerce", "--type", "long", "7"])
            .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Coerce(args) => {
                assert_eq!(args.simple_type, "long");
                assert_eq!(args.text, "7");
            }
            other => panic!("expected coerce, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["omt", "types", "--log-json"]).unwrap();
        assert!(cli.log_json);
        assert!(matches!(cli.command, Commands::Types(_)));
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["omt", "check", "m.yaml", "--format", "xml"]).is_err());
    }
}
