//! # agrireg CLI entry point
//!
//! Parses command-line arguments, loads the optional config file, sets up
//! tracing, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agrireg_cli::check_id::{run_check_id, CheckIdArgs};
use agrireg_cli::config::CliConfig;
use agrireg_cli::delete::{run_delete, DeleteArgs};
use agrireg_cli::fixture::{run_load, LoadArgs};
use agrireg_cli::report::{run_report, ReportArgs};
use agrireg_cli::seed::{run_seed, SeedArgs};

/// Farm registry CLI.
///
/// Validates taxpayer identifiers, loads and checks registry fixtures,
/// generates sample data, and prints dashboard reports.
#[derive(Parser, Debug)]
#[command(name = "agrireg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify taxpayer identifiers.
    CheckId(CheckIdArgs),

    /// Validate and commit a registry fixture.
    Load(LoadArgs),

    /// Print the dashboard report for a fixture.
    Report(ReportArgs),

    /// Generate a deterministic sample fixture.
    Seed(SeedArgs),

    /// Delete a record from a fixture and show the cascade.
    Delete(DeleteArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref());
    let fallback = match &config {
        Ok(c) => c.log_level.as_str(),
        Err(_) => "warn",
    };
    init_tracing(log_filter(cli.verbose, fallback), cli.json_logs);

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(
        referential_delete = ?config.referential_delete,
        "agrireg starting"
    );

    let result = match &cli.command {
        Commands::CheckId(args) => run_check_id(args),
        Commands::Load(args) => run_load(args, &config),
        Commands::Report(args) => run_report(args, &config),
        Commands::Seed(args) => run_seed(args, &config),
        Commands::Delete(args) => run_delete(args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// `-v` wins, then `RUST_LOG`, then the config file's level.
fn log_filter(verbose: u8, fallback: &str) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn init_tracing(filter: EnvFilter, json: bool) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_check_id() {
        let cli =
            Cli::try_parse_from(["agrireg", "check-id", "123.456.789-09", "11222333000181"])
                .unwrap();
        if let Commands::CheckId(args) = cli.command {
            assert_eq!(args.values.len(), 2);
        } else {
            panic!("expected check-id");
        }
    }

    #[test]
    fn cli_parse_check_id_requires_value() {
        assert!(Cli::try_parse_from(["agrireg", "check-id"]).is_err());
    }

    #[test]
    fn cli_parse_load() {
        let cli = Cli::try_parse_from(["agrireg", "load", "farm.yaml"]).unwrap();
        if let Commands::Load(args) = cli.command {
            assert_eq!(args.fixture, PathBuf::from("farm.yaml"));
        } else {
            panic!("expected load");
        }
    }

    #[test]
    fn cli_parse_report_compact() {
        let cli = Cli::try_parse_from(["agrireg", "report", "farm.yaml", "--compact"]).unwrap();
        if let Commands::Report(args) = cli.command {
            assert!(args.compact);
        } else {
            panic!("expected report");
        }
    }

    #[test]
    fn cli_parse_seed_options() {
        let cli = Cli::try_parse_from([
            "agrireg",
            "seed",
            "--producers",
            "5",
            "--rng-seed",
            "42",
            "--year",
            "2025",
            "-o",
            "farm.yaml",
        ])
        .unwrap();
        if let Commands::Seed(args) = cli.command {
            assert_eq!(args.producers, Some(5));
            assert_eq!(args.rng_seed, Some(42));
            assert_eq!(args.year, Some(2025));
            assert_eq!(args.output, Some(PathBuf::from("farm.yaml")));
        } else {
            panic!("expected seed");
        }
    }

    #[test]
    fn cli_parse_delete_requires_one_target() {
        assert!(Cli::try_parse_from(["agrireg", "delete", "farm.yaml"]).is_err());
        assert!(Cli::try_parse_from([
            "agrireg",
            "delete",
            "farm.yaml",
            "--region",
            "Bahia",
            "--crop-kind",
            "Soja"
        ])
        .is_err());
        let cli =
            Cli::try_parse_from(["agrireg", "delete", "farm.yaml", "--crop-kind", "Soja"]).unwrap();
        if let Commands::Delete(args) = cli.command {
            assert_eq!(args.crop_kind.as_deref(), Some("Soja"));
        } else {
            panic!("expected delete");
        }
    }

    #[test]
    fn cli_parse_global_options() {
        let cli = Cli::try_parse_from([
            "agrireg",
            "-vv",
            "--json-logs",
            "--config",
            "agrireg.yaml",
            "check-id",
            "12345678909",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.json_logs);
        assert_eq!(cli.config, Some(PathBuf::from("agrireg.yaml")));
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["agrireg"]).is_err());
    }

    #[test]
    fn verbosity_overrides_fallback() {
        assert_eq!(log_filter(1, "error").to_string(), "info");
        assert_eq!(log_filter(3, "error").to_string(), "trace");
    }
}
