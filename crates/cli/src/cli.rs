//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Batch Shipper - ships event batches to outputs with per-batch acknowledgement
#[derive(Parser, Debug)]
#[command(
    name = "batch-shipper",
    author,
    version,
    about = "Event batch shipper with exactly-once batch acknowledgement",
    long_about = "Ships batches of events to the configured outputs.\n\n\
                  Each batch is written in chunks to every output and acknowledged \n\
                  exactly once: failed if any chunk on any output failed, completed otherwise."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BATCH_SHIPPER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BATCH_SHIPPER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ship synthetic batches through the configured outputs
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "shipper.toml",
        env = "BATCH_SHIPPER_CONFIG"
    )]
    pub config: PathBuf,

    /// Number of synthetic batches to publish
    #[arg(long, default_value = "100", env = "BATCH_SHIPPER_BATCHES")]
    pub batches: u64,

    /// Events per synthetic batch
    #[arg(long, default_value = "128", env = "BATCH_SHIPPER_BATCH_SIZE")]
    pub batch_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BATCH_SHIPPER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without shipping
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "shipper.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_args() {
        let cli = Cli::parse_from([
            "batch-shipper",
            "-v",
            "run",
            "--config",
            "custom.toml",
            "--batches",
            "10",
            "--batch-size",
            "5",
            "--dry-run",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("custom.toml"));
                assert_eq!(args.batches, 10);
                assert_eq!(args.batch_size, 5);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["batch-shipper", "-q", "-v", "validate"]);
        assert!(result.is_err());
    }
}
