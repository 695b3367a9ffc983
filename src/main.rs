//! HiTrack GPX CLI
//!
//! Converts Huawei HiTrack activity logs into GPX tracks.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use hitrack_gpx::aggregator::{MergeOptions, SentinelFilter};
use hitrack_gpx::commands::{
    display_version, execute_convert, inspect_file, validate_args, ConvertArgs,
};
use hitrack_gpx::output::TimeFormat;

/// HiTrack GPX - export Huawei tracking files to GPX
#[derive(Parser, Debug)]
#[command(name = "hitrack-gpx")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert HiTrack files to GPX
    Convert {
        /// HiTrack files to convert (default: scan the working directory)
        inputs: Vec<PathBuf>,

        /// Directory receiving the GPX files
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Which pause markers the merge drops
        #[arg(long, value_enum, default_value_t = SentinelOpt::Keep)]
        sentinel_filter: SentinelOpt,

        /// Layout of point timestamps
        #[arg(long, value_enum, default_value_t = TimeFormatOpt::Legacy)]
        time_format: TimeFormatOpt,

        /// Also dump each merged track as JSON into this directory
        #[arg(long)]
        json: Option<PathBuf>,

        /// Print a track summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Show per-stream sample counts of a HiTrack file
    Inspect {
        /// Path to the HiTrack file
        file: PathBuf,
    },

    /// Display version information
    Version,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SentinelOpt {
    /// Keep pause markers and split the track on them
    Keep,
    /// Drop exact (90, -80) pause markers
    Pair,
    /// Drop every fix at latitude 90
    Latitude,
}

impl From<SentinelOpt> for SentinelFilter {
    fn from(value: SentinelOpt) -> Self {
        match value {
            SentinelOpt::Keep => SentinelFilter::Keep,
            SentinelOpt::Pair => SentinelFilter::Pair,
            SentinelOpt::Latitude => SentinelFilter::Latitude,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TimeFormatOpt {
    /// DD/MM/YYYY HH:MM:SS TZ, local time
    Legacy,
    /// RFC 3339, UTC
    Iso8601,
}

impl From<TimeFormatOpt> for TimeFormat {
    fn from(value: TimeFormatOpt) -> Self {
        match value {
            TimeFormatOpt::Legacy => TimeFormat::Legacy,
            TimeFormatOpt::Iso8601 => TimeFormat::Iso8601,
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Convert {
            inputs,
            output_dir,
            sentinel_filter,
            time_format,
            json,
            summary,
        } => {
            let args = ConvertArgs {
                inputs,
                output_dir,
                merge: MergeOptions::default().with_sentinel_filter(sentinel_filter.into()),
                time_format: time_format.into(),
                json_dir: json,
                print_summary: summary,
                ..Default::default()
            };

            // Validate args first
            validate_args(&args)?;

            let report = execute_convert(&args)?;
            if !report.is_success() {
                anyhow::bail!(
                    "{} of {} files failed to convert",
                    report.failed.len(),
                    report.total()
                );
            }
        }

        Commands::Inspect { file } => {
            inspect_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
