use crate::aggregator::MergeOptions;
use crate::output::TimeFormat;
use std::path::PathBuf;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Logs to convert; empty means scan `scan_dir`
    pub inputs: Vec<PathBuf>,

    /// Directory scanned for `HiTrack_` files when no input is given
    pub scan_dir: PathBuf,

    /// Directory receiving the GPX files
    pub output_dir: PathBuf,

    /// Merge engine options
    pub merge: MergeOptions,

    /// `<time>` layout
    pub time_format: TimeFormat,

    /// Also dump each merged track as JSON into this directory
    pub json_dir: Option<PathBuf>,

    /// Print a track summary to stdout
    pub print_summary: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            scan_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            merge: MergeOptions::default(),
            time_format: TimeFormat::default(),
            json_dir: None,
            print_summary: false,
        }
    }
}

/// Result of converting one file
#[derive(Debug, Clone)]
pub struct ConvertedTrack {
    pub input: PathBuf,
    pub output: PathBuf,
    pub points: usize,
    pub segments: usize,
}

/// Outcome of a batch
#[derive(Debug, Default)]
pub struct ConvertReport {
    pub converted: Vec<ConvertedTrack>,

    /// One entry per failed file
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl ConvertReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
