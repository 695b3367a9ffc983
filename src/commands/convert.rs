//! Convert command implementation.
//!
//! The convert command, for each HiTrack log:
//! 1. Decodes the output name from the file name
//! 2. Parses the log into typed samples
//! 3. Collects the samples into per-type streams
//! 4. Merges the streams and splits the track at pauses
//! 5. Writes the GPX file (and the optional JSON dump)
//!
//! Files are independent: a failure is recorded and the batch moves on.

use super::models::{ConvertArgs, ConvertReport, ConvertedTrack};
use super::utils::discover_inputs;
use crate::aggregator::{build_segments, summarize_track, MergeOptions, SampleStreams, TrackSummary};
use crate::output::{render_gpx, write_gpx, write_track_json, GpxConfig, TrackDocument};
use crate::parser::schema::Segment;
use crate::parser::{parse_log, parse_log_file, TrackName};
use crate::utils::error::ParseError;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// A report listing converted and failed files. Only discovery errors are
/// returned as `Err`; per-file failures land in the report.
pub fn execute_convert(args: &ConvertArgs) -> Result<ConvertReport> {
    let start_time = Instant::now();

    let inputs = if args.inputs.is_empty() {
        info!("No input given, scanning {}", args.scan_dir.display());
        discover_inputs(&args.scan_dir)
            .with_context(|| format!("Failed to scan {}", args.scan_dir.display()))?
    } else {
        args.inputs.clone()
    };

    if inputs.is_empty() {
        info!("No HiTrack_ files found");
    }

    let mut report = ConvertReport::default();
    for input in inputs {
        match convert_file(&input, args) {
            Ok(track) => {
                println!("{} processed", track.output.display());
                report.converted.push(track);
            }
            Err(e) => {
                error!("{}: {:#}", input.display(), e);
                report.failed.push((input, e));
            }
        }
    }

    info!(
        "Converted {} of {} files in {:.2}s",
        report.converted.len(),
        report.total(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Convert one HiTrack log to GPX
///
/// **Public** - the whole file is parsed and rendered before anything is
/// written, so a malformed log never leaves a partial output behind.
pub fn convert_file(input: &Path, args: &ConvertArgs) -> Result<ConvertedTrack> {
    info!("Converting {}", input.display());

    // Step 1: Output name
    debug!("Step 1/5: Decoding file name...");
    let name = TrackName::from_path(input)?;
    let file_name = name.local_output_file_name()?;
    let output = args.output_dir.join(&file_name);

    // Step 2: Parse
    debug!("Step 2/5: Parsing log...");
    let parsed = parse_log_file(input)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    // Step 3: Streams
    debug!("Step 3/5: Collecting streams...");
    let streams = SampleStreams::collect(parsed.events);

    // Step 4: Merge and split
    debug!("Step 4/5: Merging streams...");
    let (segments, summary) = build_track(&streams, &args.merge);
    info!("Track summary: {}", summary.summary());

    // Step 5: Render and write
    debug!("Step 5/5: Writing output files...");
    let config = GpxConfig::new()
        .with_name(file_name.trim_end_matches(".gpx"))
        .with_time_format(args.time_format);
    let gpx = render_gpx(&segments, &config).context("Failed to render GPX")?;
    let json = args.json_dir.as_ref().map(|json_dir| {
        let document =
            TrackDocument::new(input.display().to_string(), segments.clone(), summary.clone());
        (json_output_path(json_dir, &file_name), document)
    });
    write_outputs(&gpx, &output, json.as_ref())?;

    if args.print_summary {
        print_summary(input, &summary);
    }

    Ok(ConvertedTrack {
        input: input.to_path_buf(),
        output,
        points: summary.point_count,
        segments: summary.segment_count,
    })
}

/// Run the parse/merge/split pipeline on an in-memory log
///
/// **Public** - no file name or output involved
pub fn convert_reader<R: BufRead>(
    reader: R,
    options: &MergeOptions,
) -> Result<(Vec<Segment>, TrackSummary), ParseError> {
    let parsed = parse_log(reader)?;
    let streams = SampleStreams::collect(parsed.events);
    Ok(build_track(&streams, options))
}

fn build_track(streams: &SampleStreams, options: &MergeOptions) -> (Vec<Segment>, TrackSummary) {
    let segments = build_segments(streams, options);
    let summary = summarize_track(&segments, streams);
    (segments, summary)
}

/// Write the GPX and the optional JSON dump as one unit
///
/// The GPX goes to a staging file first and is renamed into place only once
/// the JSON dump is on disk. On any failure nothing written here survives.
fn write_outputs(gpx: &str, output: &Path, json: Option<&(PathBuf, TrackDocument)>) -> Result<()> {
    let staged = staging_path(output);
    write_gpx(gpx, &staged).context("Failed to write GPX")?;

    if let Some((json_path, document)) = json {
        if let Err(e) = write_track_json(document, json_path) {
            discard(&staged);
            if json_path.is_file() {
                discard(json_path);
            }
            return Err(e).context("Failed to write track JSON");
        }
    }

    if let Err(e) = std::fs::rename(&staged, output) {
        discard(&staged);
        if let Some((json_path, _)) = json {
            discard(json_path);
        }
        return Err(e).with_context(|| format!("Failed to move GPX into {}", output.display()));
    }

    if let Some((json_path, _)) = json {
        info!("✓ Track JSON written to: {}", json_path.display());
    }

    Ok(())
}

fn staging_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    output.with_file_name(name)
}

fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Could not remove {}: {}", path.display(), e);
    }
}

fn json_output_path(json_dir: &Path, gpx_name: &str) -> PathBuf {
    json_dir.join(Path::new(gpx_name).with_extension("json"))
}

fn print_summary(input: &Path, summary: &TrackSummary) {
    println!("\n{}", "=".repeat(80));
    println!("TRACK SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Input:     {}", input.display());
    println!("{}", summary.summary());
    println!(
        "Samples:   {} fixes, {} heart rate, {} altitude, {} speed, {} stride, {} pace, {} beat",
        summary.streams.locations,
        summary.streams.heart_rates,
        summary.streams.altitudes,
        summary.streams.speeds,
        summary.streams.strides,
        summary.streams.paces,
        summary.streams.beats
    );
    println!("{}", "=".repeat(80));
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    if args.output_dir.is_file() {
        anyhow::bail!(
            "Output directory is a file: {}",
            args.output_dir.display()
        );
    }

    if let Some(json_dir) = &args.json_dir {
        if json_dir.is_file() {
            anyhow::bail!("JSON directory is a file: {}", json_dir.display());
        }
    }

    if args.inputs.iter().any(|p| p.as_os_str().is_empty()) {
        anyhow::bail!("Input paths cannot be empty");
    }

    if args.inputs.is_empty() && !args.scan_dir.is_dir() {
        anyhow::bail!("Scan directory does not exist: {}", args.scan_dir.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_default() {
        assert!(validate_args(&ConvertArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_output() {
        let args = ConvertArgs {
            output_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_output_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = ConvertArgs {
            output_dir: file.path().to_path_buf(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = ConvertArgs {
            inputs: vec![PathBuf::new()],
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let staged = staging_path(Path::new("out/20180302_141320_151320.gpx"));
        assert_eq!(staged, Path::new("out/20180302_141320_151320.gpx.part"));
    }

    #[test]
    fn test_json_output_path() {
        let path = json_output_path(Path::new("out"), "20180302_141320_151320.gpx");
        assert_eq!(path, Path::new("out").join("20180302_141320_151320.json"));
    }
}
