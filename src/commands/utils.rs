use crate::aggregator::SampleStreams;
use crate::parser::{is_hitrack_name, parse_log_file, TrackName};
use crate::utils::config::HITRACK_MARKER;
use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find every file under `dir` whose name contains `HiTrack_`
///
/// Walks subdirectories too, without following symlinks. Results are sorted
/// for a stable batch order.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.with_context(|| format!("Cannot scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(is_hitrack_name) {
            debug!("Found {}", entry.path().display());
            found.push(entry.into_path());
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}

/// Print per-stream sample counts of a log
pub fn inspect_file(file_path: &Path) -> Result<SampleStreams> {
    println!("Inspecting log: {}", file_path.display());

    let parsed = parse_log_file(file_path)
        .with_context(|| format!("Failed to parse {}", file_path.display()))?;
    let unknown = parsed.unknown_tags.clone();
    let lines = parsed.lines;
    let streams = SampleStreams::collect(parsed.events);
    let counts = streams.counts();

    println!("✓ Valid HiTrack log ({} records)", lines);
    match TrackName::from_path(file_path) {
        Ok(name) => match name.local_output_file_name() {
            Ok(output) => println!("  Output name:   {}", output),
            Err(e) => println!("  Output name:   unavailable ({})", e),
        },
        Err(_) => println!("  Output name:   unavailable (no {} marker)", HITRACK_MARKER),
    }
    println!("  Location fixes: {}", counts.locations);
    println!("  Heart rate:     {}", counts.heart_rates);
    println!("  Altitude:       {}", counts.altitudes);
    println!("  Speed:          {}", counts.speeds);
    println!("  Stride:         {}", counts.strides);
    println!("  Pace:           {}", counts.paces);
    println!("  Beat:           {}", counts.beats);

    if !unknown.is_empty() {
        println!("  Unknown types:");
        for (tag, count) in &unknown {
            println!("    {}: {}", tag, count);
        }
    }

    Ok(streams)
}

/// Display version information
pub fn display_version() {
    println!("hitrack-gpx v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Converts Huawei HiTrack activity logs into GPX tracks.");
}
