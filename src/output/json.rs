//! JSON track output writer.
//!
//! Dumps the merged segments and their summary, mostly for debugging the
//! merge of a particular log.

use super::{ensure_parent_dir, validate_path};
use crate::aggregator::TrackSummary;
use crate::parser::schema::Segment;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDocument {
    /// Schema version for compatibility checking
    pub version: String,

    /// Input log the track came from
    pub source: String,

    pub segments: Vec<Segment>,

    pub summary: TrackSummary,

    /// Timestamp when the document was generated
    pub generated_at: String,
}

impl TrackDocument {
    pub fn new(source: impl Into<String>, segments: Vec<Segment>, summary: TrackSummary) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            source: source.into(),
            segments,
            summary,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Write a track document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_track_json(
    document: &TrackDocument,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing track JSON to: {}", output_path.display());

    validate_path(output_path)?;

    ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Track JSON written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );

    Ok(())
}

/// Read a track document back from JSON
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_track_json(input_path: impl AsRef<Path>) -> Result<TrackDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading track JSON from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let document: TrackDocument =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Track loaded: version {}, {} segments",
        document.version,
        document.segments.len()
    );

    Ok(document)
}
