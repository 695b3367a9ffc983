//! HiTrack log parsing and track schema definitions.
//!
//! This module handles:
//! - Normalizing second/millisecond timestamps
//! - Classifying raw log lines into typed samples
//! - Decoding metadata from HiTrack file names
//! - Defining the track point and segment schema

pub mod filename;
pub mod record;
pub mod schema;
pub mod timestamp;

// Re-export main types
pub use filename::{is_hitrack_name, TrackName};
pub use record::{parse_log, parse_log_file, parse_record, ParsedLog, Record};
pub use schema::{
    Altitude, BeatSample, HeartRate, LocationFix, PaceSample, RawSample, RecordTag, Segment,
    SpeedSample, StrideSample, TrackPoint, TypedEvent,
};
pub use timestamp::{normalize_timestamp, normalize_timestamp_value};
