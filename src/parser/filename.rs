//! Metadata encoded in HiTrack file names.
//!
//! Original exports are named `HiTrack_<start ms, 13 digits><end ms><5 digits>`.
//! Only the output file name is derived from it; the log body never depends on it.

use crate::utils::config::{HITRACK_MARKER, NAME_START_DIGITS, NAME_SUFFIX_LEN, OUTPUT_EXTENSION};
use crate::utils::error::FilenameError;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::path::Path;

/// Recording span decoded from a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackName {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TrackName {
    /// Decode the file name component of `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FilenameError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FilenameError::InvalidFilename(path.display().to_string()))?;
        Self::parse(name)
    }

    /// Decode a bare file name
    pub fn parse(name: &str) -> Result<Self, FilenameError> {
        let invalid = || FilenameError::InvalidFilename(name.to_string());

        let (_, rest) = name.split_once(HITRACK_MARKER).ok_or_else(invalid)?;
        let digits_len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..digits_len];

        if digits.len() <= NAME_START_DIGITS + NAME_SUFFIX_LEN {
            return Err(invalid());
        }

        let start = &digits[..NAME_START_DIGITS];
        let end = &digits[NAME_START_DIGITS..digits.len() - NAME_SUFFIX_LEN];

        Ok(Self {
            start_ms: start.parse().map_err(|_| invalid())?,
            end_ms: end.parse().map_err(|_| invalid())?,
        })
    }

    /// `YYYYMMDD_HHMMSS_HHMMSS.gpx` in the given zone
    pub fn output_file_name<Tz>(&self, tz: &Tz) -> Result<String, FilenameError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let start = to_datetime(self.start_ms, tz)?;
        let end = to_datetime(self.end_ms, tz)?;

        Ok(format!(
            "{}_{}.{}",
            start.format("%Y%m%d_%H%M%S"),
            end.format("%H%M%S"),
            OUTPUT_EXTENSION
        ))
    }

    /// Output name in the machine's local zone
    pub fn local_output_file_name(&self) -> Result<String, FilenameError> {
        self.output_file_name(&Local)
    }
}

fn to_datetime<Tz: TimeZone>(millis: i64, tz: &Tz) -> Result<DateTime<Tz>, FilenameError> {
    tz.timestamp_millis_opt(millis)
        .earliest()
        .ok_or_else(|| {
            FilenameError::InvalidFilename(format!("timestamp out of range: {}", millis))
        })
}

/// Whether a file name looks like an original HiTrack export
pub fn is_hitrack_name(name: &str) -> bool {
    name.contains(HITRACK_MARKER)
}
