//! HiTrack record parser.
//!
//! A log line is a `;`-separated list of `name=value` fields. Field 0 holds
//! the record type, field 1 the key, the rest depend on the type. Field
//! names are not checked; values are taken by position.

use super::schema::{
    Altitude, BeatSample, HeartRate, LocationFix, PaceSample, RawSample, RecordTag, SpeedSample,
    StrideSample, TypedEvent,
};
use super::timestamp::{normalize_timestamp, normalize_timestamp_value};
use crate::utils::config::{FIELD_SEPARATOR, PACE_KEY_DIVISOR, VALUE_SEPARATOR};
use crate::utils::error::ParseError;
use log::debug;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Outcome of classifying one line
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Event(TypedEvent),
    /// Type tag this parser does not know; skipped by callers
    Unknown { tag: String },
}

/// Every event of a log, in file order
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub events: Vec<TypedEvent>,

    /// Unknown tags and how often each was seen
    pub unknown_tags: BTreeMap<String, usize>,

    /// Non-blank lines read
    pub lines: usize,
}

impl ParsedLog {
    pub fn unknown_count(&self) -> usize {
        self.unknown_tags.values().sum()
    }
}

/// Parse one log line
///
/// **Public** - main entry point for line classification
///
/// # Arguments
/// * `line` - Raw line, trailing newline allowed
/// * `line_no` - 1-based line number, used in error messages
///
/// # Errors
/// * `ParseError::MalformedRecord` - missing fields or non-numeric values
pub fn parse_record(line: &str, line_no: usize) -> Result<Record, ParseError> {
    match split_record(line, line_no)? {
        Ok(raw) => to_event(&raw, line_no).map(Record::Event),
        Err(tag) => {
            debug!("Data type unknown at line {}: {}", line_no, tag);
            Ok(Record::Unknown { tag })
        }
    }
}

/// Split a line into a [`RawSample`]
///
/// The inner `Err` carries the tag text when the record type is unknown;
/// the key and values of such lines are not inspected.
pub fn split_record(
    line: &str,
    line_no: usize,
) -> Result<Result<RawSample<'_>, String>, ParseError> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let mut fields = line.split(FIELD_SEPARATOR);

    let tag_field = fields
        .next()
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| ParseError::malformed(line_no, "empty record"))?;
    let tag = match field_value(tag_field, line_no)?.parse::<RecordTag>() {
        Ok(tag) => tag,
        Err(unknown) => return Ok(Err(unknown)),
    };

    let key_text = fields
        .next()
        .map(|f| field_value(f, line_no))
        .transpose()?
        .ok_or_else(|| ParseError::malformed(line_no, format!("'{}' record has no key", tag)))?;
    let key = key_text.parse::<i64>().map_err(|_| {
        ParseError::malformed(line_no, format!("key '{}' is not an integer", key_text))
    })?;

    let values = fields
        .take(tag.value_count())
        .map(|f| field_value(f, line_no))
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() < tag.value_count() {
        return Err(ParseError::malformed(
            line_no,
            format!(
                "'{}' record needs {} value fields, found {}",
                tag,
                tag.value_count(),
                values.len()
            ),
        ));
    }

    Ok(Ok(RawSample { tag, key, values }))
}

/// Interpret the values of a split line according to its tag
///
/// **Public** - pure conversion, no I/O
pub fn to_event(raw: &RawSample<'_>, line_no: usize) -> Result<TypedEvent, ParseError> {
    let value = |i: usize| raw.values[i];

    let event = match raw.tag {
        RecordTag::Location => {
            // value(2) historically held altitude; the watch writes garbage there
            let t = normalize_timestamp(value(3)).ok_or_else(|| {
                ParseError::malformed(line_no, format!("invalid timestamp '{}'", value(3)))
            })?;
            TypedEvent::LocationFix(LocationFix {
                lat: parse_float(value(0), line_no)?,
                lon: parse_float(value(1), line_no)?,
                t,
            })
        }
        RecordTag::HeartRate => TypedEvent::HeartRate(HeartRate {
            t: normalize_timestamp_value(raw.key),
            bpm: parse_count(value(0), line_no)?,
        }),
        RecordTag::Altitude => TypedEvent::Altitude(Altitude {
            t: normalize_timestamp_value(raw.key),
            meters: parse_float(value(0), line_no)?,
        }),
        RecordTag::Stride => TypedEvent::StrideSample(StrideSample {
            t: normalize_timestamp_value(raw.key),
            stride: parse_count(value(0), line_no)?,
        }),
        // Sequence index, never a timestamp
        RecordTag::Speed => TypedEvent::SpeedSample(SpeedSample {
            seq: raw.key,
            decimeters_per_sec: parse_float(value(0), line_no)?,
        }),
        RecordTag::Pace => TypedEvent::PaceSample(PaceSample {
            meters_since_start: raw.key.div_euclid(PACE_KEY_DIVISOR),
            seconds_per_km: parse_count(value(0), line_no)?,
        }),
        RecordTag::Beat => TypedEvent::BeatSample(BeatSample {
            key: raw.key,
            value: parse_float(value(0), line_no)?.trunc() as i64,
        }),
    };

    Ok(event)
}

/// Parse every line of a reader
///
/// Blank lines are skipped. The first malformed line aborts the whole log.
pub fn parse_log<R: BufRead>(reader: R) -> Result<ParsedLog, ParseError> {
    let mut parsed = ParsedLog::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        parsed.lines += 1;

        match parse_record(&line, index + 1)? {
            Record::Event(event) => parsed.events.push(event),
            Record::Unknown { tag } => *parsed.unknown_tags.entry(tag).or_insert(0) += 1,
        }
    }

    debug!(
        "Parsed {} events from {} lines ({} unknown)",
        parsed.events.len(),
        parsed.lines,
        parsed.unknown_count()
    );

    Ok(parsed)
}

/// Open and parse a HiTrack log file
pub fn parse_log_file(path: impl AsRef<Path>) -> Result<ParsedLog, ParseError> {
    let path = path.as_ref();
    debug!("Opening {}...", path.display());

    let file = File::open(path)?;

    debug!("Reading data...");
    parse_log(BufReader::new(file))
}

/// Take the text after the first `=`
fn field_value(field: &str, line_no: usize) -> Result<&str, ParseError> {
    field
        .split_once(VALUE_SEPARATOR)
        .map(|(_, value)| value.trim())
        .ok_or_else(|| {
            ParseError::malformed(line_no, format!("field '{}' is not name=value", field.trim()))
        })
}

fn parse_float(token: &str, line_no: usize) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::malformed(line_no, format!("'{}' is not a number", token)))
}

/// Non-negative integer value; decimal text is truncated
fn parse_count(token: &str, line_no: usize) -> Result<u32, ParseError> {
    let value = parse_float(token, line_no)?.trunc();
    if value < 0.0 || value > u32::MAX as f64 {
        return Err(ParseError::malformed(
            line_no,
            format!("'{}' is out of range", token),
        ));
    }
    Ok(value as u32)
}
