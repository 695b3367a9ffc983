//! Typed sample and track definitions.
//!
//! Every line of a HiTrack log becomes one [`TypedEvent`]. The merge engine
//! turns the location stream into [`TrackPoint`] rows, which the segment
//! emitter groups into [`Segment`]s.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record type tag found in field 0 (`type=<tag>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordTag {
    /// `lbs` - GPS fix
    Location,
    /// `h-r` - heart rate
    HeartRate,
    /// `alti` - altitude
    Altitude,
    /// `s-r` - stride rate
    Stride,
    /// `rs` - instantaneous speed, keyed by fix index
    Speed,
    /// `p-m` - pace per kilometre
    Pace,
    /// `b-p-m`
    Beat,
}

impl RecordTag {
    /// Tag text as written in the log
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordTag::Location => "lbs",
            RecordTag::HeartRate => "h-r",
            RecordTag::Altitude => "alti",
            RecordTag::Stride => "s-r",
            RecordTag::Speed => "rs",
            RecordTag::Pace => "p-m",
            RecordTag::Beat => "b-p-m",
        }
    }

    /// Number of value fields after the key this tag needs
    pub fn value_count(&self) -> usize {
        match self {
            RecordTag::Location => 4,
            _ => 1,
        }
    }
}

impl FromStr for RecordTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lbs" => Ok(RecordTag::Location),
            "h-r" => Ok(RecordTag::HeartRate),
            "alti" => Ok(RecordTag::Altitude),
            "s-r" => Ok(RecordTag::Stride),
            "rs" => Ok(RecordTag::Speed),
            "p-m" => Ok(RecordTag::Pace),
            "b-p-m" => Ok(RecordTag::Beat),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One split log line, before its values are interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample<'a> {
    pub tag: RecordTag,
    pub key: i64,
    /// Value tokens following the key, in field order
    pub values: Vec<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub lat: f64,
    pub lon: f64,
    pub t: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRate {
    pub t: i64,
    pub bpm: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Altitude {
    pub t: i64,
    pub meters: f64,
}

/// Speed keyed by the index of the chronological location fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub seq: i64,
    pub decimeters_per_sec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaceSample {
    pub meters_since_start: i64,
    pub seconds_per_km: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatSample {
    pub key: i64,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrideSample {
    pub t: i64,
    pub stride: u32,
}

/// A classified sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedEvent {
    LocationFix(LocationFix),
    HeartRate(HeartRate),
    Altitude(Altitude),
    SpeedSample(SpeedSample),
    PaceSample(PaceSample),
    BeatSample(BeatSample),
    StrideSample(StrideSample),
}

impl TypedEvent {
    pub fn tag(&self) -> RecordTag {
        match self {
            TypedEvent::LocationFix(_) => RecordTag::Location,
            TypedEvent::HeartRate(_) => RecordTag::HeartRate,
            TypedEvent::Altitude(_) => RecordTag::Altitude,
            TypedEvent::SpeedSample(_) => RecordTag::Speed,
            TypedEvent::PaceSample(_) => RecordTag::Pace,
            TypedEvent::BeatSample(_) => RecordTag::Beat,
            TypedEvent::StrideSample(_) => RecordTag::Stride,
        }
    }
}

/// One row of the merged track table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt: Option<f64>,
    pub t: i64,
    pub hr: Option<u32>,
    /// Stride cadence (steps per minute)
    pub cadence: Option<u32>,
    /// Decimeters per second
    pub speed: Option<f64>,
    /// Position in the chronologically sorted location sequence
    pub seq: i64,
}

impl TrackPoint {
    /// Row anchored on a GPS fix, all other columns empty
    pub fn from_fix(fix: &LocationFix, seq: i64) -> Self {
        Self {
            lat: Some(fix.lat),
            lon: Some(fix.lon),
            alt: None,
            t: fix.t,
            hr: None,
            cadence: None,
            speed: None,
            seq,
        }
    }

    pub fn is_anchored(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }

    /// Speed converted to metres per second
    pub fn speed_mps(&self) -> Option<f64> {
        self.speed.map(|dm| dm / 10.0)
    }
}

/// A continuous recording span between pauses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub points: Vec<TrackPoint>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TrackPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrackPoint> {
        self.points.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tag_round_trip_text() {
        for tag in [
            RecordTag::Location,
            RecordTag::HeartRate,
            RecordTag::Altitude,
            RecordTag::Stride,
            RecordTag::Speed,
            RecordTag::Pace,
            RecordTag::Beat,
        ] {
            assert_eq!(tag.as_str().parse::<RecordTag>().unwrap(), tag);
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!("gps".parse::<RecordTag>(), Err("gps".to_string()));
    }

    #[test]
    fn test_speed_mps() {
        let fix = LocationFix { lat: 1.0, lon: 2.0, t: 10 };
        let mut point = TrackPoint::from_fix(&fix, 0);
        assert!(point.speed_mps().is_none());
        point.speed = Some(35.0);
        assert_eq!(point.speed_mps(), Some(3.5));
    }
}
