//! Summary statistics for a converted track.
//!
//! Distances use the haversine formula on consecutive points of a segment;
//! nothing is counted across a pause.

use super::streams::{SampleStreams, StreamCounts};
use crate::parser::schema::{Segment, TrackPoint};
use crate::utils::config::EARTH_RADIUS_M;
use serde::{Deserialize, Serialize};

/// Track statistics
///
/// **Public** - returned from summarize_track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Points across all segments
    pub point_count: usize,

    pub segment_count: usize,

    /// First and last point timestamp (seconds since epoch)
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,

    /// Sum of segment spans, pauses excluded
    pub moving_secs: i64,

    /// Great-circle distance in metres
    pub distance_m: f64,

    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,

    pub avg_heart_rate: Option<f64>,
    pub max_heart_rate: Option<u32>,

    /// Fastest non-zero `p-m` sample, seconds per km
    pub best_pace: Option<u32>,

    /// Raw sample counts per stream
    pub streams: StreamCounts,
}

/// Calculate summary statistics
///
/// **Public** - main entry point for track metrics
pub fn summarize_track(segments: &[Segment], streams: &SampleStreams) -> TrackSummary {
    let points = || segments.iter().flat_map(|s| s.points.iter());

    let elevations: Vec<f64> = points().filter_map(|p| p.alt).collect();
    let heart_rates: Vec<u32> = points().filter_map(|p| p.hr).collect();

    let avg_heart_rate = if heart_rates.is_empty() {
        None
    } else {
        Some(heart_rates.iter().map(|&hr| hr as f64).sum::<f64>() / heart_rates.len() as f64)
    };

    TrackSummary {
        point_count: points().count(),
        segment_count: segments.len(),
        start_time: points().next().map(|p| p.t),
        end_time: points().last().map(|p| p.t),
        moving_secs: segments.iter().map(segment_span).sum(),
        distance_m: segments.iter().map(segment_distance).sum(),
        min_elevation: elevations.iter().copied().reduce(f64::min),
        max_elevation: elevations.iter().copied().reduce(f64::max),
        avg_heart_rate,
        max_heart_rate: heart_rates.iter().copied().max(),
        best_pace: streams
            .paces
            .iter()
            .map(|p| p.seconds_per_km)
            .filter(|&s| s > 0)
            .min(),
        streams: streams.counts(),
    }
}

fn segment_span(segment: &Segment) -> i64 {
    match (segment.first(), segment.last()) {
        (Some(first), Some(last)) => last.t - first.t,
        _ => 0,
    }
}

/// Distance along one segment in metres
pub fn segment_distance(segment: &Segment) -> f64 {
    segment
        .points
        .windows(2)
        .filter_map(|w| point_distance(&w[0], &w[1]))
        .sum()
}

fn point_distance(a: &TrackPoint, b: &TrackPoint) -> Option<f64> {
    Some(haversine_distance(a.lat?, a.lon?, b.lat?, b.lon?))
}

/// Great-circle distance in metres
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Pace as `M'SS"` per kilometre
pub fn format_pace(seconds_per_km: u32) -> String {
    format!("{}'{:02}\"", seconds_per_km / 60, seconds_per_km % 60)
}

/// Duration as `H:MM:SS`
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

impl TrackSummary {
    pub fn is_empty(&self) -> bool {
        self.point_count == 0
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and the `--summary` flag
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Points: {} | Segments: {} | Distance: {:.2} km | Moving: {}",
            self.point_count,
            self.segment_count,
            self.distance_m / 1000.0,
            format_duration(self.moving_secs)
        );

        if let (Some(min), Some(max)) = (self.min_elevation, self.max_elevation) {
            line.push_str(&format!(" | Elevation: {:.0}-{:.0} m", min, max));
        }
        if let (Some(avg), Some(max)) = (self.avg_heart_rate, self.max_heart_rate) {
            line.push_str(&format!(" | HR: avg {:.0} / max {}", avg, max));
        }
        if let Some(pace) = self.best_pace {
            line.push_str(&format!(" | Best pace: {}/km", format_pace(pace)));
        }

        line
    }
}
