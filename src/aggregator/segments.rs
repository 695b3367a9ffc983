//! Split merged track points into segments at pause sentinels.
//!
//! The watch records a pause as a fix at (90.0, -80.0). Such rows close the
//! current segment and are never emitted themselves.

use crate::parser::schema::{Segment, TrackPoint};
use crate::utils::config::{SENTINEL_LAT, SENTINEL_LON};
use log::debug;

/// Exact match on the sentinel coordinate pair
pub fn is_sentinel(lat: f64, lon: f64) -> bool {
    lat == SENTINEL_LAT && lon == SENTINEL_LON
}

pub fn is_sentinel_point(point: &TrackPoint) -> bool {
    matches!((point.lat, point.lon), (Some(lat), Some(lon)) if is_sentinel(lat, lon))
}

/// Partition points into non-empty segments
///
/// **Public** - main entry point of the segment emitter
///
/// Consecutive, leading or trailing sentinels never yield empty segments.
/// Unanchored points are skipped.
pub fn split_segments(points: impl IntoIterator<Item = TrackPoint>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Vec<TrackPoint> = Vec::new();
    let mut pauses = 0;

    for point in points {
        if is_sentinel_point(&point) {
            pauses += 1;
            close_segment(&mut segments, &mut current);
        } else if point.is_anchored() {
            current.push(point);
        }
    }
    close_segment(&mut segments, &mut current);

    debug!(
        "Split track into {} segments ({} pause markers)",
        segments.len(),
        pauses
    );

    segments
}

fn close_segment(segments: &mut Vec<Segment>, current: &mut Vec<TrackPoint>) {
    if !current.is_empty() {
        segments.push(Segment {
            points: std::mem::take(current),
        });
    }
}
