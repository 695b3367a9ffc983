//! Alignment of the sample streams into one track table.
//!
//! The location stream is the anchor: one row per GPS fix, in timestamp
//! order. Heart rate, altitude and stride are joined by exact timestamp,
//! speed by the row's position in the table. Gaps are then filled forward,
//! and whatever is still missing at the start is filled backward.
//!
//! Every step is a standalone function so the join and fill rules can be
//! checked in isolation.

use super::segments::is_sentinel_point;
use super::streams::SampleStreams;
use crate::parser::schema::{LocationFix, SpeedSample, TrackPoint};
use crate::utils::config::SENTINEL_LAT;
use log::debug;

/// Which rows the merge drops as pause markers
///
/// The segment emitter can only split a track on sentinels that survive the
/// merge, so `Keep` is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SentinelFilter {
    /// Keep sentinel rows; they become segment boundaries
    #[default]
    Keep,
    /// Drop rows at exactly (90.0, -80.0); the track is never split
    Pair,
    /// Drop every row with latitude exactly 90.0, whatever the longitude
    Latitude,
}

/// Options for [`merge_streams`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub sentinel_filter: SentinelFilter,
}

impl MergeOptions {
    pub fn with_sentinel_filter(mut self, filter: SentinelFilter) -> Self {
        self.sentinel_filter = filter;
        self
    }
}

/// Merge all streams into timestamp-ordered track points
///
/// **Public** - main entry point of the alignment engine
///
/// # Algorithm
/// 1. Stable-sort fixes by timestamp, numbering them
/// 2. Join heart rate, altitude and stride on exact timestamp
/// 3. Drop unanchored rows, apply the sentinel policy, re-sort, renumber
/// 4. Join speed on row position
/// 5. Forward-fill, then backward-fill, each metric column
///
/// An empty location stream yields an empty table.
pub fn merge_streams(streams: &SampleStreams, options: &MergeOptions) -> Vec<TrackPoint> {
    if streams.locations.is_empty() {
        debug!("No location fixes, nothing to merge");
        return Vec::new();
    }

    let mut rows = sort_locations(&streams.locations);

    let hr_matched = join_by_timestamp(&mut rows, &streams.heart_rates, |s| s.t, |row, s| {
        row.hr = Some(s.bpm)
    });
    let alt_matched = join_by_timestamp(&mut rows, &streams.altitudes, |s| s.t, |row, s| {
        row.alt = Some(s.meters)
    });
    let stride_matched = join_by_timestamp(&mut rows, &streams.strides, |s| s.t, |row, s| {
        row.cadence = Some(s.stride)
    });
    debug!(
        "Timestamp joins matched {} heart rate, {} altitude, {} stride rows of {}",
        hr_matched,
        alt_matched,
        stride_matched,
        rows.len()
    );

    rows.retain(TrackPoint::is_anchored);
    let dropped = apply_sentinel_filter(&mut rows, options.sentinel_filter);
    if dropped > 0 {
        debug!(
            "Dropped {} rows with sentinel policy {:?}",
            dropped, options.sentinel_filter
        );
    }
    sort_by_timestamp(&mut rows);
    renumber(&mut rows);

    let speed_matched = join_by_sequence(&mut rows, &streams.speeds);
    debug!(
        "Sequence join matched {} of {} speed samples",
        speed_matched,
        streams.speeds.len()
    );

    fill_gaps(&mut rows);

    rows
}

/// One row per fix, stable-sorted by timestamp, `seq` = sorted position
pub fn sort_locations(fixes: &[LocationFix]) -> Vec<TrackPoint> {
    let mut ordered: Vec<&LocationFix> = fixes.iter().collect();
    ordered.sort_by_key(|fix| fix.t);

    ordered
        .into_iter()
        .enumerate()
        .map(|(seq, fix)| TrackPoint::from_fix(fix, seq as i64))
        .collect()
}

/// Sort-merge left join on exact timestamp equality
///
/// `rows` must already be in ascending timestamp order. Samples without a
/// matching row are dropped; when several samples share a timestamp the
/// first one in source order wins, so rows are never duplicated. Rows that
/// share a timestamp all receive the same sample.
///
/// Returns the number of rows that matched.
pub fn join_by_timestamp<S, K, F>(
    rows: &mut [TrackPoint],
    samples: &[S],
    key: K,
    mut apply: F,
) -> usize
where
    K: Fn(&S) -> i64,
    F: FnMut(&mut TrackPoint, &S),
{
    debug_assert!(rows.windows(2).all(|w| w[0].t <= w[1].t));

    let mut ordered: Vec<&S> = samples.iter().collect();
    ordered.sort_by_key(|s| key(*s));

    let mut matched = 0;
    let mut next = 0;
    for row in rows.iter_mut() {
        while next < ordered.len() && key(ordered[next]) < row.t {
            next += 1;
        }
        if next < ordered.len() && key(ordered[next]) == row.t {
            apply(row, ordered[next]);
            matched += 1;
        }
    }

    matched
}

/// Drop pause rows according to `filter`, returning how many went
pub fn apply_sentinel_filter(rows: &mut Vec<TrackPoint>, filter: SentinelFilter) -> usize {
    let before = rows.len();
    match filter {
        SentinelFilter::Keep => {}
        SentinelFilter::Pair => rows.retain(|row| !is_sentinel_point(row)),
        SentinelFilter::Latitude => rows.retain(|row| row.lat != Some(SENTINEL_LAT)),
    }
    before - rows.len()
}

/// Stable sort by timestamp
pub fn sort_by_timestamp(rows: &mut [TrackPoint]) {
    rows.sort_by_key(|row| row.t);
}

/// Set `seq` to each row's position
pub fn renumber(rows: &mut [TrackPoint]) {
    for (seq, row) in rows.iter_mut().enumerate() {
        row.seq = seq as i64;
    }
}

/// Join speed samples on `seq`
///
/// `rows` must be in ascending `seq` order. Samples whose index matches no
/// row (negative, or past the end) are dropped. First sample per index wins.
///
/// Returns the number of samples used.
pub fn join_by_sequence(rows: &mut [TrackPoint], speeds: &[SpeedSample]) -> usize {
    let mut matched = 0;
    let mut unmatched = 0;

    for sample in speeds {
        match rows.binary_search_by_key(&sample.seq, |row| row.seq) {
            Ok(index) if rows[index].speed.is_none() => {
                rows[index].speed = Some(sample.decimeters_per_sec);
                matched += 1;
            }
            Ok(_) => debug!("Duplicate speed sample for index {}", sample.seq),
            Err(_) => unmatched += 1,
        }
    }

    if unmatched > 0 {
        debug!("{} speed samples had no matching row", unmatched);
    }

    matched
}

/// Replace each empty cell with the nearest earlier value
pub fn forward_fill<'a, T, I>(cells: I)
where
    T: Copy + 'a,
    I: IntoIterator<Item = &'a mut Option<T>>,
{
    let mut last = None;
    for cell in cells {
        match *cell {
            Some(value) => last = Some(value),
            None => *cell = last,
        }
    }
}

/// Replace each empty cell with the nearest later value
pub fn backward_fill<'a, T, I>(cells: I)
where
    T: Copy + 'a,
    I: IntoIterator<Item = &'a mut Option<T>>,
    I::IntoIter: DoubleEndedIterator,
{
    forward_fill(cells.into_iter().rev());
}

/// Forward then backward fill every metric column independently
pub fn fill_gaps(rows: &mut [TrackPoint]) {
    forward_fill(rows.iter_mut().map(|row| &mut row.alt));
    forward_fill(rows.iter_mut().map(|row| &mut row.hr));
    forward_fill(rows.iter_mut().map(|row| &mut row.cadence));
    forward_fill(rows.iter_mut().map(|row| &mut row.speed));

    backward_fill(rows.iter_mut().map(|row| &mut row.alt));
    backward_fill(rows.iter_mut().map(|row| &mut row.hr));
    backward_fill(rows.iter_mut().map(|row| &mut row.cadence));
    backward_fill(rows.iter_mut().map(|row| &mut row.speed));
}
