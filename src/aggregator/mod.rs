//! Aggregation of parsed samples into track segments and metrics.
//!
//! This module transforms parsed HiTrack events into:
//! - Per-type sample streams
//! - One merged, gap-filled track table
//! - Track segments split at pause markers
//! - Track summary statistics

pub mod merge;
pub mod metrics;
pub mod segments;
pub mod streams;

// Re-export main types and functions
pub use merge::{merge_streams, MergeOptions, SentinelFilter};
pub use metrics::{format_duration, format_pace, haversine_distance, summarize_track, TrackSummary};
pub use segments::{is_sentinel, is_sentinel_point, split_segments};
pub use streams::{SampleStreams, StreamCounts};

use crate::parser::schema::Segment;

/// Merge the streams and split the result at pauses
pub fn build_segments(streams: &SampleStreams, options: &MergeOptions) -> Vec<Segment> {
    split_segments(merge_streams(streams, options))
}
