use std::path::Path;

use hitrack_gpx::aggregator::{summarize_track, SampleStreams};
use hitrack_gpx::output::{ensure_parent_dir, validate_path};
use hitrack_gpx::output::{
    read_track_json, render_gpx, write_gpx, write_track_json, GpxConfig, TimeFormat,
    TrackDocument,
};
use hitrack_gpx::parser::{LocationFix, Segment, TrackPoint};
use hitrack_gpx::utils::error::OutputError;
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn create_test_segments() -> Vec<Segment> {
    let mut first = TrackPoint::from_fix(
        &LocationFix {
            lat: 48.85,
            lon: 2.35,
            t: 1_520_000_000,
        },
        0,
    );
    first.hr = Some(70);
    first.alt = Some(35.5);
    first.speed = Some(28.0);

    let second = TrackPoint::from_fix(
        &LocationFix {
            lat: 48.86,
            lon: 2.36,
            t: 1_520_000_060,
        },
        1,
    );

    vec![
        Segment {
            points: vec![first],
        },
        Segment { points: Vec::new() },
        Segment {
            points: vec![second],
        },
    ]
}

#[test]
fn test_render_gpx_iso() {
    let config = GpxConfig::new()
        .with_name("morning run")
        .with_time_format(TimeFormat::Iso8601);
    let gpx = render_gpx(&create_test_segments(), &config).unwrap();

    assert!(gpx.starts_with("<?xml"));
    assert!(gpx.contains("<name>morning run</name>"));
    assert_eq!(gpx.matches("<trkseg>").count(), 2);
    assert_eq!(gpx.matches("<trkpt ").count(), 2);
    assert!(gpx.contains(r#"<trkpt lat="48.85" lon="2.35">"#));
    assert!(gpx.contains("<time>2018-03-02T14:13:20Z</time>"));
    assert!(gpx.contains("<gpxtpx:hr>70</gpxtpx:hr>"));
    assert!(gpx.contains("<gpxtpx:speed>2.8</gpxtpx:speed>"));
    assert_eq!(gpx.matches("<gpxtpx:speed>").count(), 1);
    assert!(gpx.trim_end().ends_with("</gpx>"));
}

#[test]
fn test_render_gpx_no_segments() {
    let gpx = render_gpx(&[], &GpxConfig::new()).unwrap();
    assert!(gpx.contains("<trk>"));
    assert!(!gpx.contains("<trkseg>"));
}

#[test]
fn test_write_gpx() {
    let temp_file = NamedTempFile::new().unwrap();
    let gpx = render_gpx(&create_test_segments(), &GpxConfig::new()).unwrap();

    write_gpx(&gpx, temp_file.path()).unwrap();

    let written = std::fs::read_to_string(temp_file.path()).unwrap();
    assert_eq!(written, gpx);
}

#[test]
fn test_write_and_read_track_json() {
    let segments = create_test_segments();
    let summary = summarize_track(&segments, &SampleStreams::new());
    let document = TrackDocument::new("HiTrack_test", segments, summary);
    let temp_file = NamedTempFile::new().unwrap();

    write_track_json(&document, temp_file.path()).unwrap();
    let loaded = read_track_json(temp_file.path()).unwrap();

    assert_eq!(loaded, document);
    assert_eq!(loaded.summary.point_count, 2);
}

#[test]
fn test_validate_output_path_empty() {
    let result = validate_path(Path::new(""));
    assert!(result.is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = validate_path(temp_dir.path());
    assert!(result.is_err());
}

#[test]
fn test_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("track.gpx");

    write_gpx("<gpx/>", &nested).unwrap();

    assert!(nested.exists());
}

#[test]
fn test_parent_dir_under_file_is_rejected() {
    let blocker = NamedTempFile::new().unwrap();
    let target = blocker.path().join("sub").join("track.json");

    let result = ensure_parent_dir(&target);

    assert!(matches!(result, Err(OutputError::InvalidPath(_))));
}
