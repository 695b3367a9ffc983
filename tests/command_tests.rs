use std::fs;
use std::path::PathBuf;

use hitrack_gpx::aggregator::MergeOptions;
use hitrack_gpx::commands::{
    convert_file, convert_reader, discover_inputs, execute_convert, inspect_file, validate_args,
    ConvertArgs,
};
use hitrack_gpx::output::{read_track_json, TimeFormat};
use hitrack_gpx::parser::TrackName;
use pretty_assertions::assert_eq;

const TRACK_FILE: &str = "HiTrack_1520000000000152000360000030001";

const TRACK_LOG: &str = "\
type=lbs;k=0;lat=48.85;lon=2.35;alt=0;t=1520000000000
type=h-r;k=1520000000;v=70
type=alti;k=1520000000;v=35
type=lbs;k=1;lat=48.8505;lon=2.3505;alt=0;t=1520000010000
type=rs;k=1;v=30
type=lbs;k=2;lat=90.0;lon=-80.0;alt=0;t=1520000020000
type=lbs;k=3;lat=48.851;lon=2.351;alt=0;t=1520000030000
type=h-r;k=1520000030;v=120
type=p-m;k=10000000;v=330
type=odd-sensor;k=1;v=1
";

fn write_track(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_convert_args_default() {
    let args = ConvertArgs::default();
    assert!(args.inputs.is_empty());
    assert_eq!(args.output_dir, PathBuf::from("."));
    assert_eq!(args.time_format, TimeFormat::Legacy);
    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_missing_scan_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let args = ConvertArgs {
        scan_dir: temp_dir.path().join("missing"),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_convert_file_end_to_end() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_track(temp_dir.path(), TRACK_FILE, TRACK_LOG);
    let out_dir = temp_dir.path().join("gpx");
    let json_dir = temp_dir.path().join("json");

    let args = ConvertArgs {
        output_dir: out_dir.clone(),
        time_format: TimeFormat::Iso8601,
        json_dir: Some(json_dir.clone()),
        ..Default::default()
    };

    let track = convert_file(&input, &args).unwrap();

    let expected_name = TrackName::parse(TRACK_FILE)
        .unwrap()
        .local_output_file_name()
        .unwrap();
    assert_eq!(track.output, out_dir.join(&expected_name));
    assert_eq!(track.points, 3);
    assert_eq!(track.segments, 2);

    let gpx = fs::read_to_string(&track.output).unwrap();
    assert_eq!(gpx.matches("<trkseg>").count(), 2);
    assert_eq!(gpx.matches("<trkpt ").count(), 3);
    assert!(gpx.contains("<time>2018-03-02T14:13:20Z</time>"));
    assert!(gpx.contains("<gpxtpx:hr>120</gpxtpx:hr>"));
    assert!(!gpx.contains(r#"lat="90""#));

    let json_path = json_dir.join(PathBuf::from(&expected_name).with_extension("json"));
    let document = read_track_json(json_path).unwrap();
    assert_eq!(document.segments.len(), 2);
    assert_eq!(document.summary.best_pace, Some(330));
    assert_eq!(document.summary.streams.locations, 4);
}

#[test]
fn test_malformed_log_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_track(
        temp_dir.path(),
        TRACK_FILE,
        "type=lbs;k=0;lat=48.85;lon=2.35;alt=0;t=1520000000000\ntype=h-r;k=abc;v=70\n",
    );
    let out_dir = temp_dir.path().join("gpx");
    let args = ConvertArgs {
        output_dir: out_dir.clone(),
        ..Default::default()
    };

    assert!(convert_file(&input, &args).is_err());
    assert!(!out_dir.exists());
}

#[test]
fn test_failed_json_dump_leaves_no_gpx() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_track(temp_dir.path(), TRACK_FILE, TRACK_LOG);
    let blocker = write_track(temp_dir.path(), "blocker", "");
    let out_dir = temp_dir.path().join("gpx");
    let args = ConvertArgs {
        output_dir: out_dir.clone(),
        json_dir: Some(blocker.join("json")),
        ..Default::default()
    };

    assert!(convert_file(&input, &args).is_err());

    let leftovers: Vec<PathBuf> = fs::read_dir(&out_dir)
        .map(|entries| entries.map(|e| e.unwrap().path()).collect())
        .unwrap_or_default();
    assert_eq!(leftovers, Vec::<PathBuf>::new());
}

#[test]
fn test_invalid_file_name_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_track(temp_dir.path(), "HiTrack_123", TRACK_LOG);
    let args = ConvertArgs {
        output_dir: temp_dir.path().join("gpx"),
        ..Default::default()
    };

    assert!(convert_file(&input, &args).is_err());
}

#[test]
fn test_execute_convert_scans_and_continues() {
    let temp_dir = tempfile::tempdir().unwrap();
    let logs = temp_dir.path().join("logs");
    fs::create_dir_all(logs.join("nested")).unwrap();
    write_track(&logs, TRACK_FILE, TRACK_LOG);
    write_track(
        &logs.join("nested"),
        "HiTrack_1520100000000152010360000030002",
        "type=lbs;k=0;lat=1.0\n",
    );
    write_track(&logs, "notes.txt", "not a track");

    let found = discover_inputs(&logs).unwrap();
    assert_eq!(found.len(), 2);

    let args = ConvertArgs {
        scan_dir: logs,
        output_dir: temp_dir.path().join("gpx"),
        ..Default::default()
    };
    let report = execute_convert(&args).unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.converted.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert!(!report.is_success());
}

#[test]
fn test_convert_reader_without_fixes() {
    let (segments, summary) =
        convert_reader("type=h-r;k=1000;v=70\n".as_bytes(), &MergeOptions::default()).unwrap();

    assert!(segments.is_empty());
    assert_eq!(summary.point_count, 0);
    assert_eq!(summary.streams.heart_rates, 1);
}

#[test]
fn test_inspect_file_counts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_track(temp_dir.path(), TRACK_FILE, TRACK_LOG);

    let streams = inspect_file(&input).unwrap();
    let counts = streams.counts();

    assert_eq!(counts.locations, 4);
    assert_eq!(counts.heart_rates, 2);
    assert_eq!(counts.speeds, 1);
    assert_eq!(counts.paces, 1);
}
