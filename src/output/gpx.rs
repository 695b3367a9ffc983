//! GPX track output.
//!
//! Renders segments as a GPX 1.1 document with Garmin TrackPointExtension
//! heart rate, cadence and speed, then writes it to disk in one go.

use super::{ensure_parent_dir, validate_path};
use crate::parser::schema::{Segment, TrackPoint};
use crate::utils::config::{
    GPXTPX_NAMESPACE, GPX_CREATOR, GPX_NAMESPACE, GPX_SCHEMA_LOCATION, LEGACY_TIME_FORMAT,
};
use crate::utils::error::OutputError;
use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use log::{debug, info};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Layout of the `<time>` element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFormat {
    /// `DD/MM/YYYY HH:MM:SS TZ` in local time
    #[default]
    Legacy,
    /// RFC 3339 in UTC
    Iso8601,
}

/// GPX rendering configuration
#[derive(Debug, Clone, Default)]
pub struct GpxConfig {
    /// Optional `<name>` of the track
    pub name: Option<String>,
    pub time_format: TimeFormat,
}

impl GpxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }
}

/// Render segments as a GPX document
///
/// **Public** - main entry point for GPX rendering
///
/// Empty segments are skipped, so the document never holds an empty
/// `<trkseg>`.
///
/// # Errors
/// * `OutputError::InvalidTimestamp` - a point time chrono cannot represent
pub fn render_gpx(segments: &[Segment], config: &GpxConfig) -> Result<String, OutputError> {
    let mut doc = String::new();

    // Writing into a String never fails
    let _ = writeln!(doc, r#"<?xml version="1.0" encoding="UTF-8" standalone="no" ?>"#);
    let _ = writeln!(
        doc,
        r#"<gpx xmlns="{}" creator="{}" version="1.1""#,
        GPX_NAMESPACE, GPX_CREATOR
    );
    let _ = writeln!(doc, r#"    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#);
    let _ = writeln!(doc, r#"    xmlns:gpxtpx="{}""#, GPXTPX_NAMESPACE);
    let _ = writeln!(doc, r#"    xsi:schemaLocation="{}">"#, GPX_SCHEMA_LOCATION);
    let _ = writeln!(doc, "    <trk>");

    if let Some(name) = &config.name {
        let _ = writeln!(doc, "        <name>{}</name>", escape_xml(name));
    }

    let mut points = 0;
    for segment in segments.iter().filter(|s| !s.is_empty()) {
        let _ = writeln!(doc, "        <trkseg>");
        for point in &segment.points {
            render_point(&mut doc, point, config.time_format)?;
            points += 1;
        }
        let _ = writeln!(doc, "        </trkseg>");
    }

    let _ = writeln!(doc, "    </trk>");
    let _ = writeln!(doc, "</gpx>");

    debug!(
        "Rendered {} points in {} segments",
        points,
        segments.iter().filter(|s| !s.is_empty()).count()
    );

    Ok(doc)
}

fn render_point(
    doc: &mut String,
    point: &TrackPoint,
    format: TimeFormat,
) -> Result<(), OutputError> {
    let time = format_point_time(point.t, format)?;

    let _ = writeln!(
        doc,
        r#"            <trkpt lat="{}" lon="{}">"#,
        point.lat.unwrap_or_default(),
        point.lon.unwrap_or_default()
    );
    let _ = writeln!(doc, "                <ele>{}</ele>", point.alt.unwrap_or_default());
    let _ = writeln!(doc, "                <time>{}</time>", time);
    let _ = writeln!(doc, "                <extensions>");
    let _ = writeln!(doc, "                    <gpxtpx:TrackPointExtension>");
    let _ = writeln!(
        doc,
        "                        <gpxtpx:hr>{}</gpxtpx:hr>",
        point.hr.unwrap_or_default()
    );
    let _ = writeln!(
        doc,
        "                        <gpxtpx:cad>{}</gpxtpx:cad>",
        point.cadence.unwrap_or_default()
    );
    if let Some(speed) = point.speed_mps() {
        let _ = writeln!(
            doc,
            "                        <gpxtpx:speed>{}</gpxtpx:speed>",
            speed
        );
    }
    let _ = writeln!(doc, "                    </gpxtpx:TrackPointExtension>");
    let _ = writeln!(doc, "                </extensions>");
    let _ = writeln!(doc, "            </trkpt>");

    Ok(())
}

/// Format a point timestamp, legacy layout in the local zone
pub fn format_point_time(t: i64, format: TimeFormat) -> Result<String, OutputError> {
    match format {
        TimeFormat::Legacy => format_legacy_time(t, &Local),
        TimeFormat::Iso8601 => Ok(to_datetime(t, &Utc)?.to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

/// `DD/MM/YYYY HH:MM:SS TZ` in an explicit zone
pub fn format_legacy_time<Tz>(t: i64, tz: &Tz) -> Result<String, OutputError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    Ok(to_datetime(t, tz)?.format(LEGACY_TIME_FORMAT).to_string())
}

fn to_datetime<Tz: TimeZone>(t: i64, tz: &Tz) -> Result<DateTime<Tz>, OutputError> {
    tz.timestamp_opt(t, 0)
        .earliest()
        .ok_or(OutputError::InvalidTimestamp(t))
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write a rendered GPX document to a file
///
/// **Public** - main entry point for GPX output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_gpx(gpx_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing GPX to: {}", output_path.display());

    validate_path(output_path)?;

    ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(gpx_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    debug!("GPX written successfully ({} bytes)", gpx_content.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::LocationFix;
    use chrono::FixedOffset;

    fn segment(points: &[(f64, f64, i64)]) -> Segment {
        Segment {
            points: points
                .iter()
                .enumerate()
                .map(|(i, &(lat, lon, t))| {
                    TrackPoint::from_fix(&LocationFix { lat, lon, t }, i as i64)
                })
                .collect(),
        }
    }

    #[test]
    fn test_render_segments() {
        let mut first = segment(&[(48.85, 2.35, 1_520_000_000)]);
        first.points[0].hr = Some(70);
        first.points[0].alt = Some(35.0);
        first.points[0].speed = Some(25.0);
        let second = segment(&[(48.86, 2.36, 1_520_000_100)]);

        let config = GpxConfig::new().with_time_format(TimeFormat::Iso8601);
        let gpx = render_gpx(&[first, Segment { points: vec![] }, second], &config).unwrap();

        assert_eq!(gpx.matches("<trkseg>").count(), 2);
        assert_eq!(gpx.matches("<trkpt ").count(), 2);
        assert!(gpx.contains(r#"<trkpt lat="48.85" lon="2.35">"#));
        assert!(gpx.contains("<ele>35</ele>"));
        assert!(gpx.contains("<time>2018-03-02T14:13:20Z</time>"));
        assert!(gpx.contains("<gpxtpx:hr>70</gpxtpx:hr>"));
        assert!(gpx.contains("<gpxtpx:speed>2.5</gpxtpx:speed>"));
        assert!(gpx.trim_end().ends_with("</gpx>"));
    }

    #[test]
    fn test_missing_metrics_default_to_zero() {
        let gpx = render_gpx(&[segment(&[(1.0, 2.0, 0)])], &GpxConfig::new()).unwrap();
        assert!(gpx.contains("<ele>0</ele>"));
        assert!(gpx.contains("<gpxtpx:hr>0</gpxtpx:hr>"));
        assert!(gpx.contains("<gpxtpx:cad>0</gpxtpx:cad>"));
        assert!(!gpx.contains("<gpxtpx:speed>"));
    }

    #[test]
    fn test_no_segments() {
        let gpx = render_gpx(&[], &GpxConfig::new()).unwrap();
        assert!(!gpx.contains("<trkseg>"));
        assert!(gpx.contains("<trk>"));
    }

    #[test]
    fn test_legacy_time_format() {
        assert_eq!(
            format_legacy_time(1_520_000_000, &Utc).unwrap(),
            "02/03/2018 14:13:20 UTC"
        );
    }

    #[test]
    fn test_legacy_time_offset_zone() {
        // chrono prints the numeric offset for zones without a name
        let cet = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            format_legacy_time(1_520_000_000, &cet).unwrap(),
            "02/03/2018 15:13:20 +01:00"
        );
    }

    #[test]
    fn test_name_is_escaped() {
        let config = GpxConfig::new().with_name("Run <fast> & far");
        let gpx = render_gpx(&[], &config).unwrap();
        assert!(gpx.contains("<name>Run &lt;fast&gt; &amp; far</name>"));
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let err = format_point_time(i64::MAX, TimeFormat::Iso8601).unwrap_err();
        assert!(matches!(err, OutputError::InvalidTimestamp(_)));
    }
}
