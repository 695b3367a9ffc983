//! Configuration and constants for the converter.

/// Marker every original HiTrack export carries in its file name
pub const HITRACK_MARKER: &str = "HiTrack_";

/// Width of the start timestamp (epoch milliseconds) in a HiTrack file name
pub const NAME_START_DIGITS: usize = 13;

/// Trailing characters after the end timestamp in a HiTrack file name
pub const NAME_SUFFIX_LEN: usize = 5;

/// Extension of converted tracks
pub const OUTPUT_EXTENSION: &str = "gpx";

// Pause sentinel written by the watch in place of a real fix
pub const SENTINEL_LAT: f64 = 90.0;
pub const SENTINEL_LON: f64 = -80.0;

// Timestamp unit detection
pub const MILLIS_EXPONENT_MARKER: &str = "E12";
pub const MILLIS_DIGITS: usize = 13;

/// `p-m` keys are distance in 1/10000 m
pub const PACE_KEY_DIVISOR: i64 = 10_000;

// Record separators
pub const FIELD_SEPARATOR: char = ';';
pub const VALUE_SEPARATOR: char = '=';

// GPX document constants
pub const GPX_CREATOR: &str = "hitrack-gpx";
pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
pub const GPX_SCHEMA_LOCATION: &str =
    "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd";
pub const GPXTPX_NAMESPACE: &str = "http://www.garmin.com/xmlschemas/TrackPointExtension/v1";

/// Legacy `<time>` layout (local time)
///
/// `%Z` renders as `UTC` for [`chrono::Utc`] and as a numeric offset such as
/// `+01:00` for local and fixed zones; chrono has no zone abbreviations.
pub const LEGACY_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S %Z";

/// Current JSON dump schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Mean Earth radius used for track distance
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
