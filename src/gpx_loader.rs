//! GPX loading: reads one track segment into an ordered `RawPoint` series.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use gpx::{read, Gpx, Waypoint};
use tracing::{debug, info, warn};

use crate::error::{NgsError, Result};
use crate::models::RawPoint;

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub track_index: usize,
    pub segment_index: usize,
    /// Drop waypoints without elevation or time instead of failing.
    pub skip_incomplete: bool,
}

pub fn load_track(path: &Path, options: &LoadOptions) -> Result<Vec<RawPoint>> {
    let file = File::open(path)?;
    let points = parse_track(BufReader::new(file), options)?;
    info!(file = %path.display(), points = points.len(), "loaded track");
    Ok(points)
}

pub fn parse_track<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<RawPoint>> {
    let gpx = read(reader).map_err(|e| NgsError::Gpx(e.to_string()))?;
    extract_points(&gpx, options)
}

/// Track name of the selected track, if the file carries one.
pub fn track_name(gpx: &Gpx, options: &LoadOptions) -> Option<String> {
    gpx.tracks.get(options.track_index).and_then(|t| t.name.clone())
}

pub fn extract_points(gpx: &Gpx, options: &LoadOptions) -> Result<Vec<RawPoint>> {
    let not_found = NgsError::TrackNotFound {
        track: options.track_index,
        segment: options.segment_index,
    };
    let segment = gpx
        .tracks
        .get(options.track_index)
        .and_then(|track| track.segments.get(options.segment_index))
        .ok_or(not_found)?;

    let mut points = Vec::with_capacity(segment.points.len());
    let mut skipped = 0;

    for (index, waypoint) in segment.points.iter().enumerate() {
        match waypoint_to_raw(index, waypoint) {
            Ok(point) => points.push(point),
            Err(NgsError::MissingField { index, field }) if options.skip_incomplete => {
                debug!(index, field, "skipping incomplete waypoint");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = points.len(), "dropped waypoints without elevation or time");
    }
    if points.is_empty() {
        return Err(NgsError::EmptyTrack);
    }

    Ok(points)
}

fn waypoint_to_raw(index: usize, waypoint: &Waypoint) -> Result<RawPoint> {
    let elevation = waypoint
        .elevation
        .ok_or(NgsError::MissingField { index, field: "elevation" })?;
    let time = waypoint
        .time
        .as_ref()
        .ok_or(NgsError::MissingField { index, field: "time" })?;
    let formatted = time.format().map_err(|e| NgsError::Gpx(e.to_string()))?;
    let timestamp = naive_utc(&formatted)
        .ok_or_else(|| NgsError::Gpx(format!("unreadable timestamp '{}' at waypoint {}", formatted, index)))?;

    let p = waypoint.point();
    Ok(RawPoint::new(p.y(), p.x(), elevation, timestamp))
}

/// Converts an RFC 3339 timestamp to UTC and drops the offset.
fn naive_utc(rfc3339: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(rfc3339).ok().map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning Run</name>
    <trkseg>
      <trkpt lat="0.0" lon="0.0"><ele>100.0</ele><time>2020-08-07T10:00:00+02:00</time></trkpt>
      <trkpt lat="0.0001" lon="0.0"><ele>105.0</ele><time>2020-08-07T08:00:10Z</time></trkpt>
      <trkpt lat="0.0002" lon="0.0"><time>2020-08-07T08:00:20Z</time></trkpt>
      <trkpt lat="0.0003" lon="0.0"><ele>106.0</ele><time>2020-08-07T08:00:30Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_incomplete_waypoint_fails_by_default() {
        let result = parse_track(Cursor::new(SAMPLE), &LoadOptions::default());
        assert!(matches!(
            result,
            Err(NgsError::MissingField { index: 2, field: "elevation" })
        ));
    }

    #[test]
    fn test_skip_incomplete_and_normalize_offsets() {
        let options = LoadOptions { skip_incomplete: true, ..LoadOptions::default() };
        let points = parse_track(Cursor::new(SAMPLE), &options).unwrap();

        assert_eq!(points.len(), 3);
        let expected_start = NaiveDate::from_ymd_opt(2020, 8, 7).unwrap().and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(points[0].timestamp, expected_start);
        assert_eq!((points[1].timestamp - points[0].timestamp).num_seconds(), 10);
        assert_eq!(points[1].latitude, 0.0001);
        assert_eq!(points[1].longitude, 0.0);
        assert_eq!(points[2].elevation, 106.0);
    }

    #[test]
    fn test_missing_track_reported() {
        let options = LoadOptions { track_index: 1, ..LoadOptions::default() };
        let result = parse_track(Cursor::new(SAMPLE), &options);
        assert!(matches!(result, Err(NgsError::TrackNotFound { track: 1, segment: 0 })));
    }

    #[test]
    fn test_track_name() {
        let gpx = read(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(track_name(&gpx, &LoadOptions::default()).as_deref(), Some("Morning Run"));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let result = parse_track(Cursor::new("not a gpx file"), &LoadOptions::default());
        assert!(matches!(result, Err(NgsError::Gpx(_))));
    }
}
