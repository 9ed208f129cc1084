//! Point-series differencing: one forward pass producing per-segment
//! distance, elevation and time deltas.

use crate::error::{NgsError, Result};
use crate::geodesy::{surface_distance_m, DistanceModel};
use crate::models::{RawPoint, SegmentRecord};

/// Builds the delta table. Gradient, speed and NGS columns are left at zero
/// for the transformer to fill in.
pub fn difference_points(points: &[RawPoint], model: DistanceModel) -> Result<Vec<SegmentRecord>> {
    let first = points.first().ok_or(NgsError::EmptyTrack)?;

    let mut records = Vec::with_capacity(points.len());
    records.push(SegmentRecord::sentinel(first));

    let mut cumulative_distance_m = 0.0;
    for (i, pair) in points.windows(2).enumerate() {
        let index = i + 1;
        let (prev, curr) = (&pair[0], &pair[1]);

        let segment_time_delta_s = seconds_between(prev, curr);
        if curr.timestamp < prev.timestamp {
            return Err(NgsError::MalformedInput { index, delta_s: segment_time_delta_s });
        }

        let segment_distance_m = surface_distance_m(
            (prev.latitude, prev.longitude),
            (curr.latitude, curr.longitude),
            model,
        );
        cumulative_distance_m += segment_distance_m;

        records.push(SegmentRecord {
            index,
            timestamp: curr.timestamp,
            latitude: curr.latitude,
            longitude: curr.longitude,
            elevation_m: curr.elevation,
            cumulative_distance_m,
            segment_distance_m,
            segment_elevation_delta_m: curr.elevation - prev.elevation,
            segment_time_delta_s,
            gradient_pct: 0.0,
            raw_speed_mps: 0.0,
            ngs_mps: 0.0,
            adjusted_distance_m: 0.0,
        });
    }

    Ok(records)
}

/// Sub-second precision down to nanoseconds; spans too long for i64
/// nanoseconds fall back to microseconds, then milliseconds.
fn seconds_between(prev: &RawPoint, curr: &RawPoint) -> f64 {
    let delta = curr.timestamp - prev.timestamp;
    if let Some(ns) = delta.num_nanoseconds() {
        ns as f64 / 1e9
    } else if let Some(us) = delta.num_microseconds() {
        us as f64 / 1e6
    } else {
        delta.num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn t(seconds: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 8, 7)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + Duration::seconds(seconds)
    }

    #[test]
    fn test_empty_track_is_rejected() {
        let result = difference_points(&[], DistanceModel::Geodesic);
        assert!(matches!(result, Err(NgsError::EmptyTrack)));
    }

    #[test]
    fn test_single_point_yields_only_sentinel() {
        let points = [RawPoint::new(45.0, 7.0, 300.0, t(0))];
        let records = difference_points(&points, DistanceModel::Geodesic).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].segment_distance_m, 0.0);
        assert_eq!(records[0].segment_time_delta_s, 0.0);
        assert_eq!(records[0].cumulative_distance_m, 0.0);
    }

    #[test]
    fn test_deltas_for_two_points() {
        let points = [
            RawPoint::new(0.0, 0.0, 100.0, t(0)),
            RawPoint::new(0.0001, 0.0, 105.0, t(10)),
        ];
        let records = difference_points(&points, DistanceModel::Geodesic).unwrap();

        assert_eq!(records.len(), 2);
        assert!((records[1].segment_distance_m - 11.0574).abs() < 0.001);
        assert_eq!(records[1].segment_elevation_delta_m, 5.0);
        assert_eq!(records[1].segment_time_delta_s, 10.0);
        assert_eq!(records[1].cumulative_distance_m, records[1].segment_distance_m);
        assert_eq!(records[1].elevation_m, 105.0);
    }

    #[test]
    fn test_descent_is_negative_delta() {
        let points = [
            RawPoint::new(0.0, 0.0, 110.0, t(0)),
            RawPoint::new(0.0, 0.0001, 104.5, t(5)),
        ];
        let records = difference_points(&points, DistanceModel::Haversine).unwrap();
        assert_eq!(records[1].segment_elevation_delta_m, -5.5);
    }

    #[test]
    fn test_duplicate_points_are_tolerated() {
        let points = [
            RawPoint::new(10.0, 10.0, 50.0, t(0)),
            RawPoint::new(10.0, 10.0, 50.0, t(0)),
            RawPoint::new(10.0, 10.0, 51.0, t(3)),
        ];
        let records = difference_points(&points, DistanceModel::Geodesic).unwrap();

        assert_eq!(records[1].segment_distance_m, 0.0);
        assert_eq!(records[1].segment_time_delta_s, 0.0);
        assert_eq!(records[2].segment_time_delta_s, 3.0);
    }

    #[test]
    fn test_out_of_order_timestamps_fail_with_index() {
        let points = [
            RawPoint::new(0.0, 0.0, 0.0, t(0)),
            RawPoint::new(0.0, 0.0001, 0.0, t(10)),
            RawPoint::new(0.0, 0.0002, 0.0, t(8)),
        ];
        match difference_points(&points, DistanceModel::Geodesic) {
            Err(NgsError::MalformedInput { index, delta_s }) => {
                assert_eq!(index, 2);
                assert_eq!(delta_s, -2.0);
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_sub_millisecond_reversal_is_malformed() {
        let start = t(0);
        let points = [
            RawPoint::new(0.0, 0.0, 0.0, start + Duration::microseconds(500)),
            RawPoint::new(0.0, 0.00001, 0.0, start),
        ];
        match difference_points(&points, DistanceModel::Geodesic) {
            Err(NgsError::MalformedInput { index, delta_s }) => {
                assert_eq!(index, 1);
                assert!(delta_s < 0.0);
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_sub_millisecond_step_keeps_speed() {
        let start = t(0);
        let points = [
            RawPoint::new(0.0, 0.0, 0.0, start),
            RawPoint::new(0.0, 0.00001, 0.0, start + Duration::microseconds(900)),
        ];
        let records = difference_points(&points, DistanceModel::Geodesic).unwrap();
        assert!((records[1].segment_time_delta_s - 0.0009).abs() < 1e-12);
        assert!(records[1].segment_time_delta_s > 0.0);
    }

    #[test]
    fn test_fractional_seconds_kept() {
        let start = t(0);
        let points = [
            RawPoint::new(0.0, 0.0, 0.0, start),
            RawPoint::new(0.0, 0.00001, 0.0, start + Duration::milliseconds(1500)),
        ];
        let records = difference_points(&points, DistanceModel::Geodesic).unwrap();
        assert_eq!(records[1].segment_time_delta_s, 1.5);
    }

    #[test]
    fn test_cumulative_distance_is_monotonic_and_sums_segments() {
        let points: Vec<RawPoint> = (0..50)
            .map(|i| {
                let wobble = if i % 3 == 0 { 0.0 } else { 0.00003 };
                RawPoint::new(46.0 + i as f64 * 0.00005, 7.0 + wobble, 500.0 + (i % 7) as f64, t(i * 4))
            })
            .collect();
        let records = difference_points(&points, DistanceModel::Geodesic).unwrap();

        for pair in records.windows(2) {
            assert!(pair[1].cumulative_distance_m >= pair[0].cumulative_distance_m);
        }

        let summed: f64 = records.iter().map(|r| r.segment_distance_m).sum();
        let last = records.last().unwrap().cumulative_distance_m;
        assert!((summed - last).abs() < 1e-9);
    }
}
