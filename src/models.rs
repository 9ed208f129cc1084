use chrono::NaiveDateTime;
use serde::Serialize;

/// One recorded track point, timezone already normalized away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub timestamp: NaiveDateTime,
}

impl RawPoint {
    pub fn new(latitude: f64, longitude: f64, elevation: f64, timestamp: NaiveDateTime) -> Self {
        RawPoint { latitude, longitude, elevation, timestamp }
    }
}

/// Derived metrics for the step from the previous point to this one.
///
/// Index 0 is a sentinel with every delta at zero so the table lines up
/// 1:1 with the input points.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRecord {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub cumulative_distance_m: f64,
    pub segment_distance_m: f64,
    pub segment_elevation_delta_m: f64,
    pub segment_time_delta_s: f64,
    pub gradient_pct: f64,
    pub raw_speed_mps: f64,
    pub ngs_mps: f64,
    pub adjusted_distance_m: f64,
}

impl SegmentRecord {
    pub fn sentinel(point: &RawPoint) -> Self {
        SegmentRecord {
            index: 0,
            timestamp: point.timestamp,
            latitude: point.latitude,
            longitude: point.longitude,
            elevation_m: point.elevation,
            cumulative_distance_m: 0.0,
            segment_distance_m: 0.0,
            segment_elevation_delta_m: 0.0,
            segment_time_delta_s: 0.0,
            gradient_pct: 0.0,
            raw_speed_mps: 0.0,
            ngs_mps: 0.0,
            adjusted_distance_m: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    pub total_distance_m: f64,
    pub actual_duration_s: f64,
    pub overall_avg_speed_mps: f64,
    pub total_adjusted_distance_m: f64,
    pub ngs_avg_speed_mps: f64,
    pub normalized_duration_s: f64,
}

impl SummaryResult {
    /// Seconds the flat-ground equivalent would take beyond the actual time.
    /// Negative when the course was harder than flat. The baseline is
    /// P(0) = 0.98462, not 1.0, so a flat track comes out slightly positive.
    pub fn time_difference_s(&self) -> f64 {
        self.normalized_duration_s - self.actual_duration_s
    }
}

#[derive(Debug, Clone)]
pub struct TrackAnalysis {
    pub segments: Vec<SegmentRecord>,
    pub summary: SummaryResult,
}
