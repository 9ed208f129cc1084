//! Normalized Graded Speed (NGS)
//!
//! Raw segment speed scaled by an empirically fit quartic in gradient
//! percent. The fit comes from published grade-adjusted-pace research and
//! is used as-is: P(0) is 0.98462, not 1.0.

use rayon::prelude::*;

use crate::models::SegmentRecord;

const NGS_COEFFICIENTS: [f64; 5] = [0.98462, 0.030266, 0.0018814, -3.3882e-06, -4.5704e-07];

/// Gradient correction factor P(g) for a gradient in percent.
pub fn gradient_factor(gradient_pct: f64) -> f64 {
    let g = gradient_pct;
    NGS_COEFFICIENTS[0]
        + NGS_COEFFICIENTS[1] * g
        + NGS_COEFFICIENTS[2] * g.powi(2)
        + NGS_COEFFICIENTS[3] * g.powi(3)
        + NGS_COEFFICIENTS[4] * g.powi(4)
}

pub fn gradient_pct(elevation_delta_m: f64, distance_m: f64) -> f64 {
    if distance_m == 0.0 {
        0.0
    } else {
        elevation_delta_m / distance_m * 100.0
    }
}

pub fn raw_speed_mps(distance_m: f64, time_delta_s: f64) -> f64 {
    if time_delta_s == 0.0 {
        0.0
    } else {
        distance_m / time_delta_s
    }
}

pub fn ngs_mps(raw_speed_mps: f64, gradient_pct: f64) -> f64 {
    if raw_speed_mps == 0.0 {
        0.0
    } else {
        raw_speed_mps * gradient_factor(gradient_pct)
    }
}

/// Fills gradient, raw speed, NGS and adjusted distance from the deltas.
pub fn grade_adjust(record: &mut SegmentRecord) {
    record.gradient_pct = gradient_pct(record.segment_elevation_delta_m, record.segment_distance_m);
    record.raw_speed_mps = raw_speed_mps(record.segment_distance_m, record.segment_time_delta_s);
    record.ngs_mps = ngs_mps(record.raw_speed_mps, record.gradient_pct);
    record.adjusted_distance_m = record.ngs_mps * record.segment_time_delta_s;
}

pub fn grade_adjust_all(records: &mut [SegmentRecord], parallel: bool) {
    if parallel {
        records.par_iter_mut().for_each(grade_adjust);
    } else {
        records.iter_mut().for_each(grade_adjust);
    }
}
