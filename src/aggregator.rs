//! Whole-track reductions. Unlike per-segment degenerate cases, a track that
//! spans zero time or has zero NGS speed overall is invalid input.

use crate::error::{NgsError, Result};
use crate::models::{SegmentRecord, SummaryResult};

pub fn summarize(records: &[SegmentRecord]) -> Result<SummaryResult> {
    let last = records.last().ok_or(NgsError::EmptyTrack)?;
    let total_distance_m = last.cumulative_distance_m;

    let actual_duration_s: f64 = records.iter().map(|r| r.segment_time_delta_s).sum();
    if actual_duration_s == 0.0 {
        return Err(NgsError::DivisionByZero { quantity: "overall average speed" });
    }
    let overall_avg_speed_mps = total_distance_m / actual_duration_s;

    let total_adjusted_distance_m: f64 = records.iter().map(|r| r.adjusted_distance_m).sum();
    let ngs_avg_speed_mps = total_adjusted_distance_m / actual_duration_s;
    if ngs_avg_speed_mps == 0.0 {
        return Err(NgsError::DivisionByZero { quantity: "normalized duration" });
    }
    let normalized_duration_s = total_distance_m / ngs_avg_speed_mps;

    Ok(SummaryResult {
        total_distance_m,
        actual_duration_s,
        overall_avg_speed_mps,
        total_adjusted_distance_m,
        ngs_avg_speed_mps,
        normalized_duration_s,
    })
}
