//! Normalized graded speed (NGS) for running GPS tracks.
//!
//! A recording is differenced point by point, each segment's speed is
//! scaled by a gradient polynomial, and the table is reduced to an average
//! NGS and the finish time the same effort would give on a flat course.

pub mod aggregator;
pub mod batch_processor;
pub mod config;
pub mod error;
pub mod geodesy;
pub mod gpx_loader;
pub mod models;
pub mod ngs_transformer;
pub mod race_distance_filter;
pub mod report;
pub mod segment_differencer;

use tracing::debug;

pub use config::AnalysisConfig;
pub use error::{NgsError, Result};
pub use geodesy::DistanceModel;
pub use gpx_loader::LoadOptions;
pub use models::{RawPoint, SegmentRecord, SummaryResult, TrackAnalysis};

/// Runs the full pipeline with default settings.
pub fn compute(points: &[RawPoint]) -> Result<TrackAnalysis> {
    compute_with(points, &AnalysisConfig::default())
}

pub fn compute_with(points: &[RawPoint], config: &AnalysisConfig) -> Result<TrackAnalysis> {
    let truncated;
    let points = match config.race_distance_m {
        Some(target_m) => {
            truncated = race_distance_filter::truncate_to_distance(points, target_m, config.distance_model)?;
            &truncated[..]
        }
        None => points,
    };

    let mut segments = segment_differencer::difference_points(points, config.distance_model)?;
    ngs_transformer::grade_adjust_all(&mut segments, config.parallel);
    let summary = aggregator::summarize(&segments)?;

    debug!(
        segments = segments.len(),
        distance_m = summary.total_distance_m,
        ngs_avg_mps = summary.ngs_avg_speed_mps,
        "computed track analysis"
    );

    Ok(TrackAnalysis { segments, summary })
}
