//! Optional pre-filter that cuts a recording at a standard race distance
//! (5 km, 10 km, ...) before it reaches the differencer.

use tracing::{debug, warn};

use crate::error::{NgsError, Result};
use crate::geodesy::{surface_distance_m, DistanceModel};
use crate::models::RawPoint;

pub const FIVE_K_M: f64 = 5_000.0;
pub const TEN_K_M: f64 = 10_000.0;
pub const HALF_MARATHON_M: f64 = 21_097.5;
pub const MARATHON_M: f64 = 42_195.0;

/// Parses `5k`, `10k`, `half`, `marathon` or a plain number of meters.
pub fn parse_race_distance(token: &str) -> Result<f64> {
    let t = token.trim().to_lowercase();
    let meters = match t.as_str() {
        "5k" => FIVE_K_M,
        "10k" => TEN_K_M,
        "half" | "half-marathon" => HALF_MARATHON_M,
        "marathon" => MARATHON_M,
        other => {
            let (number, scale) = match other.strip_suffix("km") {
                Some(km) => (km, 1000.0),
                None => (other.strip_suffix('m').unwrap_or(other), 1.0),
            };
            let value: f64 = number
                .trim()
                .parse()
                .map_err(|_| NgsError::InvalidParameter(format!("race distance '{}'", token)))?;
            value * scale
        }
    };
    if !meters.is_finite() || meters <= 0.0 {
        return Err(NgsError::InvalidParameter(format!("race distance must be positive, got '{}'", token)));
    }
    Ok(meters)
}

/// Keeps points up to and including the first one at or beyond `target_m`.
/// A track shorter than the target is returned whole.
pub fn truncate_to_distance(points: &[RawPoint], target_m: f64, model: DistanceModel) -> Result<Vec<RawPoint>> {
    if !target_m.is_finite() || target_m <= 0.0 {
        return Err(NgsError::InvalidParameter(format!("race distance must be positive, got {}", target_m)));
    }

    let mut covered_m = 0.0;
    for (i, pair) in points.windows(2).enumerate() {
        covered_m += surface_distance_m(
            (pair[0].latitude, pair[0].longitude),
            (pair[1].latitude, pair[1].longitude),
            model,
        );
        if covered_m >= target_m {
            debug!(kept = i + 2, dropped = points.len() - (i + 2), covered_m, "truncated track");
            return Ok(points[..i + 2].to_vec());
        }
    }

    warn!(covered_m, target_m, "track shorter than race distance, keeping all points");
    Ok(points.to_vec())
}
