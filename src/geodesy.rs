//! Horizontal surface distance between two track points.
//! Elevation is never part of the distance; gradient is rise over this run.

use geo::{point, GeodesicDistance, HaversineDistance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceModel {
    /// WGS84 ellipsoid (Karney)
    #[default]
    Geodesic,
    /// Mean-radius sphere
    Haversine,
}

pub fn surface_distance_m(
    (lat_a, lon_a): (f64, f64),
    (lat_b, lon_b): (f64, f64),
    model: DistanceModel,
) -> f64 {
    let a = point!(x: lon_a, y: lat_a);
    let b = point!(x: lon_b, y: lat_b);
    match model {
        DistanceModel::Geodesic => a.geodesic_distance(&b),
        DistanceModel::Haversine => a.haversine_distance(&b),
    }
}
