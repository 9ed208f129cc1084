use crate::geodesy::DistanceModel;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub distance_model: DistanceModel,
    /// Run the per-segment transform on the rayon pool.
    pub parallel: bool,
    /// Cut the recording at this many meters before analysis.
    pub race_distance_m: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            distance_model: DistanceModel::Geodesic,
            parallel: true,
            race_distance_m: None,
        }
    }
}
