use thiserror::Error;

#[derive(Error, Debug)]
pub enum NgsError {
    #[error("track contains no points")]
    EmptyTrack,
    #[error("timestamps out of order at segment {index}: time delta {delta_s}s")]
    MalformedInput { index: usize, delta_s: f64 },
    #[error("division by zero computing {quantity}")]
    DivisionByZero { quantity: &'static str },
    #[error("waypoint {index} has no {field}")]
    MissingField { index: usize, field: &'static str },
    #[error("track {track} segment {segment} not found")]
    TrackNotFound { track: usize, segment: usize },
    #[error("failed to parse GPX file: {0}")]
    Gpx(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, NgsError>;
