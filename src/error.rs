use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisibilityError {
    #[error("RA must be in range [0, 360) degrees, got {0}")]
    InvalidRa(f64),
    #[error("Dec must be in range [-90, 90] degrees, got {0}")]
    InvalidDec(f64),
    #[error("begin ({begin}) must be before end ({end})")]
    InvalidTimeRange {
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("time {0} is outside of the ephemeris range")]
    OutsideEphemeris(DateTime<Utc>),
    #[error("SAA array has {saa} samples but the ephemeris has {ephem}")]
    SaaLengthMismatch { saa: usize, ephem: usize },
    #[error("ephemeris array '{name}' has shape {shape:?}, expected ({expected}, 3)")]
    BadShape {
        name: &'static str,
        shape: Vec<usize>,
        expected: usize,
    },
    #[error("array '{name}' has {len} samples, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        len: usize,
        expected: usize,
    },
    #[error("timestamps must be strictly increasing (violated at index {0})")]
    NonIncreasingTimes(usize),
    #[error("step_size must be positive")]
    InvalidStepSize,
    #[error("time range would generate approximately {0} timestamps (max: {1}), use a larger step_size")]
    TooManyTimestamps(i64, i64),
    #[error("invalid constraint configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VisibilityError>;
