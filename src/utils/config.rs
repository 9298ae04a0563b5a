//! Crate-wide constants

/// TT - TAI in seconds
pub const TT_TAI_SECONDS: f64 = 32.184;

/// JD of MJD 0
pub const MJD_JD_OFFSET: f64 = 2400000.5;

/// Julian Date of the J2000.0 epoch (TT)
pub const J2000_JD: f64 = 2451545.0;

/// Days per Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

/// Query begin times are rounded to this many seconds before evaluation
pub const BEGIN_ROUND_SECONDS: i64 = 60;

/// Upper bound on the number of samples `generate_timestamps` will produce
pub const MAX_TIMESTAMPS: i64 = 100_000_000;

// Default occultation angles (degrees)
pub const DEFAULT_EARTH_OCCULT: f64 = 28.0;
pub const DEFAULT_SUN_OCCULT: f64 = 46.0;
pub const DEFAULT_MOON_OCCULT: f64 = 22.0;
pub const DEFAULT_RAM_SIZE: f64 = 0.0;
