//! Ephemeris inputs consumed by the visibility calculation

pub mod ephemeris_common;

pub use ephemeris_common::{generate_timestamps, EphemerisData, EphemerisProvider};
