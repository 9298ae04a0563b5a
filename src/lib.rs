//! Observability windows for a satellite-borne instrument
//!
//! Given a precomputed ephemeris and SAA flags, computes when a fixed
//! RA/Dec target is free of Earth, Sun, Moon, orbital pole, ram and SAA
//! constraints.

pub mod constraints;
pub mod ephemeris;
pub mod error;
pub mod status;
pub mod utils;
pub mod visibility;
pub mod windows;

// Re-export public API
pub use constraints::{
    ConstraintArray, ConstraintConfig, ConstraintEvaluator, ConstraintKind, PolygonSaa, SaaData,
    SaaProvider, TargetDirection,
};
pub use ephemeris::{generate_timestamps, EphemerisData, EphemerisProvider};
pub use error::{Result, VisibilityError};
pub use status::JobStatus;
pub use visibility::{Visibility, NO_VISIBILITY_WARNING};
pub use windows::Window;
