//! Constraint evaluation modules
//!
//! Earth limb, Sun and Moon proximity, orbital pole and ram avoidance, and
//! South Atlantic Anomaly passage, each evaluated into a per-sample blocked
//! array over the active slice of an ephemeris.

pub mod core;
pub mod evaluator;
pub mod saa;

// Re-export main types
pub use self::core::{ConstraintArray, ConstraintConfig, ConstraintKind};
pub use evaluator::{ConstraintEvaluator, TargetDirection};
pub use saa::{PolygonSaa, SaaData, SaaProvider};
