/// Constraint configuration and result types
///
/// A target is *blocked* at a sample when any enabled constraint flags it:
/// - Earth limb (angular separation from Earth center within limb + margin)
/// - Sun and Moon proximity
/// - Orbital pole avoidance band
/// - Ram (velocity vector) avoidance
/// - South Atlantic Anomaly passage
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Result, VisibilityError};
use crate::utils::config::{
    DEFAULT_EARTH_OCCULT, DEFAULT_MOON_OCCULT, DEFAULT_RAM_SIZE, DEFAULT_SUN_OCCULT,
};

/// Cause reported by constraint attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Sun,
    Moon,
    Earth,
    Saa,
    /// Target is not blocked
    None,
    /// Sample lies outside the query's [begin, end] range
    Window,
    /// Blocked, but not by any constraint in the attribution order
    Unknown,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Sun => "Sun",
            ConstraintKind::Moon => "Moon",
            ConstraintKind::Earth => "Earth",
            ConstraintKind::Saa => "SAA",
            ConstraintKind::None => "None",
            ConstraintKind::Window => "Window",
            ConstraintKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-sample blocked flags for a constraint that depends on optional
/// ephemeris data (ram, pole).
///
/// `Unavailable` means the constraint cannot be evaluated and must not be
/// applied; it never means "not blocked".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintArray<'a> {
    Available(&'a Array1<bool>),
    Unavailable,
}

impl<'a> ConstraintArray<'a> {
    pub fn is_available(&self) -> bool {
        matches!(self, ConstraintArray::Available(_))
    }

    pub fn as_array(&self) -> Option<&'a Array1<bool>> {
        match *self {
            ConstraintArray::Available(arr) => Some(arr),
            ConstraintArray::Unavailable => None,
        }
    }
}

/// Which constraints apply, and how large each avoidance zone is.
///
/// Extra margins are added to the occultation angles only for targets that
/// are not satellite-relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    pub earth_cons: bool,
    pub sun_cons: bool,
    pub moon_cons: bool,
    pub pole_cons: bool,
    pub ram_cons: bool,
    pub saa_cons: bool,
    /// Earth limb angle in degrees, added to the Earth's angular radius
    pub earth_occult: f64,
    pub sun_occult: f64,
    pub moon_occult: f64,
    /// Half-angle of the ram avoidance cone in degrees
    pub ram_size: f64,
    pub earth_extra: f64,
    pub sun_extra: f64,
    pub moon_extra: f64,
    pub ram_extra: f64,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        ConstraintConfig {
            earth_cons: true,
            sun_cons: true,
            moon_cons: true,
            pole_cons: false,
            ram_cons: false,
            saa_cons: true,
            earth_occult: DEFAULT_EARTH_OCCULT,
            sun_occult: DEFAULT_SUN_OCCULT,
            moon_occult: DEFAULT_MOON_OCCULT,
            ram_size: DEFAULT_RAM_SIZE,
            earth_extra: 0.0,
            sun_extra: 0.0,
            moon_extra: 0.0,
            ram_extra: 0.0,
        }
    }
}

impl ConstraintConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ConstraintConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Reject occultation angles that are negative, and any angle that is
    /// not finite. Extra margins may be negative to shrink a zone.
    pub fn validate(&self) -> Result<()> {
        let occults = [
            ("earth_occult", self.earth_occult),
            ("sun_occult", self.sun_occult),
            ("moon_occult", self.moon_occult),
            ("ram_size", self.ram_size),
        ];
        let extras = [
            ("earth_extra", self.earth_extra),
            ("sun_extra", self.sun_extra),
            ("moon_extra", self.moon_extra),
            ("ram_extra", self.ram_extra),
        ];
        for (name, value) in occults.iter().chain(extras.iter()) {
            if !value.is_finite() {
                return Err(VisibilityError::InvalidConfig(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }
        for (name, value) in occults {
            if value < 0.0 {
                return Err(VisibilityError::InvalidConfig(format!(
                    "{name} must be non-negative (got {value})"
                )));
            }
        }
        Ok(())
    }

    pub fn name(&self) -> String {
        let enabled: Vec<&str> = [
            (self.earth_cons, "Earth"),
            (self.sun_cons, "Sun"),
            (self.moon_cons, "Moon"),
            (self.pole_cons, "Pole"),
            (self.ram_cons, "Ram"),
            (self.saa_cons, "SAA"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();
        format!("Visibility({})", enabled.join("+"))
    }
}
