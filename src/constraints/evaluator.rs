//! Per-constraint blocked arrays over the active slice of an ephemeris
//!
//! Each array is computed on first access and cached for the lifetime of
//! the evaluator, so the window synthesizer and the attribution classifier
//! read the same data without recomputing separations.

use chrono::{DateTime, Utc};
use ndarray::{s, Array1, ArrayView1, ArrayView2};
use once_cell::unsync::OnceCell;
use std::ops::Range;
use tracing::debug;

use super::core::{ConstraintArray, ConstraintConfig};
use super::saa::SaaProvider;
use crate::ephemeris::EphemerisProvider;
use crate::utils::precession::precess_to_date;
use crate::utils::vector_math::{
    angular_separation_deg, negate_vector, radec_to_unit_vector, row_vector,
};

/// Target pointing resolved into the ephemeris frame
#[derive(Debug, Clone, PartialEq)]
pub enum TargetDirection {
    /// Same unit vector for every sample
    Fixed([f64; 3]),
    /// One unit vector per sample (mean equinox of each sample's date)
    PerSample(Vec<[f64; 3]>),
}

impl TargetDirection {
    #[inline]
    pub fn at(&self, i: usize) -> &[f64; 3] {
        match self {
            TargetDirection::Fixed(v) => v,
            TargetDirection::PerSample(vs) => &vs[i],
        }
    }
}

pub struct ConstraintEvaluator<'a> {
    ephem: &'a dyn EphemerisProvider,
    saa: &'a dyn SaaProvider,
    ra: f64,
    dec: f64,
    isat: bool,
    config: ConstraintConfig,
    range: Range<usize>,
    target: OnceCell<TargetDirection>,
    earth: OnceCell<Array1<bool>>,
    sun: OnceCell<Array1<bool>>,
    moon: OnceCell<Array1<bool>>,
    ram: OnceCell<Option<Array1<bool>>>,
    pole: OnceCell<Option<Array1<bool>>>,
}

impl<'a> ConstraintEvaluator<'a> {
    /// `range` is the `[ephstart, ephstop)` slice of the ephemeris grid and
    /// must lie within it.
    pub fn new(
        ephem: &'a dyn EphemerisProvider,
        saa: &'a dyn SaaProvider,
        ra: f64,
        dec: f64,
        isat: bool,
        config: ConstraintConfig,
        range: Range<usize>,
    ) -> Self {
        ConstraintEvaluator {
            ephem,
            saa,
            ra,
            dec,
            isat,
            config,
            range,
            target: OnceCell::new(),
            earth: OnceCell::new(),
            sun: OnceCell::new(),
            moon: OnceCell::new(),
            ram: OnceCell::new(),
            pole: OnceCell::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn config(&self) -> &ConstraintConfig {
        &self.config
    }

    pub fn timestamps(&self) -> &'a [DateTime<Utc>] {
        &self.ephem.timestamps()[self.range.clone()]
    }

    /// Margin applied on top of an occultation angle
    fn extra(&self, margin: f64) -> f64 {
        if self.isat {
            0.0
        } else {
            margin
        }
    }

    /// Target direction, precessed per sample when the ephemeris is apparent
    pub fn target(&self) -> &TargetDirection {
        self.target.get_or_init(|| {
            let j2000 = radec_to_unit_vector(self.ra, self.dec);
            if self.ephem.apparent() {
                debug!(samples = self.len(), "precessing target to equinox of date");
                TargetDirection::PerSample(
                    self.timestamps()
                        .iter()
                        .map(|t| precess_to_date(&j2000, t))
                        .collect(),
                )
            } else {
                TargetDirection::Fixed(j2000)
            }
        })
    }

    /// Separation in degrees between the target and each body vector in the slice
    fn separations(&self, bodies: ArrayView2<'_, f64>) -> Array1<f64> {
        let target = self.target();
        bodies
            .slice(s![self.range.clone(), ..])
            .outer_iter()
            .enumerate()
            .map(|(i, row)| angular_separation_deg(target.at(i), &row_vector(row)))
            .collect()
    }

    fn earth_size(&self) -> ArrayView1<'_, f64> {
        self.ephem.earth_size().slice_move(s![self.range.clone()])
    }

    /// Blocked where the target is within the Earth limb plus margin
    pub fn earth(&self) -> &Array1<bool> {
        self.earth.get_or_init(|| {
            let cons = self.config.earth_occult + self.extra(self.config.earth_extra);
            let sep = self.separations(self.ephem.earth());
            let blocked: Array1<bool> = sep
                .iter()
                .zip(self.earth_size().iter())
                .map(|(&ang, &size)| ang < cons + size)
                .collect();
            log_evaluated("earth", &blocked);
            blocked
        })
    }

    pub fn sun(&self) -> &Array1<bool> {
        self.sun.get_or_init(|| {
            let cons = self.config.sun_occult + self.extra(self.config.sun_extra);
            let blocked = self.separations(self.ephem.sun()).mapv(|ang| ang < cons);
            log_evaluated("sun", &blocked);
            blocked
        })
    }

    pub fn moon(&self) -> &Array1<bool> {
        self.moon.get_or_init(|| {
            let cons = self.config.moon_occult + self.extra(self.config.moon_extra);
            let blocked = self.separations(self.ephem.moon()).mapv(|ang| ang < cons);
            log_evaluated("moon", &blocked);
            blocked
        })
    }

    /// Ram avoidance; `Unavailable` when the ephemeris carries no velocity
    pub fn ram(&self) -> ConstraintArray<'_> {
        let cached = self.ram.get_or_init(|| {
            if !self.ephem.has_velocity() {
                return None;
            }
            let velvec = self.ephem.velocity()?;
            let cons = self.config.ram_size + self.extra(self.config.ram_extra);
            let blocked = self.separations(velvec).mapv(|ang| ang < cons);
            log_evaluated("ram", &blocked);
            Some(blocked)
        });
        match cached {
            Some(arr) => ConstraintArray::Available(arr),
            None => ConstraintArray::Unavailable,
        }
    }

    /// Orbital pole avoidance; `Unavailable` when the ephemeris carries no pole
    ///
    /// The band around each pole is `earth_size + earth_occult - 90` degrees:
    /// near the poles the Earth limb still blocks the anti-pole side.
    pub fn pole(&self) -> ConstraintArray<'_> {
        let cached = self.pole.get_or_init(|| {
            if !self.ephem.has_velocity() {
                return None;
            }
            let polevec = self.ephem.pole()?;
            let extra = self.extra(self.config.earth_extra);
            let target = self.target();
            let blocked: Array1<bool> = polevec
                .slice(s![self.range.clone(), ..])
                .outer_iter()
                .zip(self.earth_size().iter())
                .enumerate()
                .map(|(i, (row, &size))| {
                    let cons = size + self.config.earth_occult - 90.0 + extra;
                    let north = row_vector(row);
                    let north_dist = angular_separation_deg(target.at(i), &north);
                    let south_dist = angular_separation_deg(target.at(i), &negate_vector(&north));
                    south_dist < cons || north_dist < cons
                })
                .collect();
            log_evaluated("pole", &blocked);
            Some(blocked)
        });
        match cached {
            Some(arr) => ConstraintArray::Available(arr),
            None => ConstraintArray::Unavailable,
        }
    }

    /// SAA flags for the slice; the provider does its own memoization
    pub fn saa(&self) -> ArrayView1<'a, bool> {
        self.saa.insaacons().slice_move(s![self.range.clone()])
    }
}

fn log_evaluated(name: &str, blocked: &Array1<bool>) {
    debug!(
        constraint = name,
        samples = blocked.len(),
        blocked = blocked.iter().filter(|&&b| b).count(),
        "constraint evaluated"
    );
}
