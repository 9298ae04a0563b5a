//! Visibility query: combines the enabled constraints into visibility windows
//!
//! A [`Visibility`] is built for one target and time range, evaluated with
//! [`Visibility::get`], and then answers point queries (`visible`, `insaa`)
//! and attribution queries (`constraint`) against that single result.

use chrono::{DateTime, Utc};
use ndarray::Array1;
use once_cell::unsync::OnceCell;
use std::ops::{Index, Range};
use tracing::{debug, warn};

use crate::constraints::{ConstraintConfig, ConstraintEvaluator, ConstraintKind, SaaProvider};
use crate::ephemeris::EphemerisProvider;
use crate::error::{Result, VisibilityError};
use crate::status::JobStatus;
use crate::utils::config::BEGIN_ROUND_SECONDS;
use crate::utils::time_utils::round_time;
use crate::windows::{make_windows, Window};

pub const NO_VISIBILITY_WARNING: &str = "No visibility for target in given time period.";

pub struct Visibility<'a> {
    /// Right ascension in degrees (J2000)
    pub ra: f64,
    /// Declination in degrees (J2000)
    pub dec: f64,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Target is satellite-relative; extra margins are not applied
    pub isat: bool,
    pub config: ConstraintConfig,
    pub status: JobStatus,
    ephem: &'a dyn EphemerisProvider,
    saa: &'a dyn SaaProvider,
    entries: Vec<Window>,
    inconstraint: Array1<bool>,
    evaluator: Option<ConstraintEvaluator<'a>>,
    saa_windows: OnceCell<Vec<Window>>,
}

impl<'a> Visibility<'a> {
    pub fn new(
        ephem: &'a dyn EphemerisProvider,
        saa: &'a dyn SaaProvider,
        ra: f64,
        dec: f64,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Visibility {
            ra,
            dec,
            begin,
            end,
            isat: false,
            config: ConstraintConfig::default(),
            status: JobStatus::new(),
            ephem,
            saa,
            entries: Vec::new(),
            inconstraint: Array1::from_elem(0, false),
            evaluator: None,
            saa_windows: OnceCell::new(),
        }
    }

    pub fn with_config(mut self, config: ConstraintConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_isat(mut self, isat: bool) -> Self {
        self.isat = isat;
        self
    }

    /// Check the request and resolve the active `[ephstart, ephstop)` slice.
    ///
    /// The stop index includes the sample covering `end`.
    pub fn validate(&self) -> Result<Range<usize>> {
        if !(0.0..360.0).contains(&self.ra) {
            return Err(VisibilityError::InvalidRa(self.ra));
        }
        if !(-90.0..=90.0).contains(&self.dec) {
            return Err(VisibilityError::InvalidDec(self.dec));
        }
        if self.begin >= self.end {
            return Err(VisibilityError::InvalidTimeRange {
                begin: self.begin,
                end: self.end,
            });
        }
        self.config.validate()?;

        let saa_len = self.saa.insaacons().len();
        if saa_len != self.ephem.len() {
            return Err(VisibilityError::SaaLengthMismatch {
                saa: saa_len,
                ephem: self.ephem.len(),
            });
        }

        let ephstart = self
            .ephem
            .ephindex(&self.begin)
            .ok_or(VisibilityError::OutsideEphemeris(self.begin))?;
        let ephstop = self
            .ephem
            .ephindex(&self.end)
            .ok_or(VisibilityError::OutsideEphemeris(self.end))?
            + 1;
        Ok(ephstart..ephstop)
    }

    /// Compute visibility windows for the target.
    ///
    /// Returns `false` without computing anything when the request fails
    /// validation; the reason is recorded in `status`. An empty result is not
    /// a failure: it returns `true` and records a warning.
    pub fn get(&mut self) -> bool {
        self.begin = round_time(&self.begin, BEGIN_ROUND_SECONDS);

        self.entries.clear();
        self.inconstraint = Array1::from_elem(0, false);
        self.evaluator = None;
        self.saa_windows = OnceCell::new();
        self.status.clear();

        let range = match self.validate() {
            Ok(range) => range,
            Err(e) => {
                warn!(ra = self.ra, dec = self.dec, error = %e, "visibility request rejected");
                self.status.error(e.to_string());
                return false;
            }
        };

        let evaluator = ConstraintEvaluator::new(
            self.ephem,
            self.saa,
            self.ra,
            self.dec,
            self.isat,
            self.config.clone(),
            range,
        );

        let cfg = &self.config;
        let mut combined = Array1::from_elem(evaluator.len(), false);
        let or = |a: &mut bool, &b: &bool| *a |= b;
        if cfg.saa_cons {
            combined.zip_mut_with(&evaluator.saa(), or);
        }
        if cfg.earth_cons {
            combined.zip_mut_with(evaluator.earth(), or);
        }
        if cfg.moon_cons {
            combined.zip_mut_with(evaluator.moon(), or);
        }
        if cfg.sun_cons {
            combined.zip_mut_with(evaluator.sun(), or);
        }
        if cfg.pole_cons {
            if let Some(pole) = evaluator.pole().as_array() {
                combined.zip_mut_with(pole, or);
            }
        }
        if cfg.ram_cons {
            if let Some(ram) = evaluator.ram().as_array() {
                combined.zip_mut_with(ram, or);
            }
        }

        self.inconstraint = combined;
        self.evaluator = Some(evaluator);

        let entries = make_windows(
            self.inconstraint.view(),
            self.timestamp(),
            self.begin,
            self.end,
            |i| self.constraint(i),
        );
        self.entries = entries;

        if self.entries.is_empty() {
            warn!(ra = self.ra, dec = self.dec, "no visibility windows found");
            self.status.warning(NO_VISIBILITY_WARNING);
        }
        debug!(
            constraints = %self.config.name(),
            samples = self.len(),
            windows = self.entries.len(),
            "visibility computed"
        );
        true
    }

    /// Visibility windows from the last successful `get()`
    pub fn entries(&self) -> &[Window] {
        &self.entries
    }

    /// Combined blocked flags over the active slice
    pub fn inconstraint(&self) -> &Array1<bool> {
        &self.inconstraint
    }

    /// Cached per-constraint arrays, available after a successful `get()`
    pub fn constraints(&self) -> Option<&ConstraintEvaluator<'a>> {
        self.evaluator.as_ref()
    }

    /// Timestamps of the active slice (empty before `get()`)
    pub fn timestamp(&self) -> &'a [DateTime<Utc>] {
        match &self.evaluator {
            Some(ev) => ev.timestamps(),
            None => &[],
        }
    }

    /// Number of samples in the active slice
    pub fn len(&self) -> usize {
        self.inconstraint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inconstraint.is_empty()
    }

    fn in_query_range(&self, t: &DateTime<Utc>) -> bool {
        *t >= self.begin && *t <= self.end
    }

    /// Name the constraint responsible for the state at sample `index`.
    ///
    /// Attribution checks Sun, Moon, Earth, then SAA, in that fixed order.
    /// The order is a reporting convention only. Pole and ram blocking fall
    /// through to [`ConstraintKind::Unknown`].
    ///
    /// # Panics
    /// Panics if called before a successful `get()` or if `index` is not
    /// within the active slice.
    pub fn constraint(&self, index: usize) -> ConstraintKind {
        let ev = self
            .evaluator
            .as_ref()
            .expect("constraint() requires a successful get()");

        if !self.in_query_range(&ev.timestamps()[index]) {
            return ConstraintKind::Window;
        }
        if !self.inconstraint[index] {
            return ConstraintKind::None;
        }

        if ev.sun()[index] {
            ConstraintKind::Sun
        } else if ev.moon()[index] {
            ConstraintKind::Moon
        } else if ev.earth()[index] {
            ConstraintKind::Earth
        } else if ev.saa()[index] {
            ConstraintKind::Saa
        } else {
            ConstraintKind::Unknown
        }
    }

    /// Intervals spent inside the SAA over the active slice
    pub fn saa_windows(&self) -> &[Window] {
        let Some(ev) = self.evaluator.as_ref() else {
            return &[];
        };
        self.saa_windows.get_or_init(|| {
            let outside = ev.saa().mapv(|s| !s);
            make_windows(outside.view(), ev.timestamps(), self.begin, self.end, |i| {
                if self.in_query_range(&ev.timestamps()[i]) {
                    ConstraintKind::None
                } else {
                    ConstraintKind::Window
                }
            })
        })
    }

    /// Is the spacecraft inside the SAA at `t`?
    pub fn insaa(&self, t: &DateTime<Utc>) -> bool {
        self.saa_windows().iter().any(|w| w.contains(t))
    }

    /// Is the target visible at `t`?
    pub fn visible(&self, t: &DateTime<Utc>) -> bool {
        self.entries.iter().any(|w| w.contains(t))
    }
}

impl Index<usize> for Visibility<'_> {
    type Output = Window;

    fn index(&self, i: usize) -> &Window {
        &self.entries[i]
    }
}
