use chrono::{DateTime, Duration, Utc};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{Result, VisibilityError};
use crate::utils::config::MAX_TIMESTAMPS;

/// Generate a vector of timestamps from begin to end (inclusive) with step_size in seconds
///
/// # Errors
/// Returns error if:
/// - begin > end
/// - step_size <= 0
/// - Expected timestamp count exceeds MAX_TIMESTAMPS
pub fn generate_timestamps(
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    step_size: i64,
) -> Result<Vec<DateTime<Utc>>> {
    if begin > end {
        return Err(VisibilityError::InvalidTimeRange { begin, end });
    }
    if step_size <= 0 {
        return Err(VisibilityError::InvalidStepSize);
    }

    let time_range_secs = (end - begin).num_seconds();
    let expected_count = (time_range_secs + step_size) / step_size;
    if expected_count > MAX_TIMESTAMPS {
        return Err(VisibilityError::TooManyTimestamps(
            expected_count,
            MAX_TIMESTAMPS,
        ));
    }

    let mut times = Vec::with_capacity(expected_count as usize);
    let mut current = begin;
    let step_duration = Duration::seconds(step_size);

    while current <= end {
        times.push(current);
        current += step_duration;
    }

    Ok(times)
}

/// Read-only view of a precomputed ephemeris over an ordered time grid.
///
/// Vector accessors return N x 3 arrays aligned with `timestamps()`; they are
/// directions from the spacecraft and need not be unit length.
pub trait EphemerisProvider {
    /// Strictly increasing sample times
    fn timestamps(&self) -> &[DateTime<Utc>];

    /// Direction to the Sun
    fn sun(&self) -> ArrayView2<'_, f64>;

    /// Direction to the Moon
    fn moon(&self) -> ArrayView2<'_, f64>;

    /// Direction to the Earth's center
    fn earth(&self) -> ArrayView2<'_, f64>;

    /// Angular radius of the Earth in degrees
    fn earth_size(&self) -> ArrayView1<'_, f64>;

    /// Whether body vectors are given in the mean equinox of date rather than J2000
    fn apparent(&self) -> bool;

    /// Velocity capability flag; when false, `velocity()` and `pole()` are ignored
    fn has_velocity(&self) -> bool;

    /// Spacecraft velocity direction, when available
    fn velocity(&self) -> Option<ArrayView2<'_, f64>>;

    /// Orbital (north) pole direction, when available
    fn pole(&self) -> Option<ArrayView2<'_, f64>>;

    fn len(&self) -> usize {
        self.timestamps().len()
    }

    fn is_empty(&self) -> bool {
        self.timestamps().is_empty()
    }

    /// Index of the last sample at or before `t`, or `None` when `t` is
    /// outside the grid.
    fn ephindex(&self, t: &DateTime<Utc>) -> Option<usize> {
        let times = self.timestamps();
        let first = times.first()?;
        let last = times.last()?;
        if t < first || t > last {
            return None;
        }
        Some(times.partition_point(|x| x <= t) - 1)
    }
}

/// In-memory ephemeris holding already-propagated arrays
#[derive(Debug, Clone)]
pub struct EphemerisData {
    pub times: Vec<DateTime<Utc>>,
    pub sun: Array2<f64>,
    pub moon: Array2<f64>,
    pub earth: Array2<f64>,
    pub earth_size: Array1<f64>,
    pub apparent: bool,
    pub velocity: bool,
    pub velvec: Option<Array2<f64>>,
    pub polevec: Option<Array2<f64>>,
}

fn check_vectors(name: &'static str, arr: &Array2<f64>, n: usize) -> Result<()> {
    if arr.nrows() != n || arr.ncols() != 3 {
        return Err(VisibilityError::BadShape {
            name,
            shape: arr.shape().to_vec(),
            expected: n,
        });
    }
    Ok(())
}

impl EphemerisData {
    /// Build an ephemeris without velocity or pole data
    ///
    /// # Errors
    /// Fails when the timestamps are not strictly increasing or any array
    /// does not have one row per timestamp.
    pub fn new(
        times: Vec<DateTime<Utc>>,
        sun: Array2<f64>,
        moon: Array2<f64>,
        earth: Array2<f64>,
        earth_size: Array1<f64>,
    ) -> Result<Self> {
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(VisibilityError::NonIncreasingTimes(i + 1));
        }
        let n = times.len();
        check_vectors("sun", &sun, n)?;
        check_vectors("moon", &moon, n)?;
        check_vectors("earth", &earth, n)?;
        if earth_size.len() != n {
            return Err(VisibilityError::LengthMismatch {
                name: "earth_size",
                len: earth_size.len(),
                expected: n,
            });
        }
        Ok(EphemerisData {
            times,
            sun,
            moon,
            earth,
            earth_size,
            apparent: false,
            velocity: false,
            velvec: None,
            polevec: None,
        })
    }

    /// Attach velocity vectors and set the velocity capability flag
    pub fn with_velocity(mut self, velvec: Array2<f64>) -> Result<Self> {
        check_vectors("velocity", &velvec, self.times.len())?;
        self.velvec = Some(velvec);
        self.velocity = true;
        Ok(self)
    }

    /// Attach orbital pole vectors and set the velocity capability flag
    pub fn with_pole(mut self, polevec: Array2<f64>) -> Result<Self> {
        check_vectors("pole", &polevec, self.times.len())?;
        self.polevec = Some(polevec);
        self.velocity = true;
        Ok(self)
    }

    pub fn with_apparent(mut self, apparent: bool) -> Self {
        self.apparent = apparent;
        self
    }
}

impl EphemerisProvider for EphemerisData {
    fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    fn sun(&self) -> ArrayView2<'_, f64> {
        self.sun.view()
    }

    fn moon(&self) -> ArrayView2<'_, f64> {
        self.moon.view()
    }

    fn earth(&self) -> ArrayView2<'_, f64> {
        self.earth.view()
    }

    fn earth_size(&self) -> ArrayView1<'_, f64> {
        self.earth_size.view()
    }

    fn apparent(&self) -> bool {
        self.apparent
    }

    fn has_velocity(&self) -> bool {
        self.velocity
    }

    fn velocity(&self) -> Option<ArrayView2<'_, f64>> {
        self.velvec.as_ref().map(|v| v.view())
    }

    fn pole(&self) -> Option<ArrayView2<'_, f64>> {
        self.polevec.as_ref().map(|p| p.view())
    }
}
