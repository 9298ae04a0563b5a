//! Synthetic ephemerides for integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use ndarray::{Array1, Array2};
use rust_visibility::{generate_timestamps, EphemerisData, SaaData};

/// Direction opposite the default target (RA=0, Dec=0)
pub const AWAY: [f64; 3] = [-1.0, 0.0, 0.0];
/// Direction of the default target
pub const ON_TARGET: [f64; 3] = [1.0, 0.0, 0.0];

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn grid(start: DateTime<Utc>, n: usize, step: i64) -> Vec<DateTime<Utc>> {
    generate_timestamps(start, start + Duration::seconds(step * (n as i64 - 1)), step).unwrap()
}

pub fn rows<F: Fn(usize) -> [f64; 3]>(n: usize, f: F) -> Array2<f64> {
    Array2::from_shape_fn((n, 3), |(i, j)| f(i)[j])
}

/// Per-sample body directions for a synthetic scene
pub struct Scene {
    pub times: Vec<DateTime<Utc>>,
    pub sun: Box<dyn Fn(usize) -> [f64; 3]>,
    pub moon: Box<dyn Fn(usize) -> [f64; 3]>,
    pub earth: Box<dyn Fn(usize) -> [f64; 3]>,
    pub earth_size: f64,
}

impl Scene {
    /// Sun behind the target, Moon and Earth 90 degrees away, Earth radius 60 degrees
    pub fn clear(times: Vec<DateTime<Utc>>) -> Self {
        Scene {
            times,
            sun: Box::new(|_| AWAY),
            moon: Box::new(|_| [0.0, 1.0, 0.0]),
            earth: Box::new(|_| [0.0, 0.0, -1.0]),
            earth_size: 60.0,
        }
    }

    pub fn sun(mut self, f: impl Fn(usize) -> [f64; 3] + 'static) -> Self {
        self.sun = Box::new(f);
        self
    }

    pub fn moon(mut self, f: impl Fn(usize) -> [f64; 3] + 'static) -> Self {
        self.moon = Box::new(f);
        self
    }

    pub fn earth(mut self, f: impl Fn(usize) -> [f64; 3] + 'static) -> Self {
        self.earth = Box::new(f);
        self
    }

    pub fn build(self) -> EphemerisData {
        let n = self.times.len();
        EphemerisData::new(
            self.times,
            rows(n, &*self.sun),
            rows(n, &*self.moon),
            rows(n, &*self.earth),
            Array1::from_elem(n, self.earth_size),
        )
        .unwrap()
    }
}

/// SAA active on the given index range
pub fn saa_between(n: usize, start: usize, stop: usize) -> SaaData {
    SaaData::new((0..n).map(|i| i >= start && i < stop).collect())
}

/// `ON_TARGET` inside `[start, stop)`, `AWAY` elsewhere
pub fn blocked_between(start: usize, stop: usize) -> impl Fn(usize) -> [f64; 3] {
    move |i| if i >= start && i < stop { ON_TARGET } else { AWAY }
}
