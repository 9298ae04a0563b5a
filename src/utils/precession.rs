//! IAU 1976 precession from J2000 to the mean equinox of date
//!
//! Used when an ephemeris reports its body vectors in an apparent
//! (equinox-of-date) frame: the fixed J2000 target direction is carried
//! into the same frame before any separation is measured.

use chrono::{DateTime, Utc};

use crate::utils::config::{DAYS_PER_JULIAN_CENTURY, J2000_JD};
use crate::utils::time_utils::datetime_to_jd_tt;
use crate::utils::vector_math::{mat_mul, mat_vec_mul};

const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Lieske (1977) precession angles (zeta, z, theta) in radians for `t`
/// Julian centuries of TT since J2000.
pub fn precession_angles(t: f64) -> (f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let zeta = 2306.2181 * t + 0.30188 * t2 + 0.017998 * t3;
    let z = 2306.2181 * t + 1.09468 * t2 + 0.018203 * t3;
    let theta = 2004.3109 * t - 0.42665 * t2 - 0.041833 * t3;
    (
        zeta * ARCSEC_TO_RAD,
        z * ARCSEC_TO_RAD,
        theta * ARCSEC_TO_RAD,
    )
}

// Frame rotations about the z and y axes
fn rot_z(psi: f64) -> [[f64; 3]; 3] {
    let (s, c) = psi.sin_cos();
    [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]]
}

fn rot_y(theta: f64) -> [[f64; 3]; 3] {
    let (s, c) = theta.sin_cos();
    [[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]]
}

/// Precession matrix J2000 -> mean equinox of date, P = Rz(-z) Ry(theta) Rz(-zeta)
pub fn precession_matrix(t: f64) -> [[f64; 3]; 3] {
    let (zeta, z, theta) = precession_angles(t);
    mat_mul(&rot_z(-z), &mat_mul(&rot_y(theta), &rot_z(-zeta)))
}

/// Julian centuries of TT elapsed since J2000.0
pub fn julian_centuries_tt(dt: &DateTime<Utc>) -> f64 {
    (datetime_to_jd_tt(dt) - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

/// Precess a J2000 unit vector to the mean equinox of `dt`
pub fn precess_to_date(v: &[f64; 3], dt: &DateTime<Utc>) -> [f64; 3] {
    mat_vec_mul(&precession_matrix(julian_centuries_tt(dt)), v)
}
