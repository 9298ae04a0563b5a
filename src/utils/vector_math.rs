/// Vector math utilities for constraint calculations
///
/// Helpers for coordinate conversion, normalization and angular separation
/// between a target direction and the per-sample body directions supplied
/// by an ephemeris.
use ndarray::ArrayView1;

/// Convert RA/Dec coordinates to a unit vector
///
/// # Arguments
/// * `ra_deg` - Right ascension in degrees
/// * `dec_deg` - Declination in degrees
///
/// # Returns
/// Unit vector [x, y, z] in the frame the coordinates are given in
pub fn radec_to_unit_vector(ra_deg: f64, dec_deg: f64) -> [f64; 3] {
    let ra_rad = ra_deg.to_radians();
    let dec_rad = dec_deg.to_radians();
    let cos_dec = dec_rad.cos();
    [
        cos_dec * ra_rad.cos(),
        cos_dec * ra_rad.sin(),
        dec_rad.sin(),
    ]
}

/// Normalize a 3D vector to unit length
///
/// Returns [0, 0, 0] if the input magnitude is zero.
pub fn normalize_vector(v: &[f64; 3]) -> [f64; 3] {
    let mag = vector_magnitude(v);
    if mag > 0.0 {
        [v[0] / mag, v[1] / mag, v[2] / mag]
    } else {
        [0.0, 0.0, 0.0]
    }
}

pub fn dot_product(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn vector_magnitude(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn negate_vector(v: &[f64; 3]) -> [f64; 3] {
    [-v[0], -v[1], -v[2]]
}

/// Copy one row of an N x 3 array into a fixed-size vector
#[inline]
pub fn row_vector(row: ArrayView1<'_, f64>) -> [f64; 3] {
    [row[0], row[1], row[2]]
}

/// Angular separation in degrees between a unit target vector and a body direction
///
/// The body direction need not be normalized (ephemeris vectors are often in km).
pub fn angular_separation_deg(target_unit: &[f64; 3], body: &[f64; 3]) -> f64 {
    let body_unit = normalize_vector(body);
    let cos_angle = dot_product(target_unit, &body_unit);
    cos_angle.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Multiply a 3x3 matrix by a vector
pub fn mat_vec_mul(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Multiply two 3x3 matrices (a * b)
pub fn mat_mul(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}
