/// South Atlantic Anomaly providers
use ndarray::{Array1, ArrayView1};
use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::error::{Result, VisibilityError};

/// Source of a per-sample "spacecraft inside the SAA" array, aligned with the
/// ephemeris grid.
pub trait SaaProvider {
    fn insaacons(&self) -> ArrayView1<'_, bool>;
}

/// Precomputed SAA flags
#[derive(Debug, Clone)]
pub struct SaaData {
    insaa: Array1<bool>,
}

impl SaaData {
    pub fn new(insaa: Array1<bool>) -> Self {
        SaaData { insaa }
    }

    /// SAA never active over `n` samples
    pub fn clear(n: usize) -> Self {
        SaaData {
            insaa: Array1::from_elem(n, false),
        }
    }
}

impl SaaProvider for SaaData {
    fn insaacons(&self) -> ArrayView1<'_, bool> {
        self.insaa.view()
    }
}

/// SAA flags derived from sub-satellite longitude/latitude and a polygon.
///
/// Containment is evaluated once, on first access.
#[derive(Debug)]
pub struct PolygonSaa {
    /// Polygon defining the SAA region as (longitude, latitude) pairs in degrees
    polygon: Vec<(f64, f64)>,
    longitude: Array1<f64>,
    latitude: Array1<f64>,
    insaa: OnceCell<Array1<bool>>,
}

impl PolygonSaa {
    pub fn new(
        polygon: Vec<(f64, f64)>,
        longitude: Array1<f64>,
        latitude: Array1<f64>,
    ) -> Result<Self> {
        if longitude.len() != latitude.len() {
            return Err(VisibilityError::LengthMismatch {
                name: "latitude",
                len: latitude.len(),
                expected: longitude.len(),
            });
        }
        Ok(PolygonSaa {
            polygon,
            longitude,
            latitude,
            insaa: OnceCell::new(),
        })
    }

    /// Check if a point is inside the polygon using ray casting algorithm
    pub fn point_in_polygon(&self, lon: f64, lat: f64) -> bool {
        let mut inside = false;
        let n = self.polygon.len();

        for i in 0..n {
            let j = (i + 1) % n;
            let (x1, y1) = self.polygon[i];
            let (x2, y2) = self.polygon[j];

            if ((y1 > lat) != (y2 > lat)) && (lon < x1 + (x2 - x1) * (lat - y1) / (y2 - y1)) {
                inside = !inside;
            }
        }

        inside
    }
}

impl SaaProvider for PolygonSaa {
    fn insaacons(&self) -> ArrayView1<'_, bool> {
        self.insaa
            .get_or_init(|| {
                let flags: Array1<bool> = self
                    .longitude
                    .iter()
                    .zip(self.latitude.iter())
                    .map(|(&lon, &lat)| self.point_in_polygon(lon, lat))
                    .collect();
                debug!(
                    vertices = self.polygon.len(),
                    samples = flags.len(),
                    inside = flags.iter().filter(|&&b| b).count(),
                    "SAA containment evaluated"
                );
                flags
            })
            .view()
    }
}
