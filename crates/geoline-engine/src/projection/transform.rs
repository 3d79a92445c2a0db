use std::f64::consts::PI;

use super::Crs;

/// Earth radius used by spherical Web Mercator (meters).
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of Web Mercator, `atan(sinh(PI))` in degrees.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_6;

/// Errors returned by a [`CoordinateTransform`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("unsupported transform from {from} to {to}")]
    Unsupported { from: Crs, to: Crs },

    #[error("coordinate dimension must be 2 or 3, got {0}")]
    InvalidDimension(usize),

    #[error("coordinate list length {len} is not a multiple of dimension {dimension}")]
    RaggedInput { len: usize, dimension: usize },
}

/// Converts a flat coordinate list between two reference systems.
///
/// `coords` holds `dimension` values per point (`x, y[, z]`); the result must
/// have the same length and layout.
pub trait CoordinateTransform {
    fn transform(
        &self,
        source: &Crs,
        target: &Crs,
        coords: &[f64],
        dimension: usize,
    ) -> Result<Vec<f64>, ProjectionError>;
}

/// Built-in transform: identity between equal systems and spherical
/// Web Mercator between EPSG:4326 and EPSG:3857.
#[derive(Debug, Copy, Clone, Default)]
pub struct Projector;

impl Projector {
    pub fn new() -> Self {
        Self
    }
}

impl CoordinateTransform for Projector {
    fn transform(
        &self,
        source: &Crs,
        target: &Crs,
        coords: &[f64],
        dimension: usize,
    ) -> Result<Vec<f64>, ProjectionError> {
        if !(2..=3).contains(&dimension) {
            return Err(ProjectionError::InvalidDimension(dimension));
        }
        if coords.len() % dimension != 0 {
            return Err(ProjectionError::RaggedInput { len: coords.len(), dimension });
        }

        let mut out = coords.to_vec();
        if source == target {
            return Ok(out);
        }

        let convert: fn(f64, f64) -> (f64, f64) = match (source.epsg_code(), target.epsg_code()) {
            (Some(4326), Some(3857)) => lonlat_to_mercator,
            (Some(3857), Some(4326)) => mercator_to_lonlat,
            _ => {
                return Err(ProjectionError::Unsupported {
                    from: source.clone(),
                    to: target.clone(),
                });
            }
        };

        for point in out.chunks_exact_mut(dimension) {
            let (x, y) = convert(point[0], point[1]);
            point[0] = x;
            point[1] = y;
        }

        Ok(out)
    }
}

fn lonlat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

fn mercator_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn identity_between_equal_systems() {
        let coords = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let out = Projector.transform(&Crs::Epsg(32654), &Crs::Epsg(32654), &coords, 3);
        assert_eq!(out, Ok(coords.to_vec()));
    }

    #[test]
    fn lonlat_to_web_mercator_known_points() {
        let coords = [0.0, 0.0, 7.0, 180.0, 0.0, 0.0];
        let out = Projector
            .transform(&Crs::WGS84, &Crs::WEB_MERCATOR, &coords, 3)
            .expect("supported transform");
        assert!(close(out[0], 0.0, 1e-9));
        assert!(close(out[1], 0.0, 1e-9));
        // z is carried through untouched.
        assert_eq!(out[2], 7.0);
        assert!(close(out[3], 20_037_508.342_789_244, 1e-6));
    }

    #[test]
    fn polar_latitudes_are_clamped() {
        let out = Projector
            .transform(&Crs::WGS84, &Crs::WEB_MERCATOR, &[0.0, 90.0], 2)
            .expect("supported transform");
        assert!(out[1].is_finite());
        assert!(close(out[1], 20_037_508.342_789_244, 1e-3));
    }

    #[test]
    fn mercator_round_trip() {
        let coords = [-73.9857, 40.7484];
        let merc = Projector.transform(&Crs::WGS84, &Crs::WEB_MERCATOR, &coords, 2).expect("fwd");
        let back = Projector.transform(&Crs::WEB_MERCATOR, &Crs::WGS84, &merc, 2).expect("inv");
        assert!(close(back[0], coords[0], 1e-9));
        assert!(close(back[1], coords[1], 1e-9));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            Projector.transform(&Crs::WGS84, &Crs::WGS84, &[0.0; 4], 4),
            Err(ProjectionError::InvalidDimension(4))
        );
        assert_eq!(
            Projector.transform(&Crs::WGS84, &Crs::WGS84, &[0.0; 4], 3),
            Err(ProjectionError::RaggedInput { len: 4, dimension: 3 })
        );
        assert!(matches!(
            Projector.transform(&Crs::WGS84, &Crs::Epsg(32654), &[0.0; 3], 3),
            Err(ProjectionError::Unsupported { .. })
        ));
    }
}
