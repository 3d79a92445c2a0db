/// A point position in some coordinate reference system.
///
/// 2D inputs carry `z = 0`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    #[inline]
    pub const fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 2]> for Position {
    #[inline]
    fn from(v: [f64; 2]) -> Self {
        Position::new(v[0], v[1])
    }
}

impl From<[f64; 3]> for Position {
    #[inline]
    fn from(v: [f64; 3]) -> Self {
        Position::with_z(v[0], v[1], v[2])
    }
}

impl From<(f64, f64)> for Position {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Position::new(x, y)
    }
}

/// Geographic coordinate in degrees.
///
/// Converts to a [`Position`] with `x = lng`, `y = lat`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for Position {
    #[inline]
    fn from(ll: LatLng) -> Self {
        Position::new(ll.lng, ll.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_d_inputs_have_zero_z() {
        assert_eq!(Position::from([1.0, 2.0]).z, 0.0);
        assert_eq!(Position::from((1.0, 2.0)), Position::with_z(1.0, 2.0, 0.0));
    }

    #[test]
    fn latlng_maps_longitude_to_x() {
        let p: Position = LatLng::new(45.0, -73.5).into();
        assert_eq!(p, Position::new(-73.5, 45.0));
    }

    #[test]
    fn non_finite_is_detected() {
        assert!(!Position::new(f64::NAN, 0.0).is_finite());
        assert!(!Position::with_z(0.0, 0.0, f64::INFINITY).is_finite());
        assert!(Position::new(1.0, 1.0).is_finite());
    }
}
