//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean Earth radius used by every distance computation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Ouagadougou city centre, the default origin for the served region.
    pub const OUAGADOUGOU: Coordinate = Coordinate {
        lat: 12.3714,
        lng: -1.5197,
    };

    /// Build a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when `lat` is outside
    /// `-90..=90` or `lng` is outside `-180..=180`.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if !lat.is_finite()
            || !lng.is_finite()
            || !(-90.0..=90.0).contains(&lat)
            || !(-180.0..=180.0).contains(&lng)
        {
            return Err(CoreError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Whether this value would pass [`Coordinate::new`].
    ///
    /// Deserialized coordinates bypass the constructor, so loaders call this
    /// before trusting them.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        Self::new(self.lat, self.lng).is_ok()
    }
}

/// Great-circle distance in kilometres between two coordinates.
#[must_use]
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    // Rounding can push `a` just past 1.0 for near-antipodal pairs.
    let a = ((d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2))
        .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Round a distance to one decimal place.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).expect("valid coordinate")
    }

    #[test]
    fn new_rejects_out_of_range_latitude() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(CoreError::InvalidCoordinate { lat: 90.5, lng: 0.0 })
        );
    }

    #[test]
    fn new_rejects_out_of_range_longitude() {
        assert!(Coordinate::new(0.0, -180.01).is_err());
    }

    #[test]
    fn new_rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn new_accepts_bounds() {
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
        assert!(Coordinate::new(90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = Coordinate::OUAGADOUGOU;
        assert!(haversine_km(a, a).abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (coord(12.3714, -1.5197), coord(11.1771, -4.2979)),
            (coord(-33.8688, 151.2093), coord(51.5074, -0.1278)),
            (coord(0.0, 179.9), coord(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
        }
    }

    /// The point on the opposite side of the globe.
    fn antipode(c: Coordinate) -> Coordinate {
        let lng = if c.lng <= 0.0 { c.lng + 180.0 } else { c.lng - 180.0 };
        coord(-c.lat, lng)
    }

    #[test]
    fn distance_is_finite_bounded_and_symmetric_across_the_globe() {
        let half_circumference = PI * EARTH_RADIUS_KM;
        let anchors = [
            coord(90.0, 0.0),
            coord(-90.0, 0.0),
            coord(0.0, 180.0),
            coord(0.0, -180.0),
            Coordinate::OUAGADOUGOU,
        ];
        for lat_step in -180..=180 {
            for lng_step in -36..=36 {
                let point = coord(f64::from(lat_step) * 0.5, f64::from(lng_step) * 5.0);
                let opposite = antipode(point);
                for other in anchors.iter().copied().chain([opposite]) {
                    let ab = haversine_km(point, other);
                    let ba = haversine_km(other, point);
                    assert!(ab.is_finite(), "{point:?} -> {other:?} gave {ab}");
                    assert!(ab <= half_circumference + 1e-6, "{point:?} -> {other:?} gave {ab}");
                    assert!((ab - ba).abs() < 1e-3, "{point:?} <-> {other:?}: {ab} != {ba}");
                }
                let across = haversine_km(point, opposite);
                assert!(
                    (across - half_circumference).abs() < 1.0,
                    "{point:?} antipode gave {across}"
                );
            }
        }
    }

    #[test]
    fn near_antipodal_pair_is_half_the_circumference() {
        let d = haversine_km(coord(-87.5, -179.5), coord(87.5, 0.5));
        assert!(d.is_finite(), "got {d}");
        assert!((d - PI * EARTH_RADIUS_KM).abs() < 1.0, "got {d}");
    }

    #[test]
    fn tenth_of_a_degree_of_longitude_near_ouagadougou() {
        let d = haversine_km(Coordinate::OUAGADOUGOU, coord(12.3714, -1.6197));
        assert!((10.5..=11.5).contains(&d), "got {d}");
        assert!((round_km(d) - 10.9).abs() < 1e-9, "got {}", round_km(d));
    }

    #[test]
    fn antimeridian_crossing_is_short() {
        let d = haversine_km(coord(0.0, 179.9), coord(0.0, -179.9));
        assert!(d < 23.0, "got {d}");
    }

    #[test]
    fn round_km_keeps_one_decimal() {
        assert!((round_km(2.449) - 2.4).abs() < 1e-9);
        assert!((round_km(2.451) - 2.5).abs() < 1e-9);
        assert!((round_km(0.04)).abs() < 1e-9);
    }
}
