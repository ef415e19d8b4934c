//! Geographic primitives and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for all distance calculations.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when latitude is in [-90, 90] and longitude in [-180, 180].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Haversine distance in meters between two points.
///
/// Coordinates are not validated; out-of-range input produces a number, not a
/// panic. The haversine term is clamped to `[0, 1]` so identical points yield
/// exactly `0.0` and antipodal points yield `π·R`, never `NaN`.
#[must_use]
pub fn haversine_meters(from: GeoPoint, to: GeoPoint) -> f64 {
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlng = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlng / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Human-readable distance: `"850 m"`, `"3.2 km"`, `"12 km"`.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    let km = meters / 1000.0;
    if km < 1.0 {
        format!("{} m", meters.max(0.0).trunc())
    } else if km < 10.0 {
        format!("{km:.1} km")
    } else {
        format!("{} km", km.trunc())
    }
}
