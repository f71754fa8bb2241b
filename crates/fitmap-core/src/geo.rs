//! Great-circle distance on a spherical Earth.
//!
//! Both the meter and kilometer variants share one haversine central-angle
//! computation so filter distances and display distances never drift apart.

use serde::{Deserialize, Serialize};

use crate::CoreError;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting latitudes outside `[-90, 90]` and
    /// longitudes outside `[-180, 180]`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] for out-of-range or
    /// non-finite values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        let coordinate = Self { lat, lng };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Central angle between two points, in radians.
fn central_angle(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lng / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Haversine distance in whole meters, rounded to the nearest meter.
#[must_use]
// Half the Earth's circumference is ~20,015 km, well inside u32.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn distance_meters(a: Coordinate, b: Coordinate) -> u32 {
    (EARTH_RADIUS_M * central_angle(a, b)).round() as u32
}

/// Haversine distance in kilometers, unrounded.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    EARTH_RADIUS_KM * central_angle(a, b)
}

/// Human-readable distance label for list cards: `"350m"` or `"1.2km"`.
#[must_use]
pub fn format_distance(meters: u32) -> String {
    if meters < 1_000 {
        format!("{meters}m")
    } else {
        format!("{:.1}km", f64::from(meters) / 1_000.0)
    }
}
