//! Coordinates, great-circle distance and waypoint interpolation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Length of one degree of latitude.
const METRES_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Two positions closer than this are treated as the same point.
pub const POSITION_EPSILON_M: f64 = 0.5;

/// A map coordinate in degrees. Field names match the planning service's wire format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(&self, other: &Position) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
        EARTH_RADIUS_M * c
    }

    pub fn approx_eq(&self, other: &Position) -> bool {
        self.distance_m(other) <= POSITION_EPSILON_M
    }

    /// `(north, east)` metres from `self` to `other` on a flat approximation around `self`.
    /// Only meaningful over short distances.
    pub fn local_offset_m(&self, other: &Position) -> (f64, f64) {
        let north = (other.lat - self.lat) * METRES_PER_DEGREE;
        let east = (other.lng - self.lng) * METRES_PER_DEGREE * self.lat.to_radians().cos();
        (north, east)
    }

    /// Inverse of [`local_offset_m`](Self::local_offset_m).
    pub fn offset_m(&self, north_m: f64, east_m: f64) -> Position {
        Position {
            lat: self.lat + north_m / METRES_PER_DEGREE,
            lng: self.lng + east_m / (METRES_PER_DEGREE * self.lat.to_radians().cos()),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for Position {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Linear interpolation in coordinate space. `progress` is clamped to `[0, 1]`.
pub fn interpolate(from: &Position, to: &Position, progress: f64) -> Position {
    let t = progress.clamp(0.0, 1.0);
    Position {
        lat: from.lat + (to.lat - from.lat) * t,
        lng: from.lng + (to.lng - from.lng) * t,
    }
}
