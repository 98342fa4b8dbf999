use std::fmt::Display;

use log::*;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parses a `"latitude,longitude"` string.
    ///
    /// The string is split on every comma and the first two parts are trimmed and parsed. Anything after the second
    /// comma is ignored. There is no other validation: a part that is missing or not a number becomes `NaN`.
    /// Distances involving a `NaN` coordinate are `NaN`, and `NaN` never compares as below a threshold, so a malformed
    /// location never triggers a notification.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split(',');
        let latitude = parse_component(parts.next().unwrap_or_default());
        let longitude = parse_component(parts.next().unwrap_or_default());
        let coord = Self { latitude, longitude };
        if !coord.is_valid() {
            debug!("📍️ Location '{s}' did not parse into a coordinate pair");
        }
        coord
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

fn parse_component(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two points, in kilometres (Haversine formula on a sphere of radius 6371 km).
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
