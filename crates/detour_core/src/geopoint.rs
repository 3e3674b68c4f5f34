use std::{fmt::Display, str::FromStr};

use rstar::{AABB, Envelope, PointDistance, RTreeObject};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const EARTH_RADIUS: f64 = 6_371_000.0;

/// A WGS84 coordinate. Used for route endpoints, decoded route shapes and
/// closure vertices alike.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseGeoPointError {
    #[error("expected `lat,lng`, got {0:?}")]
    Format(String),
    #[error("invalid number {0:?}")]
    Number(String),
    #[error("latitude {0} is out of range [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is out of range [-180, 180]")]
    Longitude(f64),
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a point from a GeoJSON `[lon, lat]` position.
    pub fn from_lon_lat(position: [f64; 2]) -> Self {
        Self {
            lat: position[1],
            lng: position[0],
        }
    }

    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }

    /// Initial bearing towards `other` in degrees clockwise from north, in `[0, 360)`.
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let y = dlng.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();

        y.atan2(x).to_degrees().rem_euclid(360.0)
    }

    /// Linear interpolation, only meant for short segments.
    pub fn interpolate(&self, other: &GeoPoint, fraction: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * fraction,
            lng: self.lng + (other.lng - self.lng) * fraction,
        }
    }
}

impl RTreeObject for GeoPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lng, self.lat])
    }
}

impl PointDistance for GeoPoint {
    fn distance_2(&self, point: &<Self::Envelope as Envelope>::Point) -> f64 {
        haversine_distance(self.lat, self.lng, point[1], point[0]).powi(2)
    }
}

impl From<&GeoPoint> for geo_types::Point {
    fn from(value: &GeoPoint) -> Self {
        geo_types::Point::new(value.lng, value.lat)
    }
}

impl From<&GeoPoint> for geo_types::Coord {
    fn from(value: &GeoPoint) -> Self {
        geo_types::Coord {
            x: value.lng,
            y: value.lat,
        }
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for GeoPoint {
    type Err = ParseGeoPointError;

    /// Parses `lat,lng`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| ParseGeoPointError::Format(s.to_string()))?;

        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| ParseGeoPointError::Number(value.trim().to_string()))
        };

        let lat = parse(lat)?;
        let lng = parse(lng)?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(ParseGeoPointError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ParseGeoPointError::Longitude(lng));
        }

        Ok(GeoPoint { lat, lng })
    }
}

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lon1_rad = lon1.to_radians();
    let lat2_rad = lat2.to_radians();
    let lon2_rad = lon2.to_radians();

    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2_rad - lon1_rad;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let distance = a.haversine_distance(&b);
        assert!((distance - 111_194.9).abs() < 1.0, "{distance}");
        assert_eq!(a.haversine_distance(&a), 0.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((origin.bearing_to(&GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((origin.bearing_to(&GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_to(&GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((origin.bearing_to(&GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse() {
        let point: GeoPoint = "41.8781, -87.6298".parse().unwrap();
        assert_eq!(point, GeoPoint::new(41.8781, -87.6298));

        assert!(matches!(
            "41.8781".parse::<GeoPoint>(),
            Err(ParseGeoPointError::Format(_))
        ));
        assert!(matches!(
            "abc,1".parse::<GeoPoint>(),
            Err(ParseGeoPointError::Number(_))
        ));
        assert_eq!(
            "91,0".parse::<GeoPoint>(),
            Err(ParseGeoPointError::Latitude(91.0))
        );
        assert_eq!(
            "0,-181".parse::<GeoPoint>(),
            Err(ParseGeoPointError::Longitude(-181.0))
        );
    }

    #[test]
    fn test_lon_lat_order() {
        let point = GeoPoint::from_lon_lat([-87.6298, 41.8781]);
        assert_eq!(point.lat, 41.8781);
        assert_eq!(point.to_lon_lat(), [-87.6298, 41.8781]);

        let geo_point: geo_types::Point = (&point).into();
        assert_eq!(geo_point.x(), -87.6298);
        assert_eq!(geo_point.y(), 41.8781);
    }
}
