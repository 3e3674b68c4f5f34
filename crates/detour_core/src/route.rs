use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::{geopoint::GeoPoint, transport_mode::TransportMode};

/// One request to a routing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub source: GeoPoint,
    pub destination: GeoPoint,
    pub mode: TransportMode,
    #[serde(default)]
    pub exclusions: Vec<GeoPoint>,
}

impl RouteRequest {
    pub fn direct(source: GeoPoint, destination: GeoPoint, mode: TransportMode) -> Self {
        Self {
            source,
            destination,
            mode,
            exclusions: vec![],
        }
    }

    pub fn avoiding(
        source: GeoPoint,
        destination: GeoPoint,
        mode: TransportMode,
        exclusions: Vec<GeoPoint>,
    ) -> Self {
        Self {
            source,
            destination,
            mode,
            exclusions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedRoute {
    pub coordinates: Vec<GeoPoint>,
    /// As reported by the engine, in kilometers.
    pub distance_km: f64,
    pub duration: SignedDuration,
    /// Number of exclusion points sent with the request.
    pub avoided_closures: usize,
    pub excluded_points: Vec<GeoPoint>,
}

impl CalculatedRoute {
    pub fn duration_minutes(&self) -> f64 {
        self.duration.as_secs_f64() / 60.0
    }

    pub fn line_string(&self) -> geo_types::LineString {
        self.coordinates
            .iter()
            .map(geo_types::Coord::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_minutes() {
        let route = CalculatedRoute {
            coordinates: vec![GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 4.0)],
            distance_km: 1.2,
            duration: SignedDuration::from_secs(90),
            avoided_closures: 0,
            excluded_points: vec![],
        };

        assert_eq!(route.duration_minutes(), 1.5);

        let line = route.line_string();
        assert_eq!(line.0.len(), 2);
        assert_eq!(line.0[0].x, 2.0);
        assert_eq!(line.0[0].y, 1.0);
    }
}
