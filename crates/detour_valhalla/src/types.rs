use detour_core::{geopoint::GeoPoint, route::RouteRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExcludeLocation {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsOptions {
    pub units: &'static str,
    pub format: &'static str,
}

/// Body of a `POST /route` request.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRequestBody {
    pub locations: Vec<Location>,
    pub costing: &'static str,
    pub directions_options: DirectionsOptions,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_locations: Vec<ExcludeLocation>,
}

impl From<&RouteRequest> for RouteRequestBody {
    fn from(request: &RouteRequest) -> Self {
        let location = |point: &GeoPoint| Location {
            lat: point.lat,
            lon: point.lng,
            kind: "break",
        };

        RouteRequestBody {
            locations: vec![location(&request.source), location(&request.destination)],
            costing: request.mode.costing(),
            directions_options: DirectionsOptions {
                units: "kilometers",
                format: "json",
            },
            exclude_locations: request
                .exclusions
                .iter()
                .map(|point| ExcludeLocation {
                    lat: point.lat,
                    lon: point.lng,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    pub trip: Option<Trip>,
}

#[derive(Debug, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub legs: Vec<Leg>,
    pub summary: Summary,
}

#[derive(Debug, Deserialize)]
pub struct Leg {
    pub shape: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Summary {
    /// Kilometers, as requested in `directions_options`.
    pub length: f64,
    /// Seconds.
    pub time: f64,
}
