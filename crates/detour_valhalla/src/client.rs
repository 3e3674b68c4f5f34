use detour_core::{
    polyline::{self, PolylineError, VALHALLA_PRECISION},
    route::{CalculatedRoute, RouteRequest},
};
use jiff::SignedDuration;
use thiserror::Error;
use tracing::debug;

use crate::types::{RouteRequestBody, RouteResponse};

#[derive(Debug, Error)]
pub enum ValhallaError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Response has no route shape")]
    MissingShape,

    #[error("Invalid route shape: {0}")]
    Shape(#[from] PolylineError),
}

pub struct ValhallaClientParams {
    pub valhalla_url: String,
}

pub const VALHALLA_ROUTE_API_PATH: &str = "/route";

pub struct ValhallaClient {
    params: ValhallaClientParams,
    client: reqwest::Client,
}

impl ValhallaClient {
    pub fn new(params: ValhallaClientParams) -> Self {
        Self::with_client(params, reqwest::Client::new())
    }

    pub fn with_client(params: ValhallaClientParams, client: reqwest::Client) -> Self {
        Self { params, client }
    }

    pub fn url(&self) -> &str {
        &self.params.valhalla_url
    }

    pub async fn route(&self, request: &RouteRequest) -> Result<CalculatedRoute, ValhallaError> {
        let mut url = self.params.valhalla_url.trim_end_matches('/').to_string();
        url.push_str(VALHALLA_ROUTE_API_PATH);

        let body = RouteRequestBody::from(request);

        debug!(
            "Valhalla: requesting {} route with {} excluded locations",
            body.costing,
            body.exclude_locations.len()
        );

        let response = self.client.post(url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ValhallaError::Api { status, message });
        }

        let route_response: RouteResponse = response.json().await?;

        into_calculated_route(route_response, request)
    }
}

/// Decodes the first leg's shape. Multi-leg trips only happen with more than
/// two locations, which this client never sends.
pub fn into_calculated_route(
    response: RouteResponse,
    request: &RouteRequest,
) -> Result<CalculatedRoute, ValhallaError> {
    let trip = response.trip.ok_or(ValhallaError::MissingShape)?;
    let shape = trip
        .legs
        .into_iter()
        .next()
        .and_then(|leg| leg.shape)
        .ok_or(ValhallaError::MissingShape)?;

    let coordinates = polyline::decode(&shape, VALHALLA_PRECISION)?;

    Ok(CalculatedRoute {
        coordinates,
        distance_km: trip.summary.length,
        duration: SignedDuration::try_from_secs_f64(trip.summary.time)
            .unwrap_or(SignedDuration::ZERO),
        avoided_closures: request.exclusions.len(),
        excluded_points: request.exclusions.clone(),
    })
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::post};
    use detour_core::{geopoint::GeoPoint, transport_mode::TransportMode};
    use serde_json::{Value, json};

    use super::*;

    fn request(exclusions: Vec<GeoPoint>) -> RouteRequest {
        RouteRequest::avoiding(
            GeoPoint::new(41.8781, -87.6298),
            GeoPoint::new(41.8785, -87.6290),
            TransportMode::Bicycle,
            exclusions,
        )
    }

    fn response_json(shape: &str) -> Value {
        json!({
            "trip": {
                "legs": [{ "shape": shape }],
                "summary": { "length": 0.082, "time": 30.5 },
                "status": 0
            }
        })
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{}", address)
    }

    fn client(url: String) -> ValhallaClient {
        ValhallaClient::with_client(
            ValhallaClientParams { valhalla_url: url },
            reqwest::Client::builder().no_proxy().build().unwrap(),
        )
    }

    #[test]
    fn test_request_body_shape() {
        let body = RouteRequestBody::from(&request(vec![GeoPoint::new(41.8783, -87.6294)]));

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "locations": [
                    { "lat": 41.8781, "lon": -87.6298, "type": "break" },
                    { "lat": 41.8785, "lon": -87.6290, "type": "break" }
                ],
                "costing": "bicycle",
                "directions_options": { "units": "kilometers", "format": "json" },
                "exclude_locations": [{ "lat": 41.8783, "lon": -87.6294 }]
            })
        );
    }

    #[test]
    fn test_request_body_omits_empty_exclusions() {
        let body = serde_json::to_value(RouteRequestBody::from(&request(vec![]))).unwrap();
        assert!(body.get("exclude_locations").is_none());
    }

    #[test]
    fn test_into_calculated_route() {
        let shape = polyline::encode(
            &[GeoPoint::new(41.8781, -87.6298), GeoPoint::new(41.8785, -87.6290)],
            VALHALLA_PRECISION,
        );
        let response: RouteResponse = serde_json::from_value(response_json(&shape)).unwrap();
        let exclusions = vec![GeoPoint::new(41.8783, -87.6294)];

        let route = into_calculated_route(response, &request(exclusions.clone())).unwrap();

        assert_eq!(route.coordinates.len(), 2);
        assert_eq!(route.distance_km, 0.082);
        assert_eq!(route.duration, SignedDuration::from_millis(30_500));
        assert_eq!(route.avoided_closures, 1);
        assert_eq!(route.excluded_points, exclusions);
    }

    #[test]
    fn test_missing_shape() {
        let response: RouteResponse = serde_json::from_value(json!({
            "trip": { "legs": [], "summary": { "length": 1.0, "time": 1.0 } }
        }))
        .unwrap();
        assert!(matches!(
            into_calculated_route(response, &request(vec![])),
            Err(ValhallaError::MissingShape)
        ));

        let response: RouteResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            into_calculated_route(response, &request(vec![])),
            Err(ValhallaError::MissingShape)
        ));
    }

    #[tokio::test]
    async fn test_route_against_server() {
        let shape = polyline::encode(
            &[GeoPoint::new(41.8781, -87.6298), GeoPoint::new(41.8785, -87.6290)],
            VALHALLA_PRECISION,
        );
        let router = Router::new().route(
            "/route",
            post(move |Json(body): Json<Value>| {
                let shape = shape.clone();
                async move {
                    assert_eq!(body["costing"], "bicycle");
                    assert_eq!(body["locations"].as_array().unwrap().len(), 2);
                    Json(response_json(&shape))
                }
            }),
        );
        let url = spawn_server(router).await;

        let route = client(format!("{url}/")).route(&request(vec![])).await.unwrap();

        assert_eq!(route.coordinates[0], GeoPoint::new(41.8781, -87.6298));
        assert_eq!(route.avoided_closures, 0);
    }

    #[tokio::test]
    async fn test_route_api_error() {
        let router = Router::new().route(
            "/route",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    r#"{"error_code":171,"error":"No suitable edges near location"}"#,
                )
            }),
        );
        let url = spawn_server(router).await;

        let result = client(url).route(&request(vec![])).await;

        assert!(matches!(
            result,
            Err(ValhallaError::Api { status: 400, .. })
        ));
    }
}
