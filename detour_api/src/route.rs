use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use detour_core::{geopoint::GeoPoint, route::CalculatedRoute, transport_mode::TransportMode};
use detour_planner::{
    render::render_plan,
    source::{ClosureSource, RoutingEngine},
};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RouteRequestBody {
    source: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    #[serde(default)]
    mode: TransportMode,
}

#[derive(Serialize)]
pub struct RouteSummary {
    distance_km: f64,
    duration_minutes: f64,
    avoided_closures: usize,
}

impl From<&CalculatedRoute> for RouteSummary {
    fn from(route: &CalculatedRoute) -> Self {
        RouteSummary {
            distance_km: route.distance_km,
            duration_minutes: route.duration_minutes(),
            avoided_closures: route.avoided_closures,
        }
    }
}

#[derive(Serialize)]
pub struct RouteResponse {
    mode: TransportMode,
    direct: RouteSummary,
    closure_aware: RouteSummary,
    extra_distance_km: f64,
    extra_minutes: f64,
    closures_in_area: usize,
    relevant_closures: usize,
    geojson: GeoJson,
}

impl IntoResponse for RouteResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn route_handler<C, R>(
    State(state): State<Arc<AppState<C, R>>>,
    Json(body): Json<RouteRequestBody>,
) -> Result<RouteResponse, ApiError>
where
    C: ClosureSource,
    R: RoutingEngine,
{
    let plan = state
        .planner
        .plan(body.source, body.destination, body.mode)
        .await?;

    info!(
        "Planned {} route, {:.2} km extra to avoid {} closures",
        plan.mode,
        plan.extra_distance_km(),
        plan.relevant_closure_ids.len()
    );

    state.store.replace_all(plan.closures.clone());

    Ok(RouteResponse {
        mode: plan.mode,
        direct: RouteSummary::from(&plan.direct_route),
        closure_aware: RouteSummary::from(&plan.closure_aware_route),
        extra_distance_km: plan.extra_distance_km(),
        extra_minutes: plan.extra_minutes(),
        closures_in_area: plan.closures.len(),
        relevant_closures: plan.relevant_closure_ids.len(),
        geojson: GeoJson::FeatureCollection(render_plan(&plan)),
    })
}
