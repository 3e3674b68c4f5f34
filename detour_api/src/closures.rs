use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use detour_core::{
    bounding_box::BoundingBox,
    closure::{Closure, ClosureId},
    relevance::relevant_closures,
    transport_mode::TransportMode,
};
use detour_planner::{
    render::render_closures,
    source::{ClosureSource, RoutingEngine},
};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ClosuresQuery {
    /// `west,south,east,north`
    bbox: String,
    mode: Option<TransportMode>,
}

#[derive(Serialize)]
pub struct ClosuresResponse {
    count: usize,
    geojson: GeoJson,
}

impl IntoResponse for ClosuresResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn closures_handler<C, R>(
    State(state): State<Arc<AppState<C, R>>>,
    Query(query): Query<ClosuresQuery>,
) -> Result<ClosuresResponse, ApiError>
where
    C: ClosureSource,
    R: RoutingEngine,
{
    let bbox: BoundingBox = query
        .bbox
        .parse()
        .map_err(|err| ApiError::BadRequest(format!("Invalid bbox: {err}")))?;

    let closures = state
        .planner
        .closure_source()
        .closures_in(&bbox)
        .await
        .map_err(|err| ApiError::BadGateway(format!("Failed to fetch closures: {err:#}")))?;

    state.store.replace_all(closures.clone());

    let shown: Vec<&Closure> = match query.mode {
        Some(mode) => relevant_closures(&closures, mode).collect(),
        None => closures.iter().collect(),
    };

    Ok(ClosuresResponse {
        count: shown.len(),
        geojson: GeoJson::FeatureCollection(render_closures(shown)),
    })
}

pub async fn closure_handler<C, R>(
    State(state): State<Arc<AppState<C, R>>>,
    Path(id): Path<ClosureId>,
) -> Result<Json<Closure>, ApiError> {
    state
        .store
        .get(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Closure {id} not found")))
}
