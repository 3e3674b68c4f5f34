use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use detour_core::{
    geopoint::GeoPoint,
    polyline::{self, VALHALLA_PRECISION},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Beyond this the scaled integers overflow `f64`'s exact range.
const MAX_PRECISION: u32 = 10;

#[derive(Deserialize)]
pub struct DecodeRequestBody {
    polyline: String,
    precision: Option<u32>,
}

#[derive(Serialize)]
pub struct DecodeResponse {
    count: usize,
    coordinates: Vec<GeoPoint>,
}

impl IntoResponse for DecodeResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn decode_handler(
    Json(body): Json<DecodeRequestBody>,
) -> Result<DecodeResponse, ApiError> {
    let precision = body.precision.unwrap_or(VALHALLA_PRECISION);
    if precision > MAX_PRECISION {
        return Err(ApiError::BadRequest(format!(
            "Precision must be at most {MAX_PRECISION}"
        )));
    }

    let coordinates = polyline::decode(&body.polyline, precision)
        .map_err(|err| ApiError::BadRequest(format!("Invalid polyline: {err}")))?;

    Ok(DecodeResponse {
        count: coordinates.len(),
        coordinates,
    })
}
