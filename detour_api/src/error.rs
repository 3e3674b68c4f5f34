use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use detour_planner::planner::PlanError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
}

impl From<PlanError> for ApiError {
    fn from(error: PlanError) -> Self {
        match error {
            PlanError::MissingSource | PlanError::MissingDestination => {
                ApiError::BadRequest(error.to_string())
            }
            PlanError::RouteCalculation => ApiError::BadGateway(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            ApiError::BadGateway(message) => (StatusCode::BAD_GATEWAY, message).into_response(),
        }
    }
}
