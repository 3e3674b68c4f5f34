use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::routing::{get, post};
use detour_planner::source::{ClosureSource, RoutingEngine};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::closures::{closure_handler, closures_handler};
use crate::polyline::decode_handler;
use crate::route::route_handler;
use crate::state::AppState;

pub fn app_router<C, R>(state: Arc<AppState<C, R>>) -> Router
where
    C: ClosureSource + 'static,
    R: RoutingEngine + 'static,
{
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/route", post(route_handler::<C, R>))
        .route("/closures", get(closures_handler::<C, R>))
        .route("/closures/{id}", get(closure_handler::<C, R>))
        .route("/polyline/decode", post(decode_handler))
        .layer(ServiceBuilder::new().layer(cors_layer))
        .with_state(state)
}
