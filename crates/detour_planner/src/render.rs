use detour_core::{
    arrows::direction_arrows,
    closure::{Closure, ClosureGeometry},
    geopoint::GeoPoint,
    route::CalculatedRoute,
};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::planner::RoutePlan;

pub const ACTIVE_CLOSURE_COLOR: &str = "#dc2626";
pub const INACTIVE_CLOSURE_COLOR: &str = "#6b7280";
pub const DIRECT_ROUTE_COLOR: &str = "#9ca3af";
pub const CLOSURE_AWARE_ROUTE_COLOR: &str = "#2563eb";
const DIRECT_ROUTE_DASHARRAY: &str = "8 8";

/// Map layers of a plan: every closure of the area with its arrows, both
/// routes and the two markers. Later features are drawn on top.
pub fn render_plan(plan: &RoutePlan) -> FeatureCollection {
    let mut features = vec![];

    for closure in &plan.closures {
        let relevant = plan.relevant_closure_ids.contains(&closure.id);
        features.extend(closure_features(closure, Some(relevant)));
    }

    features.push(route_feature(
        &plan.direct_route,
        json!({
            "kind": "route",
            "role": "direct",
            "stroke": DIRECT_ROUTE_COLOR,
            "stroke-width": 4,
            "stroke-dasharray": DIRECT_ROUTE_DASHARRAY,
        }),
    ));
    features.push(route_feature(
        &plan.closure_aware_route,
        json!({
            "kind": "route",
            "role": "closure_aware",
            "stroke": CLOSURE_AWARE_ROUTE_COLOR,
            "stroke-width": 5,
            "avoided_closures": plan.closure_aware_route.avoided_closures,
        }),
    ));
    features.push(marker_feature(&plan.source, "source"));
    features.push(marker_feature(&plan.destination, "destination"));

    collection(features)
}

pub fn render_closures<'a>(closures: impl IntoIterator<Item = &'a Closure>) -> FeatureCollection {
    collection(
        closures
            .into_iter()
            .flat_map(|closure| closure_features(closure, None))
            .collect(),
    )
}

/// The closure itself followed by its direction arrows.
pub fn closure_features(closure: &Closure, relevant: Option<bool>) -> Vec<Feature> {
    let color = closure_color(closure);

    let value = match &closure.geometry {
        ClosureGeometry::Point(position) => Value::Point(position.to_vec()),
        ClosureGeometry::LineString(positions) => {
            Value::LineString(positions.iter().map(|position| position.to_vec()).collect())
        }
    };

    let mut closure_properties = json!({
        "kind": "closure",
        "id": closure.id,
        "description": closure.description,
        "closure_type": closure.category.as_str(),
        "status": closure.status.as_str(),
        "color": color,
        "stroke": color,
        "marker-color": color,
    });
    if let Some(relevant) = relevant {
        closure_properties["relevant"] = json!(relevant);
    }

    let mut features = vec![feature(value, closure_properties)];

    if let Some(directionality) = closure.directionality() {
        let vertices: Vec<GeoPoint> = closure.vertices().collect();

        features.extend(
            direction_arrows(&vertices, directionality)
                .into_iter()
                .map(|arrow| {
                    feature(
                        Value::Point(arrow.position.to_lon_lat().to_vec()),
                        json!({
                            "kind": "arrow",
                            "closure_id": closure.id,
                            "bearing": arrow.bearing,
                            "color": color,
                        }),
                    )
                }),
        );
    }

    features
}

pub fn closure_color(closure: &Closure) -> &'static str {
    if closure.is_active() {
        ACTIVE_CLOSURE_COLOR
    } else {
        INACTIVE_CLOSURE_COLOR
    }
}

fn route_feature(route: &CalculatedRoute, mut properties: serde_json::Value) -> Feature {
    properties["distance_km"] = json!(route.distance_km);
    properties["duration_minutes"] = json!(route.duration_minutes());

    feature(
        Value::LineString(
            route
                .coordinates
                .iter()
                .map(|point| point.to_lon_lat().to_vec())
                .collect(),
        ),
        properties,
    )
}

fn marker_feature(point: &GeoPoint, role: &str) -> Feature {
    feature(
        Value::Point(point.to_lon_lat().to_vec()),
        json!({ "kind": "marker", "role": role }),
    )
}

fn feature(value: Value, properties: serde_json::Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: into_object(properties),
        foreign_members: None,
    }
}

fn into_object(value: serde_json::Value) -> Option<JsonObject> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
