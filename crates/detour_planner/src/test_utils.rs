use anyhow::anyhow;
use detour_core::{
    bounding_box::BoundingBox,
    closure::{Closure, ClosureGeometry, ClosureId, ClosureStatus},
    closure_category::ClosureCategory,
    geopoint::GeoPoint,
    route::{CalculatedRoute, RouteRequest},
};
use jiff::SignedDuration;
use parking_lot::Mutex;

use crate::source::{ClosureSource, RoutingEngine};

pub fn closure(
    id: ClosureId,
    category: ClosureCategory,
    status: ClosureStatus,
    geometry: ClosureGeometry,
) -> Closure {
    Closure {
        id,
        geometry,
        description: "Water main repair blocking traffic".to_string(),
        category,
        status,
        start_time: "2025-06-01T08:00:00Z".parse().unwrap(),
        end_time: None,
        confidence_level: Some(8),
        is_bidirectional: None,
        submitter_id: 1,
        source: None,
        openlr_code: None,
        created_at: None,
        updated_at: None,
    }
}

/// Closure source returning a fixed list, or failing when built with `None`.
pub struct FakeClosureSource {
    closures: Option<Vec<Closure>>,
    pub requested: Mutex<Vec<BoundingBox>>,
}

impl FakeClosureSource {
    pub fn new(closures: Vec<Closure>) -> Self {
        Self {
            closures: Some(closures),
            requested: Mutex::new(vec![]),
        }
    }

    pub fn failing() -> Self {
        Self {
            closures: None,
            requested: Mutex::new(vec![]),
        }
    }
}

impl ClosureSource for FakeClosureSource {
    async fn closures_in(&self, bbox: &BoundingBox) -> anyhow::Result<Vec<Closure>> {
        self.requested.lock().push(*bbox);
        self.closures
            .clone()
            .ok_or_else(|| anyhow!("closures API unreachable"))
    }
}

/// Straight line between the two locations. Every exclusion adds a detour
/// vertex 100 m north of the midpoint and 250 m to the distance.
pub struct FakeRoutingEngine {
    fail_with_exclusions: bool,
    pub requests: Mutex<Vec<RouteRequest>>,
}

impl FakeRoutingEngine {
    pub fn new() -> Self {
        Self {
            fail_with_exclusions: false,
            requests: Mutex::new(vec![]),
        }
    }

    pub fn failing_with_exclusions() -> Self {
        Self {
            fail_with_exclusions: true,
            requests: Mutex::new(vec![]),
        }
    }
}

impl RoutingEngine for FakeRoutingEngine {
    async fn route(&self, request: &RouteRequest) -> anyhow::Result<CalculatedRoute> {
        self.requests.lock().push(request.clone());

        let detours = request.exclusions.len();
        if detours > 0 && self.fail_with_exclusions {
            return Err(anyhow!("API error: 400 - No path could be found"));
        }

        let mut coordinates = vec![request.source];
        if detours > 0 {
            let midpoint = request.source.interpolate(&request.destination, 0.5);
            coordinates.push(GeoPoint::new(midpoint.lat + 0.0009, midpoint.lng));
        }
        coordinates.push(request.destination);

        let meters =
            request.source.haversine_distance(&request.destination) + 250.0 * detours as f64;

        Ok(CalculatedRoute {
            coordinates,
            distance_km: meters / 1000.0,
            duration: SignedDuration::from_secs((meters / 5.0) as i64),
            avoided_closures: detours,
            excluded_points: request.exclusions.clone(),
        })
    }
}
