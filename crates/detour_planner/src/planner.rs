use detour_core::{
    bounding_box::BoundingBox,
    closure::{Closure, ClosureId},
    exclusions::exclusion_points,
    geopoint::GeoPoint,
    relevance::relevant_closures,
    route::{CalculatedRoute, RouteRequest},
    transport_mode::TransportMode,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::source::{ClosureSource, RoutingEngine};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("Please select a starting point")]
    MissingSource,

    #[error("Please select a destination")]
    MissingDestination,

    /// Routing failures are logged then collapsed into this single message.
    #[error("Failed to calculate route")]
    RouteCalculation,
}

/// Outcome of one "calculate route" action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub source: GeoPoint,
    pub destination: GeoPoint,
    pub mode: TransportMode,
    pub bbox: BoundingBox,
    /// Everything the closure source returned for `bbox`.
    pub closures: Vec<Closure>,
    pub relevant_closure_ids: Vec<ClosureId>,
    pub direct_route: CalculatedRoute,
    pub closure_aware_route: CalculatedRoute,
}

impl RoutePlan {
    pub fn relevant_closures(&self) -> impl Iterator<Item = &Closure> {
        self.closures
            .iter()
            .filter(|closure| self.relevant_closure_ids.contains(&closure.id))
    }

    pub fn extra_distance_km(&self) -> f64 {
        self.closure_aware_route.distance_km - self.direct_route.distance_km
    }

    pub fn extra_minutes(&self) -> f64 {
        self.closure_aware_route.duration_minutes() - self.direct_route.duration_minutes()
    }
}

pub struct RoutePlanner<C, R> {
    closure_source: C,
    routing_engine: R,
}

impl<C, R> RoutePlanner<C, R>
where
    C: ClosureSource,
    R: RoutingEngine,
{
    pub fn new(closure_source: C, routing_engine: R) -> Self {
        Self {
            closure_source,
            routing_engine,
        }
    }

    pub fn closure_source(&self) -> &C {
        &self.closure_source
    }

    pub fn routing_engine(&self) -> &R {
        &self.routing_engine
    }

    /// Runs the whole pipeline: bounding box, closure fetch, relevance
    /// filter, exclusions, then the direct and closure-aware routes.
    ///
    /// Missing points fail before any network call. A failed closure fetch
    /// degrades to routing without exclusions.
    pub async fn plan(
        &self,
        source: Option<GeoPoint>,
        destination: Option<GeoPoint>,
        mode: TransportMode,
    ) -> Result<RoutePlan, PlanError> {
        let source = source.ok_or(PlanError::MissingSource)?;
        let destination = destination.ok_or(PlanError::MissingDestination)?;

        let bbox = BoundingBox::around(&source, &destination);
        let direct_request = RouteRequest::direct(source, destination, mode);

        debug!("Planning {} route from {} to {} in {}", mode, source, destination, bbox);

        let (closures, direct_route) = tokio::join!(
            self.fetch_closures(&bbox),
            self.calculate(&direct_request)
        );
        let direct_route = direct_route?;

        let relevant: Vec<&Closure> = relevant_closures(&closures, mode).collect();
        let exclusions = exclusion_points(relevant.iter().copied());
        let relevant_closure_ids = relevant.iter().map(|closure| closure.id).collect();

        info!(
            "{} closures in area, {} relevant for {}, {} excluded points",
            closures.len(),
            relevant.len(),
            mode,
            exclusions.len()
        );

        let aware_request = RouteRequest::avoiding(source, destination, mode, exclusions);
        let closure_aware_route = self.calculate(&aware_request).await?;

        Ok(RoutePlan {
            source,
            destination,
            mode,
            bbox,
            closures,
            relevant_closure_ids,
            direct_route,
            closure_aware_route,
        })
    }

    async fn fetch_closures(&self, bbox: &BoundingBox) -> Vec<Closure> {
        match self.closure_source.closures_in(bbox).await {
            Ok(closures) => closures,
            Err(err) => {
                warn!("Could not fetch closures, routing without them: {err:#}");
                vec![]
            }
        }
    }

    async fn calculate(&self, request: &RouteRequest) -> Result<CalculatedRoute, PlanError> {
        self.routing_engine.route(request).await.map_err(|err| {
            error!(
                "Routing failed with {} excluded points: {err:#}",
                request.exclusions.len()
            );
            PlanError::RouteCalculation
        })
    }
}
