use detour_closures::client::ClosuresApiClient;
use detour_core::{
    bounding_box::BoundingBox,
    closure::Closure,
    route::{CalculatedRoute, RouteRequest},
};
use detour_valhalla::client::ValhallaClient;

/// Where closures come from.
pub trait ClosureSource: Send + Sync {
    fn closures_in(
        &self,
        bbox: &BoundingBox,
    ) -> impl Future<Output = anyhow::Result<Vec<Closure>>> + Send;
}

pub trait RoutingEngine: Send + Sync {
    fn route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = anyhow::Result<CalculatedRoute>> + Send;
}

impl ClosureSource for ClosuresApiClient {
    async fn closures_in(&self, bbox: &BoundingBox) -> anyhow::Result<Vec<Closure>> {
        Ok(self.fetch_in_bbox(bbox).await?)
    }
}

impl RoutingEngine for ValhallaClient {
    async fn route(&self, request: &RouteRequest) -> anyhow::Result<CalculatedRoute> {
        Ok(ValhallaClient::route(self, request).await?)
    }
}
