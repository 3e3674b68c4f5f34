use detour_core::{
    bounding_box::BoundingBox,
    closure::{Closure, ClosureId, ClosureStatus},
    closure_draft::{ClosureDraft, ClosureUpdate, ClosureValidationError},
};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::query::{ClosurePage, ClosureQuery, ClosureStatistics};

#[derive(Debug, Error)]
pub enum ClosuresApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Closure {0} not found")]
    NotFound(ClosureId),

    #[error("Invalid closure: {0}")]
    Validation(#[from] ClosureValidationError),

    #[error("This operation requires an API token")]
    MissingToken,
}

pub struct ClosuresApiClientParams {
    pub api_url: String,
    /// Bearer token for write operations.
    pub token: Option<String>,
    pub page_size: u32,
    /// Upper bound of pages walked by [`ClosuresApiClient::fetch_in_bbox`].
    pub max_pages: u32,
}

pub const CLOSURES_API_PATH: &str = "/api/v1/closures/";

pub struct ClosuresApiClient {
    params: ClosuresApiClientParams,
    client: reqwest::Client,
}

impl ClosuresApiClient {
    pub fn new(params: ClosuresApiClientParams) -> Self {
        Self::with_client(params, reqwest::Client::new())
    }

    pub fn with_client(params: ClosuresApiClientParams, client: reqwest::Client) -> Self {
        Self { params, client }
    }

    fn base_url(&self) -> String {
        let mut url = self.params.api_url.trim_end_matches('/').to_string();
        url.push_str(CLOSURES_API_PATH);
        url
    }

    fn closure_url(&self, id: ClosureId) -> String {
        format!("{}{}", self.base_url(), id)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClosuresApiError> {
        let token = self
            .params
            .token
            .as_ref()
            .ok_or(ClosuresApiError::MissingToken)?;
        Ok(builder.bearer_auth(token))
    }

    /// One page of closures matching `query`.
    pub async fn query(&self, query: &ClosureQuery) -> Result<ClosurePage, ClosuresApiError> {
        let response = self
            .client
            .get(self.base_url())
            .query(&query.query_pairs())
            .send()
            .await?;

        handle_response(response, None).await
    }

    /// Every closure intersecting `bbox`, following pagination up to `max_pages`.
    pub async fn fetch_in_bbox(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<Closure>, ClosuresApiError> {
        let mut query = ClosureQuery {
            size: self.params.page_size,
            ..ClosureQuery::in_bbox(*bbox)
        };
        let mut closures = vec![];

        for page in 1..=self.params.max_pages.max(1) {
            query.page = page;
            let result = self.query(&query).await?;

            debug!(
                "ClosuresApi: fetched page {}/{} with {} closures",
                page,
                result.pages,
                result.items.len()
            );

            let is_last = result.is_last();
            closures.extend(result.items);
            if is_last {
                break;
            }
        }

        Ok(closures)
    }

    pub async fn get(&self, id: ClosureId) -> Result<Closure, ClosuresApiError> {
        let response = self.client.get(self.closure_url(id)).send().await?;
        handle_response(response, Some(id)).await
    }

    pub async fn create(&self, draft: ClosureDraft) -> Result<Closure, ClosuresApiError> {
        let draft = draft.validate()?;
        let request = self.authorized(self.client.post(self.base_url()))?;
        let response = request.json(&draft).send().await?;
        handle_response(response, None).await
    }

    pub async fn update(
        &self,
        id: ClosureId,
        update: ClosureUpdate,
    ) -> Result<Closure, ClosuresApiError> {
        let update = update.validate()?;
        let request = self.authorized(self.client.put(self.closure_url(id)))?;
        let response = request.json(&update).send().await?;
        handle_response(response, Some(id)).await
    }

    /// Moderator only on the server side.
    pub async fn update_status(
        &self,
        id: ClosureId,
        status: ClosureStatus,
    ) -> Result<Closure, ClosuresApiError> {
        let url = format!("{}/status", self.closure_url(id));
        let request = self.authorized(self.client.post(url))?;
        let response = request
            .query(&[("new_status", status.as_str())])
            .send()
            .await?;
        handle_response(response, Some(id)).await
    }

    pub async fn delete(&self, id: ClosureId) -> Result<(), ClosuresApiError> {
        let request = self.authorized(self.client.delete(self.closure_url(id)))?;
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(ClosuresApiError::NotFound(id)),
            status => Err(ClosuresApiError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    pub async fn statistics(&self) -> Result<ClosureStatistics, ClosuresApiError> {
        let url = format!("{}statistics/summary", self.base_url());
        let response = self.client.get(url).send().await?;
        handle_response(response, None).await
    }
}

async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    id: Option<ClosureId>,
) -> Result<T, ClosuresApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(ClosuresApiError::NotFound(id));
    }

    Err(ClosuresApiError::Api {
        status: status.as_u16(),
        message: response.text().await.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
    };
    use detour_core::{closure::ClosureGeometry, closure_category::ClosureCategory};
    use serde_json::{Value, json};

    use super::*;

    fn closure_json(id: i64) -> Value {
        json!({
            "id": id,
            "geometry": { "type": "Point", "coordinates": [-87.6298, 41.8781] },
            "description": "Crash blocking the left lane",
            "closure_type": "accident",
            "start_time": "2025-06-01T08:00:00Z",
            "end_time": null,
            "status": "active",
            "submitter_id": 7,
            "source": null,
            "confidence_level": 6
        })
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{}", address)
    }

    fn client(api_url: String, token: Option<&str>) -> ClosuresApiClient {
        ClosuresApiClient::with_client(
            ClosuresApiClientParams {
                api_url,
                token: token.map(str::to_string),
                page_size: 2,
                max_pages: 10,
            },
            reqwest::Client::builder().no_proxy().build().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_fetch_in_bbox_follows_pages() {
        let router = Router::new().route(
            "/api/v1/closures/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params["bbox"], "-87.7,41.8,-87.6,41.9");
                assert_eq!(params["size"], "2");
                let page: i64 = params["page"].parse().unwrap();
                let items = match page {
                    1 => vec![closure_json(1), closure_json(2)],
                    2 => vec![closure_json(3)],
                    _ => vec![],
                };
                Json(json!({ "items": items, "total": 3, "page": page, "size": 2, "pages": 2 }))
            }),
        );
        let url = spawn_server(router).await;

        let closures = client(url, None)
            .fetch_in_bbox(&BoundingBox::new(41.9, 41.8, -87.6, -87.7))
            .await
            .unwrap();

        let ids: Vec<ClosureId> = closures.iter().map(|closure| closure.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let router = Router::new().route(
            "/api/v1/closures/{id}",
            get(|Path(id): Path<i64>| async move {
                if id == 1 {
                    Ok(Json(closure_json(1)))
                } else {
                    Err((StatusCode::NOT_FOUND, "Closure not found"))
                }
            }),
        );
        let url = spawn_server(router).await;
        let client = client(url, None);

        assert_eq!(client.get(1).await.unwrap().category, ClosureCategory::Accident);
        assert!(matches!(
            client.get(2).await,
            Err(ClosuresApiError::NotFound(2))
        ));
    }

    #[tokio::test]
    async fn test_write_operations_need_token() {
        // Nothing listens here, the token check fails before any request
        let client = client("http://127.0.0.1:9".to_string(), None);

        assert!(matches!(
            client.update_status(1, ClosureStatus::Cancelled).await,
            Err(ClosuresApiError::MissingToken)
        ));
        assert!(matches!(
            client.delete(1).await,
            Err(ClosuresApiError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn test_create_validates_before_sending() {
        let client = client("http://127.0.0.1:9".to_string(), Some("secret"));
        let draft = ClosureDraft {
            geometry: ClosureGeometry::LineString(vec![[-87.6298, 41.8781]]),
            description: "Water main repair blocking eastbound traffic".to_string(),
            category: ClosureCategory::Construction,
            start_time: "2025-06-01T08:00:00Z".parse().unwrap(),
            end_time: None,
            source: None,
            confidence_level: None,
            is_bidirectional: None,
        };

        assert!(matches!(
            client.create(draft).await,
            Err(ClosuresApiError::Validation(
                ClosureValidationError::TooFewCoordinates(1)
            ))
        ));
    }

    #[tokio::test]
    async fn test_create_sends_bearer_token() {
        let router = Router::new().route(
            "/api/v1/closures/",
            axum::routing::post(
                |headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(headers["authorization"], "Bearer secret");
                    assert_eq!(body["closure_type"], "accident");
                    let mut created = closure_json(42);
                    created["description"] = body["description"].clone();
                    (StatusCode::CREATED, Json(created))
                },
            ),
        );
        let url = spawn_server(router).await;

        let draft = ClosureDraft {
            geometry: ClosureGeometry::Point([-87.6298, 41.8781]),
            description: " Crash blocking the left lane ".to_string(),
            category: ClosureCategory::Accident,
            start_time: "2025-06-01T08:00:00Z".parse().unwrap(),
            end_time: None,
            source: None,
            confidence_level: Some(6),
            is_bidirectional: Some(true),
        };

        let created = client(url, Some("secret")).create(draft).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.description, "Crash blocking the left lane");
    }
}
