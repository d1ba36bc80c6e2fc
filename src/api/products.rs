use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{respond, ApiResponse, ApiResult};
use crate::state::AppState;
use search_gateway::search::ResultRecord;

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
}

/// GET /api/products/search?title= - 按标题搜索商品
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TitleQuery>, QueryRejection>,
) -> ApiResult<Vec<ResultRecord>> {
    // Unparseable query strings get the same envelope as every other error.
    let Query(q) = match query {
        Ok(q) => q,
        Err(e) => {
            tracing::debug!("Rejected search query string: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(StatusCode::BAD_REQUEST, &e.body_text())),
            );
        }
    };
    let gateway = &state.gateway;
    let title = q.title.as_str();
    respond(
        state
            .retry
            .run(move || async move { gateway.search_by_title(title).await })
            .await,
    )
}

/// GET /api/products - 列出全部商品
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ResultRecord>> {
    let gateway = &state.gateway;
    respond(state.retry.run(move || async move { gateway.list_all().await }).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use search_gateway::retry::RetryPolicy;
    use search_gateway::search::{
        Gateway, GatewayError, RawHitEnvelope, Result, SearchBackend, SearchQueryBody, TransportFailure,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    /// Fails the first `failures` calls with `error`, then answers `reply`.
    struct ScriptedBackend {
        calls: AtomicUsize,
        failures: usize,
        error: fn() -> GatewayError,
        reply: Value,
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn execute(&self, _index: &str, _body: &SearchQueryBody) -> Result<RawHitEnvelope> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err((self.error)());
            }
            Ok(serde_json::from_value(self.reply.clone()).unwrap())
        }
    }

    fn backend(failures: usize, error: fn() -> GatewayError, reply: Value) -> Arc<ScriptedBackend> {
        Arc::new(ScriptedBackend {
            calls: AtomicUsize::new(0),
            failures,
            error,
            reply,
        })
    }

    fn healthy(reply: Value) -> Arc<ScriptedBackend> {
        backend(0, || GatewayError::Malformed("unused".into()), reply)
    }

    fn app(backend: Arc<ScriptedBackend>) -> axum::Router {
        let gateway = Gateway::new(backend, "product-index", 50);
        let retry = RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(2));
        routes().with_state(Arc::new(AppState::new(gateway, retry)))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_search_route_returns_records() {
        let b = healthy(json!({ "hits": { "hits": [ { "_source": { "title": "Widget" } } ] } }));
        let (status, body) = get(app(b), "/api/products/search?title=Widget").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 200);
        assert_eq!(body["data"], json!([{ "title": "Widget" }]));
    }

    #[tokio::test]
    async fn test_search_route_without_title_is_bad_request() {
        let b = healthy(json!({ "hits": { "hits": [] } }));
        let (status, body) = get(app(b.clone()), "/api/products/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body.get("data").is_none());
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_repeated_title_param_gets_json_envelope() {
        let b = healthy(json!({ "hits": { "hits": [] } }));
        let (status, body) = get(app(b.clone()), "/api/products/search?title=a&title=b").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert!(body.get("data").is_none());
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_route_returns_empty_array() {
        let b = healthy(json!({ "hits": { "hits": [] } }));
        let (status, body) = get(app(b), "/api/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_transport_failures_are_retried() {
        let b = backend(
            2,
            || GatewayError::transport(TransportFailure::Timeout, "slow"),
            json!({ "hits": { "hits": [ { "_source": { "title": "Lamp" } } ] } }),
        );
        let (status, body) = get(app(b.clone()), "/api/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["title"], "Lamp");
        assert_eq!(b.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_upstream_status_is_not_retried() {
        let b = backend(
            usize::MAX,
            || GatewayError::UpstreamStatus { status: 503, body: "unavailable".into() },
            json!({ "hits": { "hits": [] } }),
        );
        let (status, body) = get(app(b.clone()), "/api/products/search?title=Widget").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], 502);
        assert!(body["message"].as_str().unwrap().contains("503"));
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_timeouts_map_to_gateway_timeout() {
        let b = backend(
            usize::MAX,
            || GatewayError::transport(TransportFailure::Timeout, "slow"),
            json!({ "hits": { "hits": [] } }),
        );
        let (status, _) = get(app(b.clone()), "/api/products").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(b.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_health_route() {
        let b = healthy(json!({ "hits": { "hits": [] } }));
        let (status, body) = get(app(b), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["index"], "product-index");
    }
}
