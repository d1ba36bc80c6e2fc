//! Search engine HTTP client / 搜索引擎 HTTP 客户端
//!
//! Issues exactly one `POST {endpoint}/{index}/_search` per call. No retries
//! happen here; see `crate::retry` for the caller-side policy.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::error::{GatewayError, Result, TransportFailure};
use super::schema::{RawHitEnvelope, SearchQueryBody};
use crate::config::EngineConfig;

const USER_AGENT: &str = concat!("search-gateway/", env!("CARGO_PKG_VERSION"));

/// Upstream error bodies longer than this are cut / 上游错误响应体最大保留长度
const MAX_ERROR_BODY: usize = 4096;

const MAX_INDEX_LEN: usize = 255;

/// Anything that can run a query body against an index / 搜索后端抽象
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn execute(&self, index: &str, body: &SearchQueryBody) -> Result<RawHitEnvelope>;
}

/// Hook for the credential provider to sign or tag outbound requests.
///
/// The client never reads credentials itself.
pub trait RequestAuthorizer: Send + Sync {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Check an index name before it becomes a URL path segment / 校验索引名
pub fn validate_index_name(index: &str) -> Result<()> {
    let invalid = |reason: &str| Err(GatewayError::InvalidInput(format!("index '{}' {}", index, reason)));

    if index.is_empty() {
        return invalid("is empty");
    }
    if index.len() > MAX_INDEX_LEN {
        return invalid("is longer than 255 bytes");
    }
    if index == "." || index == ".." {
        return invalid("is a relative path");
    }
    if index.starts_with(['-', '_', '+']) {
        return invalid("must not start with '-', '_' or '+'");
    }
    if let Some(c) = index.chars().find(|&c| {
        c.is_control()
            || c.is_whitespace()
            || c.is_uppercase()
            || matches!(c, '/' | '\\' | '*' | '?' | '"' | '<' | '>' | '|' | ',' | '#' | ':')
    }) {
        return invalid(&format!("contains forbidden character {:?}", c));
    }
    Ok(())
}

/// reqwest-backed search client / 基于 reqwest 的搜索客户端
#[derive(Clone)]
pub struct SearchClient {
    endpoint: Url,
    client: Client,
    timeout: Duration,
    authorizer: Option<Arc<dyn RequestAuthorizer>>,
}

impl SearchClient {
    /// Build a client with its own connection pool / 创建客户端（独立连接池）
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| {
                GatewayError::transport(TransportFailure::Other, format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self::with_http_client(endpoint, client, config.request_timeout()))
    }

    /// Use a pre-configured (e.g. already authenticated) HTTP client.
    pub fn with_http_client(endpoint: Url, client: Client, timeout: Duration) -> Self {
        Self {
            endpoint,
            client,
            timeout,
            authorizer: None,
        }
    }

    pub fn with_authorizer(mut self, authorizer: Arc<dyn RequestAuthorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `{endpoint}/{index}/_search`, built segment by segment.
    pub fn search_url(&self, index: &str) -> Result<Url> {
        validate_index_name(index)?;

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidInput(format!("endpoint '{}' cannot carry a path", self.endpoint)))?
            .pop_if_empty()
            .push(index)
            .push("_search");
        Ok(url)
    }

    /// Same as `execute`, abandoning the call when `token` fires.
    ///
    /// The in-flight request future is dropped on cancellation, which
    /// releases its connection.
    pub async fn execute_cancellable(
        &self,
        index: &str,
        body: &SearchQueryBody,
        token: &CancellationToken,
    ) -> Result<RawHitEnvelope> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Search request on index {} cancelled by caller", index);
                Err(GatewayError::transport(TransportFailure::Cancelled, "search request cancelled"))
            }
            res = self.send(index, body) => res,
        }
    }

    async fn send(&self, index: &str, body: &SearchQueryBody) -> Result<RawHitEnvelope> {
        let url = self.search_url(index)?;
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url.clone()).timeout(self.timeout).json(body);
        if let Some(authorizer) = &self.authorizer {
            request = authorizer.authorize(request);
        }

        let resp = request.send().await?;
        let status = resp.status();

        if !status.is_success() {
            // An unreadable error body must not hide the status.
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!("Search engine returned {} for {}", status, url);
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
                body: truncate_body(text),
            });
        }

        let text = resp.text().await?;

        serde_json::from_str::<RawHitEnvelope>(&text)
            .map_err(|e| GatewayError::Malformed(format!("Failed to parse search response: {}", e)))
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn execute(&self, index: &str, body: &SearchQueryBody) -> Result<RawHitEnvelope> {
        self.send(index, body).await
    }
}

/// Parse and check the engine endpoint / 解析引擎地址
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| GatewayError::InvalidInput(format!("invalid engine endpoint '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(GatewayError::InvalidInput(format!(
                "engine endpoint must be http or https, got '{}'",
                other
            )))
        }
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(GatewayError::InvalidInput(format!("engine endpoint '{}' has no host", raw)));
    }
    Ok(url)
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
