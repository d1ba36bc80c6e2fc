//! Gateway router / 网关路由
//!
//! Entry points for the two product queries. Each call runs
//! translate → execute → map on its own values; the gateway only holds
//! immutable settings and a shared backend handle.
//!
//! Title searches are capped at `page_size` results while `list_all` sends
//! no `size` and gets the engine default. The asymmetry is kept on purpose,
//! matching the resolvers this service replaces.

use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::client::{validate_index_name, SearchBackend, SearchClient};
use super::error::{GatewayError, Result};
use super::mapper::map_results;
use super::query::{sanitize_title, translate};
use super::schema::{ResultRecord, SearchRequest};
use crate::config::EngineConfig;

#[derive(Clone)]
pub struct Gateway {
    backend: Arc<dyn SearchBackend>,
    index: String,
    page_size: usize,
}

impl Gateway {
    pub fn new(backend: Arc<dyn SearchBackend>, index: impl Into<String>, page_size: usize) -> Self {
        Self {
            backend,
            index: index.into(),
            page_size,
        }
    }

    /// Gateway backed by a fresh [`SearchClient`] / 基于配置创建网关
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        validate_index_name(&config.index)?;
        let client = SearchClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.index.clone(), config.default_page_size))
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Products whose title matches / 按标题搜索商品
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<ResultRecord>> {
        self.search(&SearchRequest::ByTitle {
            title: title.to_string(),
        })
        .await
    }

    /// Every product, engine-default page / 列出全部商品
    pub async fn list_all(&self) -> Result<Vec<ResultRecord>> {
        self.search(&SearchRequest::All).await
    }

    pub async fn search(&self, req: &SearchRequest) -> Result<Vec<ResultRecord>> {
        if let SearchRequest::ByTitle { title } = req {
            if sanitize_title(title).is_empty() {
                return Err(GatewayError::InvalidInput("title must not be empty".to_string()));
            }
        }

        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("search", %request_id, index = %self.index);

        async move {
            let body = translate(req, self.page_size);
            let env = self.backend.execute(&self.index, &body).await?;
            let records = map_results(env)?;
            tracing::debug!("Search returned {} records", records.len());
            Ok(records)
        }
        .instrument(span)
        .await
    }
}
