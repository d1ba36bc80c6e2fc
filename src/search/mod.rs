//! Search module - product search over a remote document-search engine / 搜索模块
//!
//! Pipeline / 处理流程:
//! - query: typed request → engine query body (pure)
//! - client: one HTTP call to `{endpoint}/{index}/_search`
//! - mapper: hit envelope → ordered `_source` records
//! - gateway: the two entry points wiring the three together
//!
//! The engine owns storage and indexing; nothing here outlives a call.

pub mod client;
pub mod error;
pub mod gateway;
pub mod mapper;
pub mod query;
pub mod schema;

pub use client::{RequestAuthorizer, SearchBackend, SearchClient};
pub use error::{GatewayError, Result, TransportFailure};
pub use gateway::Gateway;
pub use mapper::map_results;
pub use query::{sanitize_title, translate};
pub use schema::{RawHit, RawHitEnvelope, ResultRecord, SearchQueryBody, SearchRequest};
