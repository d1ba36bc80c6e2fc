//! Search request/response shapes / 搜索请求与响应结构
//!
//! Engine-facing types mirror the document-search API:
//! request `{ from, size, query }`, response `{ hits: { hits: [ { _source } ] } }`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Field matched by title searches / 标题搜索的匹配字段
pub const TITLE_FIELD: &str = "title";

/// Typed search request / 类型化搜索请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SearchRequest {
    /// Match on the title field / 按标题匹配
    ByTitle { title: String },
    /// Every document in the index / 列出全部文档
    All,
}

/// Caller-facing document, equal to a hit's `_source` / 返回给调用方的文档
pub type ResultRecord = Map<String, Value>;

/// Engine-native query document / 搜索引擎原生查询体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQueryBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    pub query: QueryClause,
}

/// Query clause / 查询子句
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClause {
    /// `{ "match": { <field>: <value> } }`
    Match(FieldMatch),
    /// `{ "match_all": {} }`
    MatchAll {},
}

/// Single-field match, serialized as a one-entry object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub field: String,
    pub value: String,
}

impl Serialize for FieldMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.value)?;
        map.end()
    }
}

/// Raw engine response envelope / 引擎原始响应
///
/// Only `hits.hits` is required; `took`, `_shards`, `hits.total` and the
/// like are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHitEnvelope {
    pub hits: RawHits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHits {
    pub hits: Vec<RawHit>,
}

/// One matched document plus engine metadata / 单条命中
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_index")]
    pub index: Option<String>,
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_score")]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Option<Value>,
}
