//! Response mapping / 响应映射

use super::error::{GatewayError, Result};
use super::schema::{RawHitEnvelope, ResultRecord};
use serde_json::Value;

/// Flatten the hit envelope into `_source` records, keeping engine order.
///
/// A hit without an object `_source` fails the whole call: a partial list
/// would be indistinguishable from a smaller match set.
pub fn map_results(env: RawHitEnvelope) -> Result<Vec<ResultRecord>> {
    env.hits
        .hits
        .into_iter()
        .enumerate()
        .map(|(pos, hit)| match hit.source {
            Some(Value::Object(record)) => Ok(record),
            Some(other) => Err(GatewayError::Malformed(format!(
                "hit {} (_id={}) has non-object _source: {}",
                pos,
                hit.id.as_deref().unwrap_or("?"),
                type_name(&other)
            ))),
            None => Err(GatewayError::Malformed(format!(
                "hit {} (_id={}) has no _source",
                pos,
                hit.id.as_deref().unwrap_or("?")
            ))),
        })
        .collect()
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
