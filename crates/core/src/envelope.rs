//! Search response normalization.
//!
//! The search endpoint's answer reaches us in several shapes:
//!
//! - `{ "results": [...] }` straight from a proxy-integrated gateway
//! - `{ "statusCode": 200, "body": "<json>" }` from a non-proxy Lambda integration
//! - `{ "data": { "body": <json or string> } }` from a generated gateway client
//!
//! and any `body` may be a parsed object or a JSON-encoded string. All of them
//! go through [`normalize_results`], which peels wrappers until it finds
//! `results`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::PhotoError;
use crate::types::SearchResult;

/// Wrapper layers we are willing to peel before giving up.
const MAX_WRAPPER_DEPTH: usize = 4;

/// A response body before normalization: raw text, or an already parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Text(String),
    Parsed(Value),
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody::Text(text)
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        ResponseBody::Text(text.to_string())
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        ResponseBody::Parsed(value)
    }
}

/// Normalize any supported envelope into the list of search results.
///
/// A missing, null, or empty `results` is not an error: it yields an empty
/// list and the caller renders "no results". An embedded non-2xx `statusCode`
/// becomes a [`PhotoError::Request`].
pub fn normalize_results(body: impl Into<ResponseBody>) -> Result<Vec<SearchResult>, PhotoError> {
    let value = match body.into() {
        ResponseBody::Parsed(value) => value,
        ResponseBody::Text(text) if text.trim().is_empty() => return Ok(Vec::new()),
        ResponseBody::Text(text) => parse_text(&text)?,
    };
    normalize_value(value, 0)
}

fn parse_text(text: &str) -> Result<Value, PhotoError> {
    serde_json::from_str(text).map_err(|e| PhotoError::Parse(format!("body is not valid JSON: {e}")))
}

fn normalize_value(value: Value, depth: usize) -> Result<Vec<SearchResult>, PhotoError> {
    if depth > MAX_WRAPPER_DEPTH {
        return Err(PhotoError::Parse("response is nested too deeply".to_string()));
    }
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => {
            debug!(depth, "Parsing string-encoded response body");
            normalize_value(parse_text(&text)?, depth + 1)
        }
        Value::Object(map) => normalize_object(map, depth),
        other => Err(PhotoError::Parse(format!("expected a JSON object, got {}", kind(&other)))),
    }
}

fn normalize_object(mut map: Map<String, Value>, depth: usize) -> Result<Vec<SearchResult>, PhotoError> {
    // Direct field access first
    if let Some(results) = map.remove("results") {
        return extract_results(results, depth);
    }

    if let Some(status) = map.get("statusCode").and_then(Value::as_u64) {
        if !(200..300).contains(&status) {
            let status = u16::try_from(status)
                .map_err(|_| PhotoError::Parse(format!("embedded statusCode {status} is out of range")))?;
            let body = map.get("body").map(body_text);
            return Err(PhotoError::request(status, body));
        }
    }

    for key in ["body", "data"] {
        if let Some(inner) = map.remove(key) {
            return normalize_value(inner, depth + 1);
        }
    }

    Ok(Vec::new())
}

fn extract_results(results: Value, depth: usize) -> Result<Vec<SearchResult>, PhotoError> {
    match results {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter().map(to_search_result).collect(),
        Value::String(text) if depth < MAX_WRAPPER_DEPTH => extract_results(parse_text(&text)?, depth + 1),
        other => Err(PhotoError::Parse(format!("`results` must be an array, got {}", kind(&other)))),
    }
}

/// Read one result leniently: a url of the wrong type counts as missing,
/// non-string labels are dropped.
fn to_search_result(item: Value) -> Result<SearchResult, PhotoError> {
    let Value::Object(entry) = item else {
        return Err(PhotoError::Parse(format!("result entry must be an object, got {}", kind(&item))));
    };
    let url = entry.get("url").and_then(Value::as_str).map(str::to_string);
    let labels = match entry.get("labels") {
        Some(Value::Array(labels)) => {
            labels.iter().filter_map(Value::as_str).map(str::to_string).collect()
        }
        _ => Vec::new(),
    };
    Ok(SearchResult { url, labels })
}

fn body_text(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
