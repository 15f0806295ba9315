use axum::{
    body::Bytes,
    extract::{Json, Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use photoscope_core::types::{guess_content_type, SearchEnvelope, SearchResult};
use photoscope_core::{CUSTOM_LABELS_FIELD, CUSTOM_LABELS_HEADER, OCTET_STREAM};

use crate::query::extract_keywords;
use crate::types::*;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Wrap a `/search` payload in the configured envelope.
///
/// `proxy` and `wrapped` always answer HTTP 200 and carry the real status in
/// `statusCode`, the way a non-proxy Lambda integration does.
pub fn envelope(style: EnvelopeStyle, status: StatusCode, payload: Value) -> Response {
    match style {
        EnvelopeStyle::Plain => (status, Json(payload)).into_response(),
        EnvelopeStyle::Proxy => {
            Json(json!({ "statusCode": status.as_u16(), "body": payload.to_string() })).into_response()
        }
        EnvelopeStyle::Wrapped => Json(json!({
            "data": { "statusCode": status.as_u16(), "body": payload.to_string() }
        }))
        .into_response(),
    }
}

fn header_labels(headers: &HeaderMap) -> Option<String> {
    headers.get(CUSTOM_LABELS_HEADER).and_then(|v| v.to_str().ok()).map(str::to_string)
}

fn valid_key(key: &str) -> bool {
    !key.trim().is_empty() && !key.contains('/') && key != "." && key != ".."
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

pub async fn api_search(State(ctx): State<GatewayContext>, Query(params): Query<SearchQuery>) -> Response {
    let style = ctx.config.envelope;
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        warn!("Search without query");
        return envelope(style, StatusCode::BAD_REQUEST, json!({ "error": NO_QUERY_ERROR }));
    }

    let keywords = extract_keywords(query);
    let results: Vec<SearchResult> = ctx
        .store
        .search(&keywords)
        .into_iter()
        .map(|photo| SearchResult::new(ctx.config.photo_url(&photo.key), photo.labels))
        .collect();
    info!(query = query, keywords = ?keywords, hits = results.len(), "Search");

    let payload = serde_json::to_value(SearchEnvelope { results }).unwrap_or_else(|_| json!({ "results": [] }));
    envelope(style, StatusCode::OK, payload)
}

// ---------------------------------------------------------------------------
// Upload (multipart)
// ---------------------------------------------------------------------------

pub async fn api_upload(
    State(ctx): State<GatewayContext>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut field_labels: Option<String> = None;

    while let Some(field) =
        multipart.next_field().await.map_err(|e| api_error(e.status(), e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .or_else(|| guess_content_type(&file_name).map(str::to_string))
                    .unwrap_or_else(|| OCTET_STREAM.to_string());
                let bytes = field.bytes().await.map_err(|e| api_error(e.status(), e.body_text()))?;
                file = Some((file_name, content_type, bytes));
            }
            Some(CUSTOM_LABELS_FIELD) => {
                field_labels = Some(field.text().await.map_err(|e| api_error(e.status(), e.body_text()))?);
            }
            _ => {}
        }
    }

    let Some((key, content_type, bytes)) = file else {
        warn!("Upload without file field");
        return Err(api_error(StatusCode::BAD_REQUEST, NO_FILE_ERROR));
    };
    if !valid_key(&key) {
        return Err(api_error(StatusCode::BAD_REQUEST, format!("Invalid file name: {key:?}")));
    }

    let raw_labels = header_labels(&headers).or(field_labels).unwrap_or_default();
    let labels = ctx.store.put(&key, &content_type, bytes.to_vec(), &raw_labels, ctx.detector.as_ref());
    Ok(Json(UploadResponse { object_key: key, labels }))
}

// ---------------------------------------------------------------------------
// Object routes (direct storage)
// ---------------------------------------------------------------------------

pub async fn api_put_object(
    State(ctx): State<GatewayContext>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    if !valid_key(&key) {
        return Err(api_error(StatusCode::BAD_REQUEST, format!("Invalid object key: {key:?}")));
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(OCTET_STREAM)
        .to_string();
    let raw_labels = header_labels(&headers).unwrap_or_default();
    ctx.store.put(&key, &content_type, body.to_vec(), &raw_labels, ctx.detector.as_ref());
    Ok(StatusCode::OK)
}

pub async fn api_get_object(State(ctx): State<GatewayContext>, Path(key): Path<String>) -> Response {
    match ctx.store.get(&key) {
        Some(photo) => {
            ([(header::CONTENT_TYPE, photo.content_type)], photo.bytes.to_vec()).into_response()
        }
        None => api_error(StatusCode::NOT_FOUND, "Photo not found").into_response(),
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

pub async fn api_health(State(ctx): State<GatewayContext>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "photos": ctx.store.len(),
        "detector": ctx.detector.name(),
        "envelope": format!("{:?}", ctx.config.envelope).to_lowercase(),
        "uptime_secs": ctx.start_time.elapsed().as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_validation() {
        assert!(valid_key("my dog.jpg"));
        assert!(!valid_key(""));
        assert!(!valid_key("  "));
        assert!(!valid_key("a/b.jpg"));
        assert!(!valid_key(".."));
    }
}
