use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

use crate::detect::LabelDetector;
use crate::store::PhotoStore;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default request body limit for uploads, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Port range tried when neither `--port` nor `PORT` is given.
pub const PORT_SCAN_BASE: u16 = 8480;
pub const PORT_SCAN_RANGE: u16 = 10;

pub const NO_QUERY_ERROR: &str = "No search query provided.";
pub const NO_FILE_ERROR: &str = "No file provided.";

// ---------------------------------------------------------------------------
// Envelope styles
// ---------------------------------------------------------------------------

/// How `/search` wraps its payload. Mirrors the shapes a real API gateway
/// stage produces depending on its integration type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EnvelopeStyle {
    /// `{"results": [...]}`
    #[default]
    Plain,
    /// `{"statusCode": 200, "body": "<json>"}`, always HTTP 200
    Proxy,
    /// `{"data": {"statusCode": 200, "body": "<json>"}}`, always HTTP 200
    Wrapped,
}

// ---------------------------------------------------------------------------
// Stored photos
// ---------------------------------------------------------------------------

/// One object in the in-memory bucket.
#[derive(Clone, Debug)]
pub struct StoredPhoto {
    pub key: String,
    pub content_type: String,
    pub bytes: Arc<[u8]>,
    /// Custom labels first, then detected ones. Lowercased, deduplicated.
    pub labels: Vec<String>,
    /// Insertion sequence; overwriting a key moves it to the end.
    pub seq: u64,
}

/// Response body for `PUT /upload`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub object_key: String,
    pub labels: Vec<String>,
}

// ---------------------------------------------------------------------------
// Axum state
// ---------------------------------------------------------------------------

/// Gateway settings fixed at startup.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Base URL that photo links in search results point at.
    pub public_url: Url,
    pub envelope: EnvelopeStyle,
    pub max_upload_bytes: usize,
}

impl GatewayConfig {
    pub fn new(public_url: Url) -> Self {
        Self { public_url, envelope: EnvelopeStyle::Plain, max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024 }
    }

    /// `{public_url}/photos/{key}`, key percent-encoded as one path segment.
    pub fn photo_url(&self, key: &str) -> String {
        let mut url = self.public_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("photos").push(key);
        }
        url.to_string()
    }
}

/// Axum application state shared by every handler.
#[derive(Clone)]
pub struct GatewayContext {
    pub store: Arc<PhotoStore>,
    pub config: Arc<GatewayConfig>,
    pub detector: Arc<dyn LabelDetector>,
    pub start_time: Instant,
}

impl GatewayContext {
    pub fn new(config: GatewayConfig, detector: Arc<dyn LabelDetector>) -> Self {
        Self { store: Arc::new(PhotoStore::new()), config: Arc::new(config), detector, start_time: Instant::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_url_encodes_key_as_one_segment() {
        let config = GatewayConfig::new(Url::parse("http://127.0.0.1:8480/").unwrap());
        assert_eq!(config.photo_url("my dog.jpg"), "http://127.0.0.1:8480/photos/my%20dog.jpg");

        let staged = GatewayConfig::new(Url::parse("https://cdn.example.com/dev").unwrap());
        assert_eq!(staged.photo_url("a/b.png"), "https://cdn.example.com/dev/photos/a%2Fb.png");
    }
}
