//! Endpoint configuration and `photoscope.toml` loading.
//!
//! [`ApiConfig`] is passed explicitly to the requesters; nothing in the crate
//! reads process-wide endpoint state.

use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};
use url::Url;

use crate::API_KEY_HEADER;

/// Gateway URL used when nothing else is configured: the local development gateway.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8480";

/// Name of the per-project config file.
pub const CONFIG_FILE_NAME: &str = "photoscope.toml";

/// Known keys in `photoscope.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &["base_url", "api_key", "storage_root", "labels_placement"];

/// Where multipart uploads carry the custom labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelsPlacement {
    /// `x-amz-meta-customLabels` request header
    #[default]
    Header,
    /// `customLabels` multipart form field
    Field,
}

impl FromStr for LabelsPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(LabelsPlacement::Header),
            "field" | "form" => Ok(LabelsPlacement::Field),
            other => Err(format!("unknown labels placement '{other}' (expected header or field)")),
        }
    }
}

/// Endpoints and credentials for the photo API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API gateway stage URL, e.g. `https://abc.execute-api.us-east-1.amazonaws.com/dev`.
    pub base_url: Url,
    /// Sent as `x-api-key` when present.
    pub api_key: Option<String>,
    /// Bucket URL for direct uploads, e.g. `https://bucket.s3.amazonaws.com`.
    pub storage_root: Option<Url>,
    pub labels_placement: LabelsPlacement,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self { base_url, api_key: None, storage_root: None, labels_placement: LabelsPlacement::default() }
    }

    /// Parse a base URL string into a config.
    pub fn from_base(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_storage_root(mut self, storage_root: Url) -> Self {
        self.storage_root = Some(storage_root);
        self
    }

    pub fn with_labels_placement(mut self, placement: LabelsPlacement) -> Self {
        self.labels_placement = placement;
        self
    }

    /// `<base>/<segment>`, tolerant of a trailing slash on the base.
    pub fn endpoint(&self, segment: &str) -> Url {
        append_segment(&self.base_url, segment)
    }

    /// `<storage-root>/<file-name>`, with the file name encoded as one path segment.
    pub fn storage_url(&self, file_name: &str) -> Option<Url> {
        self.storage_root.as_ref().map(|root| append_segment(root, file_name))
    }

    /// Attach the API key header to a gateway request, if one is configured.
    pub fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key {
            Some(ref key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"))
    }
}

fn append_segment(base: &Url, segment: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    url
}

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn parse_url_key(table: &toml::Table, key: &str) -> Option<Url> {
    let raw = table.get(key)?.as_str()?;
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(key, value = raw, error = %e, "Invalid URL in {CONFIG_FILE_NAME}, ignoring");
            None
        }
    }
}

/// Load an [`ApiConfig`] from a `photoscope.toml` file.
///
/// Returns defaults merged with any overrides from the file. A missing or
/// unparsable file yields defaults with a warning. Unknown keys trigger a
/// warning with a typo suggestion.
pub fn load_photoscope_config(config_path: &Path) -> ApiConfig {
    let mut config = ApiConfig::default();

    if !config_path.exists() {
        return config;
    }

    debug!(path = %config_path.display(), "Loading {CONFIG_FILE_NAME}");
    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Could not read config file");
            return config;
        }
    };
    let table = match content.parse::<toml::Table>() {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Failed to parse {CONFIG_FILE_NAME}");
            return config;
        }
    };

    // Unknown keys only warn
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
        match suggestion {
            Some(suggestion) if edit_distance(key, suggestion) <= 3 => {
                warn!(
                    key = key.as_str(),
                    suggestion = *suggestion,
                    "Unknown key in {CONFIG_FILE_NAME}, did you mean '{suggestion}'?"
                );
            }
            _ => {
                warn!(
                    key = key.as_str(),
                    "Unknown key in {CONFIG_FILE_NAME} (known keys: {})",
                    KNOWN_CONFIG_KEYS.join(", ")
                );
            }
        }
    }

    if let Some(url) = parse_url_key(&table, "base_url") {
        config.base_url = url;
    }

    if let Some(key) = table.get("api_key").and_then(|v| v.as_str()) {
        if !key.is_empty() {
            config.api_key = Some(key.to_string());
        }
    }

    config.storage_root = parse_url_key(&table, "storage_root");

    if let Some(raw) = table.get("labels_placement").and_then(|v| v.as_str()) {
        match raw.parse() {
            Ok(placement) => config.labels_placement = placement,
            Err(e) => warn!(error = e.as_str(), "Ignoring labels_placement"),
        }
    }

    config
}
