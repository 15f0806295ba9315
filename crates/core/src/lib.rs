//! Photoscope core: photo search and upload client.
//!
//! This crate holds everything that makes decisions in Photoscope. Adapters
//! (the `pscope` CLI, the local gateway) sit on top of it and only move data
//! in and out.
//!
//! # Modules
//!
//! - [`types`]: Data model: search results, photo files, upload requests, forms
//! - [`labels`]: Custom label parsing and label merging for indexing
//! - [`envelope`]: Search response normalization across envelope shapes
//! - [`render`]: Pure renderer from search results to display instructions
//! - [`search`]: Search requester (`GET <base>/search?q=`)
//! - [`upload`]: Upload requester (multipart to the gateway, or direct to storage)
//! - [`view`]: Search view and upload form state, user notifications
//! - [`config`]: `ApiConfig` and `photoscope.toml` loading
//! - [`error`]: Error types

pub mod config;
pub mod envelope;
pub mod error;
pub mod labels;
pub mod render;
pub mod search;
pub mod types;
pub mod upload;
pub mod view;

use std::path::PathBuf;

pub use config::{load_photoscope_config, ApiConfig, LabelsPlacement};
pub use error::{PhotoError, ValidationError};
pub use search::SearchRequester;
pub use upload::{UploadRequester, UploadTransport};

/// Header carrying the comma-joined custom labels, stored by S3 as object metadata.
pub const CUSTOM_LABELS_HEADER: &str = "x-amz-meta-customLabels";

/// Multipart form field carrying custom labels when they are not sent as a header.
pub const CUSTOM_LABELS_FIELD: &str = "customLabels";

/// Header carrying the API key, when one is configured.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Content type used when a file's MIME type is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// Cross-platform path helpers
// ---------------------------------------------------------------------------

/// Platform-aware home directory: `HOME` on Unix, `USERPROFILE` on Windows.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")).ok().map(PathBuf::from)
}

/// Platform-aware config directory: `~/.photoscope` on Unix, `%APPDATA%/photoscope` on Windows.
pub fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var("APPDATA").ok().map(|a| PathBuf::from(a).join("photoscope"))
    } else {
        home_dir().map(|h| h.join(".photoscope"))
    }
}
