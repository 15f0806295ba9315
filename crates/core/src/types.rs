//! Core types shared across Photoscope: search results, photo files, upload
//! requests, and the upload form state.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::labels::parse_custom_labels;
use crate::OCTET_STREAM;

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// One photo returned by the search endpoint.
///
/// `url` is optional so that malformed entries survive normalization; the
/// renderer skips anything without a usable url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
}

impl SearchResult {
    pub fn new(url: impl Into<String>, labels: Vec<String>) -> Self {
        Self { url: Some(url.into()), labels }
    }
}

/// Search response body as the gateway produces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SearchEnvelope {
    pub results: Vec<SearchResult>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// A file picked for upload: name, MIME type if known, and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), content_type, bytes }
    }

    /// Content type to send, falling back to `application/octet-stream`.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().filter(|c| !c.is_empty()).unwrap_or(OCTET_STREAM)
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| "photo".to_string());
        let content_type = guess_content_type(&name).map(str::to_string);
        Ok(Self { name, content_type, bytes })
    }
}

/// MIME type for common image extensions. Unknown extensions yield `None`.
pub fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase())?;
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(mime)
}

/// A file together with its cleaned custom labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: PhotoFile,
    pub custom_labels: Vec<String>,
}

impl UploadRequest {
    /// Build a request from the raw comma-separated labels input.
    pub fn new(file: PhotoFile, raw_labels: &str) -> Self {
        Self { file, custom_labels: parse_custom_labels(raw_labels) }
    }

    /// Labels as they travel on the wire: comma-joined, no padding.
    pub fn labels_value(&self) -> String {
        self.custom_labels.join(",")
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: u16,
    /// URL the file was sent to.
    pub location: String,
    pub body: String,
}

/// State of the upload form: the selected file and the labels input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadForm {
    pub selected: Option<PathBuf>,
    pub custom_labels: String,
}

impl UploadForm {
    pub fn new(selected: Option<PathBuf>, custom_labels: impl Into<String>) -> Self {
        Self { selected, custom_labels: custom_labels.into() }
    }

    /// Clear the file selection and the labels input.
    pub fn reset(&mut self) {
        self.selected = None;
        self.custom_labels.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none() && self.custom_labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_tolerates_missing_fields() {
        let r: SearchResult = serde_json::from_str(r#"{"labels": null}"#).unwrap();
        assert_eq!(r.url, None);
        assert!(r.labels.is_empty());

        let r: SearchResult = serde_json::from_str(r#"{"url": "https://x/a.jpg"}"#).unwrap();
        assert_eq!(r.url.as_deref(), Some("https://x/a.jpg"));
        assert!(r.labels.is_empty());
    }

    #[test]
    fn content_type_defaults_to_octet_stream() {
        let f = PhotoFile::new("blob", None, vec![1, 2, 3]);
        assert_eq!(f.content_type_or_default(), "application/octet-stream");
        let f = PhotoFile::new("blob", Some(String::new()), vec![]);
        assert_eq!(f.content_type_or_default(), "application/octet-stream");
        let f = PhotoFile::new("cat.png", Some("image/png".into()), vec![]);
        assert_eq!(f.content_type_or_default(), "image/png");
    }

    #[test]
    fn guesses_image_types() {
        assert_eq!(guess_content_type("Beach.JPG"), Some("image/jpeg"));
        assert_eq!(guess_content_type("a.b.webp"), Some("image/webp"));
        assert_eq!(guess_content_type("notes.txt"), None);
        assert_eq!(guess_content_type("noext"), None);
    }

    #[test]
    fn upload_request_cleans_labels() {
        let req = UploadRequest::new(PhotoFile::new("a.jpg", None, vec![]), " dog , beach,, ");
        assert_eq!(req.custom_labels, vec!["dog", "beach"]);
        assert_eq!(req.labels_value(), "dog,beach");
    }

    #[test]
    fn form_reset_clears_everything() {
        let mut form = UploadForm::new(Some(PathBuf::from("/tmp/a.jpg")), "x, y");
        assert!(!form.is_empty());
        form.reset();
        assert!(form.is_empty());
    }

    #[tokio::test]
    async fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sunset.png");
        std::fs::write(&path, b"\x89PNG").unwrap();
        let file = PhotoFile::read(&path).await.unwrap();
        assert_eq!(file.name, "sunset.png");
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
        assert_eq!(file.bytes, b"\x89PNG");
    }
}
