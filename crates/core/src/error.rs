//! Error types for photoscope-core.
//!
//! Every failure of a search or upload ends up as a [`PhotoError`]. Validation
//! errors are raised before any request is built; the rest carry whatever
//! diagnostic detail the remote side gave us.

use thiserror::Error;

/// Local precondition failures. No request is issued when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Search query is empty or whitespace only
    #[error("No search query provided")]
    MissingQuery,
    /// Upload submitted without a selected file
    #[error("No photo selected for upload")]
    MissingFile,
    /// Selected file could not be read from disk
    #[error("Could not read selected file {path}: {reason}")]
    UnreadableFile { path: String, reason: String },
    /// Custom labels contain characters that cannot travel in an HTTP header
    #[error("Custom labels cannot be sent as a header: {0}")]
    InvalidLabels(String),
    /// Direct storage upload requested but no storage root is configured
    #[error("No storage root configured for direct upload")]
    MissingStorageRoot,
}

/// Errors surfaced by the search and upload requesters.
#[derive(Debug, Clone, Error)]
pub enum PhotoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The endpoint answered with a non-success status
    #[error("Error: {status} - {reason}")]
    Request { status: u16, reason: String, body: Option<String> },
    /// The response body is not a search envelope we understand
    #[error("Could not parse response: {0}")]
    Parse(String),
    /// The request never produced a status (connection refused, DNS, bad URL)
    #[error("Request failed: {0}")]
    Transport(String),
}

impl PhotoError {
    /// Build a `Request` error from a status code and an optional response body.
    pub fn request(status: u16, body: Option<String>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        Self::Request { status, reason, body: body.filter(|b| !b.is_empty()) }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PhotoError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => PhotoError::request(status.as_u16(), None),
            None => PhotoError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PhotoError {
    fn from(err: serde_json::Error) -> Self {
        PhotoError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_carries_canonical_reason() {
        let err = PhotoError::request(500, Some("boom".to_string()));
        assert_eq!(err.to_string(), "Error: 500 - Internal Server Error");
        assert_eq!(err.status(), Some(500));
        match err {
            PhotoError::Request { body, .. } => assert_eq!(body.as_deref(), Some("boom")),
            other => panic!("expected Request, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_dropped() {
        let err = PhotoError::request(404, Some(String::new()));
        assert!(matches!(err, PhotoError::Request { body: None, .. }));
    }

    #[test]
    fn validation_converts_transparently() {
        let err: PhotoError = ValidationError::MissingQuery.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "No search query provided");
    }
}
