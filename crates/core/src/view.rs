//! View state for adapters: the rendered results, the upload form, and the
//! notification shown after each action.
//!
//! Outcomes are applied in the order they arrive. Two overlapping searches
//! are not sequenced; whichever response is applied last is what stays on screen.

use serde::Serialize;
use tracing::{error, warn};

use crate::error::{PhotoError, ValidationError};
use crate::render::{render_results, RenderInstruction};
use crate::types::{SearchResult, UploadForm, UploadReceipt};

pub const SEARCH_FAILED: &str = "An error occurred while searching for photos. Please try again.";
pub const UPLOAD_FAILED: &str = "An error occurred while uploading the photo. Please try again.";
pub const UPLOAD_SUCCEEDED: &str = "Photo uploaded successfully!";
pub const ENTER_QUERY: &str = "Please enter a search query!";
pub const SELECT_PHOTO: &str = "Please select a photo to upload!";

/// What the user is told after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Success { message: String },
    /// `detail` is for local diagnostics and is not meant for display.
    Failure { message: String, detail: String },
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success { message } | Notification::Failure { message, .. } => message,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Notification::Failure { .. })
    }

    fn failure(message: &str, err: &PhotoError) -> Self {
        Notification::Failure { message: message.to_string(), detail: diagnostic(err) }
    }
}

/// Full diagnostic text for an error, including any response body.
pub fn diagnostic(err: &PhotoError) -> String {
    match err {
        PhotoError::Request { body: Some(body), .. } => format!("{err}: {body}"),
        _ => err.to_string(),
    }
}

/// The results container.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    instructions: Vec<RenderInstruction>,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[RenderInstruction] {
        &self.instructions
    }

    /// Apply a finished search. Success replaces the rendered results;
    /// failure leaves them as they were.
    pub fn apply(&mut self, outcome: Result<Vec<SearchResult>, PhotoError>) -> Option<Notification> {
        match outcome {
            Ok(results) => {
                self.instructions = render_results(&results);
                None
            }
            Err(PhotoError::Validation(ValidationError::MissingQuery)) => {
                warn!("Search submitted without a query");
                Some(Notification::Failure {
                    message: ENTER_QUERY.to_string(),
                    detail: ValidationError::MissingQuery.to_string(),
                })
            }
            Err(err) => {
                error!(error = %diagnostic(&err), "Error during photo search");
                Some(Notification::failure(SEARCH_FAILED, &err))
            }
        }
    }
}

impl UploadForm {
    /// Apply a finished upload. Success clears the form; failure leaves it
    /// untouched so the user can retry.
    pub fn apply_outcome(&mut self, outcome: &Result<UploadReceipt, PhotoError>) -> Notification {
        match outcome {
            Ok(_) => {
                self.reset();
                Notification::Success { message: UPLOAD_SUCCEEDED.to_string() }
            }
            Err(PhotoError::Validation(ValidationError::MissingFile)) => {
                warn!("Upload submitted without a file");
                Notification::Failure {
                    message: SELECT_PHOTO.to_string(),
                    detail: ValidationError::MissingFile.to_string(),
                }
            }
            Err(err) => {
                error!(error = %diagnostic(err), "Error during photo upload");
                Notification::failure(UPLOAD_FAILED, err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn results(n: usize) -> Vec<SearchResult> {
        (0..n).map(|i| SearchResult::new(format!("https://x.test/{i}.jpg"), vec![format!("l{i}")])).collect()
    }

    #[test]
    fn success_replaces_and_failure_keeps_results() {
        let mut view = SearchView::new();
        assert!(view.apply(Ok(results(2))).is_none());
        let before = view.instructions().to_vec();
        assert_eq!(before.len(), 2);

        let note = view.apply(Err(PhotoError::request(500, Some("boom".into())))).unwrap();
        assert!(note.is_failure());
        assert_eq!(note.message(), SEARCH_FAILED);
        match note {
            Notification::Failure { detail, .. } => assert!(detail.contains("boom")),
            _ => unreachable!(),
        }
        assert_eq!(view.instructions(), &before[..]);
    }

    #[test]
    fn empty_results_render_placeholder() {
        let mut view = SearchView::new();
        view.apply(Ok(results(3)));
        assert!(view.apply(Ok(vec![])).is_none());
        assert!(matches!(view.instructions(), [RenderInstruction::NoResults { .. }]));
    }

    #[test]
    fn last_applied_outcome_wins() {
        let mut view = SearchView::new();
        view.apply(Ok(results(1)));
        view.apply(Ok(results(3)));
        assert_eq!(view.instructions().len(), 3);
    }

    #[test]
    fn missing_query_prompts_for_input() {
        let mut view = SearchView::new();
        let note = view.apply(Err(ValidationError::MissingQuery.into())).unwrap();
        assert_eq!(note.message(), ENTER_QUERY);
        assert!(view.instructions().is_empty());
    }

    #[test]
    fn upload_success_resets_form() {
        let mut form = UploadForm::new(Some(PathBuf::from("a.jpg")), "dog, beach");
        let receipt =
            UploadReceipt { status: 200, location: "http://x/upload".into(), body: String::new() };
        let note = form.apply_outcome(&Ok(receipt));
        assert_eq!(note.message(), UPLOAD_SUCCEEDED);
        assert!(form.is_empty());
    }

    #[test]
    fn upload_failure_keeps_form() {
        let mut form = UploadForm::new(Some(PathBuf::from("a.jpg")), "dog, beach");
        let before = form.clone();
        let note = form.apply_outcome(&Err(PhotoError::request(500, None)));
        assert_eq!(note.message(), UPLOAD_FAILED);
        assert_eq!(form, before);

        let note = form.apply_outcome(&Err(ValidationError::MissingFile.into()));
        assert_eq!(note.message(), SELECT_PHOTO);
        assert_eq!(form, before);
    }
}
