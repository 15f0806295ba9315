//! Pure renderer from search results to display instructions.
//!
//! Adapters (terminal, web view) turn each [`RenderInstruction`] into whatever
//! their surface needs. Nothing here performs I/O.

use serde::Serialize;
use url::Url;

use crate::types::SearchResult;

/// Placeholder shown when a search returns nothing.
pub const NO_RESULTS_MESSAGE: &str = "No photos found for the query.";

/// Alt text for rendered photos.
pub const PHOTO_ALT: &str = "Photo";

/// One thing to draw in the results container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderInstruction {
    Photo {
        url: String,
        alt: String,
        /// `"Labels: a, b"`, absent when the photo has no labels.
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    NoResults { message: String },
}

impl RenderInstruction {
    pub fn is_photo(&self) -> bool {
        matches!(self, RenderInstruction::Photo { .. })
    }
}

/// Render a result set.
///
/// An empty input produces a single [`RenderInstruction::NoResults`]. Results
/// without a usable url are skipped.
pub fn render_results(results: &[SearchResult]) -> Vec<RenderInstruction> {
    if results.is_empty() {
        return vec![RenderInstruction::NoResults { message: NO_RESULTS_MESSAGE.to_string() }];
    }

    results
        .iter()
        .filter_map(|result| {
            let url = result.url.as_deref().filter(|u| is_usable_url(u))?;
            Some(RenderInstruction::Photo {
                url: url.trim().to_string(),
                alt: PHOTO_ALT.to_string(),
                caption: labels_caption(&result.labels),
            })
        })
        .collect()
}

/// `"Labels: a, b"` for a non-empty label list.
pub fn labels_caption(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        Some(format!("Labels: {}", labels.join(", ")))
    }
}

/// An absolute http(s) URL.
pub fn is_usable_url(url: &str) -> bool {
    Url::parse(url.trim()).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}
