//! Search requester: `GET <base>/search?q=<query>`.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::envelope::normalize_results;
use crate::error::{PhotoError, ValidationError};
use crate::types::SearchResult;

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Issues search requests against the configured gateway.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SearchRequester {
    client: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl SearchRequester {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: Arc<ApiConfig>) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Full search URL with the query percent-encoded as `q`.
    ///
    /// Spaces go out as `%20`, never `+`: the gateway hands `q` to the search
    /// function without form decoding.
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.config.endpoint("search");
        url.set_query(Some(&format!("q={}", utf8_percent_encode(query, QUERY_COMPONENT))));
        url
    }

    /// Search photos by label.
    ///
    /// A blank query fails with [`ValidationError::MissingQuery`] before any
    /// request is made. An empty result list means "no results", not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, PhotoError> {
        let query = query.trim();
        if query.is_empty() {
            warn!("No search query provided");
            return Err(ValidationError::MissingQuery.into());
        }

        let url = self.search_url(query);
        debug!(url = %url, "Sending search request");

        let response = self.config.authorize(self.client.get(url)).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "Received search response");

        if !status.is_success() {
            let body = response.text().await.ok();
            error!(status = status.as_u16(), body = body.as_deref().unwrap_or(""), "Search request failed");
            return Err(PhotoError::request(status.as_u16(), body));
        }

        let text = response.text().await?;
        let results = normalize_results(text).inspect_err(|e| {
            error!(error = %e, "Could not normalize search response");
        })?;

        if results.is_empty() {
            info!(query, "No photos found for the query");
        } else {
            info!(query, count = results.len(), "Search results received");
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_percent_encoded_like_a_uri_component() {
        let config = ApiConfig::from_base("https://api.test/dev").unwrap();
        let requester = SearchRequester::new(Arc::new(config));
        assert_eq!(
            requester.search_url("dogs and cats").as_str(),
            "https://api.test/dev/search?q=dogs%20and%20cats"
        );
        assert_eq!(requester.search_url("dogs & cats").as_str(), "https://api.test/dev/search?q=dogs%20%26%20cats");
        assert_eq!(requester.search_url("a+b=c").as_str(), "https://api.test/dev/search?q=a%2Bb%3Dc");
        assert_eq!(requester.search_url("dog (fun)!").as_str(), "https://api.test/dev/search?q=dog%20(fun)!");
        assert_eq!(requester.search_url("café").as_str(), "https://api.test/dev/search?q=caf%C3%A9");
    }

    #[tokio::test]
    async fn blank_query_is_rejected_locally() {
        // Port 9 (discard) would fail with a transport error if contacted
        let config = ApiConfig::from_base("http://127.0.0.1:9").unwrap();
        let requester = SearchRequester::new(Arc::new(config));
        for query in ["", "   "] {
            let err = requester.search(query).await.unwrap_err();
            assert!(matches!(err, PhotoError::Validation(ValidationError::MissingQuery)));
        }
    }
}
