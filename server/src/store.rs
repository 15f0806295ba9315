//! In-memory photo bucket and label index.
//!
//! Every put indexes the object immediately: custom labels from the metadata
//! value are merged with whatever the detector reports, and the merged set is
//! what search matches against.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use photoscope_core::labels::{merge_labels, parse_custom_labels};

use crate::detect::LabelDetector;
use crate::query::matches_all;
use crate::types::StoredPhoto;

pub struct PhotoStore {
    photos: DashMap<String, StoredPhoto>,
    next_seq: AtomicU64,
}

impl Default for PhotoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoStore {
    pub fn new() -> Self {
        Self { photos: DashMap::new(), next_seq: AtomicU64::new(0) }
    }

    /// Store (or overwrite) an object and index its labels. Returns the indexed labels.
    pub fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: impl Into<Arc<[u8]>>,
        raw_labels: &str,
        detector: &dyn LabelDetector,
    ) -> Vec<String> {
        let bytes = bytes.into();
        let custom = parse_custom_labels(raw_labels);
        let detected = detector.detect(key, content_type, &bytes);
        let labels = merge_labels(&custom, &detected);
        debug!(key = key, custom = custom.len(), detected = detected.len(), "Indexed labels");

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let size = bytes.len();
        self.photos.insert(
            key.to_string(),
            StoredPhoto {
                key: key.to_string(),
                content_type: content_type.to_string(),
                bytes,
                labels: labels.clone(),
                seq,
            },
        );
        info!(key = key, bytes = size, labels = ?labels, "Stored photo");
        labels
    }

    pub fn get(&self, key: &str) -> Option<StoredPhoto> {
        self.photos.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Photos whose labels satisfy every keyword, oldest upload first.
    pub fn search(&self, keywords: &[String]) -> Vec<StoredPhoto> {
        if keywords.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<StoredPhoto> = self
            .photos
            .iter()
            .filter(|entry| matches_all(&entry.labels, keywords))
            .map(|entry| entry.value().clone())
            .collect();
        hits.sort_by_key(|photo| photo.seq);
        hits
    }
}
