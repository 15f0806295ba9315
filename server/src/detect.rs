//! Pluggable label detection for indexed photos.
//!
//! Provides a `LabelDetector` trait with two implementations: `NoDetector`
//! (custom labels only) and `FileNameDetector` (words from the object key,
//! e.g. `golden-retriever_beach.jpg` → `golden`, `retriever`, `beach`).

use std::sync::Arc;

pub trait LabelDetector: Send + Sync {
    /// Labels detected for an object. Merged after the custom labels.
    fn detect(&self, key: &str, content_type: &str, bytes: &[u8]) -> Vec<String>;
    fn name(&self) -> &str;
}

/// Default: index custom labels only
pub struct NoDetector;

impl LabelDetector for NoDetector {
    fn detect(&self, _key: &str, _content_type: &str, _bytes: &[u8]) -> Vec<String> {
        Vec::new()
    }
    fn name(&self) -> &str {
        "none"
    }
}

/// Words of the file stem, split on anything that is not a letter or digit.
/// Purely numeric words (`IMG_0042`) are dropped.
pub struct FileNameDetector;

impl LabelDetector for FileNameDetector {
    fn detect(&self, key: &str, _content_type: &str, _bytes: &[u8]) -> Vec<String> {
        let stem = key.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(key);
        stem.split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 1 && !w.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_lowercase)
            .collect()
    }
    fn name(&self) -> &str {
        "filename"
    }
}

/// Detector selectable on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DetectorKind {
    /// Custom labels only
    #[default]
    None,
    /// Words from the object key
    Filename,
}

pub fn create_detector(kind: DetectorKind) -> Arc<dyn LabelDetector> {
    match kind {
        DetectorKind::None => Arc::new(NoDetector),
        DetectorKind::Filename => Arc::new(FileNameDetector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_words_become_labels() {
        let labels = FileNameDetector.detect("Golden-Retriever_beach 2.jpg", "image/jpeg", &[]);
        assert_eq!(labels, vec!["golden", "retriever", "beach"]);
    }

    #[test]
    fn camera_names_yield_nothing_useful() {
        assert_eq!(FileNameDetector.detect("IMG_0042.JPG", "image/jpeg", &[]), vec!["img"]);
    }

    #[test]
    fn kinds_map_to_detectors() {
        assert_eq!(create_detector(DetectorKind::None).name(), "none");
        assert_eq!(create_detector(DetectorKind::Filename).name(), "filename");
        assert!(NoDetector.detect("dog.jpg", "image/jpeg", &[]).is_empty());
    }

    #[test]
    fn unknown_detector_name_is_rejected() {
        use clap::ValueEnum;
        assert_eq!(DetectorKind::from_str("filename", false), Ok(DetectorKind::Filename));
        assert_eq!(DetectorKind::from_str("none", false), Ok(DetectorKind::None));
        assert!(DetectorKind::from_str("rekognition", false).is_err());
        assert!(DetectorKind::from_str("filenme", false).is_err());
    }
}
