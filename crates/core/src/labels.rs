//! Custom label handling.
//!
//! Users type labels as one comma-separated string. The same format comes back
//! from object metadata when a photo is indexed, so both directions go through
//! [`parse_custom_labels`].

use std::collections::HashSet;

/// Split a comma-separated labels input, trimming each token and dropping empties.
///
/// Order is preserved and duplicates are kept; deduplication happens at index time.
pub fn parse_custom_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Combine custom and detected labels into the indexed label set.
///
/// Custom labels come first. All labels are lowercased and deduplicated,
/// keeping the first occurrence.
pub fn merge_labels<S: AsRef<str>>(custom: &[S], detected: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    custom
        .iter()
        .chain(detected.iter())
        .map(|label| label.as_ref().trim().to_lowercase())
        .filter(|label| !label.is_empty() && seen.insert(label.clone()))
        .collect()
}

/// Whether a comma-joined labels value can be sent as an HTTP header value.
///
/// Header values are restricted to visible ASCII plus space and tab.
pub fn is_header_safe(value: &str) -> bool {
    value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_empty_tokens() {
        assert_eq!(parse_custom_labels(" a, b ,,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_input_yields_no_labels() {
        assert!(parse_custom_labels("").is_empty());
        assert!(parse_custom_labels(" , ,, ").is_empty());
    }

    #[test]
    fn keeps_inner_whitespace_and_order() {
        assert_eq!(parse_custom_labels("golden retriever, Beach"), vec!["golden retriever", "Beach"]);
    }

    #[test]
    fn merge_lowercases_and_dedupes_custom_first() {
        let merged = merge_labels(&["Dog", "beach"], &["Animal", "dog", "BEACH", "Sand"]);
        assert_eq!(merged, vec!["dog", "beach", "animal", "sand"]);
    }

    #[test]
    fn merge_with_no_detected_labels() {
        let none: [&str; 0] = [];
        assert_eq!(merge_labels(&["Cat", " cat "], &none), vec!["cat"]);
    }

    #[test]
    fn header_safety() {
        assert!(is_header_safe("dog,beach day"));
        assert!(!is_header_safe("café"));
        assert!(!is_header_safe("line\nbreak"));
    }
}
