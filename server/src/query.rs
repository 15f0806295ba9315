//! Query disambiguation and label matching.
//!
//! A free-text query ("show me dogs and cats on the beach") is reduced to the
//! keyword labels it mentions. A photo matches when every keyword matches one
//! of the words in its labels.

use regex::Regex;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").unwrap());

/// Filler words that never name a label.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "any", "are", "at", "by", "find", "for", "from", "get", "give", "have",
    "i", "image", "images", "in", "is", "me", "my", "of", "on", "or", "photo", "photos",
    "pic", "pics", "picture", "pictures", "please", "search", "show", "some", "that", "the",
    "them", "there", "these", "this", "those", "to", "want", "with",
];

/// Keyword labels mentioned in a query, lowercased and deduplicated in order.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let lower = query.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();
    for m in WORD.find_iter(&lower) {
        let word = m.as_str();
        if STOP_WORDS.contains(&word) || keywords.iter().any(|k| k == word) {
            continue;
        }
        keywords.push(word.to_string());
    }
    keywords
}

/// Fold simple English plurals so that "dogs" finds "dog" and "beaches" finds "beach".
pub fn stem(word: &str) -> &str {
    if word.len() > 4 && ["ches", "shes", "sses", "xes"].iter().any(|s| word.ends_with(s)) {
        &word[..word.len() - 2]
    } else if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        &word[..word.len() - 1]
    } else {
        word
    }
}

/// Whether `keyword` matches any word of any label.
pub fn label_matches(labels: &[String], keyword: &str) -> bool {
    let wanted = stem(keyword);
    labels.iter().any(|label| {
        let lower = label.to_lowercase();
        WORD.find_iter(&lower).any(|w| stem(w.as_str()) == wanted)
    })
}

/// Whether a photo's labels satisfy every keyword.
pub fn matches_all(labels: &[String], keywords: &[String]) -> bool {
    !keywords.is_empty() && keywords.iter().all(|k| label_matches(labels, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn drops_filler_words() {
        assert_eq!(extract_keywords("Show me photos of dogs and cats"), vec!["dogs", "cats"]);
        assert_eq!(extract_keywords("beach, Beach, BEACH"), vec!["beach"]);
        assert!(extract_keywords("show me the pictures").is_empty());
        assert!(extract_keywords("   ").is_empty());
    }

    #[test]
    fn plurals_fold() {
        assert_eq!(stem("dogs"), "dog");
        assert_eq!(stem("beaches"), "beach");
        assert_eq!(stem("boxes"), "box");
        assert_eq!(stem("grass"), "grass");
        assert_eq!(stem("bus"), "bus");
    }

    #[test]
    fn keyword_matches_words_inside_labels() {
        let l = labels(&["golden retriever", "beach"]);
        assert!(label_matches(&l, "retrievers"));
        assert!(label_matches(&l, "beaches"));
        assert!(!label_matches(&l, "cat"));
    }

    #[test]
    fn all_keywords_must_match() {
        let l = labels(&["dog", "beach"]);
        assert!(matches_all(&l, &labels(&["dog", "beach"])));
        assert!(!matches_all(&l, &labels(&["dog", "snow"])));
        assert!(!matches_all(&l, &[]));
    }
}
