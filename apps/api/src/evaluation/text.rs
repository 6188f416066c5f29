// Small text utilities shared by the heuristic provider.

use std::collections::BTreeSet;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "you", "your", "our", "are", "was", "were",
    "will", "have", "has", "had", "from", "into", "about", "their", "they", "them", "who",
    "what", "when", "where", "which", "while", "would", "should", "could", "been", "being",
    "also", "such", "than", "then", "there", "these", "those", "not", "but", "all", "any",
    "can", "may", "must", "how", "why", "its", "his", "her", "she", "him", "out", "over",
    "more", "most", "other", "some", "very", "just", "each", "per", "via", "etc", "able",
    "work", "working", "role", "team", "tell", "time", "describe", "experience",
];

pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#' || c == '\''))
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Distinct content words (3+ chars, not stopwords).
pub fn keywords(text: &str) -> BTreeSet<String> {
    words(text)
        .into_iter()
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Share of `reference` keywords that also appear in `candidate`. `None` when there is
/// nothing to compare against.
pub fn coverage(reference: &BTreeSet<String>, candidate: &BTreeSet<String>) -> Option<f64> {
    if reference.is_empty() {
        return None;
    }
    let hits = reference.intersection(candidate).count();
    Some(hits as f64 / reference.len() as f64)
}

pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Occurrences of any phrase in `phrases`, matched on whole words.
pub fn count_phrases(text: &str, phrases: &[&str]) -> usize {
    let padded = format!(" {} ", words(text).join(" "));
    phrases
        .iter()
        .map(|p| padded.matches(&format!(" {p} ")).count())
        .sum()
}

pub fn has_number(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit()) || text.contains('%') || text.contains('$')
}

/// 1.0 inside `[low, high]`, decaying proportionally outside it.
pub fn within(value: f64, low: f64, high: f64) -> f64 {
    if value <= 0.0 {
        0.0
    } else if value < low {
        value / low
    } else if value > high {
        high / value
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_drop_stopwords_and_short_words() {
        let kw = keywords("The Rust engineer will build APIs in Go and C++");
        assert!(kw.contains("rust"));
        assert!(kw.contains("apis"));
        assert!(kw.contains("c++"));
        assert!(!kw.contains("the"));
        assert!(!kw.contains("in"));
        assert!(!kw.contains("go"));
    }

    #[test]
    fn test_coverage() {
        let reference = keywords("rust kubernetes postgres");
        let candidate = keywords("I shipped Rust services on Kubernetes");
        let c = coverage(&reference, &candidate).unwrap();
        assert!((c - 2.0 / 3.0).abs() < 1e-9);
        assert!(coverage(&keywords(""), &candidate).is_none());
    }

    #[test]
    fn test_count_phrases_whole_words() {
        let text = "I think, maybe, it likely works. I think so.";
        assert_eq!(count_phrases(text, &["i think", "maybe"]), 3);
        assert_eq!(count_phrases("likely", &["like"]), 0);
    }

    #[test]
    fn test_within() {
        assert_eq!(within(15.0, 10.0, 25.0), 1.0);
        assert_eq!(within(5.0, 10.0, 25.0), 0.5);
        assert_eq!(within(50.0, 10.0, 25.0), 0.5);
        assert_eq!(within(0.0, 10.0, 25.0), 0.0);
    }

    #[test]
    fn test_sentences() {
        assert_eq!(sentences("One. Two!  Three?"), vec!["One", "Two", "Three"]);
    }
}
