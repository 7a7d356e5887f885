//! Canonical text forms shared by the report parser and the matcher.

use std::collections::{BTreeSet, HashSet};

/// Words that carry no signal about which bug a sentence describes.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "but", "not", "nor", "this", "that", "these", "those",
    "with", "without", "from", "into", "onto", "are", "was", "were", "will",
    "would", "could", "should", "can", "cannot", "cant", "does", "doesnt",
    "dont", "did", "didnt", "has", "have", "had", "its", "isnt", "arent",
    "wasnt", "also", "which", "when", "where", "what", "who", "why", "how",
    "all", "any", "there", "their", "they", "them", "then", "than", "been",
    "being", "only", "just", "very", "more", "most", "such", "here", "each",
    "every", "some", "other", "our", "your", "you", "may", "might", "must",
    "shall", "too", "via", "per", "yet", "because", "while", "about", "whether",
];

/// Case-folded, punctuation-free, whitespace-collapsed form of `text`.
///
/// Apostrophes are dropped (`doesn't` -> `doesnt`); every other
/// non-alphanumeric character separates words.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}') {
            continue;
        }
        out.push(if c.is_alphanumeric() { c } else { ' ' });
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Words of the normalized text.
pub fn tokens(text: &str) -> HashSet<String> {
    normalize(text).split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect()
}

/// Distinct words long enough and not in `stop_words`.
pub fn content_words(text: &str, min_len: usize, stop_words: &HashSet<String>) -> BTreeSet<String> {
    normalize(text)
        .split(' ')
        .filter(|t| t.chars().count() >= min_len && !stop_words.contains(*t))
        .map(str::to_string)
        .collect()
}
