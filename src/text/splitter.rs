use regex::Regex;
use std::sync::OnceLock;

/// Sentence-ending punctuation followed by whitespace
fn boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex is valid"))
}

/// Split text into trimmed, non-empty sentences
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace. The punctuation
/// stays with the sentence; the whitespace is dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in boundary().find_iter(text) {
        // punctuation is a single ASCII byte
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
