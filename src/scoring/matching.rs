//! Whole-word, case-insensitive term matching
//!
//! Word boundaries are Unicode-aware: accented and non-Latin letters count
//! as word characters, so "José" matches in "Chef José said" but "AI" does
//! not match inside "MAIN".

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Compile a matcher for `term` anchored at word boundaries on both sides
fn word_pattern(term: &str) -> Option<Regex> {
    let pattern = format!(r"\b{}\b", regex::escape(term));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

/// True when `term` occurs in `haystack` as a whole word, ignoring case
pub fn contains_word(haystack: &str, term: &str) -> bool {
    word_pattern(term).is_some_and(|re| re.is_match(haystack))
}

/// Markdown heading counts as (H1, H2)
pub fn heading_counts(body: &str) -> (usize, usize) {
    static H1: OnceLock<Regex> = OnceLock::new();
    static H2: OnceLock<Regex> = OnceLock::new();
    let h1 = H1.get_or_init(|| Regex::new(r"(?m)^#\s+").expect("valid H1 regex"));
    let h2 = H2.get_or_init(|| Regex::new(r"(?m)^##\s+").expect("valid H2 regex"));
    (h1.find_iter(body).count(), h2.find_iter(body).count())
}

/// Loose question match: either side contains the other, ignoring case and
/// surrounding whitespace
pub fn question_matches(requested: &str, asked: &str) -> bool {
    let requested = requested.trim().to_lowercase();
    let asked = asked.trim().to_lowercase();
    // An empty side would trivially "contain" every question
    if requested.is_empty() || asked.is_empty() {
        return false;
    }
    asked.contains(&requested) || requested.contains(&asked)
}
