//! FTS5 query sanitization.
//!
//! User text goes into `MATCH` as quoted phrases only. FTS5 treats bare
//! input as its own query language (`AND`, `NEAR/3`, `col:`, `*`), so a raw
//! pass-through turns ordinary punctuation into syntax errors and lets a
//! query string select columns it should not.

/// Render free text as a phrase-safe FTS5 query.
///
/// Each whitespace-separated token becomes a quoted phrase (internal quotes
/// doubled, per SQL string rules); phrases are joined by FTS5's implicit AND.
/// Returns `None` when no token survives, which callers treat as "nothing to
/// match" rather than an error.
#[must_use]
pub fn fts_phrase_query(text: &str) -> Option<String> {
    let phrases: Vec<String> = text
        .split_whitespace()
        .map(|token| token.trim_matches('"'))
        .filter(|token| !token.is_empty())
        .map(|token| format!("\"{}\"", token.replace('"', "\"\"")))
        .collect();

    if phrases.is_empty() {
        None
    } else {
        Some(phrases.join(" "))
    }
}
