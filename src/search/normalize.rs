// src/search/normalize.rs
// Query normalization and tokenization shared by the search engine

use once_cell::sync::Lazy;
use regex::Regex;

/// Prepositions and articles stripped from queries before matching.
pub const STOPWORDS: [&str; 11] = [
    "DE", "DA", "DO", "PARA", "COM", "EM", "P/", "O", "A", "OS", "AS",
];

// 3/4'' and 3'4 style dimension notation collapses to a comma-decimal.
static DIMENSION_QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)\s*'\s*(\d)").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Upper-cases and cleans a raw search query: typographic apostrophes are
/// folded, quote characters dropped, whitespace runs collapsed.
pub fn normalize_query(input: &str) -> String {
    let mut normalized = input.to_uppercase().trim().to_string();
    normalized = normalized.replace(['\u{2019}', '\u{00B4}', '`'], "'");
    normalized = DIMENSION_QUOTE_RE
        .replace_all(&normalized, "$1,$2")
        .into_owned();
    normalized = normalized.replace('"', "");
    normalized = normalized.replace('\'', " ");
    WHITESPACE_RE
        .replace_all(&normalized, " ")
        .trim()
        .to_string()
}

/// Splits a normalized query into tokens on whitespace-or-comma runs,
/// dropping stopwords. An empty result means "no match possible" and
/// callers must short-circuit.
pub fn tokenize(normalized: &str) -> Vec<String> {
    name_words(normalized)
        .filter(|t| !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Words of a product name or query, split on whitespace-or-comma runs.
/// Also the word boundary used by the word-prefix policy for short
/// variants.
pub fn name_words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
}
