// src/matching/terms.rs
// Search term extraction for the store-side resolver queries. Unlike the
// in-memory engine this path does no abbreviation expansion; the predicates
// are pushed down to the catalog store as-is.

/// Tokens shorter than this carry too little signal for a pushed-down
/// substring predicate.
pub const MIN_TERM_LEN: usize = 2;

/// Keeps only alphanumeric, space, dash and dot characters (everything else
/// becomes a space), then splits on whitespace and drops short tokens.
pub fn extract_search_terms(description: &str) -> Vec<String> {
    let cleaned: String = description
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '.' {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TERM_LEN)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_terms() {
        assert_eq!(
            extract_search_terms("Cabo Flexivel 2.5mm"),
            vec!["Cabo", "Flexivel", "2.5mm"]
        );
    }

    #[test]
    fn test_strips_special_characters() {
        assert_eq!(
            extract_search_terms("disjuntor (20A) c/ barramento!"),
            vec!["disjuntor", "20A", "barramento"]
        );
    }

    #[test]
    fn test_drops_single_character_tokens() {
        assert_eq!(extract_search_terms("fita p isolante"), vec!["fita", "isolante"]);
    }

    #[test]
    fn test_empty_description_yields_no_terms() {
        assert!(extract_search_terms("").is_empty());
        assert!(extract_search_terms("! @ #").is_empty());
    }
}
