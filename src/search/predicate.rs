// src/search/predicate.rs
// Length-dependent variant predicate and the AND-across / OR-within combiner

use super::normalize::name_words;

/// Variants at or below this length must anchor to a word start; longer
/// variants are assumed specific enough for plain containment. Short
/// abbreviations would otherwise collide inside unrelated words (FIO must
/// not match inside DESAFIO).
const SHORT_VARIANT_MAX_LEN: usize = 3;

/// Whether a single variant matches an upper-cased product name.
pub fn variant_matches(name_upper: &str, variant: &str) -> bool {
    if variant.len() <= SHORT_VARIANT_MAX_LEN {
        name_words(name_upper).any(|word| word.starts_with(variant))
    } else {
        name_upper.contains(variant)
    }
}

/// Whether a product name satisfies every token condition: AND across the
/// original query tokens, OR within each token's variant set. An empty
/// condition list never matches.
pub fn matches_product(name_upper: &str, token_conditions: &[Vec<String>]) -> bool {
    if token_conditions.is_empty() {
        return false;
    }
    token_conditions.iter().all(|variants| {
        variants
            .iter()
            .any(|variant| variant_matches(name_upper, variant))
    })
}
