// src/search/engine.rs
// Expansion-based in-memory search over a loaded product set

use crate::models::ProductRecord;

use super::normalize::{normalize_query, tokenize};
use super::predicate::matches_product;
use super::rank::rank;
use super::synonyms::SynonymTable;

pub const DEFAULT_SEARCH_LIMIT: usize = 3;

/// Runs a query against an in-memory product set: normalize, expand every
/// token into its variant set, keep products satisfying all token
/// conditions, rank and truncate. A query that reduces to no tokens
/// returns nothing.
pub fn search<'a>(
    products: &'a [ProductRecord],
    table: &SynonymTable,
    query: &str,
    limit: usize,
) -> Vec<&'a ProductRecord> {
    let normalized_query = normalize_query(query);
    let tokens = tokenize(&normalized_query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let token_conditions: Vec<Vec<String>> =
        tokens.iter().map(|t| table.variations(t)).collect();

    let matched: Vec<&ProductRecord> = products
        .iter()
        .filter(|p| matches_product(&p.name.to_uppercase(), &token_conditions))
        .collect();

    rank(matched, &normalized_query, limit)
}
