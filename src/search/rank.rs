// src/search/rank.rs
// Tie-break ordering for matched candidates: exact match on the full
// normalized query, then prefix match, then plain lexicographic order.

use std::cmp::Ordering;

use crate::models::ProductRecord;

/// Stable sort, strongest signal first, truncated to `limit`. When neither
/// stronger signal applies, candidates fall back to alphabetic order.
pub fn rank<'a>(
    mut candidates: Vec<&'a ProductRecord>,
    normalized_query: &str,
    limit: usize,
) -> Vec<&'a ProductRecord> {
    candidates.sort_by(|a, b| {
        let name_a = a.name.to_uppercase();
        let name_b = b.name.to_uppercase();

        let exact_a = name_a == normalized_query;
        let exact_b = name_b == normalized_query;
        if exact_a != exact_b {
            return if exact_a { Ordering::Less } else { Ordering::Greater };
        }

        let prefix_a = name_a.starts_with(normalized_query);
        let prefix_b = name_b.starts_with(normalized_query);
        if prefix_a != prefix_b {
            return if prefix_a { Ordering::Less } else { Ordering::Greater };
        }

        name_a.cmp(&name_b)
    });
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductId;
    use uuid::Uuid;

    fn product(name: &str) -> ProductRecord {
        ProductRecord {
            id: ProductId(Uuid::new_v4()),
            name: name.to_string(),
            erp_code: None,
            brand: None,
            category: None,
            price: 10.0,
            is_available: true,
        }
    }

    #[test]
    fn test_exact_match_first() {
        let a = product("TOMADA DUPLA 10A");
        let b = product("TOMADA");
        let ranked = rank(vec![&a, &b], "TOMADA", 3);
        assert_eq!(ranked[0].name, "TOMADA");
    }

    #[test]
    fn test_prefix_beats_lexicographic() {
        let a = product("ADAPTADOR TOMADA");
        let b = product("TOMADA TRIPLA");
        let ranked = rank(vec![&a, &b], "TOMADA", 3);
        assert_eq!(ranked[0].name, "TOMADA TRIPLA");
    }

    #[test]
    fn test_lexicographic_fallback() {
        let a = product("CABO PP");
        let b = product("ABRACADEIRA NYLON");
        let ranked = rank(vec![&a, &b], "NYLON", 3);
        assert_eq!(ranked[0].name, "ABRACADEIRA NYLON");
    }

    #[test]
    fn test_truncates_to_limit() {
        let a = product("CABO A");
        let b = product("CABO B");
        let c = product("CABO C");
        let d = product("CABO D");
        let ranked = rank(vec![&a, &b, &c, &d], "CABO", 3);
        assert_eq!(ranked.len(), 3);
    }
}
