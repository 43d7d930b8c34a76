// src/matching/memory.rs
// Correction memory: key normalization and the caller-invoked write path.
// The resolver only ever reads; appends happen when a human overrides a
// suggested match during import review.

use crate::models::{CorrectionEntry, NewCorrection, ParsedLineItem};
use crate::store::{CorrectionStore, StoreError};

/// Correction lookups key on lower-cased, trimmed text.
pub fn normalize_correction_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Lookup keys for one parsed item: its raw text and its description,
/// normalized, deduplicated, empties dropped.
pub fn correction_keys(item: &ParsedLineItem) -> Vec<String> {
    let mut keys = Vec::with_capacity(2);
    let raw = normalize_correction_text(&item.raw_text);
    if !raw.is_empty() {
        keys.push(raw);
    }
    let description = normalize_correction_text(&item.description);
    if !description.is_empty() && !keys.contains(&description) {
        keys.push(description);
    }
    keys
}

/// Appends a correction with its text fields normalized the same way the
/// resolver will later look them up.
pub async fn record_correction<M: CorrectionStore>(
    store: &M,
    mut correction: NewCorrection,
) -> Result<CorrectionEntry, StoreError> {
    correction.original_text = normalize_correction_text(&correction.original_text);
    correction.description = correction
        .description
        .as_deref()
        .map(normalize_correction_text)
        .filter(|d| !d.is_empty());
    store.append(correction).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CorrectionKind, ProductId};
    use crate::store::InMemoryCorrectionStore;
    use uuid::Uuid;

    fn item(raw: &str, description: &str) -> ParsedLineItem {
        ParsedLineItem {
            raw_text: raw.to_string(),
            quantity: 1.0,
            unit: None,
            description: description.to_string(),
            brand: None,
            code_ref: None,
        }
    }

    #[test]
    fn test_keys_are_normalized_and_deduplicated() {
        let keys = correction_keys(&item("  10m Cabo 2.5 ", "cabo 2.5"));
        assert_eq!(keys, vec!["10m cabo 2.5", "cabo 2.5"]);

        let same = correction_keys(&item("Cabo 2.5", "  CABO 2.5 "));
        assert_eq!(same, vec!["cabo 2.5"]);
    }

    #[test]
    fn test_empty_fields_produce_no_keys() {
        assert!(correction_keys(&item("", "  ")).is_empty());
    }

    #[tokio::test]
    async fn test_record_correction_normalizes_before_append() {
        let store = InMemoryCorrectionStore::new();
        let entry = record_correction(
            &store,
            NewCorrection {
                original_text: "  10m CABO 2.5 ".to_string(),
                description: Some("  ".to_string()),
                model_tag: "gpt-4o-mini".to_string(),
                suggested_product_id: None,
                corrected_product_id: Some(ProductId(Uuid::new_v4())),
                kind: CorrectionKind::Fixed,
            },
        )
        .await
        .unwrap();

        assert_eq!(entry.original_text, "10m cabo 2.5");
        assert_eq!(entry.description, None);
    }
}
