// src/matching/resolver.rs
// The cascading match resolver: learned corrections, then exact code, then
// strict AND text search, then a ranked OR fallback. Strategies run
// strictly in order and the first success wins; a miss is a value, never an
// error.

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::models::{MatchResult, MatchStatus, ParsedLineItem, ProductRecord};
use crate::store::{CatalogStore, CorrectionStore, StoreError};

use super::memory::correction_keys;
use super::terms::extract_search_terms;

// Fixed confidence bands, one per resolution strategy.
pub const SCORE_EXACT_CODE: u8 = 100;
pub const SCORE_CORRECTION_MEMORY: u8 = 95;
pub const SCORE_STRICT_AND: u8 = 90;
pub const SCORE_RANKED_OR: u8 = 60;

/// Candidate cap for the ranked OR fallback.
const OR_FALLBACK_CANDIDATE_CAP: i64 = 10;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MatchResolver<C, M> {
    catalog: C,
    corrections: M,
    lookup_timeout: Duration,
}

impl<C: CatalogStore, M: CorrectionStore> MatchResolver<C, M> {
    pub fn new(catalog: C, corrections: M) -> Self {
        Self {
            catalog,
            corrections,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Resolves one parsed line item. Store failures and lookup timeouts
    /// abort this item only; the caller decides whether to continue the
    /// batch.
    pub async fn resolve(&self, item: &ParsedLineItem) -> Result<MatchResult, StoreError> {
        if let Some(result) = self.try_correction_memory(item).await? {
            return Ok(result);
        }
        if let Some(result) = self.try_exact_code(item).await? {
            return Ok(result);
        }
        self.try_text_search(item).await
    }

    /// Resolves a batch sequentially, preserving input order.
    pub async fn resolve_batch(
        &self,
        items: &[ParsedLineItem],
    ) -> Vec<Result<MatchResult, StoreError>> {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(self.resolve(item).await);
        }
        results
    }

    /// Resolves a batch with at most `workers` lookups in flight. Items are
    /// independent, so this is safe; results keep the input order.
    pub async fn resolve_batch_concurrent(
        &self,
        items: &[ParsedLineItem],
        workers: usize,
    ) -> Vec<Result<MatchResult, StoreError>> {
        stream::iter(items)
            .map(|item| self.resolve(item))
            .buffered(workers.max(1))
            .collect()
            .await
    }

    async fn lookup<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.lookup_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                operation,
                timeout: self.lookup_timeout,
            }),
        }
    }

    /// State 0: a human already corrected this exact text. The entry only
    /// counts if the corrected product still exists in the catalog.
    async fn try_correction_memory(
        &self,
        item: &ParsedLineItem,
    ) -> Result<Option<MatchResult>, StoreError> {
        let keys = correction_keys(item);
        if keys.is_empty() {
            return Ok(None);
        }

        let entry = self
            .lookup("correction memory", self.corrections.latest_fixed(&keys))
            .await?;
        let Some(entry) = entry else {
            return Ok(None);
        };
        let Some(product_id) = entry.corrected_product_id else {
            return Ok(None);
        };

        let product = self
            .lookup("product by id", self.catalog.find_by_id(&product_id))
            .await?;
        match product {
            Some(product) => {
                debug!(
                    "Resolved {:?} from correction memory (entry {})",
                    item.raw_text, entry.id
                );
                Ok(Some(MatchResult {
                    parsed: item.clone(),
                    match_score: SCORE_CORRECTION_MEMORY,
                    status: MatchStatus::Matched,
                    product: Some(product),
                }))
            }
            None => {
                warn!(
                    "Correction {} references missing product {}; continuing cascade",
                    entry.id, product_id
                );
                Ok(None)
            }
        }
    }

    /// State 1: an explicit reference code beats any text heuristic.
    async fn try_exact_code(
        &self,
        item: &ParsedLineItem,
    ) -> Result<Option<MatchResult>, StoreError> {
        let Some(code_ref) = item.code_ref.as_deref() else {
            return Ok(None);
        };
        let digits: String = code_ref.chars().filter(char::is_ascii_digit).collect();
        let Ok(code) = digits.parse::<i64>() else {
            return Ok(None);
        };

        let product = self
            .lookup("product by code", self.catalog.find_by_code(code))
            .await?;
        Ok(product.map(|product| MatchResult {
            parsed: item.clone(),
            match_score: SCORE_EXACT_CODE,
            status: MatchStatus::Matched,
            product: Some(product),
        }))
    }

    /// States 2-4: strict all-terms search, then the ranked any-term
    /// fallback, then the terminal miss.
    async fn try_text_search(&self, item: &ParsedLineItem) -> Result<MatchResult, StoreError> {
        let terms = extract_search_terms(&item.description);
        if terms.is_empty() {
            return Ok(MatchResult::not_found(item.clone()));
        }

        let strict = self
            .lookup("strict name search", self.catalog.find_all_terms(&terms, 1))
            .await?;
        if let Some(product) = strict.into_iter().next() {
            return Ok(MatchResult {
                parsed: item.clone(),
                match_score: SCORE_STRICT_AND,
                status: MatchStatus::Matched,
                product: Some(product),
            });
        }

        let candidates = self
            .lookup(
                "fallback name search",
                self.catalog
                    .find_any_terms(&terms, OR_FALLBACK_CANDIDATE_CAP),
            )
            .await?;
        if let Some(product) = best_by_term_overlap(&candidates, &terms) {
            return Ok(MatchResult {
                parsed: item.clone(),
                match_score: SCORE_RANKED_OR,
                status: MatchStatus::Suggested,
                product: Some(product.clone()),
            });
        }

        Ok(MatchResult::not_found(item.clone()))
    }
}

/// The candidate containing the most terms wins; earlier candidates win
/// ties. None if nothing contains any term.
fn best_by_term_overlap<'a>(
    candidates: &'a [ProductRecord],
    terms: &[String],
) -> Option<&'a ProductRecord> {
    let mut best: Option<(&ProductRecord, usize)> = None;
    for candidate in candidates {
        let name_upper = candidate.name.to_uppercase();
        let hits = terms
            .iter()
            .filter(|t| name_upper.contains(&t.to_uppercase()))
            .count();
        if hits > 0 && best.map_or(true, |(_, best_hits)| hits > best_hits) {
            best = Some((candidate, hits));
        }
    }
    best.map(|(product, _)| product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::memory::record_correction;
    use crate::models::{CorrectionKind, NewCorrection, ProductId};
    use crate::store::memory::{InMemoryCatalog, InMemoryCorrectionStore};
    use async_trait::async_trait;
    use uuid::Uuid;

    fn product(name: &str, code: Option<i64>) -> ProductRecord {
        ProductRecord {
            id: ProductId(Uuid::new_v4()),
            name: name.to_string(),
            erp_code: code,
            brand: None,
            category: None,
            price: 10.0,
            is_available: true,
        }
    }

    fn item(raw: &str, description: &str, code_ref: Option<&str>) -> ParsedLineItem {
        ParsedLineItem {
            raw_text: raw.to_string(),
            quantity: 1.0,
            unit: None,
            description: description.to_string(),
            brand: None,
            code_ref: code_ref.map(str::to_string),
        }
    }

    fn resolver(
        products: Vec<ProductRecord>,
    ) -> MatchResolver<InMemoryCatalog, InMemoryCorrectionStore> {
        MatchResolver::new(InMemoryCatalog::new(products), InMemoryCorrectionStore::new())
    }

    #[tokio::test]
    async fn test_exact_code_match_scores_100() {
        let resolver = resolver(vec![
            product("DISJUNTOR BIPOLAR 20A", Some(12345)),
            product("CABO FLEXIVEL 2.5MM", None),
        ]);

        let result = resolver
            .resolve(&item("Ref 12345 Disjuntor", "qualquer coisa", Some("12345")))
            .await
            .unwrap();

        assert_eq!(result.status, MatchStatus::Matched);
        assert_eq!(result.match_score, SCORE_EXACT_CODE);
        assert_eq!(result.product.unwrap().name, "DISJUNTOR BIPOLAR 20A");
    }

    #[tokio::test]
    async fn test_code_ref_digits_are_extracted() {
        let resolver = resolver(vec![product("DISJUNTOR BIPOLAR 20A", Some(12345))]);

        let result = resolver
            .resolve(&item("x", "y", Some("REF-12.345")))
            .await
            .unwrap();

        assert_eq!(result.match_score, SCORE_EXACT_CODE);
    }

    #[tokio::test]
    async fn test_strict_and_search_scores_90() {
        let resolver = resolver(vec![
            product("CABO FLEXIVEL 2.5MM SIL", None),
            product("CABO RIGIDO 4MM", None),
        ]);

        let result = resolver
            .resolve(&item("Cabo Flexivel", "Cabo Flexivel", None))
            .await
            .unwrap();

        assert_eq!(result.status, MatchStatus::Matched);
        assert_eq!(result.match_score, SCORE_STRICT_AND);
        assert_eq!(result.product.unwrap().name, "CABO FLEXIVEL 2.5MM SIL");
    }

    #[tokio::test]
    async fn test_or_fallback_suggests_best_overlap() {
        let resolver = resolver(vec![
            product("FITA ISOLANTE 20M", None),
            product("CABO PP 3X1.5MM", None),
        ]);

        // "Cabo Antichama" never matches all terms; CABO PP shares one.
        let result = resolver
            .resolve(&item("Cabo Antichama", "Cabo Antichama", None))
            .await
            .unwrap();

        assert_eq!(result.status, MatchStatus::Suggested);
        assert_eq!(result.match_score, SCORE_RANKED_OR);
        assert_eq!(result.product.unwrap().name, "CABO PP 3X1.5MM");
    }

    #[tokio::test]
    async fn test_no_match_is_not_found() {
        let resolver = resolver(vec![product("FITA ISOLANTE 20M", None)]);

        let result = resolver
            .resolve(&item("Parafuso", "Parafuso Sextavado", None))
            .await
            .unwrap();

        assert_eq!(result.status, MatchStatus::NotFound);
        assert_eq!(result.match_score, 0);
        assert!(result.product.is_none());
    }

    #[tokio::test]
    async fn test_empty_description_short_circuits_without_catalog_calls() {
        let catalog = InMemoryCatalog::new(vec![product("FITA ISOLANTE 20M", None)]);
        let calls = catalog.call_counter();
        let resolver = MatchResolver::new(catalog, InMemoryCorrectionStore::new());

        let result = resolver.resolve(&item("", "x", None)).await.unwrap();

        assert_eq!(result.status, MatchStatus::NotFound);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_correction_memory_wins_over_text_cascade() {
        let corrected = product("CABO FLEXIVEL 2.5MM SIL", None);
        let corrected_id = corrected.id.clone();
        let catalog = InMemoryCatalog::new(vec![
            product("CABO GENERICO", None),
            corrected,
        ]);
        let corrections = InMemoryCorrectionStore::new();
        record_correction(
            &corrections,
            NewCorrection {
                original_text: "10m Cabo".to_string(),
                description: None,
                model_tag: "gpt-4o-mini".to_string(),
                suggested_product_id: None,
                corrected_product_id: Some(corrected_id.clone()),
                kind: CorrectionKind::Fixed,
            },
        )
        .await
        .unwrap();

        let resolver = MatchResolver::new(catalog, corrections);
        let result = resolver
            .resolve(&item("10m Cabo", "Cabo", None))
            .await
            .unwrap();

        assert_eq!(result.status, MatchStatus::Matched);
        assert_eq!(result.match_score, SCORE_CORRECTION_MEMORY);
        assert_eq!(result.product.unwrap().id, corrected_id);
    }

    #[tokio::test]
    async fn test_correction_memory_checked_before_exact_code() {
        // Execution order puts memory first, so a learned correction wins
        // even when an exact code match exists.
        let by_code = product("DISJUNTOR BIPOLAR 20A", Some(777));
        let corrected = product("DISJUNTOR TRIPOLAR 32A", None);
        let corrected_id = corrected.id.clone();
        let catalog = InMemoryCatalog::new(vec![by_code, corrected]);
        let corrections = InMemoryCorrectionStore::new();
        record_correction(
            &corrections,
            NewCorrection {
                original_text: "disjuntor ref 777".to_string(),
                description: None,
                model_tag: "gpt-4o-mini".to_string(),
                suggested_product_id: None,
                corrected_product_id: Some(corrected_id.clone()),
                kind: CorrectionKind::Fixed,
            },
        )
        .await
        .unwrap();

        let resolver = MatchResolver::new(catalog, corrections);
        let result = resolver
            .resolve(&item("Disjuntor ref 777", "Disjuntor", Some("777")))
            .await
            .unwrap();

        assert_eq!(result.match_score, SCORE_CORRECTION_MEMORY);
        assert_eq!(result.product.unwrap().id, corrected_id);
    }

    #[tokio::test]
    async fn test_correction_with_vanished_product_falls_through() {
        let catalog = InMemoryCatalog::new(vec![product("CABO FLEXIVEL 2.5MM", None)]);
        let corrections = InMemoryCorrectionStore::new();
        record_correction(
            &corrections,
            NewCorrection {
                original_text: "cabo flexivel".to_string(),
                description: None,
                model_tag: "gpt-4o-mini".to_string(),
                suggested_product_id: None,
                // Never inserted into the catalog.
                corrected_product_id: Some(ProductId(Uuid::new_v4())),
                kind: CorrectionKind::Fixed,
            },
        )
        .await
        .unwrap();

        let resolver = MatchResolver::new(catalog, corrections);
        let result = resolver
            .resolve(&item("Cabo Flexivel", "Cabo Flexivel", None))
            .await
            .unwrap();

        // Falls through to the strict AND search.
        assert_eq!(result.match_score, SCORE_STRICT_AND);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let resolver = resolver(vec![
            product("CABO FLEXIVEL 2.5MM SIL", None),
            product("CABO RIGIDO 4MM", None),
        ]);
        let line = item("Cabo Flexivel", "Cabo Flexivel", None);

        let first = resolver.resolve(&line).await.unwrap();
        let second = resolver.resolve(&line).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_batch_matches_sequential_order() {
        let products = vec![
            product("CABO FLEXIVEL 2.5MM SIL", Some(1)),
            product("DISJUNTOR BIPOLAR 20A", Some(2)),
            product("TOMADA DUPLA 10A", Some(3)),
        ];
        let resolver = resolver(products);
        let items = vec![
            item("a", "Cabo Flexivel", None),
            item("b", "Disjuntor Bipolar", None),
            item("c", "Tomada Dupla", None),
            item("d", "Inexistente Produto", None),
        ];

        let sequential = resolver.resolve_batch(&items).await;
        let concurrent = resolver.resolve_batch_concurrent(&items, 4).await;

        let seq: Vec<_> = sequential.into_iter().map(Result::unwrap).collect();
        let conc: Vec<_> = concurrent.into_iter().map(Result::unwrap).collect();
        assert_eq!(seq, conc);
    }

    struct StallingCatalog;

    #[async_trait]
    impl CatalogStore for StallingCatalog {
        async fn find_by_code(&self, _: i64) -> Result<Option<ProductRecord>, StoreError> {
            futures::future::pending().await
        }
        async fn find_by_id(&self, _: &ProductId) -> Result<Option<ProductRecord>, StoreError> {
            futures::future::pending().await
        }
        async fn find_all_terms(
            &self,
            _: &[String],
            _: i64,
        ) -> Result<Vec<ProductRecord>, StoreError> {
            futures::future::pending().await
        }
        async fn find_any_terms(
            &self,
            _: &[String],
            _: i64,
        ) -> Result<Vec<ProductRecord>, StoreError> {
            futures::future::pending().await
        }
        async fn available_pool(&self, _: i64) -> Result<Vec<ProductRecord>, StoreError> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_stalled_lookup_times_out() {
        let resolver = MatchResolver::new(StallingCatalog, InMemoryCorrectionStore::new())
            .with_lookup_timeout(Duration::from_millis(20));

        let err = resolver
            .resolve(&item("x", "Cabo Flexivel", None))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Timeout { .. }));
    }
}
