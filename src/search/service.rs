// src/search/service.rs
// Catalog search surface: loads the available-product pool, runs the
// in-memory engine and records zero-result queries for synonym curation.

use log::warn;

use crate::models::ProductRecord;
use crate::store::{CatalogStore, SearchLogStore, StoreError};

use super::engine::{self, DEFAULT_SEARCH_LIMIT};
use super::normalize::{normalize_query, tokenize};
use super::synonyms::SYNONYMS;

/// Upper bound on the product pool loaded for one search; roughly the whole
/// catalog for the deployments this serves.
pub const SEARCH_POOL_LIMIT: i64 = 5000;

/// Queries shorter than this are not worth logging as failed searches.
const MIN_LOGGED_QUERY_LEN: usize = 3;

pub struct SearchService<C, L> {
    catalog: C,
    search_log: L,
}

impl<C: CatalogStore, L: SearchLogStore> SearchService<C, L> {
    pub fn new(catalog: C, search_log: L) -> Self {
        Self {
            catalog,
            search_log,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<ProductRecord>, StoreError> {
        self.search_with_limit(query, DEFAULT_SEARCH_LIMIT).await
    }

    /// Ranked catalog search. Queries that reduce to no tokens short-circuit
    /// without touching the store. Failed-search logging is best-effort and
    /// never fails the search itself.
    pub async fn search_with_limit(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let normalized = normalize_query(query);
        if tokenize(&normalized).is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.catalog.available_pool(SEARCH_POOL_LIMIT).await?;
        let results: Vec<ProductRecord> = engine::search(&pool, &SYNONYMS, query, limit)
            .into_iter()
            .cloned()
            .collect();

        if results.is_empty() && query.trim().chars().count() >= MIN_LOGGED_QUERY_LEN {
            if let Err(err) = self.search_log.log_failed(query).await {
                warn!("Failed to record zero-result search {:?}: {}", query, err);
            }
        }

        Ok(results)
    }
}
