// src/store/mod.rs
// Boundary contracts for the persistent catalog, the correction memory log
// and the failed-search log. The matcher depends only on these traits.

pub mod memory;
pub mod pg;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CorrectionEntry, NewCorrection, ProductId, ProductRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
    #[error("store lookup timed out after {timeout:?}: {operation}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl StoreError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        StoreError::Unavailable {
            message: err.to_string(),
        }
    }
}

/// Read access to the product catalog. Name predicates are case-insensitive
/// substring conditions; every query that feeds a resolution filters on
/// availability except the direct id/code lookups.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_code(&self, code: i64) -> Result<Option<ProductRecord>, StoreError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<ProductRecord>, StoreError>;

    /// Available products whose name contains every term.
    async fn find_all_terms(
        &self,
        terms: &[String],
        limit: i64,
    ) -> Result<Vec<ProductRecord>, StoreError>;

    /// Available products whose name contains at least one term.
    async fn find_any_terms(
        &self,
        terms: &[String],
        limit: i64,
    ) -> Result<Vec<ProductRecord>, StoreError>;

    /// The available-product pool the in-memory search engine operates on.
    async fn available_pool(&self, limit: i64) -> Result<Vec<ProductRecord>, StoreError>;
}

/// Append-only correction memory. Reads resolve "latest entry wins" by
/// timestamp at query time; there is no write-time exclusion.
#[async_trait]
pub trait CorrectionStore: Send + Sync {
    /// Most recent FIXED entry carrying a corrected product id whose
    /// original text equals any of the given normalized texts.
    async fn latest_fixed(
        &self,
        normalized_texts: &[String],
    ) -> Result<Option<CorrectionEntry>, StoreError>;

    async fn append(&self, correction: NewCorrection) -> Result<CorrectionEntry, StoreError>;
}

/// Append-only log of catalog searches that returned nothing.
#[async_trait]
pub trait SearchLogStore: Send + Sync {
    async fn log_failed(&self, query: &str) -> Result<(), StoreError>;
}

pub use memory::{InMemoryCatalog, InMemoryCorrectionStore, InMemorySearchLog};
pub use pg::{PgCatalogStore, PgCorrectionStore, PgSearchLogStore};
