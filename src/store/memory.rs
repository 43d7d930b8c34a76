// src/store/memory.rs
// In-memory store implementations, used by tests and by callers that
// already hold a loaded product set.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{CorrectionEntry, FailedSearch, NewCorrection, ProductId, ProductRecord};

use super::{CatalogStore, CorrectionStore, SearchLogStore, StoreError};

#[derive(Clone)]
pub struct InMemoryCatalog {
    products: Arc<Vec<ProductRecord>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self {
            products: Arc::new(products),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of store round-trips, shared across clones. Lets tests
    /// assert that short-circuit paths really skip the store.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn contains_ci(name: &str, term: &str) -> bool {
    name.to_uppercase().contains(&term.to_uppercase())
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find_by_code(&self, code: i64) -> Result<Option<ProductRecord>, StoreError> {
        self.touch();
        Ok(self
            .products
            .iter()
            .find(|p| p.erp_code == Some(code))
            .cloned())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<ProductRecord>, StoreError> {
        self.touch();
        Ok(self.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_all_terms(
        &self,
        terms: &[String],
        limit: i64,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        self.touch();
        Ok(self
            .products
            .iter()
            .filter(|p| p.is_available)
            .filter(|p| terms.iter().all(|t| contains_ci(&p.name, t)))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_any_terms(
        &self,
        terms: &[String],
        limit: i64,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        self.touch();
        Ok(self
            .products
            .iter()
            .filter(|p| p.is_available)
            .filter(|p| terms.iter().any(|t| contains_ci(&p.name, t)))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn available_pool(&self, limit: i64) -> Result<Vec<ProductRecord>, StoreError> {
        self.touch();
        Ok(self
            .products
            .iter()
            .filter(|p| p.is_available)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCorrectionStore {
    entries: Arc<RwLock<Vec<CorrectionEntry>>>,
}

impl InMemoryCorrectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<CorrectionEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl CorrectionStore for InMemoryCorrectionStore {
    async fn latest_fixed(
        &self,
        normalized_texts: &[String],
    ) -> Result<Option<CorrectionEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.kind == crate::models::CorrectionKind::Fixed)
            .filter(|e| e.corrected_product_id.is_some())
            .filter(|e| normalized_texts.contains(&e.original_text))
            .max_by_key(|e| e.created_at)
            .cloned())
    }

    async fn append(&self, correction: NewCorrection) -> Result<CorrectionEntry, StoreError> {
        let entry = CorrectionEntry {
            id: Uuid::new_v4(),
            original_text: correction.original_text,
            description: correction.description,
            model_tag: correction.model_tag,
            suggested_product_id: correction.suggested_product_id,
            corrected_product_id: correction.corrected_product_id,
            kind: correction.kind,
            created_at: Utc::now(),
        };
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }
}

#[derive(Clone, Default)]
pub struct InMemorySearchLog {
    entries: Arc<RwLock<Vec<FailedSearch>>>,
}

impl InMemorySearchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn logged(&self) -> Vec<FailedSearch> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl SearchLogStore for InMemorySearchLog {
    async fn log_failed(&self, query: &str) -> Result<(), StoreError> {
        self.entries.write().await.push(FailedSearch {
            query: query.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }
}
