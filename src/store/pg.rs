// src/store/pg.rs
// PostgreSQL implementations of the store boundary.
//
// Expected tables:
//   public.product            (id uuid PK, name text, erp_code bigint NULL UNIQUE,
//                              brand text NULL, category text NULL,
//                              price double precision, is_available boolean)
//   public.product_correction (id uuid PK, original_text text, description text NULL,
//                              model_tag text, suggested_product_id uuid NULL,
//                              corrected_product_id uuid NULL, kind text,
//                              created_at timestamptz)
//   public.failed_search      (id uuid PK, query text, created_at timestamptz)

use async_trait::async_trait;
use chrono::Utc;
use postgres_types::ToSql;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::db::PgPool;
use crate::models::{
    CorrectionEntry, CorrectionKind, NewCorrection, ProductId, ProductRecord,
};

use super::{CatalogStore, CorrectionStore, SearchLogStore, StoreError};

const PRODUCT_COLUMNS: &str = "id, name, erp_code, brand, category, price, is_available";

const FIND_BY_CODE_SQL: &str = "SELECT id, name, erp_code, brand, category, price, is_available
     FROM public.product WHERE erp_code = $1";

const FIND_BY_ID_SQL: &str = "SELECT id, name, erp_code, brand, category, price, is_available
     FROM public.product WHERE id = $1";

const LATEST_FIXED_SQL: &str = "SELECT id, original_text, description, model_tag, suggested_product_id,
            corrected_product_id, kind, created_at
     FROM public.product_correction
     WHERE original_text = ANY($1)
       AND kind = 'FIXED'
       AND corrected_product_id IS NOT NULL
     ORDER BY created_at DESC
     LIMIT 1";

const APPEND_CORRECTION_SQL: &str = "INSERT INTO public.product_correction
            (id, original_text, description, model_tag, suggested_product_id,
             corrected_product_id, kind, created_at)
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)";

const LOG_FAILED_SEARCH_SQL: &str =
    "INSERT INTO public.failed_search (id, query, created_at) VALUES ($1, $2, $3)";

fn product_from_row(row: &Row) -> ProductRecord {
    ProductRecord {
        id: ProductId(row.get("id")),
        name: row.get("name"),
        erp_code: row.get("erp_code"),
        brand: row.get("brand"),
        category: row.get("category"),
        price: row.get("price"),
        is_available: row.get("is_available"),
    }
}

fn correction_from_row(row: &Row) -> CorrectionEntry {
    let suggested: Option<Uuid> = row.get("suggested_product_id");
    let corrected: Option<Uuid> = row.get("corrected_product_id");
    let kind: String = row.get("kind");
    CorrectionEntry {
        id: row.get("id"),
        original_text: row.get("original_text"),
        description: row.get("description"),
        model_tag: row.get("model_tag"),
        suggested_product_id: suggested.map(ProductId),
        corrected_product_id: corrected.map(ProductId),
        kind: CorrectionKind::from_db(&kind),
        created_at: row.get("created_at"),
    }
}

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds a name-predicate query with one ILIKE clause per term, joined
    /// by the given operator, plus the availability filter and a limit.
    async fn query_by_terms(
        &self,
        terms: &[String],
        joiner: &str,
        limit: i64,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let clauses: Vec<String> = (1..=terms.len())
            .map(|i| format!("name ILIKE ${}", i))
            .collect();
        let sql = format!(
            "SELECT {} FROM public.product WHERE is_available AND ({}) LIMIT ${}",
            PRODUCT_COLUMNS,
            clauses.join(joiner),
            terms.len() + 1
        );

        let patterns: Vec<String> = terms.iter().map(|t| format!("%{}%", t)).collect();
        let mut params: Vec<&(dyn ToSql + Sync)> = patterns
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();
        params.push(&limit);

        let conn = self.pool.get().await.map_err(StoreError::unavailable)?;
        let rows = conn
            .query(&sql, &params)
            .await
            .map_err(StoreError::unavailable)?;
        Ok(rows.iter().map(product_from_row).collect())
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_by_code(&self, code: i64) -> Result<Option<ProductRecord>, StoreError> {
        let conn = self.pool.get().await.map_err(StoreError::unavailable)?;
        let row = conn
            .query_opt(FIND_BY_CODE_SQL, &[&code])
            .await
            .map_err(StoreError::unavailable)?;
        Ok(row.as_ref().map(product_from_row))
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<ProductRecord>, StoreError> {
        let conn = self.pool.get().await.map_err(StoreError::unavailable)?;
        let row = conn
            .query_opt(FIND_BY_ID_SQL, &[&id.0])
            .await
            .map_err(StoreError::unavailable)?;
        Ok(row.as_ref().map(product_from_row))
    }

    async fn find_all_terms(
        &self,
        terms: &[String],
        limit: i64,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        self.query_by_terms(terms, " AND ", limit).await
    }

    async fn find_any_terms(
        &self,
        terms: &[String],
        limit: i64,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        self.query_by_terms(terms, " OR ", limit).await
    }

    async fn available_pool(&self, limit: i64) -> Result<Vec<ProductRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM public.product WHERE is_available LIMIT $1",
            PRODUCT_COLUMNS
        );
        let conn = self.pool.get().await.map_err(StoreError::unavailable)?;
        let rows = conn
            .query(&sql, &[&limit])
            .await
            .map_err(StoreError::unavailable)?;
        Ok(rows.iter().map(product_from_row).collect())
    }
}

#[derive(Clone)]
pub struct PgCorrectionStore {
    pool: PgPool,
}

impl PgCorrectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CorrectionStore for PgCorrectionStore {
    async fn latest_fixed(
        &self,
        normalized_texts: &[String],
    ) -> Result<Option<CorrectionEntry>, StoreError> {
        if normalized_texts.is_empty() {
            return Ok(None);
        }
        let texts: Vec<String> = normalized_texts.to_vec();
        let conn = self.pool.get().await.map_err(StoreError::unavailable)?;
        let row = conn
            .query_opt(LATEST_FIXED_SQL, &[&texts])
            .await
            .map_err(StoreError::unavailable)?;
        Ok(row.as_ref().map(correction_from_row))
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

        let conn = self.pool.get().await.map_err(StoreError::unavailable)?;
        conn.execute(
            APPEND_CORRECTION_SQL,
            &[
                &entry.id,
                &entry.original_text,
                &entry.description,
                &entry.model_tag,
                &entry.suggested_product_id.as_ref().map(|p| p.0),
                &entry.corrected_product_id.as_ref().map(|p| p.0),
                &entry.kind.as_str(),
                &entry.created_at,
            ],
        )
        .await
        .map_err(StoreError::unavailable)?;

        Ok(entry)
    }
}

#[derive(Clone)]
pub struct PgSearchLogStore {
    pool: PgPool,
}

impl PgSearchLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchLogStore for PgSearchLogStore {
    async fn log_failed(&self, query: &str) -> Result<(), StoreError> {
        let conn = self.pool.get().await.map_err(StoreError::unavailable)?;
        conn.execute(
            LOG_FAILED_SEARCH_SQL,
            &[&Uuid::new_v4(), &query, &Utc::now()],
        )
        .await
        .map_err(StoreError::unavailable)?;
        Ok(())
    }
}
