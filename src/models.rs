// src/models.rs
// Shared domain types for catalog search and budget import resolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog product as read from the persistent store. The matcher only
/// reads these; catalog sync owns all writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub erp_code: Option<i64>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub is_available: bool,
}

/// One structured line item produced by the external AI parser. Lives only
/// for the duration of one import request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLineItem {
    pub raw_text: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    pub description: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub code_ref: Option<String>,
}

fn default_quantity() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Matched,
    Suggested,
    NotFound,
}

/// Outcome of resolving one parsed line item. `match_score` is a fixed band
/// tied to the strategy that resolved the item, not a similarity measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub parsed: ParsedLineItem,
    pub match_score: u8,
    pub status: MatchStatus,
    pub product: Option<ProductRecord>,
}

impl MatchResult {
    pub fn not_found(parsed: ParsedLineItem) -> Self {
        Self {
            parsed,
            match_score: 0,
            status: MatchStatus::NotFound,
            product: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectionKind {
    Fixed,
    Rejected,
}

impl CorrectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionKind::Fixed => "FIXED",
            CorrectionKind::Rejected => "REJECTED",
        }
    }

    pub fn from_db(value: &str) -> Self {
        match value {
            "FIXED" => CorrectionKind::Fixed,
            _ => CorrectionKind::Rejected,
        }
    }
}

/// One entry of the append-only correction log. Text fields are stored
/// normalized (lowercased, trimmed); the latest entry per text wins.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionEntry {
    pub id: Uuid,
    pub original_text: String,
    pub description: Option<String>,
    pub model_tag: String,
    pub suggested_product_id: Option<ProductId>,
    pub corrected_product_id: Option<ProductId>,
    pub kind: CorrectionKind,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a correction, written when a human overrides a
/// suggested match in the import review UI.
#[derive(Debug, Clone)]
pub struct NewCorrection {
    pub original_text: String,
    pub description: Option<String>,
    pub model_tag: String,
    pub suggested_product_id: Option<ProductId>,
    pub corrected_product_id: Option<ProductId>,
    pub kind: CorrectionKind,
}

/// A catalog search that returned nothing, kept for later synonym curation.
#[derive(Debug, Clone)]
pub struct FailedSearch {
    pub query: String,
    pub created_at: DateTime<Utc>,
}
