// src/search/mod.rs
// In-memory catalog search: normalization, abbreviation expansion, the
// length-dependent match predicate and the fixed tie-break ranking.

pub mod engine;
pub mod normalize;
pub mod predicate;
pub mod rank;
pub mod service;
pub mod synonyms;

pub use engine::{search, DEFAULT_SEARCH_LIMIT};
pub use service::SearchService;
pub use synonyms::{SynonymTable, SYNONYMS};
