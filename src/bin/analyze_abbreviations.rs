// src/bin/analyze_abbreviations.rs
// Scans catalog names for frequent short tokens, dotted tokens and common
// long terms -- the raw material for extending the synonym table.

use std::collections::HashMap;

use anyhow::{Context, Result};
use log::info;

use matching_lib::db;
use matching_lib::search::normalize::name_words;
use matching_lib::search::service::SEARCH_POOL_LIMIT;
use matching_lib::store::{CatalogStore, PgCatalogStore};

const TOP_N: usize = 50;

fn print_top(title: &str, counts: &HashMap<String, usize>, top: usize) {
    println!("\n{}:", title);
    println!("count | term");
    println!("---|---");
    let mut sorted: Vec<(&String, &usize)> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (term, count) in sorted.into_iter().take(top) {
        println!("{} | {}", count, term);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    matching_lib::utils::env::load_env();

    let pool = db::connect().await.context("Failed to connect to database")?;
    let catalog = PgCatalogStore::new(pool);

    let products = catalog.available_pool(SEARCH_POOL_LIMIT).await?;
    info!("Analyzing {} products...", products.len());

    let mut short_tokens: HashMap<String, usize> = HashMap::new();
    let mut dotted_tokens: HashMap<String, usize> = HashMap::new();
    let mut common_terms: HashMap<String, usize> = HashMap::new();

    for product in &products {
        let name = product.name.to_uppercase();
        for word in name_words(&name) {
            let clean = word.trim();
            let len = clean.chars().count();
            if clean.contains('.') && len > 1 {
                *dotted_tokens.entry(clean.to_string()).or_default() += 1;
            } else if (2..=4).contains(&len)
                && clean.chars().all(|c| c.is_ascii_alphanumeric())
            {
                *short_tokens.entry(clean.to_string()).or_default() += 1;
            }
            if len > 4 {
                *common_terms.entry(clean.to_string()).or_default() += 1;
            }
        }
    }

    print_top(
        "Top potential abbreviations (short tokens <= 4 chars)",
        &short_tokens,
        TOP_N,
    );
    print_top("Top dotted abbreviations", &dotted_tokens, TOP_N);
    print_top(
        "Top common terms (> 4 chars, candidates for abbreviation)",
        &common_terms,
        30,
    );

    Ok(())
}
