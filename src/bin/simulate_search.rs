// src/bin/simulate_search.rs
// Runs a fixed set of representative queries through the in-memory search
// engine against the live catalog and reports hits as a markdown table.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use matching_lib::db;
use matching_lib::search::service::SEARCH_POOL_LIMIT;
use matching_lib::search::{search, SYNONYMS};
use matching_lib::store::{CatalogStore, PgCatalogStore};

const TEST_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Validation Specific",
        &[
            "LUMINARIA DE EMBUTIR QUADRADA DE LED",
            "Fio",
            "Cabo",
            "LUM LED",
        ],
    ),
    (
        "Produtos Basicos",
        &[
            "Tomada",
            "Interruptor",
            "Fio",
            "Cabo",
            "Disjuntor",
            "Lampada",
            "LED",
        ],
    ),
    ("Abreviacoes", &["LUM", "EMB", "QUAD", "CX"]),
    ("Compostas", &["Fio 2.5", "Cabo Flexivel", "Disjuntor 20A"]),
    (
        "Novos Casos",
        &[
            "Disjuntor Monofasico",
            "Quadro Dist",
            "Refletor",
            "Aran",
        ],
    ),
];

#[derive(Parser, Debug)]
#[command(name = "simulate_search", about = "Search engine simulation over the catalog")]
struct Args {
    /// Results kept per query
    #[arg(long, default_value_t = 3)]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    matching_lib::utils::env::load_env();
    let args = Args::parse();

    let pool = db::connect().await.context("Failed to connect to database")?;
    let catalog = PgCatalogStore::new(pool);

    info!("Loading products...");
    let products = catalog.available_pool(SEARCH_POOL_LIMIT).await?;
    info!("Loaded {} products", products.len());

    let mut total = 0usize;
    let mut found = 0usize;

    println!("| Query | Result 1 | Result 2 | Status |");
    println!("|---|---|---|---|");

    for (category, queries) in TEST_CATEGORIES {
        println!("\n### {}", category);
        for query in *queries {
            total += 1;
            let results = search(&products, &SYNONYMS, query, args.limit);
            if !results.is_empty() {
                found += 1;
            }
            let first = results.first().map(|p| p.name.as_str()).unwrap_or("-");
            let second = results.get(1).map(|p| p.name.as_str()).unwrap_or("-");
            let status = if results.is_empty() { "MISS" } else { "HIT" };
            println!("| {} | {} | {} | {} |", query, first, second, status);
        }
    }

    println!(
        "\n**Simulation results:** {}/{} found ({:.1}%)",
        found,
        total,
        (found as f64 / total as f64) * 100.0
    );

    Ok(())
}
