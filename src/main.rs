// src/main.rs
// Batch import resolution driver: reads AI-parsed line items from a JSON
// file and resolves each against the catalog.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::time::Instant;

use matching_lib::db;
use matching_lib::matching::resolver::MatchResolver;
use matching_lib::models::{MatchStatus, ParsedLineItem};
use matching_lib::store::{PgCatalogStore, PgCorrectionStore};
use matching_lib::utils::env::{load_env, lookup_timeout};

#[derive(Parser, Debug)]
#[command(name = "matcher", about = "Resolve parsed budget items against the catalog")]
struct Args {
    /// JSON file holding an array of parsed line items
    #[arg(long)]
    items: String,

    /// Lookups in flight; 1 resolves strictly sequentially
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    load_env();
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.items)
        .with_context(|| format!("Failed to read items file {}", args.items))?;
    let items: Vec<ParsedLineItem> =
        serde_json::from_str(&raw).context("Items file is not a JSON array of parsed items")?;
    info!("Loaded {} parsed line items from {}", items.len(), args.items);

    let pool = db::connect().await.context("Failed to connect to database")?;
    let resolver = MatchResolver::new(
        PgCatalogStore::new(pool.clone()),
        PgCorrectionStore::new(pool.clone()),
    )
    .with_lookup_timeout(lookup_timeout());

    let workers = args.concurrency.clamp(1, num_cpus::get());
    let start = Instant::now();

    let results = if workers > 1 {
        info!("Resolving with {} workers", workers);
        resolver.resolve_batch_concurrent(&items, workers).await
    } else {
        let pb = ProgressBar::new(items.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        let mut results = Vec::with_capacity(items.len());
        for item in &items {
            pb.set_message(item.description.clone());
            results.push(resolver.resolve(item).await);
            pb.inc(1);
        }
        pb.finish_with_message("done");
        results
    };

    let mut matched = 0usize;
    let mut suggested = 0usize;
    let mut not_found = 0usize;
    let mut failed = 0usize;

    println!("| Item | Score | Status | Product |");
    println!("|---|---|---|---|");
    for (item, outcome) in items.iter().zip(&results) {
        match outcome {
            Ok(result) => {
                match result.status {
                    MatchStatus::Matched => matched += 1,
                    MatchStatus::Suggested => suggested += 1,
                    MatchStatus::NotFound => not_found += 1,
                }
                let product = result
                    .product
                    .as_ref()
                    .map(|p| p.name.as_str())
                    .unwrap_or("-");
                println!(
                    "| {} | {} | {:?} | {} |",
                    item.raw_text, result.match_score, result.status, product
                );
            }
            Err(err) => {
                failed += 1;
                warn!("Resolution failed for {:?}: {}", item.raw_text, err);
                println!("| {} | - | ERROR | - |", item.raw_text);
            }
        }
    }

    info!(
        "Resolved {} items in {:.2?}: {} matched, {} suggested, {} not found, {} failed",
        items.len(),
        start.elapsed(),
        matched,
        suggested,
        not_found,
        failed
    );

    Ok(())
}
