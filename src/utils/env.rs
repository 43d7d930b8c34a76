// src/utils/env.rs

use std::time::Duration;

use log::debug;

/// Loads variables from a local .env file if present. Values already set in
/// the process environment win.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found; using process environment"),
    }
}

/// Per-lookup timeout for store round-trips, overridable via
/// MATCH_LOOKUP_TIMEOUT_SECS.
pub fn lookup_timeout() -> Duration {
    let secs = std::env::var("MATCH_LOOKUP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(10);
    Duration::from_secs(secs)
}
