//! Partitions a serverless application's call-tree into fused composite groups that
//! minimize billed cost under per-group memory and end-to-end latency constraints.
//!
//! The pipeline is always `Builder -> Application -> Runner -> Vec<AlgorithmResult>`:
//! build an [`model::Application`] from a manifest, hand it to [`runner::run_all`],
//! read off the ranked results. Every stage here is pure and synchronous — no network
//! I/O, no caching, no state carried between calls.

pub mod algorithms;
pub mod builder;
pub mod config;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod model;
pub mod result;
pub mod runner;

pub use error::{Error, Result};
pub use model::Application;
pub use result::AlgorithmResult;

/// Parses `config_path` as an [`config::AppConfig`], optionally enriches it with
/// live-metrics measurements from `live_metrics_path`, and runs every fusion algorithm.
///
/// This is the convenience entry point the CLI binary wraps; library consumers that
/// already hold a parsed `AppConfig` should call [`builder::build`] /
/// [`runner::run_all`] directly instead.
pub fn optimize(config_path: &str, live_metrics_path: Option<&str>) -> Result<Vec<AlgorithmResult>> {
    let config_json = std::fs::read_to_string(config_path)?;
    let config: config::AppConfig = serde_json::from_str(&config_json)?;

    let app = builder::build(config_path, &config)?;
    log::info!("Application '{}' built with {} functions.", app.name, app.functions.len());

    let app = match live_metrics_path {
        Some(path) => {
            let metrics_json = std::fs::read_to_string(path)?;
            let measurements: config::LiveMetricsInput = serde_json::from_str(&metrics_json)?;
            log::info!("Enriching application with {} live measurements from '{}'.", measurements.len(), path);
            builder::enrich(&app, &measurements)
        }
        None => app,
    };

    Ok(runner::run_all(&app))
}
