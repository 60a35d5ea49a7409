use clap::Parser;

use fusion_optimizer::{builder, config, logger, runner, AlgorithmResult};

/// Computes a serverless fusion plan for a function-call-graph manifest and prints the
/// ranked results of every algorithm.
#[derive(Debug, Parser)]
#[command(name = "fusion_optimizer", about = "Serverless function fusion optimizer")]
struct Cli {
    /// Path to the application manifest (functions/topology/constraints), JSON.
    #[arg(short, long)]
    config: String,

    /// Optional path to a live-metrics measurement file, JSON.
    #[arg(short, long)]
    live_metrics: Option<String>,

    /// Restrict output to a single algorithm by name (e.g. "MinWCut Heuristic").
    #[arg(short, long)]
    algorithm: Option<String>,
}

fn main() -> fusion_optimizer::Result<()> {
    logger::init();
    let cli = Cli::parse();

    let config_json = std::fs::read_to_string(&cli.config)?;
    let app_config: config::AppConfig = serde_json::from_str(&config_json)?;
    let mut app = builder::build(&cli.config, &app_config)?;
    log::info!("Application '{}' built with {} functions.", app.name, app.functions.len());

    if let Some(path) = &cli.live_metrics {
        let metrics_json = std::fs::read_to_string(path)?;
        let measurements: config::LiveMetricsInput = serde_json::from_str(&metrics_json)?;
        log::info!("Enriching with {} live measurements from '{path}'.", measurements.len());
        app = builder::enrich(&app, &measurements);
    }

    let mut results = runner::run_all(&app);
    if let Some(name) = &cli.algorithm {
        results.retain(|r| &r.name == name);
    }

    print_results(&results);
    Ok(())
}

fn print_results(results: &[AlgorithmResult]) {
    println!("{:<22} {:>8} {:>10} {:>10} {:>9}  {}", "ALGORITHM", "FEASIBLE", "COST", "LATENCY", "MS", "NOTE");
    for r in results {
        println!(
            "{:<22} {:>8} {:>10.6} {:>10.2} {:>9.2}  {}",
            r.name,
            r.feasible,
            r.cost,
            r.latency,
            r.runtime_ms,
            r.error.as_deref().unwrap_or("-"),
        );
    }
}
