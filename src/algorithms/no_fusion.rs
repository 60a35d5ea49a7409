use std::time::Instant;

use crate::metrics::{self, Partitioning};
use crate::model::Application;
use crate::result::AlgorithmResult;

pub const NAME: &str = "NoFusion";

/// One group per function — the cost-transparent, always-complete baseline.
pub fn run(app: &Application) -> AlgorithmResult {
    let start = Instant::now();
    let groups: Partitioning = app.functions.iter().map(|f| vec![f.id.clone()]).collect();
    let metrics = metrics::evaluate(&groups, app);
    log::debug!("{NAME}: {} singleton groups, cost={:.6}", groups.len(), metrics.cost);
    AlgorithmResult::from_metrics(NAME, groups, metrics, start.elapsed().as_secs_f64() * 1000.0)
}
