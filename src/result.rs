//! The result record every algorithm produces.

use crate::metrics::Partitioning;
use crate::model::FunctionId;

/// One algorithm's outcome, always produced — infeasibility and solver failure are
/// represented as data here, never as an `Err`.
#[derive(Debug, Clone)]
pub struct AlgorithmResult {
    pub name: String,
    pub groups: Vec<Vec<FunctionId>>,
    pub cost: f64,
    pub latency: f64,
    pub feasible: bool,
    pub runtime_ms: f64,
    pub error: Option<String>,
}

impl AlgorithmResult {
    /// Builds a feasible-or-not result from a judged partitioning.
    pub fn from_metrics(
        name: impl Into<String>,
        groups: Partitioning,
        metrics: crate::metrics::Metrics,
        runtime_ms: f64,
    ) -> Self {
        AlgorithmResult {
            name: name.into(),
            groups,
            cost: metrics.cost,
            latency: metrics.latency,
            feasible: metrics.feasible,
            runtime_ms,
            error: None,
        }
    }

    /// An infeasible result carrying no partitioning and an explanatory message
    /// (`cost`/`latency` reported as `+inf`).
    pub fn infeasible(name: impl Into<String>, runtime_ms: f64, error: impl Into<String>) -> Self {
        AlgorithmResult {
            name: name.into(),
            groups: Vec::new(),
            cost: f64::INFINITY,
            latency: f64::INFINITY,
            feasible: false,
            runtime_ms,
            error: Some(error.into()),
        }
    }
}
