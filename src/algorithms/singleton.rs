use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use crate::metrics::{self, Partitioning};
use crate::model::{Application, FunctionId};
use crate::result::AlgorithmResult;

pub const NAME: &str = "Singleton";

/// One group containing every reachable function, ordered by BFS from the root.
///
/// BFS order is part of the contract: it fixes the internal sequencing of the
/// resulting composite, which Metrics then judges. This never checks memory itself;
/// that is deliberately left to `Metrics` to judge rather than pre-empted with an
/// early feasibility check here.
pub fn run(app: &Application) -> AlgorithmResult {
    let start = Instant::now();

    let root = app.root_function();
    let mut visited: HashSet<FunctionId> = HashSet::new();
    visited.insert(root.id.clone());
    let mut queue: VecDeque<FunctionId> = VecDeque::new();
    queue.push_back(root.id.clone());
    let mut order: Vec<FunctionId> = Vec::new();

    while let Some(id) = queue.pop_front() {
        let node = app.function(&id).expect("BFS only enqueues known ids");
        order.push(id);
        for child_id in &node.children {
            if visited.insert(child_id.clone()) {
                queue.push_back(child_id.clone());
            }
        }
    }

    let groups: Partitioning = vec![order];
    let metrics = metrics::evaluate(&groups, app);
    log::debug!("{NAME}: fused {} functions into one group", groups[0].len());
    AlgorithmResult::from_metrics(NAME, groups, metrics, start.elapsed().as_secs_f64() * 1000.0)
}
