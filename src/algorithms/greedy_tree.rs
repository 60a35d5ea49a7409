use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

use itertools::Itertools;

use crate::algorithms::min_w_cut::{merge_candidates_by_weight, MergeState};
use crate::metrics;
use crate::model::{Application, FunctionId};
use crate::result::AlgorithmResult;

pub const NAME: &str = "GreedyTreePartitioning";

/// Phase A: pick the smallest set of critical-path edges to keep merged (equivalently,
/// the smallest cut of the rest) such that the resulting latency — base critical-path
/// runtime plus one hop per surviving cut — fits `max_latency_ms`.
///
/// Subsets are tried in increasing size, and within a size in the lexicographic order
/// `itertools::combinations` produces over the edges in critical-path order; the first
/// one that fits wins. Keeping every edge (cutting nothing) always fits once the base
/// latency itself is within budget, so this never falls through without an answer.
fn select_seed_cut(app: &Application) -> Result<Vec<(FunctionId, FunctionId)>, AlgorithmResult> {
    let critical_path = app.critical_path_functions();
    let base_latency: f64 = critical_path.iter().map(|f| f.runtime_ms() as f64).sum();

    if base_latency > app.max_latency_ms as f64 {
        return Err(AlgorithmResult::infeasible(
            NAME,
            0.0,
            format!(
                "critical path base latency {base_latency} already exceeds max_latency_ms {}",
                app.max_latency_ms
            ),
        ));
    }

    let edges: Vec<(FunctionId, FunctionId)> = critical_path
        .windows(2)
        .map(|w| (w[0].id.clone(), w[1].id.clone()))
        .collect();

    for k in 0..=edges.len() {
        for combo in edges.iter().cloned().combinations(k) {
            let num_cut = edges.len() - k;
            let latency = base_latency + (num_cut as f64) * app.network_hop_delay_ms as f64;
            if latency <= app.max_latency_ms as f64 {
                let kept: HashSet<(FunctionId, FunctionId)> = combo.into_iter().collect();
                return Ok(edges.into_iter().filter(|e| !kept.contains(e)).collect());
            }
        }
    }

    unreachable!("k = edges.len() merges everything and reduces to the base latency check above")
}

/// Phase B: the root plus every cut edge's child endpoint becomes a barrier; every
/// other function joins the barrier group of its nearest ancestor barrier. Walking the
/// tree top-down from the root visits every ancestor before its descendants, so each
/// node's governing barrier is already known by the time the node itself is reached —
/// no ties are possible on a tree.
fn seed_barrier_groups(
    app: &Application,
    cut_edges: &[(FunctionId, FunctionId)],
) -> Vec<(FunctionId, Vec<FunctionId>)> {
    let root_id = app.root_function().id.clone();

    let mut barrier_order: Vec<FunctionId> = vec![root_id.clone()];
    let mut barrier_set: HashSet<FunctionId> = HashSet::from([root_id.clone()]);
    for (_, child_id) in cut_edges {
        if barrier_set.insert(child_id.clone()) {
            barrier_order.push(child_id.clone());
        }
    }

    let mut groups: HashMap<FunctionId, Vec<FunctionId>> =
        barrier_order.iter().map(|b| (b.clone(), vec![b.clone()])).collect();
    let mut governing: HashMap<FunctionId, FunctionId> = HashMap::new();
    governing.insert(root_id.clone(), root_id.clone());

    let mut queue: VecDeque<FunctionId> = VecDeque::from([root_id]);
    while let Some(id) = queue.pop_front() {
        let node = app.function(&id).expect("BFS only enqueues known ids");
        let my_barrier = governing[&id].clone();
        for child_id in &node.children {
            let child_barrier = if barrier_set.contains(child_id) {
                child_id.clone()
            } else {
                my_barrier.clone()
            };
            governing.insert(child_id.clone(), child_barrier.clone());
            if child_barrier != *child_id {
                groups.get_mut(&child_barrier).expect("barrier group exists").push(child_id.clone());
            }
            queue.push_back(child_id.clone());
        }
    }

    barrier_order
        .into_iter()
        .map(|b| {
            let members = groups.remove(&b).expect("every barrier has a seeded group");
            (b, members)
        })
        .collect()
}

/// Two-phase heuristic: cut the critical path as little as latency allows (Phase A),
/// seed groups from the surviving barriers, then greedily fuse the remaining
/// non-critical edges by weight exactly as `MinWCutHeuristic` does (Phase B).
pub fn run(app: &Application) -> AlgorithmResult {
    let start = Instant::now();

    let cut_edges = match select_seed_cut(app) {
        Ok(cuts) => cuts,
        Err(mut infeasible) => {
            infeasible.runtime_ms = start.elapsed().as_secs_f64() * 1000.0;
            return infeasible;
        }
    };

    let barrier_groups = seed_barrier_groups(app, &cut_edges);
    let mut state = MergeState::from_groups(app, barrier_groups);

    let cut_set: HashSet<(FunctionId, FunctionId)> = cut_edges.into_iter().collect();
    for (parent, child) in merge_candidates_by_weight(app) {
        if cut_set.contains(&(parent.id.clone(), child.id.clone())) {
            continue;
        }
        state.try_merge(parent, child, app.max_memory_mb);
    }

    let groups = state.into_partitioning();
    let metrics = metrics::evaluate(&groups, app);
    log::debug!("{NAME}: {} groups after barrier seeding + merge, cost={:.6}", groups.len(), metrics.cost);
    AlgorithmResult::from_metrics(NAME, groups, metrics, start.elapsed().as_secs_f64() * 1000.0)
}
