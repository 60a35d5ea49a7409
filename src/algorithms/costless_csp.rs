use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::metrics::{self, Partitioning};
use crate::model::{Application, FunctionId};
use crate::result::AlgorithmResult;

pub const NAME: &str = "CostlessCSP";

/// A Pareto label at some chain position: accumulated cost/latency so far, the memory
/// already committed to the still-open last group, and the partial partitioning (of
/// `chain[0..=position]`) that produced it.
#[derive(Debug, Clone)]
struct Label {
    cost: f64,
    latency: f64,
    current_group_memory: u64,
    partitioning: Partitioning,
}

/// Expansion-order wrapper: the binary heap is a max-heap, so costs are negated to pop
/// the cheapest label first; insertion order (via `sequence`) breaks ties, also
/// reversed so the heap's "greater" is the earliest-inserted.
struct QueueEntry {
    position: usize,
    sequence: u64,
    label: Label,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.label.cost == other.label.cost && self.sequence == other.sequence
    }
}
impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .label
            .cost
            .partial_cmp(&self.label.cost)
            .expect("costs are never NaN")
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// `new` dominates `existing` iff it is no worse on both axes (equal labels count as
/// dominating, since they add nothing new).
fn dominates(a: &Label, b: &Label) -> bool {
    a.cost <= b.cost && a.latency <= b.latency
}

/// Pareto label-setting shortest path over the critical chain, trading off cost against
/// latency at every merge/cut decision; off-chain functions are appended as singletons
/// once the chain is resolved.
pub fn run(app: &Application) -> AlgorithmResult {
    let start = Instant::now();

    let chain = app.critical_path_functions();
    if chain.is_empty() {
        return AlgorithmResult::infeasible(
            NAME,
            start.elapsed().as_secs_f64() * 1000.0,
            "No critical path.",
        );
    }

    // labels[i] holds the current Pareto frontier at chain position i.
    let mut labels: Vec<Vec<Label>> = vec![Vec::new(); chain.len()];
    let first = &chain[0];
    labels[0].push(Label {
        cost: 0.0,
        latency: first.runtime_ms() as f64,
        current_group_memory: first.memory_mb,
        partitioning: vec![vec![first.id.clone()]],
    });

    let mut queue: BinaryHeap<QueueEntry> = BinaryHeap::new();
    let mut sequence: u64 = 0;
    queue.push(QueueEntry { position: 0, sequence, label: labels[0][0].clone() });

    while let Some(entry) = queue.pop() {
        let QueueEntry { position, label, .. } = entry;
        // Stale entries (superseded by a stronger label already inserted at this
        // position) are skipped rather than tracked separately.
        if !labels[position].iter().any(|stored| stored.cost == label.cost && stored.latency == label.latency) {
            continue;
        }
        if position + 1 >= chain.len() {
            continue;
        }
        let v = &chain[position + 1];

        let mut candidates = Vec::with_capacity(2);

        if label.current_group_memory + v.memory_mb <= app.max_memory_mb {
            let mut partitioning = label.partitioning.clone();
            partitioning.last_mut().expect("at least one group exists").push(v.id.clone());
            candidates.push(Label {
                cost: label.cost,
                latency: label.latency + v.runtime_ms() as f64,
                current_group_memory: label.current_group_memory + v.memory_mb,
                partitioning,
            });
        }

        let u = &chain[position];
        let mut partitioning = label.partitioning.clone();
        partitioning.push(vec![v.id.clone()]);
        candidates.push(Label {
            cost: label.cost + u.data_transfer_cost(&v.id),
            latency: label.latency + v.runtime_ms() as f64 + app.network_hop_delay_ms as f64,
            current_group_memory: v.memory_mb,
            partitioning,
        });

        for candidate in candidates {
            let next_position = position + 1;
            if labels[next_position].iter().any(|stored| dominates(stored, &candidate)) {
                continue;
            }
            labels[next_position].retain(|stored| !dominates(&candidate, stored));
            labels[next_position].push(candidate.clone());
            sequence += 1;
            queue.push(QueueEntry { position: next_position, sequence, label: candidate });
        }
    }

    let last = chain.len() - 1;
    let best = labels[last]
        .iter()
        .filter(|l| l.latency <= app.max_latency_ms as f64)
        .min_by(|a, b| a.cost.partial_cmp(&b.cost).expect("costs are never NaN"));

    let Some(best) = best else {
        return AlgorithmResult::infeasible(
            NAME,
            start.elapsed().as_secs_f64() * 1000.0,
            "no chain labeling satisfies max_latency_ms",
        );
    };

    let mut groups = best.partitioning.clone();
    let covered: std::collections::HashSet<FunctionId> =
        groups.iter().flatten().cloned().collect();
    for f in &app.functions {
        if !covered.contains(&f.id) {
            groups.push(vec![f.id.clone()]);
        }
    }

    let metrics = metrics::evaluate(&groups, app);
    log::debug!("{NAME}: {} groups, cost={:.6} (re-judged)", groups.len(), metrics.cost);
    AlgorithmResult::from_metrics(NAME, groups, metrics, start.elapsed().as_secs_f64() * 1000.0)
}
