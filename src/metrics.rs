//! The canonical `(partitioning, app) -> {cost, latency, feasible}` judge.
//!
//! Every algorithm is scored through [`evaluate`]; nothing else computes cost or
//! latency. The evaluator is a total, pure function of its inputs: no algorithm ever
//! fails to be judged.

use std::collections::HashMap;

use crate::model::{Application, CompositeGroup, FunctionId};

/// A single partitioning: a disjoint cover of `Application.functions` by ordered groups.
pub type Partitioning = Vec<Vec<FunctionId>>;

/// The output of judging one partitioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub cost: f64,
    pub latency: f64,
    pub feasible: bool,
}

/// Judges `partitioning` against `app`:
///
/// 1. Every group is billed once at its summed memory/runtime.
/// 2. Every cross-group edge in the full graph adds its data-transfer cost.
/// 3. Latency sums the critical path's runtimes, plus one network hop for every
///    consecutive critical-path pair that falls in different groups.
/// 4. Feasible iff every group's memory fits and the latency fits.
pub fn evaluate(partitioning: &Partitioning, app: &Application) -> Metrics {
    let groups: Vec<CompositeGroup> = partitioning
        .iter()
        .map(|member_ids| {
            let members: Vec<&crate::model::Function> = member_ids
                .iter()
                .map(|id| app.function(id).expect("partitioning references a known function"))
                .collect();
            CompositeGroup::new(&members)
        })
        .collect();

    let func_to_group: HashMap<FunctionId, usize> = groups
        .iter()
        .enumerate()
        .flat_map(|(idx, g)| g.members.iter().map(move |id| (id.clone(), idx)))
        .collect();

    let mut total_cost: f64 = groups.iter().map(CompositeGroup::execution_cost).sum();

    for (parent, child) in app.edges() {
        let parent_group = func_to_group.get(&parent.id);
        let child_group = func_to_group.get(&child.id);
        if let (Some(&pg), Some(&cg)) = (parent_group, child_group) {
            if pg != cg {
                total_cost += parent.data_transfer_cost(&child.id);
            }
        }
    }

    let critical_path = app.critical_path_functions();
    let mut latency: f64 = critical_path.iter().map(|f| f.runtime_ms() as f64).sum();
    for pair in critical_path.windows(2) {
        let (parent, child) = (&pair[0], &pair[1]);
        let parent_group = func_to_group.get(&parent.id);
        let child_group = func_to_group.get(&child.id);
        if let (Some(&pg), Some(&cg)) = (parent_group, child_group) {
            if pg != cg {
                latency += app.network_hop_delay_ms as f64;
            }
        }
    }

    let memory_feasible = groups.iter().all(|g| g.memory_mb <= app.max_memory_mb);
    let latency_feasible = latency <= app.max_latency_ms as f64;

    Metrics { cost: total_cost, latency, feasible: memory_feasible && latency_feasible }
}
