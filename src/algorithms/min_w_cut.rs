use std::collections::HashMap;
use std::time::Instant;

use crate::metrics::{self, Partitioning};
use crate::model::{Application, Function, FunctionId};
use crate::result::AlgorithmResult;

pub const NAME: &str = "MinWCut Heuristic";

/// Tracks, for the duration of a merge pass, which current group each function belongs
/// to and that group's ordered member list / summed memory. Keyed by the group's id
/// (its first member), mirroring `CompositeGroup::id`.
///
/// `order` records group ids in the order the groups were first seeded, independent of
/// `HashMap` iteration (which is not stable across separate `HashMap` instances even
/// within one process, since `RandomState` draws fresh hasher keys per instance) — this
/// is what keeps the final partitioning's group order reproducible run to run (spec
/// determinism, P7).
pub(crate) struct MergeState {
    group_of: HashMap<FunctionId, FunctionId>,
    members: HashMap<FunctionId, Vec<FunctionId>>,
    memory_mb: HashMap<FunctionId, u64>,
    order: Vec<FunctionId>,
}

impl MergeState {
    /// Seeds the merge state from an arbitrary pre-grouping (used by
    /// `GreedyTreePartitioning`'s Phase B, which starts from barrier-seeded groups
    /// rather than singletons). `groups` must list groups in the order they should
    /// appear in the final partitioning.
    pub(crate) fn from_groups(app: &Application, groups: Vec<(FunctionId, Vec<FunctionId>)>) -> Self {
        let mut group_of = HashMap::new();
        let mut memory_mb = HashMap::new();
        let mut members = HashMap::new();
        let mut order = Vec::with_capacity(groups.len());
        for (group_id, group_members) in groups {
            let mem: u64 = group_members
                .iter()
                .map(|id| app.function(id).expect("group references a known function").memory_mb)
                .sum();
            memory_mb.insert(group_id.clone(), mem);
            for member_id in &group_members {
                group_of.insert(member_id.clone(), group_id.clone());
            }
            order.push(group_id.clone());
            members.insert(group_id, group_members);
        }
        MergeState { group_of, members, memory_mb, order }
    }

    pub(crate) fn singleton(app: &Application) -> Self {
        let mut group_of = HashMap::new();
        let mut members = HashMap::new();
        let mut memory_mb = HashMap::new();
        let mut order = Vec::with_capacity(app.functions.len());
        for f in &app.functions {
            group_of.insert(f.id.clone(), f.id.clone());
            members.insert(f.id.clone(), vec![f.id.clone()]);
            memory_mb.insert(f.id.clone(), f.memory_mb);
            order.push(f.id.clone());
        }
        MergeState { group_of, members, memory_mb, order }
    }

    fn group_id_of(&self, id: &FunctionId) -> FunctionId {
        self.group_of[id].clone()
    }

    /// Merges the child's group into the parent's group, in place, iff the combined
    /// memory fits. Appends (does not reorder) the child group's members after the
    /// parent group's — this is what keeps composite member order observable and
    /// deterministic.
    pub(crate) fn try_merge(&mut self, parent: &Function, child: &Function, max_memory_mb: u64) {
        let parent_group = self.group_id_of(&parent.id);
        let child_group = self.group_id_of(&child.id);
        if parent_group == child_group {
            return;
        }
        let combined = self.memory_mb[&parent_group] + self.memory_mb[&child_group];
        if combined > max_memory_mb {
            return;
        }

        let child_members = self.members.remove(&child_group).expect("child group must exist");
        let child_memory = self.memory_mb.remove(&child_group).expect("child group must exist");
        for id in &child_members {
            self.group_of.insert(id.clone(), parent_group.clone());
        }
        self.members.get_mut(&parent_group).expect("parent group must exist").extend(child_members);
        *self.memory_mb.get_mut(&parent_group).expect("parent group must exist") += child_memory;
    }

    /// Groups are emitted in seed order; a merged-away child group simply no longer has
    /// an entry in `members` and is skipped.
    pub(crate) fn into_partitioning(mut self) -> Partitioning {
        self.order
            .into_iter()
            .filter_map(|id| self.members.remove(&id))
            .collect()
    }
}

/// Candidate merge edges sorted descending by data-transfer weight, ties broken by
/// original insertion order (`Vec::sort_by` is a stable sort, so this falls out of the
/// comparator alone).
pub(crate) fn merge_candidates_by_weight<'a>(app: &'a Application) -> Vec<(&'a Function, &'a Function)> {
    let mut candidates: Vec<(f64, &Function, &Function)> = app
        .edges()
        .into_iter()
        .map(|(parent, child)| (parent.data_transfer_cost(&child.id), parent, child))
        .collect();
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).expect("costs are never NaN"));
    candidates.into_iter().map(|(_, p, c)| (p, c)).collect()
}

/// Start from `NoFusion`; greedily merge the heaviest data-transfer edges first,
/// respecting the memory cap. Latency is ignored during merging and judged post-hoc.
pub fn run(app: &Application) -> AlgorithmResult {
    let start = Instant::now();

    let mut state = MergeState::singleton(app);
    for (parent, child) in merge_candidates_by_weight(app) {
        state.try_merge(parent, child, app.max_memory_mb);
    }

    let groups = state.into_partitioning();
    let metrics = metrics::evaluate(&groups, app);
    log::debug!("{NAME}: merged down to {} groups, cost={:.6}", groups.len(), metrics.cost);
    AlgorithmResult::from_metrics(NAME, groups, metrics, start.elapsed().as_secs_f64() * 1000.0)
}
