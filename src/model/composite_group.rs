use super::execution_cost;
use super::function::{Function, FunctionId};

/// An ordered, non-empty sequence of member functions fused into one deployable unit.
///
/// Members execute sequentially inside the composite: `runtime_ms` and `memory_mb` are
/// plain sums over the members (memory is not deduplicated across merges, matching the
/// original source's behavior).
#[derive(Debug, Clone)]
pub struct CompositeGroup {
    /// Insertion-ordered member ids. The group's `id` is `members[0]`.
    pub members: Vec<FunctionId>,
    pub memory_mb: u64,
    pub runtime_ms: u64,
}

impl CompositeGroup {
    /// Builds a composite from an ordered slice of member functions.
    ///
    /// `functions` must be non-empty; this is an invariant of every partitioning the
    /// fusion algorithms produce (each group has at least one member), so an empty slice
    /// is a caller bug rather than a runtime condition to recover from.
    pub fn new(functions: &[&Function]) -> Self {
        debug_assert!(!functions.is_empty(), "a composite group must have members");
        let members = functions.iter().map(|f| f.id.clone()).collect();
        let memory_mb = functions.iter().map(|f| f.memory_mb).sum();
        let runtime_ms = functions.iter().map(|f| f.runtime_ms()).sum();
        CompositeGroup { members, memory_mb, runtime_ms }
    }

    pub fn id(&self) -> &FunctionId {
        &self.members[0]
    }

    /// Cost of a single billed invocation at the summed memory and runtime.
    pub fn execution_cost(&self) -> f64 {
        execution_cost(self.memory_mb, self.runtime_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_memory_and_runtime_across_members() {
        let a = Function::new("a", 256, 100);
        let b = Function::new("b", 512, 200);
        let group = CompositeGroup::new(&[&a, &b]);
        assert_eq!(group.memory_mb, 768);
        assert_eq!(group.runtime_ms, 300);
        assert_eq!(group.id(), &FunctionId::new("a"));
    }
}
