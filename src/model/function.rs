use serde::{Deserialize, Serialize};
use std::fmt;

use super::data_transfer_cost;
use super::execution_cost;

/// Opaque identifier for a [`Function`], unique within an [`super::Application`].
///
/// A thin newtype rather than a bare `String` so that a `FunctionId` can never be
/// confused with an unrelated string key at the type level. A single concrete id type
/// is enough here since the model has only one kind of node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionId(String);

impl FunctionId {
    pub fn new(id: impl Into<String>) -> Self {
        FunctionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FunctionId {
    fn from(s: &str) -> Self {
        FunctionId::new(s)
    }
}

impl From<String> for FunctionId {
    fn from(s: String) -> Self {
        FunctionId::new(s)
    }
}

/// An atomic serverless function: a node in the application's call-tree.
///
/// Identity is by [`FunctionId`] alone: two functions are equal iff their ids match.
/// `parent`/`children` are relations, not ownership — they hold ids into the owning
/// `Application.functions` arena, never a pointer or `Rc` to another `Function`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub id: FunctionId,
    pub memory_mb: u64,
    pub baseline_runtime_ms: u64,
    pub load_factor: f64,

    /// Child id -> bytes transferred on that edge.
    pub out_edges: std::collections::HashMap<FunctionId, u64>,

    /// Insertion-ordered child ids; order is observable in partitionings.
    pub children: Vec<FunctionId>,

    /// `None` for the root function; at most one parent (the graph is a tree).
    pub parent: Option<FunctionId>,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Function {}

impl std::hash::Hash for Function {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Function {
    pub fn new(id: impl Into<FunctionId>, memory_mb: u64, baseline_runtime_ms: u64) -> Self {
        Function {
            id: id.into(),
            memory_mb,
            baseline_runtime_ms,
            load_factor: 1.0,
            out_edges: std::collections::HashMap::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// `round(baseline_runtime_ms * load_factor)`.
    pub fn runtime_ms(&self) -> u64 {
        (self.baseline_runtime_ms as f64 * self.load_factor).round() as u64
    }

    /// Wires `child` as an outgoing edge of `self` carrying `data_bytes`.
    ///
    /// Does not set `child.parent` — the caller (`Builder`) owns both functions and is
    /// responsible for updating the child's back-reference in the arena.
    pub fn add_child(&mut self, child_id: FunctionId, data_bytes: u64) {
        self.children.push(child_id.clone());
        self.out_edges.insert(child_id, data_bytes);
    }

    /// `(data_bytes / 2^30) * 0.01` for the edge to `child_id`, or 0 if no such edge exists.
    pub fn data_transfer_cost(&self, child_id: &FunctionId) -> f64 {
        let bytes = self.out_edges.get(child_id).copied().unwrap_or(0);
        data_transfer_cost(bytes)
    }

    /// Billed cost of a single invocation of this function alone.
    pub fn execution_cost(&self) -> f64 {
        execution_cost(self.memory_mb, self.runtime_ms())
    }
}
