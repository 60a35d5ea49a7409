use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Error, Result};

use super::function::{Function, FunctionId};

/// Live-metrics measurement for a single function, consumed by [`Application::enrich`].
#[derive(Debug, Clone, Copy)]
pub struct LiveMetric {
    pub avg_runtime_ms: u64,
    pub avg_memory_mb: u64,
}

/// The immutable (post-construction) application graph: a rooted tree of [`Function`]s
/// plus the constraints and critical path that the fusion algorithms optimize against.
///
/// `Application` never mutates itself in place after `new`/`enrich` return — every
/// derived index (`functions_map`, `root_function`, `critical_path_functions`) is
/// recomputed whenever the function set changes, so the two are always consistent.
#[derive(Debug, Clone)]
pub struct Application {
    pub name: String,
    pub functions: Vec<Function>,
    pub critical_path_ids: Vec<FunctionId>,
    pub max_memory_mb: u64,
    pub max_latency_ms: u64,
    pub network_hop_delay_ms: u64,

    functions_map: HashMap<FunctionId, Function>,
    root_function_id: FunctionId,
    critical_path_functions: Vec<Function>,
}

impl Application {
    /// Constructs and validates an `Application`.
    ///
    /// Enforces the graph's invariants: all `critical_path_ids` resolve, exactly one
    /// root (a function with no parent), every function is reachable from the root, and
    /// the graph is acyclic.
    pub fn new(
        name: impl Into<String>,
        functions: Vec<Function>,
        critical_path_ids: Vec<FunctionId>,
        max_memory_mb: u64,
        max_latency_ms: u64,
        network_hop_delay_ms: u64,
    ) -> Result<Self> {
        if functions.is_empty() {
            return Err(Error::InvalidConfiguration(
                "application must contain at least one function".to_string(),
            ));
        }

        let functions_map: HashMap<FunctionId, Function> =
            functions.iter().cloned().map(|f| (f.id.clone(), f)).collect();
        if functions_map.len() != functions.len() {
            return Err(Error::InvalidConfiguration(
                "function ids must be unique within an application".to_string(),
            ));
        }

        for cp_id in &critical_path_ids {
            if !functions_map.contains_key(cp_id) {
                return Err(Error::InvalidConfiguration(format!(
                    "critical_path id '{cp_id}' is not a known function"
                )));
            }
        }

        let roots: Vec<&Function> = functions.iter().filter(|f| f.parent.is_none()).collect();
        let root_function_id = match roots.as_slice() {
            [single] => single.id.clone(),
            [] => {
                return Err(Error::InvalidConfiguration(
                    "application graph has no root function (every function has a parent)"
                        .to_string(),
                ));
            }
            _ => {
                return Err(Error::InvalidConfiguration(format!(
                    "application graph must have exactly one root function, found {}",
                    roots.len()
                )));
            }
        };

        Self::check_reachable_and_acyclic(&functions_map, &root_function_id)?;

        let critical_path_functions = critical_path_ids
            .iter()
            .map(|id| functions_map[id].clone())
            .collect();

        Ok(Application {
            name: name.into(),
            functions,
            critical_path_ids,
            max_memory_mb,
            max_latency_ms,
            network_hop_delay_ms,
            functions_map,
            root_function_id,
            critical_path_functions,
        })
    }

    fn check_reachable_and_acyclic(
        functions_map: &HashMap<FunctionId, Function>,
        root_id: &FunctionId,
    ) -> Result<()> {
        let mut visited: HashSet<FunctionId> = HashSet::new();
        let mut queue: VecDeque<FunctionId> = VecDeque::new();
        visited.insert(root_id.clone());
        queue.push_back(root_id.clone());

        while let Some(id) = queue.pop_front() {
            let node = functions_map.get(&id).ok_or_else(|| {
                Error::InvalidConfiguration(format!("dangling child reference '{id}'"))
            })?;
            for child_id in &node.children {
                if !visited.insert(child_id.clone()) {
                    return Err(Error::InvalidConfiguration(format!(
                        "cycle detected: '{child_id}' is reachable more than once"
                    )));
                }
                queue.push_back(child_id.clone());
            }
        }

        if visited.len() != functions_map.len() {
            return Err(Error::InvalidConfiguration(
                "not every function is reachable from the root function".to_string(),
            ));
        }
        Ok(())
    }

    pub fn functions_map(&self) -> &HashMap<FunctionId, Function> {
        &self.functions_map
    }

    pub fn function(&self, id: &FunctionId) -> Option<&Function> {
        self.functions_map.get(id)
    }

    pub fn root_function(&self) -> &Function {
        &self.functions_map[&self.root_function_id]
    }

    pub fn critical_path_functions(&self) -> &[Function] {
        &self.critical_path_functions
    }

    /// All `(parent, child)` edges in the graph, in `functions`/`children` insertion order.
    pub fn edges(&self) -> Vec<(&Function, &Function)> {
        let mut out = Vec::new();
        for f in &self.functions {
            for child_id in &f.children {
                out.push((f, &self.functions_map[child_id]));
            }
        }
        out
    }

    /// Replaces `baseline_runtime_ms`/`memory_mb` on functions present in `measurements`
    /// with their observed averages. Unknown ids are ignored; functions without a
    /// measurement keep their current values. Structural invariants (ids, topology) are
    /// unaffected, so no reachability/cycle re-check is needed — only derived
    /// cost-relevant fields change.
    ///
    /// Idempotent: re-enriching with the same `measurements` is a no-op on an
    /// already-enriched `Application`.
    pub fn enrich(&self, measurements: &HashMap<FunctionId, LiveMetric>) -> Self {
        let mut functions = self.functions.clone();
        for f in &mut functions {
            if let Some(m) = measurements.get(&f.id) {
                f.baseline_runtime_ms = m.avg_runtime_ms;
                f.memory_mb = m.avg_memory_mb;
            }
        }

        let functions_map: HashMap<FunctionId, Function> =
            functions.iter().cloned().map(|f| (f.id.clone(), f)).collect();
        let critical_path_functions = self
            .critical_path_ids
            .iter()
            .map(|id| functions_map[id].clone())
            .collect();

        Application {
            name: self.name.clone(),
            functions,
            critical_path_ids: self.critical_path_ids.clone(),
            max_memory_mb: self.max_memory_mb,
            max_latency_ms: self.max_latency_ms,
            network_hop_delay_ms: self.network_hop_delay_ms,
            functions_map,
            root_function_id: self.root_function_id.clone(),
            critical_path_functions,
        }
    }
}
