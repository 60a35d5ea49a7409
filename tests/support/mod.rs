//! Shared application builders for the integration tests. Not a test binary itself —
//! included via `mod support;` from each `tests/*.rs` file.

use fusion_optimizer::model::{Application, Function, FunctionId};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Builds a straight-line chain `specs[0] -> specs[1] -> ... -> specs[n-1]`, with the
/// whole chain as the critical path.
pub fn chain(
    specs: &[(&str, u64, u64)],
    weights_gib: &[f64],
    max_memory_mb: u64,
    max_latency_ms: u64,
    network_hop_delay_ms: u64,
) -> Application {
    assert_eq!(weights_gib.len(), specs.len() - 1, "one weight per edge in the chain");

    let mut functions: Vec<Function> =
        specs.iter().map(|(id, memory_mb, runtime_ms)| Function::new(*id, *memory_mb, *runtime_ms)).collect();

    for (i, weight) in weights_gib.iter().enumerate() {
        let child_id = FunctionId::new(specs[i + 1].0);
        let bytes = (*weight * BYTES_PER_GIB) as u64;
        functions[i].add_child(child_id, bytes);
    }
    for i in 1..specs.len() {
        functions[i].parent = Some(FunctionId::new(specs[i - 1].0));
    }

    let critical_path_ids: Vec<FunctionId> = specs.iter().map(|(id, _, _)| FunctionId::new(*id)).collect();

    Application::new("chain", functions, critical_path_ids, max_memory_mb, max_latency_ms, network_hop_delay_ms)
        .expect("chain fixture is a valid application")
}

/// Builds a one-level fork: `root` with direct children `children`, each carrying its
/// own data-transfer weight to `root`.
pub fn fork(
    root: (&str, u64, u64),
    children: &[(&str, u64, u64, f64)],
    critical_path_ids: &[&str],
    max_memory_mb: u64,
    max_latency_ms: u64,
    network_hop_delay_ms: u64,
) -> Application {
    let mut root_fn = Function::new(root.0, root.1, root.2);
    let mut functions = Vec::with_capacity(children.len() + 1);

    for (id, memory_mb, runtime_ms, weight_gib) in children {
        let bytes = (*weight_gib * BYTES_PER_GIB) as u64;
        root_fn.add_child(FunctionId::new(*id), bytes);
        let mut child = Function::new(*id, *memory_mb, *runtime_ms);
        child.parent = Some(FunctionId::new(root.0));
        functions.push(child);
    }
    functions.insert(0, root_fn);

    let critical_path_ids: Vec<FunctionId> = critical_path_ids.iter().map(|id| FunctionId::new(*id)).collect();

    Application::new("fork", functions, critical_path_ids, max_memory_mb, max_latency_ms, network_hop_delay_ms)
        .expect("fork fixture is a valid application")
}

/// Returns a copy of `app` with every function's `load_factor` multiplied by `alpha`.
pub fn scale_load(app: &Application, alpha: f64) -> Application {
    let mut functions = app.functions.clone();
    for f in &mut functions {
        f.load_factor *= alpha;
    }
    Application::new(
        app.name.clone(),
        functions,
        app.critical_path_ids.clone(),
        app.max_memory_mb,
        app.max_latency_ms,
        app.network_hop_delay_ms,
    )
    .expect("scaling load_factor preserves every structural invariant")
}
