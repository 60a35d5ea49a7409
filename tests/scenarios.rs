//! End-to-end scenarios, each exercising a specific trade-off between the algorithms.

mod support;

use std::collections::HashMap;

use fusion_optimizer::algorithms::{costless_csp, greedy_tree, min_w_cut, mtx_ilp, no_fusion, singleton};
use fusion_optimizer::model::{FunctionId, LiveMetric};

/// S1 — linear chain, tight latency: full fusion is the only way to meet the deadline.
#[test]
fn s1_linear_chain_tight_latency() {
    let app = support::chain(&[("a", 256, 100), ("b", 256, 100), ("c", 256, 100)], &[1.0, 1.0], 1024, 310, 20);

    let no_fusion = no_fusion::run(&app);
    assert!(!no_fusion.feasible);
    assert_eq!(no_fusion.latency, 340.0);
    let expected_no_fusion_cost =
        3.0 * function_execution_cost(256, 100) + 2.0 * data_transfer_cost_gib(1.0);
    assert!((no_fusion.cost - expected_no_fusion_cost).abs() < 1e-9);

    let singleton = singleton::run(&app);
    assert!(singleton.feasible);
    assert!((singleton.cost - function_execution_cost(768, 300)).abs() < 1e-9);

    let ilp = mtx_ilp::run(&app);
    assert!(ilp.feasible);
    assert!((ilp.cost - singleton.cost).abs() < 1e-9, "full fusion is optimal here");
}

/// S2 — fork with one heavy edge: the heaviest edge gets merged first / preferentially.
#[test]
fn s2_fork_with_heavy_edge() {
    let app = support::fork(
        ("a", 256, 100),
        &[("b", 256, 100, 10.0), ("c", 256, 100, 0.0)],
        &["a", "b"],
        1024,
        250,
        20,
    );

    let heuristic = min_w_cut::run(&app);
    assert!(heuristic.feasible);
    let a_group = heuristic.groups.iter().find(|g| g.contains(&FunctionId::new("a"))).unwrap();
    assert!(a_group.contains(&FunctionId::new("b")), "the heavy A-B edge should be fused first");

    let ilp = mtx_ilp::run(&app);
    assert!(ilp.feasible);
    assert!(ilp.cost <= heuristic.cost + 1e-9);
}

/// S3 — memory-bound chain: Singleton can't fit everything in one group.
#[test]
fn s3_memory_bound_chain() {
    let app = support::chain(&[("a", 512, 50), ("b", 512, 50), ("c", 512, 50)], &[0.1, 0.1], 1024, 10_000, 20);

    let singleton = singleton::run(&app);
    assert!(!singleton.feasible, "768*2=1536 > 1024 max_memory_mb");

    let csp = costless_csp::run(&app);
    assert!(csp.feasible);
    assert_eq!(csp.groups.len(), 2, "exactly one cut is required to fit under the memory cap");
}

/// S4 — CostlessCSP and MtxILP agree on the optimal cost even when MinWCut's greedy
/// weight order picks a different (feasible but not necessarily cheapest) structure.
#[test]
fn s4_csp_and_ilp_agree_on_optimum() {
    let app = support::chain(
        &[("a", 256, 50), ("b", 256, 50), ("c", 256, 50), ("d", 256, 50)],
        &[0.1, 5.0, 0.1],
        1024,
        230,
        20,
    );

    let greedy = min_w_cut::run(&app);
    let tree = greedy_tree::run(&app);
    let csp = costless_csp::run(&app);
    let ilp = mtx_ilp::run(&app);

    assert!(ilp.feasible);
    for candidate in [&greedy, &tree, &csp] {
        if candidate.feasible {
            assert!(ilp.cost <= candidate.cost + 1e-9, "{} beat MtxILP's claimed optimum", candidate.name);
        }
    }
    assert!((ilp.cost - csp.cost).abs() < 1e-9, "CostlessCSP must match MtxILP's optimal cost");
}

/// S5 — the critical path alone already exceeds the deadline, even fully fused.
#[test]
fn s5_infeasible_critical_path() {
    let app = support::chain(&[("a", 256, 200), ("b", 256, 200), ("c", 256, 200)], &[0.1, 0.1], 1024, 100, 20);

    assert!(!singleton::run(&app).feasible);
    assert!(!greedy_tree::run(&app).feasible);
    assert!(!mtx_ilp::run(&app).feasible);
}

/// S6 — enrichment lowers B's measured runtime enough to make the deadline.
#[test]
fn s6_enrichment_changes_outcome() {
    let app = support::chain(&[("a", 256, 100), ("b", 256, 100), ("c", 256, 100)], &[1.0, 1.0], 1024, 310, 20);
    assert!(!singleton::run(&app).feasible);

    let mut measurements = HashMap::new();
    measurements.insert(FunctionId::new("b"), LiveMetric { avg_runtime_ms: 50, avg_memory_mb: 256 });
    let enriched = app.enrich(&measurements);

    let singleton_after = singleton::run(&enriched);
    assert!(singleton_after.feasible, "250ms fused runtime now fits the 310ms deadline");
}

fn function_execution_cost(memory_mb: u64, runtime_ms: u64) -> f64 {
    0.00001667 * (memory_mb as f64 / 1024.0) * (runtime_ms as f64 / 1000.0)
}

fn data_transfer_cost_gib(gib: f64) -> f64 {
    gib * 0.01
}
