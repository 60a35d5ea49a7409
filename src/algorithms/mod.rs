//! The six fusion algorithms, each a pure `&Application -> AlgorithmResult` function.
//!
//! None of these ever returns `Err`: infeasibility, solver failure, and any other
//! algorithm-level condition is captured as data on the returned [`crate::result::AlgorithmResult`].

pub mod costless_csp;
pub mod greedy_tree;
pub mod min_w_cut;
pub mod mtx_ilp;
pub mod no_fusion;
pub mod singleton;

/// The fixed invocation order the [`crate::runner`] runs algorithms in.
pub const ALGORITHMS: &[fn(&crate::model::Application) -> crate::result::AlgorithmResult] = &[
    no_fusion::run,
    singleton::run,
    min_w_cut::run,
    greedy_tree::run,
    costless_csp::run,
    mtx_ilp::run,
];
