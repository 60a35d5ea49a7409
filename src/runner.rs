//! Runs every fusion algorithm against one [`crate::model::Application`] and ranks the
//! outcomes.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::algorithms::ALGORITHMS;
use crate::model::Application;
use crate::result::AlgorithmResult;

/// Invokes every algorithm in the fixed order declared by [`ALGORITHMS`], guarding each
/// call with [`catch_unwind`] so a panicking algorithm degrades to an infeasible result
/// instead of taking down the whole run. Results are then sorted by
/// `(¬feasible, cost ascending)`, infeasible entries sorting last by treating their cost
/// as `+inf`.
pub fn run_all(app: &Application) -> Vec<AlgorithmResult> {
    let mut results: Vec<AlgorithmResult> = ALGORITHMS
        .iter()
        .map(|algorithm| match catch_unwind(AssertUnwindSafe(|| algorithm(app))) {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(&panic);
                log::error!("algorithm panicked: {message}");
                AlgorithmResult::infeasible("unknown", 0.0, format!("panicked: {message}"))
            }
        })
        .collect();

    results.sort_by(|a, b| {
        (!a.feasible, a.cost)
            .partial_cmp(&(!b.feasible, b.cost))
            .expect("feasibility flags and costs are always comparable")
    });
    results
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Function, FunctionId};

    fn linear_chain() -> Application {
        let mut a = Function::new("a", 256, 100);
        let mut b = Function::new("b", 256, 100);
        let c = Function::new("c", 256, 100);
        a.add_child(FunctionId::new("b"), 1 << 20);
        b.parent = Some(FunctionId::new("a"));
        b.add_child(FunctionId::new("c"), 1 << 20);
        let mut c = c;
        c.parent = Some(FunctionId::new("b"));

        Application::new(
            "s1",
            vec![a, b, c],
            vec![FunctionId::new("a"), FunctionId::new("b"), FunctionId::new("c")],
            1024,
            10_000,
            20,
        )
        .unwrap()
    }

    #[test]
    fn runs_all_six_algorithms_and_sorts_feasible_first() {
        let app = linear_chain();
        let results = run_all(&app);
        assert_eq!(results.len(), 6);
        let first_infeasible = results.iter().position(|r| !r.feasible);
        if let Some(idx) = first_infeasible {
            assert!(results[idx..].iter().all(|r| !r.feasible));
        }
        for pair in results.windows(2) {
            if pair[0].feasible && pair[1].feasible {
                assert!(pair[0].cost <= pair[1].cost);
            }
        }
    }
}
