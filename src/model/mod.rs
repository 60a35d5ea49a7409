//! The application graph model: atomic [`Function`]s, [`CompositeGroup`] fusions of them,
//! and the owning [`Application`].
//!
//! Functions are stored in a flat arena (`Application.functions`) and addressed by
//! [`FunctionId`] rather than through owning pointers, so that the back-reference from a
//! child to its parent never participates in ownership.

mod application;
mod composite_group;
mod function;

pub use application::{Application, LiveMetric};
pub use composite_group::CompositeGroup;
pub use function::{Function, FunctionId};

/// Cost of egress data transfer, in USD per GiB.
pub const DATA_TRANSFER_COST_PER_GIB: f64 = 0.01;

/// Cost of one GB-second of execution, in USD.
pub const EXECUTION_COST_PER_GB_SECOND: f64 = 0.00001667;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// `(data_bytes / 2^30) * 0.01`, the contract's egress pricing model.
pub(crate) fn data_transfer_cost(data_bytes: u64) -> f64 {
    (data_bytes as f64 / BYTES_PER_GIB) * DATA_TRANSFER_COST_PER_GIB
}

/// `0.00001667 * (memory_mb / 1024) * (runtime_ms / 1000)`, billed GB-seconds.
pub(crate) fn execution_cost(memory_mb: u64, runtime_ms: u64) -> f64 {
    let gb_seconds = (memory_mb as f64 / 1024.0) * (runtime_ms as f64 / 1000.0);
    EXECUTION_COST_PER_GB_SECOND * gb_seconds
}
