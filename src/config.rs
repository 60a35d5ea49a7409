//! Serde mirror of the external application manifest, consumed by
//! [`crate::builder::build`]. This is a plain data shape — no validation happens here;
//! `Builder`/`Application::new` are where malformed input becomes an [`crate::error::Error`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

fn default_memory_mb() -> u64 {
    256
}

fn default_timeout_seconds() -> u64 {
    100
}

fn default_max_memory_mb() -> u64 {
    1024
}

fn default_max_latency_ms() -> u64 {
    30_000
}

fn default_network_hop_delay_ms() -> u64 {
    10
}

/// Per-function overrides; any omitted field falls back to [`ProviderDefaults`].
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FunctionSpec {
    pub memory_mb: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

/// Applied to any function that omits the corresponding field.
///
/// Defaults: `memory_mb = 256`, `timeout_seconds = 100`. `timeout_seconds` is always
/// converted to `baseline_runtime_ms` via `* 1000`, whether it came from a function's
/// own entry or from here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderDefaults {
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ProviderDefaults {
    fn default() -> Self {
        ProviderDefaults {
            memory_mb: default_memory_mb(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// One parent's outgoing edges: child id -> bytes transferred.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TopologyEntry {
    pub children: HashMap<String, u64>,
}

/// `{max_memory_mb, max_latency_ms, network_hop_delay_ms}`, each with the stated default.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConstraintsSpec {
    #[serde(default = "default_max_memory_mb")]
    pub max_memory_mb: u64,
    #[serde(default = "default_max_latency_ms")]
    pub max_latency_ms: u64,
    #[serde(default = "default_network_hop_delay_ms")]
    pub network_hop_delay_ms: u64,
}

impl Default for ConstraintsSpec {
    fn default() -> Self {
        ConstraintsSpec {
            max_memory_mb: default_max_memory_mb(),
            max_latency_ms: default_max_latency_ms(),
            network_hop_delay_ms: default_network_hop_delay_ms(),
        }
    }
}

/// The full input manifest `Builder::build` consumes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub functions: HashMap<String, FunctionSpec>,
    #[serde(default)]
    pub provider_defaults: ProviderDefaults,
    #[serde(default)]
    pub topology: HashMap<String, TopologyEntry>,
    #[serde(default)]
    pub critical_path: Vec<String>,
    #[serde(default)]
    pub constraints: ConstraintsSpec,
}

/// One entry of the live-metrics input consumed by [`crate::builder::enrich`].
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LiveMetricEntry {
    pub avg_runtime_ms: u64,
    pub avg_memory_mb: u64,
}

pub type LiveMetricsInput = HashMap<String, LiveMetricEntry>;
