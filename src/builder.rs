//! Constructs an [`Application`] from a parsed [`AppConfig`].

use std::collections::{BTreeSet, HashMap};

use crate::config::{AppConfig, LiveMetricsInput};
use crate::error::{Error, Result};
use crate::model::{Application, Function, FunctionId, LiveMetric};

/// Two-pass construction: first every function is created with its own
/// `memory_mb`/`timeout_seconds` or the provider defaults, then the topology map wires
/// parent/child edges.
///
/// Function ids are gathered from every place they can appear (`functions`, topology
/// parents, every topology child, `critical_path`) and processed in sorted order —
/// `HashMap` iteration order is not fixed across runs, and the determinism the fusion
/// algorithms promise (stable tie-breaking on edge order) depends on `Builder` handing
/// `Application` a fixed function order regardless of how the input map happened to
/// iterate.
pub fn build(name: impl Into<String>, config: &AppConfig) -> Result<Application> {
    let mut ids: BTreeSet<String> = BTreeSet::new();
    ids.extend(config.functions.keys().cloned());
    for (parent_id, entry) in &config.topology {
        ids.insert(parent_id.clone());
        ids.extend(entry.children.keys().cloned());
    }
    ids.extend(config.critical_path.iter().cloned());

    if ids.is_empty() {
        return Err(Error::InvalidConfiguration("configuration defines no functions".to_string()));
    }

    let mut functions: HashMap<FunctionId, Function> = HashMap::with_capacity(ids.len());
    for id in &ids {
        let own = config.functions.get(id);
        let memory_mb = own
            .and_then(|f| f.memory_mb)
            .unwrap_or(config.provider_defaults.memory_mb);
        let timeout_seconds = own
            .and_then(|f| f.timeout_seconds)
            .unwrap_or(config.provider_defaults.timeout_seconds);
        functions.insert(
            FunctionId::new(id.clone()),
            Function::new(id.clone(), memory_mb, timeout_seconds * 1000),
        );
    }

    for (parent_id, entry) in &config.topology {
        let parent_fid = FunctionId::new(parent_id.clone());
        for (child_id, data_bytes) in &entry.children {
            let child_fid = FunctionId::new(child_id.clone());
            functions
                .get_mut(&parent_fid)
                .ok_or_else(|| Error::InvalidConfiguration(format!("topology references unknown parent '{parent_id}'")))?
                .add_child(child_fid, *data_bytes);
        }
    }
    for (parent_id, entry) in &config.topology {
        let parent_fid = FunctionId::new(parent_id.clone());
        for child_id in entry.children.keys() {
            let child_fid = FunctionId::new(child_id.clone());
            functions
                .get_mut(&child_fid)
                .ok_or_else(|| Error::InvalidConfiguration(format!("topology references unknown child '{child_id}'")))?
                .parent = Some(parent_fid.clone());
        }
    }

    let ordered_functions: Vec<Function> = ids
        .iter()
        .map(|id| functions.remove(&FunctionId::new(id.clone())).expect("every collected id was built above"))
        .collect();

    let critical_path_ids: Vec<FunctionId> =
        config.critical_path.iter().map(|id| FunctionId::new(id.clone())).collect();

    Application::new(
        name,
        ordered_functions,
        critical_path_ids,
        config.constraints.max_memory_mb,
        config.constraints.max_latency_ms,
        config.constraints.network_hop_delay_ms,
    )
}

/// Translates the wire-format live-metrics map and delegates to [`Application::enrich`].
pub fn enrich(app: &Application, measurements: &LiveMetricsInput) -> Application {
    let converted: HashMap<FunctionId, LiveMetric> = measurements
        .iter()
        .map(|(id, m)| {
            (
                FunctionId::new(id.clone()),
                LiveMetric { avg_runtime_ms: m.avg_runtime_ms, avg_memory_mb: m.avg_memory_mb },
            )
        })
        .collect();
    app.enrich(&converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConstraintsSpec, FunctionSpec, LiveMetricEntry, ProviderDefaults, TopologyEntry};

    fn sample_config() -> AppConfig {
        let mut functions = HashMap::new();
        functions.insert("a".to_string(), FunctionSpec { memory_mb: Some(512), timeout_seconds: None });

        let mut children_a = HashMap::new();
        children_a.insert("b".to_string(), 1024u64);
        let mut topology = HashMap::new();
        topology.insert("a".to_string(), TopologyEntry { children: children_a });

        AppConfig {
            functions,
            provider_defaults: ProviderDefaults::default(),
            topology,
            critical_path: vec!["a".to_string(), "b".to_string()],
            constraints: ConstraintsSpec::default(),
        }
    }

    #[test]
    fn builds_application_with_own_and_default_values() {
        let config = sample_config();
        let app = build("demo", &config).unwrap();

        let a = app.function(&FunctionId::new("a")).unwrap();
        assert_eq!(a.memory_mb, 512);
        assert_eq!(a.baseline_runtime_ms, 100_000);

        let b = app.function(&FunctionId::new("b")).unwrap();
        assert_eq!(b.memory_mb, 256);
        assert_eq!(b.parent, Some(FunctionId::new("a")));

        assert_eq!(app.root_function().id, FunctionId::new("a"));
    }

    #[test]
    fn converts_timeout_seconds_to_milliseconds() {
        let mut config = sample_config();
        config.functions.get_mut("a").unwrap().timeout_seconds = Some(5);
        let app = build("demo", &config).unwrap();
        assert_eq!(app.function(&FunctionId::new("a")).unwrap().baseline_runtime_ms, 5000);
    }

    #[test]
    fn enrich_replaces_runtime_and_memory_for_known_ids() {
        let config = sample_config();
        let app = build("demo", &config).unwrap();

        let mut measurements = LiveMetricsInput::new();
        measurements.insert("a".to_string(), LiveMetricEntry { avg_runtime_ms: 42, avg_memory_mb: 777 });

        let enriched = enrich(&app, &measurements);
        let a = enriched.function(&FunctionId::new("a")).unwrap();
        assert_eq!(a.baseline_runtime_ms, 42);
        assert_eq!(a.memory_mb, 777);
    }

    #[test]
    fn rejects_empty_configuration() {
        let config = AppConfig {
            functions: HashMap::new(),
            provider_defaults: ProviderDefaults::default(),
            topology: HashMap::new(),
            critical_path: Vec::new(),
            constraints: ConstraintsSpec::default(),
        };
        assert!(build("empty", &config).is_err());
    }
}
