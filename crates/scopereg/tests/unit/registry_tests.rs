//! Tests for the flat registry path

use std::sync::Arc;

use scopereg::{Error, Registry, ScopeGraph};

use crate::support::{CONFIG, ConfigModule, LOGGER, LoggerModule, METRICS, TelemetryModule};

#[test]
fn test_attach_then_get_returns_instance() {
    let registry = Registry::new();
    registry
        .attach(CONFIG, Arc::new(ConfigModule { endpoint: "local" }))
        .expect("instance declares the capability");

    let module = registry.get(CONFIG).expect("binding exists");
    let config = module
        .downcast_ref::<ConfigModule>()
        .expect("concrete type is ConfigModule");
    assert_eq!(config.endpoint, "local");
}

#[test]
fn test_get_without_binding_fails_not_initialized() {
    let registry = Registry::new();

    assert_eq!(
        registry.get(CONFIG).unwrap_err(),
        Error::ModuleNotInitialized { capability: CONFIG }
    );
}

#[test]
fn test_attach_overwrite_last_writer_wins() {
    let registry = Registry::new();
    registry
        .attach(CONFIG, Arc::new(ConfigModule { endpoint: "first" }))
        .unwrap();
    registry
        .attach(CONFIG, Arc::new(ConfigModule { endpoint: "second" }))
        .unwrap();

    assert_eq!(registry.len(), 1, "overwrite must not grow the table");
    let module = registry.get(CONFIG).unwrap();
    assert_eq!(
        module.downcast_ref::<ConfigModule>().unwrap().endpoint,
        "second"
    );
}

#[test]
fn test_attach_rejects_undeclared_capability() {
    let registry = Registry::new();

    // LoggerModule does not declare CONFIG.
    let result = registry.attach(CONFIG, Arc::new(LoggerModule { level: "info" }));

    assert_eq!(result, Err(Error::ModuleTypeMismatch { capability: CONFIG }));
    assert!(registry.is_empty(), "rejected binding must not be stored");
}

#[test]
fn test_detach_removes_and_tolerates_absence() {
    let registry = Registry::new();
    registry
        .attach(LOGGER, Arc::new(LoggerModule { level: "info" }))
        .unwrap();

    registry.detach(LOGGER);
    assert!(!registry.contains(LOGGER));

    // Detaching again, or a capability never attached, is a no-op.
    registry.detach(LOGGER);
    registry.detach(CONFIG);
}

#[test]
fn test_multi_capability_instance_attaches_under_each_identity() {
    let registry = Registry::new();
    let telemetry = Arc::new(TelemetryModule { sink: "collector" });

    registry.attach(LOGGER, telemetry.clone()).unwrap();
    registry.attach(METRICS, telemetry).unwrap();

    assert!(registry.get(LOGGER).is_ok());
    assert!(registry.get(METRICS).is_ok());

    // Detaching one identity leaves the other intact.
    registry.detach(LOGGER);
    assert!(registry.get(LOGGER).is_err());
    assert!(registry.get(METRICS).is_ok());
}

#[test]
fn test_registries_are_isolated_instances() {
    let first = Registry::new();
    let second = Registry::new();

    first
        .attach(CONFIG, Arc::new(ConfigModule { endpoint: "local" }))
        .unwrap();

    assert!(first.contains(CONFIG));
    assert!(
        !second.contains(CONFIG),
        "no ambient global state between registries"
    );
}

#[test]
fn test_clones_share_the_same_table() {
    let registry = Registry::new();
    let alias = registry.clone();

    registry
        .attach(CONFIG, Arc::new(ConfigModule { endpoint: "local" }))
        .unwrap();

    assert!(alias.contains(CONFIG), "clones are handles to one table");
}

#[test]
fn test_clear_for_teardown() {
    let registry = Registry::new();
    registry
        .attach(CONFIG, Arc::new(ConfigModule { endpoint: "local" }))
        .unwrap();
    registry
        .attach(LOGGER, Arc::new(LoggerModule { level: "info" }))
        .unwrap();
    assert_eq!(registry.len(), 2);

    registry.clear();

    assert!(registry.is_empty());
    assert!(registry.get(CONFIG).is_err());
}

#[test]
fn test_flat_and_scoped_paths_do_not_interoperate() {
    let registry = Registry::new();
    let graph = ScopeGraph::new();

    registry
        .attach(CONFIG, Arc::new(ConfigModule { endpoint: "local" }))
        .unwrap();
    let scope = graph.bind(Arc::new(LoggerModule { level: "info" }));

    assert!(
        scope.resolve(CONFIG).is_err(),
        "a Registry binding is invisible to scope-based resolution"
    );
    assert!(
        registry.get(LOGGER).is_err(),
        "a scoped binding is invisible to the flat registry"
    );
}
