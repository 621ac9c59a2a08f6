//! Flat module registry
//!
//! The non-hierarchical resolution path: a capability-to-instance table
//! for callers that do not need scoping. This path is independent of the
//! scope tree — a module attached here is invisible to scope-based
//! resolution and vice versa.
//!
//! The registry is an explicit, constructible object rather than ambient
//! global state, so tests run against isolated instances and a process
//! can clear it at shutdown.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::capability::{CapabilityId, Module};
use crate::error::{Error, Result};
use crate::sync::{read_lock, write_lock};

/// Flat capability-to-instance table
///
/// Cheaply cloneable; clones share the same underlying table. Insert,
/// remove, and lookup each run under one lock acquisition, so
/// attach/detach racing with get is safe.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use scopereg::{CapabilityId, Module, Registry};
///
/// const CONFIG: CapabilityId = CapabilityId::new("config");
///
/// struct Config { debug: bool }
///
/// impl Module for Config {
///     fn provides(&self) -> &[CapabilityId] { &[CONFIG] }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let registry = Registry::new();
/// registry.attach(CONFIG, Arc::new(Config { debug: true }))?;
///
/// let module = registry.get(CONFIG)?;
/// let config = module.downcast_ref::<Config>().unwrap();
/// assert!(config.debug);
/// # Ok::<(), scopereg::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    modules: Arc<RwLock<HashMap<CapabilityId, Arc<dyn Module>>>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the binding for a capability
    ///
    /// Fails with [`Error::ModuleTypeMismatch`] if the instance does not
    /// declare the capability. Overwriting an existing binding is a
    /// silent replace: the last writer wins and no error is raised.
    pub fn attach(&self, capability: CapabilityId, instance: Arc<dyn Module>) -> Result<()> {
        if !instance.satisfies(capability) {
            return Err(Error::ModuleTypeMismatch { capability });
        }

        let mut modules = write_lock(&self.modules);
        if modules.insert(capability, instance).is_some() {
            warn!("replacing existing binding for capability '{}'", capability);
        } else {
            debug!("attached module for capability '{}'", capability);
        }

        Ok(())
    }

    /// Remove the binding for a capability, if present
    ///
    /// No-op when the capability was never attached.
    pub fn detach(&self, capability: CapabilityId) {
        let mut modules = write_lock(&self.modules);
        if modules.remove(&capability).is_some() {
            debug!("detached module for capability '{}'", capability);
        }
    }

    /// Look up the instance bound for a capability
    ///
    /// Fails with [`Error::ModuleNotInitialized`] when no binding exists
    /// and [`Error::ModuleTypeMismatch`] when a binding exists but the
    /// stored instance does not declare the capability (defensive
    /// re-check against unsound registration).
    pub fn get(&self, capability: CapabilityId) -> Result<Arc<dyn Module>> {
        let modules = read_lock(&self.modules);
        let instance = modules
            .get(&capability)
            .cloned()
            .ok_or(Error::ModuleNotInitialized { capability })?;

        if !instance.satisfies(capability) {
            return Err(Error::ModuleTypeMismatch { capability });
        }

        Ok(instance)
    }

    /// Whether a binding exists for the capability
    pub fn contains(&self, capability: CapabilityId) -> bool {
        read_lock(&self.modules).contains_key(&capability)
    }

    /// Number of bindings currently held
    pub fn len(&self) -> usize {
        read_lock(&self.modules).len()
    }

    /// Whether the registry holds no bindings
    pub fn is_empty(&self) -> bool {
        read_lock(&self.modules).is_empty()
    }

    /// Remove all bindings
    ///
    /// Intended for process shutdown and test teardown.
    pub fn clear(&self) {
        write_lock(&self.modules).clear();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("bindings", &self.len())
            .finish()
    }
}
