//! Deferred-read binding accessors
//!
//! A [`LazyBinding`] captures where to look (a scope position or a flat
//! registry), what to look for (a capability), and what to extract from
//! the resolved instance (a projection). Constructing one performs no
//! resolution; the lookup happens on `read()`.
//!
//! Re-read semantics: every read re-resolves and re-applies the
//! projection. No result is cached across reads, so a rebind between two
//! reads is observed by the second one. Only single-resolution-per-read
//! is guaranteed, never single-resolution-for-the-handle's-lifetime.

use std::fmt;
use std::sync::Arc;

use crate::capability::{CapabilityId, Module};
use crate::error::{Error, Result};
use crate::graph::ScopePosition;
use crate::registry::Registry;

/// Where a lazy binding resolves from
enum Source {
    /// Upward walk starting at a captured scope position
    Scoped(ScopePosition),
    /// Flat registry lookup
    Flat(Registry),
}

type Projection<R> = Box<dyn Fn(&dyn Module) -> Option<R> + Send + Sync>;

/// Deferred read handle over a resolved module value
///
/// The projection returns `None` when the resolved instance cannot be
/// viewed as the expected concrete type; `read()` surfaces that as
/// [`Error::ModuleTypeMismatch`].
///
/// The captured capability may differ from the one the position was
/// created for, which lets a consumer bound at one scope read a
/// capability an ancestor registered for an unrelated module.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use scopereg::{CapabilityId, LazyBinding, Module, ScopeGraph};
///
/// const CONFIG: CapabilityId = CapabilityId::new("config");
///
/// struct Config { retries: u32 }
///
/// impl Module for Config {
///     fn provides(&self) -> &[CapabilityId] { &[CONFIG] }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let graph = ScopeGraph::new();
/// let root = graph.bind(Arc::new(Config { retries: 3 }));
///
/// let retries = LazyBinding::scoped_for(root, CONFIG, |config: &Config| config.retries);
/// assert_eq!(retries.read()?, 3);
/// # Ok::<(), scopereg::Error>(())
/// ```
pub struct LazyBinding<R> {
    source: Source,
    capability: CapabilityId,
    project: Projection<R>,
}

impl<R> LazyBinding<R> {
    /// Accessor resolving through an upward walk from `position`
    pub fn scoped<F>(position: ScopePosition, capability: CapabilityId, project: F) -> Self
    where
        F: Fn(&dyn Module) -> Option<R> + Send + Sync + 'static,
    {
        Self {
            source: Source::Scoped(position),
            capability,
            project: Box::new(project),
        }
    }

    /// Accessor resolving through a flat registry lookup
    pub fn flat<F>(registry: Registry, capability: CapabilityId, project: F) -> Self
    where
        F: Fn(&dyn Module) -> Option<R> + Send + Sync + 'static,
    {
        Self {
            source: Source::Flat(registry),
            capability,
            project: Box::new(project),
        }
    }

    /// Scoped accessor with a projection over the concrete module type
    ///
    /// The downcast to `M` happens at read time; a bound instance of a
    /// different concrete type surfaces as a type mismatch.
    pub fn scoped_for<M, F>(position: ScopePosition, capability: CapabilityId, project: F) -> Self
    where
        M: Module,
        F: Fn(&M) -> R + Send + Sync + 'static,
    {
        Self::scoped(position, capability, move |instance: &dyn Module| {
            instance.downcast_ref::<M>().map(&project)
        })
    }

    /// Flat accessor with a projection over the concrete module type
    pub fn flat_for<M, F>(registry: Registry, capability: CapabilityId, project: F) -> Self
    where
        M: Module,
        F: Fn(&M) -> R + Send + Sync + 'static,
    {
        Self::flat(registry, capability, move |instance: &dyn Module| {
            instance.downcast_ref::<M>().map(&project)
        })
    }

    /// The capability this accessor resolves
    pub fn capability(&self) -> CapabilityId {
        self.capability
    }

    fn resolve(&self) -> Result<Arc<dyn Module>> {
        match &self.source {
            Source::Scoped(position) => position.resolve(self.capability),
            Source::Flat(registry) => registry.get(self.capability),
        }
    }

    /// Resolve the capability and apply the projection
    ///
    /// Resolution failures propagate; a projection that cannot view the
    /// instance as the expected type fails with
    /// [`Error::ModuleTypeMismatch`].
    pub fn read(&self) -> Result<R> {
        let instance = self.resolve()?;
        (self.project)(instance.as_ref()).ok_or(Error::ModuleTypeMismatch {
            capability: self.capability,
        })
    }

    /// Resolve and project, yielding `None` on any failure
    ///
    /// Swallows not-found and type-mismatch alike; the two are
    /// deliberately not distinguished here. Callers that need to tell
    /// them apart use [`read`](Self::read) and match on the error.
    pub fn read_or_default(&self) -> Option<R> {
        self.read().ok()
    }
}

impl<R> fmt::Debug for LazyBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Source::Scoped(position) => format!("scoped at {}", position.node()),
            Source::Flat(_) => "flat".to_string(),
        };
        f.debug_struct("LazyBinding")
            .field("capability", &self.capability)
            .field("source", &source)
            .finish()
    }
}
