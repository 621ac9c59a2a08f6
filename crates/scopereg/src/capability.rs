//! Capability identity and the module contract
//!
//! A [`CapabilityId`] is the token resolution searches for; a [`Module`]
//! is an instance declaring which capabilities it satisfies. The
//! declaration is checked at registration time, so resolution never
//! needs reflective casting: an instance found by the walk is known to
//! provide the requested capability.

use std::any::Any;
use std::fmt;

/// Opaque, comparable token identifying a capability contract
///
/// Two identities are equal iff they denote the same contract. The
/// wrapped name is the contract's identity, so capabilities are declared
/// once as constants and shared between registration and lookup sites:
///
/// ```
/// use scopereg::CapabilityId;
///
/// const CONFIG: CapabilityId = CapabilityId::new("config");
/// assert_eq!(CONFIG, CapabilityId::new("config"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityId(&'static str);

impl CapabilityId {
    /// Create an identity from a contract name
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The contract name this identity wraps
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A registered implementation instance
///
/// Modules are registered by shared reference (`Arc<dyn Module>`) and
/// never copied; the caller keeps ownership of the instance's own
/// lifecycle. `provides()` declares the capabilities the instance
/// satisfies; registration checks the declaration so an unsound binding
/// is rejected up front rather than discovered at resolution time.
pub trait Module: Any + Send + Sync {
    /// Capabilities this instance satisfies
    fn provides(&self) -> &[CapabilityId];

    /// Upcast for caller-side downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("provides", &self.provides())
            .finish()
    }
}

impl dyn Module {
    /// Whether this instance declares the given capability
    pub fn satisfies(&self, capability: CapabilityId) -> bool {
        self.provides().contains(&capability)
    }

    /// Downcast to a concrete module type
    pub fn downcast_ref<M: Module>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }
}
