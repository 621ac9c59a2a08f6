//! Error handling types

use thiserror::Error;

use crate::capability::CapabilityId;
use crate::graph::NodeId;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scope registry
///
/// Resolution failures propagate synchronously from the operation that
/// triggered resolution. Swallowing is opt-in per call site via
/// [`LazyBinding::read_or_default`](crate::lazy::LazyBinding::read_or_default),
/// never global.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No module providing the capability is reachable from the starting scope
    ///
    /// The upward walk checked the starting node and every ancestor up to
    /// and including the root without finding a provider.
    #[error("no module providing capability '{capability}' reachable from scope {scope}")]
    ModuleNotFound {
        /// The capability that was searched for
        capability: CapabilityId,
        /// The scope the walk started from
        scope: NodeId,
    },

    /// The flat registry holds no binding for the capability
    #[error("no module attached for capability '{capability}'")]
    ModuleNotInitialized {
        /// The capability that was requested
        capability: CapabilityId,
    },

    /// A binding exists but the instance does not satisfy the capability contract
    ///
    /// Indicates a registration bug: the stored instance does not declare
    /// the requested capability, or an accessor's projection could not
    /// view the instance as the expected concrete type.
    #[error("module bound for capability '{capability}' does not provide it")]
    ModuleTypeMismatch {
        /// The capability the instance fails to satisfy
        capability: CapabilityId,
    },
}
