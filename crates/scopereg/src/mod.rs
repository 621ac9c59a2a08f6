//! Hierarchical service registry
//!
//! Modules (implementation instances) are registered under scopes arranged
//! in a tree and resolved by [`CapabilityId`] from any scope by walking
//! upward through ancestor scopes. A binding closer to the lookup's
//! starting scope shadows an ancestor's binding for the same capability;
//! sibling and descendant bindings are never visible.
//!
//! ## Architecture
//!
//! ```text
//! Registry (flat)          ScopeGraph (tree)
//!     │                        │
//!     │  get(capability)       │  find_module(node, capability)
//!     │                        │  (upward walk, first match wins)
//!     └──────────┬─────────────┘
//!                ▼
//!         LazyBinding<R>
//!         (deferred read: resolve + project on access)
//! ```
//!
//! Two independent resolution paths exist:
//!
//! - [`Registry`]: a flat capability-to-instance table for callers that
//!   do not need hierarchy. Bindings here are invisible to the tree.
//! - [`ScopeGraph`]: the scope tree. Binding a module yields a
//!   [`ScopePosition`], an immutable handle used as the starting point
//!   for later upward resolution.
//!
//! [`LazyBinding`] defers both to first read: constructing one performs
//! no resolution, and every read re-resolves (no caching across reads).

pub mod capability;
pub mod error;
pub mod graph;
pub mod lazy;
pub mod registry;

mod sync;

pub use capability::{CapabilityId, Module};
pub use error::{Error, Result};
pub use graph::{NodeId, ScopeGraph, ScopePosition};
pub use lazy::LazyBinding;
pub use registry::Registry;
