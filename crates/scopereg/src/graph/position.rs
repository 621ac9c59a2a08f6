//! Immutable scope handles

use std::fmt;
use std::sync::Arc;

use crate::capability::{CapabilityId, Module};
use crate::error::Result;
use crate::graph::{NodeId, ScopeGraph};

/// Immutable handle to a specific scope node
///
/// Captures the node at creation time as a structural snapshot
/// reference, not a live path query: if the node is later detached and
/// reattached elsewhere, the position still points at that same node and
/// resolution walks upward from wherever the node now sits. It
/// dereferences the live node, so modules bound into the scope after the
/// position was created are visible through it.
#[derive(Clone)]
pub struct ScopePosition {
    graph: ScopeGraph,
    node: NodeId,
}

impl ScopePosition {
    pub(crate) fn new(graph: ScopeGraph, node: NodeId) -> Self {
        Self { graph, node }
    }

    /// The node this position references
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The graph the node belongs to
    pub fn graph(&self) -> &ScopeGraph {
        &self.graph
    }

    /// Resolve a capability by walking upward from this position
    ///
    /// Equivalent to [`ScopeGraph::find_module`] starting at the
    /// referenced node. The capability need not be one provided by the
    /// module this position was created for: a consumer bound at scope A
    /// may resolve a capability registered at an ancestor for an
    /// unrelated module B — the walk's starting point stays the same,
    /// only the searched identity changes.
    pub fn resolve(&self, capability: CapabilityId) -> Result<Arc<dyn Module>> {
        self.graph.find_module(self.node, capability)
    }
}

impl fmt::Debug for ScopePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopePosition")
            .field("node", &self.node)
            .finish()
    }
}
