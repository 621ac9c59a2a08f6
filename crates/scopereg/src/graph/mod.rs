//! Scope tree and upward resolution
//!
//! The tree is an arena of nodes behind one lock; [`NodeId`] handles
//! stand in for references, so the parent back-edge is a plain optional
//! index rather than a weak pointer. Detach only unlinks edges and never
//! frees arena slots: a subtree detached from the root becomes
//! unreachable for walks starting above it, but outstanding handles and
//! [`ScopePosition`]s stay dereferenceable.
//!
//! ## Resolution
//!
//! ```text
//! find_module(start, capability):
//!     current = start
//!     loop:
//!         if current holds a provider  → return it   (first match wins)
//!         if current has a parent      → current = parent
//!         else                         → ModuleNotFound
//! ```
//!
//! The current node is checked before advancing, so the root's own
//! module set is always the last consulted. Upward-only visibility: a
//! scope sees its own and its ancestors' bindings, never siblings' or
//! descendants'; a closer binding shadows an ancestor's for the same
//! capability.

mod position;

pub use position::ScopePosition;

use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, trace, warn};

use crate::capability::{CapabilityId, Module};
use crate::error::{Error, Result};
use crate::sync::{read_lock, write_lock};

/// Opaque handle to a scope node
///
/// Handles are only meaningful for the [`ScopeGraph`] that created them;
/// passing one to another graph is a programming error and may panic on
/// slot lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena record for one scope node
#[derive(Default)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    modules: Vec<Arc<dyn Module>>,
}

#[derive(Default)]
struct GraphInner {
    nodes: Vec<NodeData>,
}

impl GraphInner {
    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    /// Whether `candidate` is `node` itself or one of its ancestors
    fn is_self_or_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Remove `node` from its parent's children and clear the back-edge
    fn unlink_from_parent(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).parent {
            self.node_mut(parent).children.retain(|&child| child != node);
            self.node_mut(node).parent = None;
        }
    }

    /// Insert an instance, displacing any prior provider of a shared capability
    ///
    /// Uniqueness-per-scope: a node never holds two instances mapping to
    /// the same capability. Last bind wins, silently.
    fn insert_module(&mut self, node: NodeId, instance: Arc<dyn Module>) {
        let slot = self.node_mut(node);
        let before = slot.modules.len();
        slot.modules
            .retain(|held| !held.provides().iter().any(|&cap| instance.satisfies(cap)));
        if slot.modules.len() < before {
            warn!("rebinding displaced a prior module at scope {}", node);
        }
        slot.modules.push(instance);
    }
}

/// The scope tree
///
/// Cheaply cloneable; clones share the same arena. Structural mutations
/// run under the write lock as a single critical section, so no observer
/// ever sees a node with two parents, even transiently. Resolution holds
/// the read lock for the whole walk and therefore observes a consistent
/// parent chain; a detach racing with a walk can yield a stale success
/// or a miss, never a crash.
#[derive(Clone, Default)]
pub struct ScopeGraph {
    inner: Arc<RwLock<GraphInner>>,
}

impl ScopeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new detached node (a root until attached)
    pub fn new_node(&self) -> NodeId {
        let mut graph = write_lock(&self.inner);
        let id = NodeId(graph.nodes.len());
        graph.nodes.push(NodeData::default());
        debug!("created scope node {}", id);
        id
    }

    // ========================================================================
    // Tree operations
    // ========================================================================

    /// Attach `child` under `parent`, moving it from any prior parent
    ///
    /// Atomic move: the old parent loses the edge and the new parent
    /// gains it inside one critical section, so the child is never a
    /// child of two parents. Attaching an already-present child is a
    /// no-op; so is an attach that would make a node its own ancestor
    /// (cycles are prevented by construction, not reported).
    pub fn attach_child(&self, parent: NodeId, child: NodeId) {
        let mut graph = write_lock(&self.inner);

        if graph.is_self_or_ancestor(child, parent) {
            warn!(
                "refusing attach of {} under {}: would create a cycle",
                child, parent
            );
            return;
        }
        if graph.node(child).parent == Some(parent) {
            return;
        }

        graph.unlink_from_parent(child);
        graph.node_mut(parent).children.push(child);
        graph.node_mut(child).parent = Some(parent);
        debug!("attached scope {} under {}", child, parent);
    }

    /// Detach a node from its parent, if it has one
    ///
    /// Idempotent: detaching a root is a no-op.
    pub fn detach_from_parent(&self, node: NodeId) {
        let mut graph = write_lock(&self.inner);
        if graph.node(node).parent.is_some() {
            graph.unlink_from_parent(node);
            debug!("detached scope {} from its parent", node);
        }
    }

    /// Remove `child` from `parent`'s children, if present
    ///
    /// On success the child's parent back-edge is cleared; on absence
    /// this is a no-op, not an error.
    pub fn detach_child(&self, parent: NodeId, child: NodeId) {
        let mut graph = write_lock(&self.inner);
        if graph.node(child).parent == Some(parent) {
            graph.unlink_from_parent(child);
            debug!("detached scope {} from {}", child, parent);
        }
    }

    /// The node's parent, or `None` for a root
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        read_lock(&self.inner).node(node).parent
    }

    /// The node's children, in attach order
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        read_lock(&self.inner).node(node).children.clone()
    }

    /// The parent's children excluding `node`; empty for a root
    pub fn siblings(&self, node: NodeId) -> Vec<NodeId> {
        let graph = read_lock(&self.inner);
        match graph.node(node).parent {
            Some(parent) => graph
                .node(parent)
                .children
                .iter()
                .copied()
                .filter(|&sibling| sibling != node)
                .collect(),
            None => Vec::new(),
        }
    }

    // ========================================================================
    // Module binding
    // ========================================================================

    /// Handle for later scoped lookups starting at `node`
    pub fn position(&self, node: NodeId) -> ScopePosition {
        ScopePosition::new(self.clone(), node)
    }

    /// Bind an instance into a fresh root scope
    pub fn bind(&self, instance: Arc<dyn Module>) -> ScopePosition {
        let mut graph = write_lock(&self.inner);
        let node = NodeId(graph.nodes.len());
        graph.nodes.push(NodeData::default());
        graph.insert_module(node, instance);
        debug!("bound module at new root scope {}", node);
        ScopePosition::new(self.clone(), node)
    }

    /// Bind an instance into a fresh child scope under `parent`
    pub fn bind_under(&self, parent: &ScopePosition, instance: Arc<dyn Module>) -> ScopePosition {
        let mut graph = write_lock(&self.inner);
        let node = NodeId(graph.nodes.len());
        graph.nodes.push(NodeData::default());
        graph.insert_module(node, instance);
        graph.node_mut(parent.node()).children.push(node);
        graph.node_mut(node).parent = Some(parent.node());
        debug!("bound module at scope {} under {}", node, parent.node());
        ScopePosition::new(self.clone(), node)
    }

    /// Bind an instance into the existing scope at `position`
    ///
    /// Displaces any instance in that scope sharing a declared
    /// capability (last bind wins). Modules added here are visible
    /// through positions created earlier for the same node.
    pub fn bind_at(&self, position: &ScopePosition, instance: Arc<dyn Module>) {
        let mut graph = write_lock(&self.inner);
        graph.insert_module(position.node(), instance);
        debug!("bound module at existing scope {}", position.node());
    }

    /// Remove the instance providing `capability` from the scope at `position`
    ///
    /// No-op when no such instance is held there.
    pub fn unbind(&self, position: &ScopePosition, capability: CapabilityId) {
        let mut graph = write_lock(&self.inner);
        let slot = graph.node_mut(position.node());
        let before = slot.modules.len();
        slot.modules.retain(|held| !held.satisfies(capability));
        if slot.modules.len() < before {
            debug!(
                "unbound module for capability '{}' at scope {}",
                capability,
                position.node()
            );
        }
    }

    /// Number of instances held directly by the scope
    pub fn module_count(&self, node: NodeId) -> usize {
        read_lock(&self.inner).node(node).modules.len()
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve a capability by walking upward from `start`
    ///
    /// Scans the starting node's own modules first (first match wins),
    /// then each ancestor in turn; the root's set is the last consulted.
    /// Fails with [`Error::ModuleNotFound`] naming the capability and
    /// the starting scope when the walk exhausts the chain.
    pub fn find_module(&self, start: NodeId, capability: CapabilityId) -> Result<Arc<dyn Module>> {
        let graph = read_lock(&self.inner);
        let mut current = start;

        loop {
            if let Some(instance) = graph
                .node(current)
                .modules
                .iter()
                .find(|held| held.satisfies(capability))
            {
                trace!(
                    "resolved capability '{}' at scope {} (walk started at {})",
                    capability, current, start
                );
                return Ok(instance.clone());
            }

            match graph.node(current).parent {
                Some(parent) => current = parent,
                None => return Err(Error::ModuleNotFound { capability, scope: start }),
            }
        }
    }
}

impl fmt::Debug for ScopeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = read_lock(&self.inner);
        f.debug_struct("ScopeGraph")
            .field("nodes", &graph.nodes.len())
            .finish()
    }
}
