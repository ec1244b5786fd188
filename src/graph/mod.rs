//! Scene graph
//!
//! Nodes are owned by a [`SceneGraph`] and addressed through [`NodeId`]
//! handles. Every link between nodes (parent, root, siblings, first child) is
//! a non-owning handle; ownership is tracked with an explicit reference count
//! that attaching retains and detaching releases.
//!
//! # Caching
//!
//! Derived values (local matrix rotation/scale block, world matrix, inverse
//! world matrix, world rotation, cascade color) are recomputed lazily on read.
//! Writes mark the edited node stale and eagerly push the inherited part of
//! that staleness into every descendant. See [`DirtyFlags`] and [`Edit`].
//!
//! ```ignore
//! let mut graph = SceneGraph::new();
//! let root = graph.create_named("root");
//! let child = graph.create_named("child");
//! graph.add_child(root, child);
//! graph.release(child); // `root` now owns it
//!
//! graph.set_local_position(root, Vec3::X);
//! assert_eq!(graph.world_position(child), Some(Vec3::X));
//! ```

mod arena;
mod color;
mod dirty;
mod hierarchy;
mod id;
mod node;
mod query;
mod transform;
mod traverse;

pub use dirty::{DirtyFlags, DirtyTransition, Edit};
pub use id::NodeId;
pub use node::Node;
pub use traverse::{Ancestors, Children, Descendants};

use arena::Arena;

use crate::config::SceneGraphConfig;

/// Owner of every node in a hierarchy (or forest of hierarchies).
///
/// Not `Sync`: cached values are refreshed through `Cell`s on read.
#[derive(Debug)]
pub struct SceneGraph {
    pub(crate) nodes: Arena<Node>,
    config: SceneGraphConfig,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create an empty graph with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SceneGraphConfig::default())
    }

    #[must_use]
    pub fn with_config(config: SceneGraphConfig) -> Self {
        Self {
            nodes: Arena::with_capacity(config.initial_capacity),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SceneGraphConfig {
        &self.config
    }

    // =========================================================================
    // Lifetime
    // =========================================================================

    /// Create a detached, unnamed node.
    ///
    /// The returned handle carries one reference owned by the caller.
    pub fn create_node(&mut self) -> NodeId {
        self.create_named(String::new())
    }

    /// Create a detached node with a name.
    pub fn create_named(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.nodes.insert(Node::new(name.into(), &self.config));
        self.linked_mut(id).root = id;
        log::trace!("created node {id}");
        id
    }

    /// Take an extra reference. Returns the new count.
    pub fn retain(&mut self, id: NodeId) -> Option<u32> {
        let node = self.nodes.get_mut(id)?;
        node.ref_count += 1;
        Some(node.ref_count)
    }

    /// Drop a reference, destroying the node when none remain.
    ///
    /// Returns the remaining count, `Some(0)` meaning the node was destroyed.
    pub fn release(&mut self, id: NodeId) -> Option<u32> {
        let node = self.nodes.get_mut(id)?;
        node.ref_count = node.ref_count.saturating_sub(1);
        let remaining = node.ref_count;
        if remaining == 0 {
            self.destroy_node(id);
        }
        Some(remaining)
    }

    /// Destroy a node regardless of its reference count.
    ///
    /// An attached node is unlinked from its parent first. Children are
    /// detached and released, so subtrees nobody else holds go with it.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.destroy_node(id);
        true
    }

    fn destroy_node(&mut self, id: NodeId) {
        log::debug!("destroying node {id} ({:?})", self.linked(id).name);

        if let Some(parent) = self.linked(id).parent {
            self.unlink(parent, id);
        }
        self.remove_all_children(id);

        let components = std::mem::take(&mut self.linked_mut(id).components);
        for mut component in components {
            component.node_changed(Some(id), None);
        }

        self.nodes.remove(id);
    }

    // =========================================================================
    // Access
    // =========================================================================

    #[must_use]
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's metadata.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    #[must_use]
    #[inline]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Number of live nodes.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Iterate over every live node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Iterate over the handles of every parentless node.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
    }

    /// Follow an internal link. A link to a freed slot means the tree is
    /// corrupted.
    #[inline]
    pub(crate) fn linked(&self, id: NodeId) -> &Node {
        self.nodes
            .get(id)
            .expect("scene graph link points at a destroyed node")
    }

    #[inline]
    pub(crate) fn linked_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(id)
            .expect("scene graph link points at a destroyed node")
    }
}
