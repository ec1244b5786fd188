//! Child iteration
//!
//! The iterators here borrow the graph and cannot observe mutation.
//! [`SceneGraph::for_each_child`] hands the callback `&mut SceneGraph` and
//! survives the callback restructuring the children it is walking.

use super::id::NodeId;
use super::SceneGraph;

/// Iterator over the direct children of a node, first to last.
pub struct Children<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.linked(current).next;
        Some(current)
    }
}

/// Iterator from a node's parent up to its root.
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.linked(current).parent;
        Some(current)
    }
}

/// Depth-first, pre-order iterator over a node's descendants.
pub struct Descendants<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;

        // Push in reverse so the first child is visited first.
        let start = self.stack.len();
        self.stack.extend(self.graph.children(current));
        self.stack[start..].reverse();

        Some(current)
    }
}

impl SceneGraph {
    /// Direct children of `id`. Empty for stale handles.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            graph: self,
            next: self.node(id).and_then(|n| n.child_head),
        }
    }

    /// Ancestors of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.node(id).and_then(|n| n.parent),
        }
    }

    /// Every node below `id`, not including `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        Descendants { graph: self, stack }
    }

    /// Snapshot of the direct children of `id`.
    #[must_use]
    pub fn all_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.child_head
    }

    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        let head = self.node(id)?.child_head?;
        self.linked(head).prev
    }

    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.next
    }

    /// Previous sibling. `None` for the first child.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        let head = self.linked(node.parent?).child_head;
        if head == Some(id) { None } else { node.prev }
    }

    /// Call `f` for each child of `parent` until it returns `false`.
    ///
    /// `f` may detach, destroy or reparent any node, including the child it
    /// was handed and its siblings. Removed children that were not yet
    /// visited are skipped; no child is visited twice. The walk ends early if
    /// `parent` is destroyed or has all its children removed.
    pub fn for_each_child<F>(&mut self, parent: NodeId, mut f: F)
    where
        F: FnMut(&mut SceneGraph, NodeId) -> bool,
    {
        let reserve = self.config().traversal_stack_capacity;
        let Some(node) = self.nodes.get_mut(parent) else {
            return;
        };
        if node.traversing_stack.capacity() == 0 {
            node.traversing_stack.reserve(reserve);
        }
        let depth = node.traversing_stack.len();
        node.traversing_stack.push(None);
        let mut current = node.child_head;

        while let Some(child) = current {
            let next = self.linked(child).next;
            self.linked_mut(parent).traversing_stack[depth] = next;

            if !f(self, child) {
                break;
            }

            let Some(node) = self.nodes.get(parent) else {
                return;
            };
            current = node.traversing_stack.get(depth).copied().flatten();
        }

        if let Some(node) = self.nodes.get_mut(parent) {
            node.traversing_stack.truncate(depth);
        }
    }
}
