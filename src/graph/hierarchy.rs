//! Structural mutation: attaching, reordering and detaching children
//!
//! Children form an intrusive list. The parent points at the first child,
//! siblings link forward through `next`, and the first child's `prev` points
//! at the last child so appending is O(1). The last child's `next` is `None`.

use super::dirty::{DirtyFlags, Edit};
use super::id::NodeId;
use super::SceneGraph;
use crate::math::Color;

impl SceneGraph {
    // =========================================================================
    // Public operations
    // =========================================================================

    /// Attach `child` as the last child of `parent`.
    ///
    /// Fails (returning `None`, changing nothing) if either handle is stale,
    /// `child` already has a parent, or `child` is the root of `parent`'s
    /// tree. On success `parent` takes a reference on `child`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        self.attach(parent, child, None)
    }

    /// Place `child` just before `before` in `parent`'s children.
    ///
    /// - `before == None` appends, like [`add_child`](Self::add_child).
    /// - A `child` already under `parent` is moved with no ownership or
    ///   dirty change.
    /// - A parentless `child` is attached like `add_child` at that position.
    /// - `child == before` is a no-op returning `child`.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> Option<NodeId> {
        let Some(before) = before else {
            return self.add_child(parent, child);
        };
        if child == before {
            return self.is_alive(child).then_some(child);
        }
        if self.node(before)?.parent != Some(parent) {
            log::debug!("insert_child: {before} is not a child of {parent}");
            return None;
        }

        match self.node(child)?.parent {
            Some(current) if current == parent => {
                self.unlink(parent, child);
                self.link(parent, child, Some(before));
                Some(child)
            }
            None => self.attach(parent, child, Some(before)),
            Some(other) => {
                log::debug!("insert_child: {child} already belongs to {other}");
                None
            }
        }
    }

    /// Detach `child` from `parent` and drop `parent`'s reference on it.
    ///
    /// Returns `false` if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.is_alive(parent) || self.node(child).and_then(|c| c.parent) != Some(parent) {
            return false;
        }
        self.detach(parent, child);
        true
    }

    /// Detach `child` from whatever parent it has.
    pub fn remove_from_parent(&mut self, child: NodeId) -> bool {
        match self.node(child).and_then(|c| c.parent) {
            Some(parent) => self.remove_child(parent, child),
            None => false,
        }
    }

    /// Detach and release every child of `parent`, first to last.
    ///
    /// Any `for_each_child` walk over `parent` in progress ends after its
    /// current callback.
    pub fn remove_all_children(&mut self, parent: NodeId) {
        let Some(node) = self.nodes.get_mut(parent) else {
            return;
        };
        node.traversing_stack.fill(None);

        while let Some(child) = self.linked(parent).child_head {
            self.detach(parent, child);
        }
    }

    // =========================================================================
    // Attach / detach
    // =========================================================================

    fn attach(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) -> Option<NodeId> {
        let (Some(p), Some(c)) = (self.node(parent), self.node(child)) else {
            return None;
        };
        if c.parent.is_some() {
            log::debug!("attach: {child} already has a parent");
            return None;
        }
        if p.root == child {
            log::debug!("attach: {child} is an ancestor of {parent}");
            return None;
        }

        let old_cascade = self.effective_cascade(child);
        self.linked_mut(child).ref_count += 1;
        self.link(parent, child, before);
        self.parent_changed(child, old_cascade);

        log::trace!("attached {child} to {parent}");
        Some(child)
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let old_cascade = self.effective_cascade(child);
        self.unlink(parent, child);
        self.parent_changed(child, old_cascade);

        log::trace!("detached {child} from {parent}");
        self.release(child);
    }

    /// Bring a node that just changed parent in line with its new ancestry.
    fn parent_changed(&mut self, id: NodeId, old_cascade: Color) {
        let root = match self.linked(id).parent {
            Some(parent) => self.linked(parent).root,
            None => id,
        };
        self.assign_root(id, root);

        let mut flags = DirtyFlags::WORLD_ALL;
        if self.composed_cascade(id) != old_cascade {
            flags |= DirtyFlags::CASCADE_COLOR;
        }
        self.receive(id, flags);
    }

    fn assign_root(&mut self, id: NodeId, root: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.linked_mut(current);
            node.root = root;

            let mut child = node.child_head;
            while let Some(c) = child {
                stack.push(c);
                child = self.linked(c).next;
            }
        }
    }

    // =========================================================================
    // Dirty propagation
    // =========================================================================

    /// Record an edit on `id` and push its inherited bits to the subtree.
    pub(crate) fn apply_edit(&self, id: NodeId, edit: Edit) {
        let transition = edit.transition();
        let node = self.linked(id);
        node.dirty.set(transition.apply(node.dirty.get()));
        self.notify_children(id, transition.propagate);
    }

    /// Mark `id` and its subtree with `flags`, stopping at any node that
    /// already holds all of them.
    pub(crate) fn receive(&self, id: NodeId, flags: DirtyFlags) {
        let node = self.linked(id);
        if node.dirty().contains(flags) {
            return;
        }
        node.mark(flags);
        self.notify_children(id, flags);
    }

    pub(crate) fn notify_children(&self, id: NodeId, flags: DirtyFlags) {
        let mut child = self.linked(id).child_head;
        while let Some(c) = child {
            self.receive(c, flags);
            child = self.linked(c).next;
        }
    }

    // =========================================================================
    // List surgery
    // =========================================================================

    /// Link a parentless `child` into `parent`'s list, before `before` or at
    /// the tail.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) {
        match self.linked(parent).child_head {
            None => {
                let node = self.linked_mut(child);
                node.prev = Some(child);
                node.next = None;
                self.linked_mut(parent).child_head = Some(child);
            }
            Some(head) => match before {
                None => {
                    let tail = self.tail_of(head);
                    self.linked_mut(tail).next = Some(child);
                    let node = self.linked_mut(child);
                    node.prev = Some(tail);
                    node.next = None;
                    self.linked_mut(head).prev = Some(child);
                }
                Some(before) => {
                    let prev = self.tail_of(before);
                    let node = self.linked_mut(child);
                    node.prev = Some(prev);
                    node.next = Some(before);
                    self.linked_mut(before).prev = Some(child);
                    if before == head {
                        self.linked_mut(parent).child_head = Some(child);
                    } else {
                        self.linked_mut(prev).next = Some(child);
                    }
                }
            },
        }

        self.linked_mut(child).parent = Some(parent);
        self.linked_mut(parent).num_children += 1;
    }

    /// Unlink `child` from `parent`'s list, redirecting in-flight walks that
    /// were about to visit it to its successor.
    pub(crate) fn unlink(&mut self, parent: NodeId, child: NodeId) {
        let (prev, next) = {
            let node = self.linked(child);
            (self.tail_of(child), node.next)
        };
        let head = self
            .linked(parent)
            .child_head
            .expect("unlinking from a parent with no children");

        if child == head {
            self.linked_mut(parent).child_head = next;
            if let Some(next) = next {
                self.linked_mut(next).prev = Some(prev);
            }
        } else {
            self.linked_mut(prev).next = next;
            match next {
                Some(next) => self.linked_mut(next).prev = Some(prev),
                None => self.linked_mut(head).prev = Some(prev),
            }
        }

        let parent_node = self.linked_mut(parent);
        parent_node.num_children -= 1;
        for slot in &mut parent_node.traversing_stack {
            if *slot == Some(child) {
                *slot = next;
            }
        }

        let node = self.linked_mut(child);
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    /// `prev` link of an attached node.
    fn tail_of(&self, id: NodeId) -> NodeId {
        self.linked(id)
            .prev
            .expect("attached node is missing its prev link")
    }
}
