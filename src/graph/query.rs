//! Cloning and read-only structural queries

use std::collections::VecDeque;

use super::id::NodeId;
use super::SceneGraph;

impl SceneGraph {
    /// Make a detached copy of `id` with the same name, layer, active flag,
    /// local transform and color.
    ///
    /// With `clone_children`, the subtree is copied too. Each copied child is
    /// owned only by its copied parent; the returned node carries one
    /// reference owned by the caller. Components are not copied.
    pub fn clone_node(&mut self, id: NodeId, clone_children: bool) -> Option<NodeId> {
        let source = self.node(id)?;
        let name = source.name.clone();
        let (layer, active, color) = (source.layer, source.active, source.color);
        let transform = self.local_transform(id)?;

        let copy = self.create_named(name);
        {
            let node = self.linked_mut(copy);
            node.layer = layer;
            node.active = active;
            node.color = color;
        }
        self.set_local_transform(copy, &transform);

        if clone_children {
            for child in self.all_children(id) {
                if let Some(child_copy) = self.clone_node(child, true) {
                    self.add_child(copy, child_copy);
                    self.release(child_copy);
                }
            }
        }

        Some(copy)
    }

    /// Find a descendant by name, breadth first.
    ///
    /// `depth == 0` checks direct children only; otherwise up to `depth + 1`
    /// levels below `id` are searched.
    #[must_use]
    pub fn child_by_name(&self, id: NodeId, name: &str, depth: u32) -> Option<NodeId> {
        let mut level = self.all_children(id);
        for _ in 0..=depth {
            if let Some(&found) = level.iter().find(|&&c| self.linked(c).name == name) {
                return Some(found);
            }
            level = level.iter().flat_map(|&c| self.children(c)).collect();
            if level.is_empty() {
                break;
            }
        }
        None
    }

    /// Level distance from `ancestor` down to `node`: 0 for the same node,
    /// 1 for a direct child. `None` if `node` is not within `max_depth`
    /// levels below `ancestor`.
    #[must_use]
    pub fn contains_node(&self, ancestor: NodeId, node: NodeId, max_depth: u32) -> Option<u32> {
        self.node(ancestor)?;
        let mut current = node;
        let mut distance = 0;
        loop {
            if current == ancestor {
                return Some(distance);
            }
            if distance >= max_depth {
                return None;
            }
            current = self.node(current)?.parent?;
            distance += 1;
        }
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Find the first node named `name` anywhere in `id`'s subtree,
    /// including `id` itself.
    #[must_use]
    pub fn find_in_subtree(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            let node = self.node(current)?;
            if node.name == name {
                return Some(current);
            }
            queue.extend(self.children(current));
        }
        None
    }
}
