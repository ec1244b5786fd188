//! Tint and cascade color
//!
//! Untinted nodes store no color and act as opaque white. A node's cascade
//! color is its own tint multiplied by its parent's cascade color; when the
//! parent's cascade is white the product is just the node's own tint and
//! nothing is cached.

use glam::Vec3;

use super::dirty::{DirtyFlags, Edit};
use super::id::NodeId;
use super::SceneGraph;
use crate::math::Color;

impl SceneGraph {
    pub(crate) fn update_cascade_color(&self, id: NodeId) {
        let node = self.linked(id);
        if !node.is_dirty(DirtyFlags::CASCADE_COLOR) {
            return;
        }

        let cascade = match node.parent {
            Some(parent) => {
                self.update_cascade_color(parent);
                let inherited = self.linked(parent).cached_cascade();
                (!inherited.is_white()).then(|| node.own_color() * inherited)
            }
            None => None,
        };
        node.cascade_color.set(cascade);
        node.clean(DirtyFlags::CASCADE_COLOR);
    }

    /// Fresh cascade color of a live node.
    pub(crate) fn effective_cascade(&self, id: NodeId) -> Color {
        self.update_cascade_color(id);
        self.linked(id).cached_cascade()
    }

    /// Cascade color computed from the node's tint and its parent, ignoring
    /// the node's own cache.
    pub(crate) fn composed_cascade(&self, id: NodeId) -> Color {
        let node = self.linked(id);
        match node.parent {
            Some(parent) => node.own_color() * self.effective_cascade(parent),
            None => node.own_color(),
        }
    }

    // =========================================================================
    // Public API
    // =========================================================================

    /// Own tint, opaque white when none was set.
    #[must_use]
    pub fn color(&self, id: NodeId) -> Option<Color> {
        Some(self.node(id)?.own_color())
    }

    #[must_use]
    pub fn alpha(&self, id: NodeId) -> Option<f32> {
        self.color(id).map(|c| c.a)
    }

    #[must_use]
    pub fn rgb(&self, id: NodeId) -> Option<Vec3> {
        self.color(id).map(Color::to_rgb_vec)
    }

    /// Tint multiplied through every ancestor.
    #[must_use]
    pub fn cascade_color(&self, id: NodeId) -> Option<Color> {
        self.node(id)?;
        Some(self.effective_cascade(id))
    }

    /// Set the node's own tint.
    ///
    /// Writing the current value does nothing. Writing white to an untinted
    /// node leaves it untinted. Descendants are only invalidated when the
    /// node's cascade color actually changes.
    pub fn set_color(&mut self, id: NodeId, color: Color) {
        let Some(node) = self.node(id) else {
            return;
        };
        match node.color {
            Some(current) if current == color => return,
            None if color.is_white() => return,
            _ => {}
        }

        let before = self.effective_cascade(id);
        self.linked_mut(id).color = Some(color);

        let transition = Edit::Color.transition();
        let node = self.linked(id);
        node.dirty.set(transition.apply(node.dirty.get()));

        if self.composed_cascade(id) != before {
            self.notify_children(id, transition.propagate);
        } else {
            // Children keep a valid cascade, so this node must not stay
            // marked without them.
            self.update_cascade_color(id);
        }
    }

    pub fn set_alpha(&mut self, id: NodeId, alpha: f32) {
        if let Some(color) = self.color(id) {
            self.set_color(id, color.with_alpha(alpha));
        }
    }

    pub fn set_rgb(&mut self, id: NodeId, rgb: Vec3) {
        if let Some(color) = self.color(id) {
            self.set_color(id, color.with_rgb(rgb));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (SceneGraph, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let a = graph.create_named("A");
        let b = graph.create_named("B");
        graph.add_child(a, b);
        (graph, a, b)
    }

    #[test]
    fn test_untinted_defaults() {
        let (graph, a, b) = chain();

        assert_eq!(graph.color(a), Some(Color::WHITE));
        assert_eq!(graph.cascade_color(b), Some(Color::WHITE));
        assert!(graph.node(b).unwrap().color().is_none());
    }

    #[test]
    fn test_alpha_cascades_to_untinted_child() {
        let (mut graph, a, b) = chain();

        graph.set_alpha(a, 0.5);

        assert_eq!(graph.cascade_color(b).unwrap().a, 0.5);
        assert!(graph.node(b).unwrap().color().is_none());
    }

    #[test]
    fn test_explicit_white_child_keeps_parent_alpha() {
        let (mut graph, a, b) = chain();
        graph.set_alpha(a, 0.5);

        graph.set_color(b, Color::rgb(1.0, 0.0, 0.0));
        graph.set_color(b, Color::WHITE);

        assert_eq!(graph.node(b).unwrap().color(), Some(Color::WHITE));
        assert_eq!(graph.cascade_color(b).unwrap().a, 0.5);
        assert_eq!(graph.cascade_color(b).unwrap(), Color::WHITE.with_alpha(0.5));
    }

    #[test]
    fn test_white_on_untinted_is_not_materialized() {
        let (mut graph, _, b) = chain();

        graph.set_color(b, Color::WHITE);
        graph.set_alpha(b, 1.0);

        assert!(graph.node(b).unwrap().color().is_none());
        assert!(!graph.node(b).unwrap().dirty().contains(DirtyFlags::CASCADE_COLOR));
    }

    #[test]
    fn test_cascade_color_law() {
        let mut graph = SceneGraph::new();
        let r = graph.create_node();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.add_child(r, a);
        graph.add_child(a, b);

        graph.set_color(r, Color::new(0.5, 1.0, 1.0, 1.0));
        graph.set_color(a, Color::new(1.0, 0.5, 1.0, 0.5));
        graph.set_rgb(b, Vec3::new(1.0, 1.0, 0.5));

        for id in [r, a, b] {
            let expected = match graph.node(id).unwrap().parent() {
                Some(p) => graph.color(id).unwrap() * graph.cascade_color(p).unwrap(),
                None => graph.color(id).unwrap(),
            };
            assert_eq!(graph.cascade_color(id), Some(expected));
        }
        assert_eq!(graph.cascade_color(b), Some(Color::new(0.5, 0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_unchanged_value_does_not_propagate() {
        let (mut graph, a, b) = chain();
        graph.set_alpha(a, 0.5);
        let _ = graph.cascade_color(b);
        assert!(!graph.node(b).unwrap().dirty().contains(DirtyFlags::CASCADE_COLOR));

        graph.set_alpha(a, 0.5);

        assert!(!graph.node(b).unwrap().dirty().contains(DirtyFlags::CASCADE_COLOR));
    }

    #[test]
    fn test_change_under_transparent_parent() {
        let (mut graph, a, b) = chain();
        let leaf = graph.create_node();
        graph.add_child(b, leaf);
        graph.set_color(a, Color::TRANSPARENT);
        let _ = graph.cascade_color(leaf);

        // B's tint changes but its cascade stays transparent black.
        graph.set_color(b, Color::rgb(0.2, 0.4, 0.6));
        assert!(!graph.node(b).unwrap().dirty().contains(DirtyFlags::CASCADE_COLOR));
        assert!(!graph.node(leaf).unwrap().dirty().contains(DirtyFlags::CASCADE_COLOR));

        // A later change above B still reaches the leaf.
        graph.set_color(a, Color::WHITE);
        assert_eq!(graph.cascade_color(leaf), Some(Color::rgb(0.2, 0.4, 0.6)));
    }

    #[test]
    fn test_reparent_updates_cascade() {
        let mut graph = SceneGraph::new();
        let red = graph.create_node();
        let blue = graph.create_node();
        let child = graph.create_node();
        graph.set_color(red, Color::rgb(1.0, 0.0, 0.0));
        graph.set_color(blue, Color::rgb(0.0, 0.0, 1.0));

        graph.add_child(red, child);
        assert_eq!(graph.cascade_color(child), Some(Color::rgb(1.0, 0.0, 0.0)));

        graph.remove_child(red, child);
        graph.add_child(blue, child);
        assert_eq!(graph.cascade_color(child), Some(Color::rgb(0.0, 0.0, 1.0)));

        graph.remove_from_parent(child);
        assert_eq!(graph.cascade_color(child), Some(Color::WHITE));
    }

    #[test]
    fn test_root_cascade_follows_own_color() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let _ = graph.cascade_color(root);

        graph.set_color(root, Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(graph.cascade_color(root), Some(Color::rgb(0.0, 1.0, 0.0)));
    }
}
