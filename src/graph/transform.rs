//! Transform state: lazy recomputation and the get/set API
//!
//! glam matrices are column-major and compose right to left, so a node's
//! world matrix is `parent_world * local` and translations sit in `w_axis`.
//!
//! # Performance
//!
//! | Operation          | Cost                              |
//! |--------------------|-----------------------------------|
//! | Read (clean)       | O(1) - returns cached             |
//! | Read (dirty)       | O(depth) - refreshes stale chain  |
//! | Local write        | O(subtree) worst case, marks only |
//! | World write        | O(depth + subtree)                |

use glam::{Mat4, Quat, Vec3};

use super::dirty::{DirtyFlags, Edit};
use super::id::NodeId;
use super::SceneGraph;
use crate::math::Transform;

impl SceneGraph {
    // =========================================================================
    // Lazy recomputation
    // =========================================================================

    pub(crate) fn update_local_matrix(&self, id: NodeId) {
        let node = self.linked(id);
        if !node.is_dirty(DirtyFlags::LOCAL_MAT) {
            return;
        }
        node.local_matrix.set(Mat4::from_scale_rotation_translation(
            node.local_scale,
            node.local_rotation,
            node.local_translation(),
        ));
        node.clean(DirtyFlags::LOCAL_MAT);
    }

    pub(crate) fn update_world_matrix(&self, id: NodeId) {
        let node = self.linked(id);
        if !node.is_dirty(DirtyFlags::WORLD_MAT) {
            return;
        }
        self.update_local_matrix(id);

        let world = match node.parent {
            Some(parent) => {
                self.update_world_matrix(parent);
                self.linked(parent).world_matrix.get() * node.local_matrix.get()
            }
            None => node.local_matrix.get(),
        };
        node.world_matrix.set(world);
        node.clean(DirtyFlags::WORLD_MAT);
    }

    /// Degenerate scale anywhere up the chain gives a non-finite inverse.
    pub(crate) fn update_inverse_world_matrix(&self, id: NodeId) {
        let node = self.linked(id);
        if !node.is_dirty(DirtyFlags::INV_WORLD_MAT) {
            return;
        }
        self.update_world_matrix(id);
        node.inverse_world_matrix.set(node.world_matrix.get().inverse());
        node.clean(DirtyFlags::INV_WORLD_MAT);
    }

    pub(crate) fn update_world_rotation(&self, id: NodeId) {
        let node = self.linked(id);
        if !node.is_dirty(DirtyFlags::WORLD_ROT) {
            return;
        }

        let rotation = match node.parent {
            Some(parent) => {
                self.update_world_rotation(parent);
                self.linked(parent).world_rotation.get() * node.local_rotation
            }
            None => node.local_rotation,
        };
        node.world_rotation.set(rotation);
        node.clean(DirtyFlags::WORLD_ROT);
    }

    /// Fresh inverse world matrix of the parent, `None` for a root.
    fn parent_world_inverse(&self, id: NodeId) -> Option<Mat4> {
        let parent = self.linked(id).parent?;
        self.update_inverse_world_matrix(parent);
        Some(self.linked(parent).inverse_world_matrix.get())
    }

    fn parent_world_rotation(&self, id: NodeId) -> Quat {
        match self.linked(id).parent {
            Some(parent) => {
                self.update_world_rotation(parent);
                self.linked(parent).world_rotation.get()
            }
            None => Quat::IDENTITY,
        }
    }

    // =========================================================================
    // Local position
    // =========================================================================

    #[must_use]
    pub fn local_position(&self, id: NodeId) -> Option<Vec3> {
        Some(self.node(id)?.local_translation())
    }

    pub fn set_local_position(&mut self, id: NodeId, position: Vec3) {
        let Some(node) = self.node(id) else {
            return;
        };
        let mut local = node.local_matrix.get();
        local.w_axis = position.extend(1.0);
        node.local_matrix.set(local);
        self.apply_edit(id, Edit::LocalPosition);
    }

    /// Move along the node's own axes (scaled and rotated).
    pub fn local_translate(&mut self, id: NodeId, delta: Vec3) {
        if !self.is_alive(id) {
            return;
        }
        self.update_local_matrix(id);
        let local = self.linked(id).local_matrix.get();
        let position = local.w_axis.truncate() + local.transform_vector3(delta);
        self.set_local_position(id, position);
    }

    // =========================================================================
    // World position
    // =========================================================================

    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.node(id)?;
        self.update_world_matrix(id);
        Some(self.linked(id).world_matrix.get().w_axis.truncate())
    }

    /// Place the node at a world-space position, solving for the local
    /// translation through the parent's inverse world matrix.
    pub fn set_world_position(&mut self, id: NodeId, position: Vec3) {
        if !self.is_alive(id) {
            return;
        }
        self.update_world_matrix(id);

        let local_position = match self.parent_world_inverse(id) {
            Some(inverse) => inverse.transform_point3(position),
            None => position,
        };

        let node = self.linked(id);
        let mut world = node.world_matrix.get();
        world.w_axis = position.extend(1.0);
        node.world_matrix.set(world);

        let mut local = node.local_matrix.get();
        local.w_axis = local_position.extend(1.0);
        node.local_matrix.set(local);

        self.apply_edit(id, Edit::WorldPosition);
    }

    /// Move along the node's own world-space axes (scaled and rotated by
    /// the whole chain).
    pub fn world_translate(&mut self, id: NodeId, delta: Vec3) {
        let Some(world) = self.world_matrix(id) else {
            return;
        };
        let position = world.w_axis.truncate() + world.transform_vector3(delta);
        self.set_world_position(id, position);
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    #[must_use]
    pub fn local_rotation(&self, id: NodeId) -> Option<Quat> {
        Some(self.node(id)?.local_rotation)
    }

    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Quat) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.local_rotation = rotation;
        self.apply_edit(id, Edit::LocalRotation);
    }

    /// Rotate about the node's own axes: `local = local * rotation`.
    pub fn local_rotate(&mut self, id: NodeId, rotation: Quat) {
        if let Some(current) = self.local_rotation(id) {
            self.set_local_rotation(id, current * rotation);
        }
    }

    /// Rotate about the parent's axes: `local = rotation * local`.
    pub fn parent_rotate(&mut self, id: NodeId, rotation: Quat) {
        if let Some(current) = self.local_rotation(id) {
            self.set_local_rotation(id, rotation * current);
        }
    }

    #[must_use]
    pub fn world_rotation(&self, id: NodeId) -> Option<Quat> {
        self.node(id)?;
        self.update_world_rotation(id);
        Some(self.linked(id).world_rotation.get())
    }

    pub fn set_world_rotation(&mut self, id: NodeId, rotation: Quat) {
        let Some(local) = self.local_rotation_from_world(id, rotation) else {
            return;
        };

        let node = self.linked_mut(id);
        node.local_rotation = local;
        node.world_rotation.set(rotation);
        self.apply_edit(id, Edit::WorldRotation);
    }

    /// Rotate about the world axes: `world = rotation * world`.
    pub fn world_rotate(&mut self, id: NodeId, rotation: Quat) {
        if let Some(current) = self.world_rotation(id) {
            self.set_world_rotation(id, rotation * current);
        }
    }

    /// The local rotation that would give the node `world` as its world
    /// rotation under its current parent. Nothing is written.
    #[must_use]
    pub fn local_rotation_from_world(&self, id: NodeId, world: Quat) -> Option<Quat> {
        self.node(id)?;
        Some(self.parent_world_rotation(id).inverse() * world)
    }

    // =========================================================================
    // Scale
    // =========================================================================

    #[must_use]
    pub fn local_scale(&self, id: NodeId) -> Option<Vec3> {
        Some(self.node(id)?.local_scale)
    }

    pub fn set_local_scale(&mut self, id: NodeId, scale: Vec3) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.local_scale = scale;
        self.apply_edit(id, Edit::LocalScale);
    }

    // =========================================================================
    // Matrices
    // =========================================================================

    #[must_use]
    pub fn local_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.node(id)?;
        self.update_local_matrix(id);
        Some(self.linked(id).local_matrix.get())
    }

    /// Replace the whole local matrix. Rotation and scale are decomposed
    /// from it.
    pub fn set_local_matrix(&mut self, id: NodeId, matrix: Mat4) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let (scale, rotation, _) = matrix.to_scale_rotation_translation();
        node.local_scale = scale;
        node.local_rotation = rotation;
        node.local_matrix.set(matrix);
        self.apply_edit(id, Edit::LocalMatrix);
    }

    /// Set translation, rotation and scale in one write.
    pub fn set_local_trs(&mut self, id: NodeId, position: Vec3, rotation: Quat, scale: Vec3) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.local_rotation = rotation;
        node.local_scale = scale;
        let mut local = node.local_matrix.get();
        local.w_axis = position.extend(1.0);
        node.local_matrix.set(local);
        self.apply_edit(id, Edit::LocalTrs);
    }

    #[must_use]
    pub fn local_transform(&self, id: NodeId) -> Option<Transform> {
        let node = self.node(id)?;
        Some(Transform::from_parts(
            node.local_translation(),
            node.local_rotation,
            node.local_scale,
        ))
    }

    pub fn set_local_transform(&mut self, id: NodeId, transform: &Transform) {
        self.set_local_trs(id, transform.position, transform.rotation, transform.scale);
    }

    /// Back to the identity local transform. Does nothing if already there.
    pub fn reset_transform(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        if node.local_rotation == Quat::IDENTITY
            && node.local_scale == Vec3::ONE
            && node.local_translation() == Vec3::ZERO
        {
            return;
        }
        self.set_local_trs(id, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
    }

    #[must_use]
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.node(id)?;
        self.update_world_matrix(id);
        Some(self.linked(id).world_matrix.get())
    }

    /// Replace the world matrix, solving for the local matrix through the
    /// parent's inverse world matrix.
    pub fn set_world_matrix(&mut self, id: NodeId, matrix: Mat4) {
        if !self.is_alive(id) {
            return;
        }
        let local = match self.parent_world_inverse(id) {
            Some(inverse) => inverse * matrix,
            None => matrix,
        };
        let (scale, rotation, _) = local.to_scale_rotation_translation();

        let node = self.linked_mut(id);
        node.local_scale = scale;
        node.local_rotation = rotation;
        node.local_matrix.set(local);
        node.world_matrix.set(matrix);
        self.apply_edit(id, Edit::WorldMatrix);
    }

    #[must_use]
    pub fn inverse_world_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.node(id)?;
        self.update_inverse_world_matrix(id);
        Some(self.linked(id).inverse_world_matrix.get())
    }

    /// Matrix taking points from `from`'s local space into `to`'s local
    /// space. Identity when the nodes live in different trees.
    #[must_use]
    pub fn local_to_local_matrix(&self, from: NodeId, to: NodeId) -> Option<Mat4> {
        let (from_node, to_node) = (self.node(from)?, self.node(to)?);
        if from_node.root != to_node.root {
            return Some(Mat4::IDENTITY);
        }
        self.update_world_matrix(from);
        self.update_inverse_world_matrix(to);
        Some(to_node.inverse_world_matrix.get() * from_node.world_matrix.get())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    fn approx_mat(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, EPSILON)
    }

    /// `q` and `-q` are the same rotation.
    fn approx_quat(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() > 1.0 - EPSILON
    }

    /// Eager recompute from local transforms, ignoring every cache.
    fn eager_world(graph: &SceneGraph, id: NodeId) -> Mat4 {
        let node = graph.node(id).unwrap();
        let local = Mat4::from_scale_rotation_translation(
            node.local_scale,
            node.local_rotation,
            node.local_translation(),
        );
        match node.parent() {
            Some(parent) => eager_world(graph, parent) * local,
            None => local,
        }
    }

    /// R -> A (1,0,0) -> B (0,2,0)
    fn rab() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut graph = SceneGraph::new();
        let r = graph.create_named("R");
        let a = graph.create_named("A");
        let b = graph.create_named("B");
        graph.add_child(r, a);
        graph.set_local_position(a, Vec3::new(1.0, 0.0, 0.0));
        graph.add_child(a, b);
        graph.set_local_position(b, Vec3::new(0.0, 2.0, 0.0));
        (graph, r, a, b)
    }

    #[test]
    fn test_world_position_composes() {
        let (graph, _, _, b) = rab();
        assert!(approx_vec(graph.world_position(b).unwrap(), Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn test_plain_reparent_keeps_local_transform() {
        let (mut graph, r, a, b) = rab();
        assert!(approx_vec(graph.world_position(b).unwrap(), Vec3::new(1.0, 2.0, 0.0)));

        graph.retain(b);
        graph.remove_child(a, b);
        graph.add_child(r, b);
        graph.release(b);

        assert!(approx_vec(graph.local_position(b).unwrap(), Vec3::new(0.0, 2.0, 0.0)));
        assert!(approx_vec(graph.world_position(b).unwrap(), Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_world_preserving_reparent_by_caller() {
        let (mut graph, r, a, b) = rab();
        let world = graph.world_position(b).unwrap();

        graph.retain(b);
        graph.remove_child(a, b);
        graph.add_child(r, b);
        graph.release(b);
        graph.set_world_position(b, world);

        assert!(approx_vec(graph.world_position(b).unwrap(), Vec3::new(1.0, 2.0, 0.0)));
        assert!(approx_vec(graph.local_position(b).unwrap(), Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn test_world_matrix_composition_law() {
        let (mut graph, r, a, b) = rab();
        graph.set_local_rotation(a, Quat::from_rotation_z(FRAC_PI_2));
        graph.set_local_scale(r, Vec3::splat(2.0));

        let parent_world = graph.world_matrix(a).unwrap();
        let local = graph.local_matrix(b).unwrap();
        assert!(approx_mat(graph.world_matrix(b).unwrap(), parent_world * local));
        assert!(approx_mat(graph.world_matrix(r).unwrap(), graph.local_matrix(r).unwrap()));
    }

    #[test]
    fn test_rotated_parent_moves_child() {
        let (mut graph, _, a, b) = rab();
        graph.set_local_rotation(a, Quat::from_rotation_z(FRAC_PI_2));

        // (0,2,0) rotated 90 degrees about Z is (-2,0,0), offset by A at (1,0,0)
        assert!(approx_vec(graph.world_position(b).unwrap(), Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_inverse_law() {
        let (mut graph, r, a, b) = rab();
        graph.set_local_scale(r, Vec3::new(2.0, 3.0, 0.5));
        graph.set_local_rotation(a, Quat::from_rotation_y(0.7));
        graph.set_local_scale(b, Vec3::splat(4.0));

        for id in [r, a, b] {
            let product = graph.world_matrix(id).unwrap() * graph.inverse_world_matrix(id).unwrap();
            assert!(approx_mat(product, Mat4::IDENTITY));
        }
    }

    #[test]
    fn test_world_position_round_trip_at_depth() {
        let (mut graph, r, a, b) = rab();
        graph.set_local_rotation(r, Quat::from_rotation_x(0.3));
        graph.set_local_scale(a, Vec3::new(2.0, 1.0, 0.5));
        graph.set_local_rotation(a, Quat::from_rotation_z(1.1));
        let leaf = graph.create_node();
        graph.add_child(b, leaf);

        let target = Vec3::new(-3.0, 4.5, 2.0);
        for id in [r, a, b, leaf] {
            graph.set_world_position(id, target);
            assert!(approx_vec(graph.world_position(id).unwrap(), target));
        }
    }

    #[test]
    fn test_set_world_position_moves_children() {
        let (mut graph, _, a, b) = rab();
        let _ = graph.world_position(b);

        graph.set_world_position(a, Vec3::new(5.0, 0.0, 0.0));
        assert!(approx_vec(graph.world_position(b).unwrap(), Vec3::new(5.0, 2.0, 0.0)));
    }

    #[test]
    fn test_world_rotation() {
        let (mut graph, r, a, b) = rab();
        let qr = Quat::from_rotation_y(0.4);
        let qa = Quat::from_rotation_x(0.9);
        graph.set_local_rotation(r, qr);
        graph.set_local_rotation(a, qa);

        let expected = qr * qa;
        assert!(approx_quat(graph.world_rotation(b).unwrap(), expected));
    }

    #[test]
    fn test_set_world_rotation_solves_local() {
        let (mut graph, r, a, b) = rab();
        graph.set_local_rotation(r, Quat::from_rotation_z(0.5));
        let target = Quat::from_rotation_x(1.0);

        graph.set_world_rotation(a, target);
        assert!(!graph.node(a).unwrap().dirty().contains(DirtyFlags::WORLD_ROT));
        assert!(graph.node(b).unwrap().dirty().contains(DirtyFlags::WORLD_ROT));

        assert!(approx_quat(graph.world_rotation(a).unwrap(), target));
        let local = graph.local_rotation(a).unwrap();
        assert!(approx_quat(Quat::from_rotation_z(0.5) * local, target));
        assert!(approx_mat(graph.world_matrix(b).unwrap(), eager_world(&graph, b)));
    }

    #[test]
    fn test_rotate_orders() {
        let mut graph = SceneGraph::new();
        let n = graph.create_node();
        let q1 = Quat::from_rotation_x(0.3);
        let q2 = Quat::from_rotation_y(0.6);

        graph.set_local_rotation(n, q1);
        graph.local_rotate(n, q2);
        assert!(approx_quat(graph.local_rotation(n).unwrap(), q1 * q2));

        graph.set_local_rotation(n, q1);
        graph.parent_rotate(n, q2);
        assert!(approx_quat(graph.local_rotation(n).unwrap(), q2 * q1));

        graph.set_local_rotation(n, q1);
        graph.world_rotate(n, q2);
        assert!(approx_quat(graph.world_rotation(n).unwrap(), q2 * q1));
    }

    #[test]
    fn test_translate() {
        let mut graph = SceneGraph::new();
        let n = graph.create_node();
        graph.set_local_rotation(n, Quat::from_rotation_z(FRAC_PI_2));

        graph.local_translate(n, Vec3::X);
        assert!(approx_vec(graph.local_position(n).unwrap(), Vec3::Y));

        // The node's own X axis points along world Y.
        graph.world_translate(n, Vec3::X);
        assert!(approx_vec(graph.world_position(n).unwrap(), Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_world_translate_follows_chain_axes() {
        let mut graph = SceneGraph::new();
        let parent = graph.create_node();
        let child = graph.create_node();
        graph.add_child(parent, child);
        graph.set_local_trs(
            parent,
            Vec3::new(5.0, 0.0, 0.0),
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::splat(2.0),
        );
        graph.set_local_position(child, Vec3::X);
        assert!(approx_vec(graph.world_position(child).unwrap(), Vec3::new(5.0, 2.0, 0.0)));

        graph.world_translate(child, Vec3::X);

        assert!(approx_vec(graph.world_position(child).unwrap(), Vec3::new(5.0, 4.0, 0.0)));
        assert!(approx_vec(graph.local_position(child).unwrap(), Vec3::new(2.0, 0.0, 0.0)));
        assert!(approx_mat(eager_world(&graph, child), graph.world_matrix(child).unwrap()));
    }

    #[test]
    fn test_set_world_matrix_uses_parent_inverse() {
        let (mut graph, _, a, b) = rab();
        graph.set_local_scale(a, Vec3::splat(2.0));
        let target = Mat4::from_scale_rotation_translation(
            Vec3::splat(3.0),
            Quat::from_rotation_y(0.25),
            Vec3::new(4.0, -1.0, 2.0),
        );

        graph.set_world_matrix(b, target);

        assert!(approx_mat(graph.world_matrix(b).unwrap(), target));
        assert!(approx_vec(graph.local_scale(b).unwrap(), Vec3::splat(1.5)));
        assert!(approx_mat(eager_world(&graph, b), target));
        assert!(approx_quat(graph.world_rotation(b).unwrap(), Quat::from_rotation_y(0.25)));
    }

    #[test]
    fn test_set_local_matrix_decomposes() {
        let mut graph = SceneGraph::new();
        let n = graph.create_node();
        let rotation = Quat::from_rotation_x(0.5);
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            rotation,
            Vec3::new(1.0, 2.0, 3.0),
        );

        graph.set_local_matrix(n, matrix);

        assert!(approx_vec(graph.local_position(n).unwrap(), Vec3::new(1.0, 2.0, 3.0)));
        assert!(approx_vec(graph.local_scale(n).unwrap(), Vec3::splat(2.0)));
        assert!(approx_quat(graph.local_rotation(n).unwrap(), rotation));
        assert!(!graph.node(n).unwrap().dirty().contains(DirtyFlags::LOCAL_MAT));
    }

    #[test]
    fn test_local_transform_and_reset() {
        let mut graph = SceneGraph::new();
        let n = graph.create_node();
        let transform = Transform::from_parts(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(0.2),
            Vec3::splat(2.0),
        );

        graph.set_local_transform(n, &transform);
        assert_eq!(graph.local_transform(n), Some(transform));
        assert!(approx_mat(graph.local_matrix(n).unwrap(), transform.matrix()));

        graph.reset_transform(n);
        assert!(approx_mat(graph.world_matrix(n).unwrap(), Mat4::IDENTITY));
    }

    #[test]
    fn test_reset_identity_is_noop() {
        let mut graph = SceneGraph::new();
        let n = graph.create_node();
        let child = graph.create_node();
        graph.add_child(n, child);
        let _ = graph.world_matrix(child);
        let _ = graph.inverse_world_matrix(child);
        let _ = graph.world_rotation(child);
        assert!(graph.node(n).unwrap().dirty().is_empty());
        assert!(graph.node(child).unwrap().dirty().is_empty());

        graph.reset_transform(n);

        assert!(graph.node(n).unwrap().dirty().is_empty());
        assert!(graph.node(child).unwrap().dirty().is_empty());
    }

    #[test]
    fn test_local_to_local_matrix() {
        let (mut graph, _, a, b) = rab();
        let other_tree = graph.create_node();

        let m = graph.local_to_local_matrix(b, a).unwrap();
        assert!(approx_vec(m.transform_point3(Vec3::ZERO), Vec3::new(0.0, 2.0, 0.0)));

        assert_eq!(graph.local_to_local_matrix(b, other_tree), Some(Mat4::IDENTITY));
    }

    #[test]
    fn test_lazy_reads_match_eager_recompute() {
        let (mut graph, r, a, b) = rab();
        let c = graph.create_node();
        graph.add_child(a, c);

        let check = |graph: &SceneGraph| {
            for id in [r, a, b, c] {
                assert!(approx_mat(graph.world_matrix(id).unwrap(), eager_world(graph, id)));
                assert!(approx_mat(
                    graph.world_matrix(id).unwrap() * graph.inverse_world_matrix(id).unwrap(),
                    Mat4::IDENTITY
                ));
            }
        };

        // Interleave reads with edits at different depths.
        let _ = graph.world_position(c);
        graph.set_local_rotation(r, Quat::from_rotation_y(0.3));
        let _ = graph.inverse_world_matrix(a);
        graph.set_local_scale(a, Vec3::new(1.0, 2.0, 1.0));
        graph.set_local_position(b, Vec3::new(0.5, 0.5, 0.5));
        check(&graph);

        graph.set_world_rotation(a, Quat::from_rotation_x(0.8));
        let _ = graph.world_matrix(b);
        graph.set_local_position(r, Vec3::new(3.0, 0.0, 0.0));
        check(&graph);

        graph.retain(c);
        graph.remove_child(a, c);
        graph.add_child(b, c);
        graph.release(c);
        graph.set_world_position(a, Vec3::new(-2.0, 1.0, 0.0));
        check(&graph);

        graph.set_local_matrix(b, Mat4::from_rotation_z(0.4));
        graph.set_world_matrix(r, Mat4::from_translation(Vec3::Y));
        check(&graph);
    }

    #[test]
    fn test_reads_clear_only_their_bits() {
        let (mut graph, _, a, b) = rab();
        graph.set_local_rotation(a, Quat::from_rotation_x(0.2));

        let _ = graph.world_matrix(b);
        let dirty = graph.node(b).unwrap().dirty();
        assert!(!dirty.contains(DirtyFlags::WORLD_MAT));
        assert!(dirty.contains(DirtyFlags::INV_WORLD_MAT | DirtyFlags::WORLD_ROT));
    }

    #[test]
    fn test_stale_handles_are_ignored() {
        let mut graph = SceneGraph::new();
        let n = graph.create_node();
        graph.release(n);

        graph.set_local_position(n, Vec3::ONE);
        graph.set_world_position(n, Vec3::ONE);
        graph.set_world_matrix(n, Mat4::IDENTITY);
        assert_eq!(graph.world_position(n), None);
        assert_eq!(graph.local_matrix(n), None);
        assert_eq!(graph.local_to_local_matrix(n, n), None);
    }
}
