//! Scene node storage
//!
//! A [`Node`] holds its own links, local transform and cached derived state.
//! Everything that needs to look at other nodes (composition, propagation,
//! linking) lives on [`SceneGraph`](super::SceneGraph).

use std::cell::Cell;

use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

use super::dirty::DirtyFlags;
use super::id::NodeId;
use crate::component::Component;
use crate::config::SceneGraphConfig;
use crate::math::Color;

/// A positionable entity in the hierarchy.
///
/// Cached world values sit behind `Cell`s so that fresh reads can refresh
/// them through a shared reference.
#[derive(Debug)]
pub struct Node {
    /// Display name, used by name lookups
    pub(crate) name: String,
    /// Layer bitmask
    pub(crate) layer: u32,
    pub(crate) active: bool,

    // Structure
    pub(crate) ref_count: u32,
    pub(crate) parent: Option<NodeId>,
    /// Topmost ancestor; `self` when detached
    pub(crate) root: NodeId,
    /// Previous sibling. On the first child this is the last child.
    pub(crate) prev: Option<NodeId>,
    /// Next sibling, `None` on the last child
    pub(crate) next: Option<NodeId>,
    pub(crate) child_head: Option<NodeId>,
    pub(crate) num_children: u32,
    /// Resume points of in-flight `for_each_child` walks over this node
    pub(crate) traversing_stack: Vec<Option<NodeId>>,

    pub(crate) components: SmallVec<[Box<dyn Component>; 2]>,

    // Local transform. Translation lives only in `local_matrix`.
    pub(crate) local_rotation: Quat,
    pub(crate) local_scale: Vec3,
    pub(crate) local_matrix: Cell<Mat4>,

    // Derived
    pub(crate) world_rotation: Cell<Quat>,
    pub(crate) world_matrix: Cell<Mat4>,
    pub(crate) inverse_world_matrix: Cell<Mat4>,

    /// Own tint, `None` meaning opaque white
    pub(crate) color: Option<Color>,
    /// Tint composed with all ancestors, `None` meaning equal to own tint
    pub(crate) cascade_color: Cell<Option<Color>>,

    pub(crate) dirty: Cell<DirtyFlags>,
}

impl Node {
    pub(crate) fn new(name: String, config: &SceneGraphConfig) -> Self {
        Self {
            name,
            layer: config.default_layer,
            active: config.default_active,
            ref_count: 1,
            parent: None,
            // Patched to the real handle once the slot is allocated
            root: NodeId {
                index: u32::MAX,
                generation: 0,
            },
            prev: None,
            next: None,
            child_head: None,
            num_children: 0,
            traversing_stack: Vec::new(),
            components: SmallVec::new(),
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,
            local_matrix: Cell::new(Mat4::IDENTITY),
            world_rotation: Cell::new(Quat::IDENTITY),
            world_matrix: Cell::new(Mat4::IDENTITY),
            inverse_world_matrix: Cell::new(Mat4::IDENTITY),
            color: None,
            cascade_color: Cell::new(None),
            dirty: Cell::new(DirtyFlags::NONE),
        }
    }

    // -------------------------------------------------------------------------
    // Metadata
    // -------------------------------------------------------------------------

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Layer bitmask.
    #[must_use]
    #[inline]
    pub const fn layer(&self) -> u32 {
        self.layer
    }

    pub fn set_layer(&mut self, layer: u32) {
        self.layer = layer;
    }

    #[must_use]
    #[inline]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // -------------------------------------------------------------------------
    // Structure (read-only)
    // -------------------------------------------------------------------------

    #[must_use]
    #[inline]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Topmost ancestor of this node.
    #[must_use]
    #[inline]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    #[inline]
    pub const fn num_children(&self) -> u32 {
        self.num_children
    }

    #[must_use]
    #[inline]
    pub const fn first_child(&self) -> Option<NodeId> {
        self.child_head
    }

    #[must_use]
    #[inline]
    pub const fn ref_count(&self) -> u32 {
        self.ref_count
    }

    /// Cached values currently marked stale.
    #[must_use]
    #[inline]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty.get()
    }

    /// Own tint, if one was ever set.
    #[must_use]
    #[inline]
    pub const fn color(&self) -> Option<Color> {
        self.color
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    #[inline]
    pub(crate) fn mark(&self, flags: DirtyFlags) {
        self.dirty.set(self.dirty.get() | flags);
    }

    #[inline]
    pub(crate) fn clean(&self, flags: DirtyFlags) {
        self.dirty.set(self.dirty.get().difference(flags));
    }

    #[inline]
    pub(crate) fn is_dirty(&self, flags: DirtyFlags) -> bool {
        self.dirty.get().intersects(flags)
    }

    /// Own tint with the implicit white default applied.
    #[inline]
    pub(crate) fn own_color(&self) -> Color {
        self.color.unwrap_or(Color::WHITE)
    }

    /// Cascade color as currently cached, without refreshing it.
    #[inline]
    pub(crate) fn cached_cascade(&self) -> Color {
        self.cascade_color.get().unwrap_or_else(|| self.own_color())
    }

    /// Local translation, read from the matrix that stores it.
    #[inline]
    pub(crate) fn local_translation(&self) -> Vec3 {
        self.local_matrix.get().w_axis.truncate()
    }
}
