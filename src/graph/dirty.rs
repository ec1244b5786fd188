//! Dirty-flag lattice for cached node state
//!
//! Each bit marks one cached derived value as stale. Edits OR bits in;
//! recomputation clears exactly the bit it refreshed.
//!
//! # Propagation semantics
//!
//! Every bit except [`DirtyFlags::LOCAL_MAT`] is *inherited*: a node's world
//! matrix, inverse world matrix, world rotation and cascade color all depend
//! on its parent's, so an edit pushes the inherited subset into every
//! descendant. A child's local matrix never depends on its ancestors.
//!
//! Because a descendant can only clear an inherited bit after its parent has
//! cleared it, a node holding an inherited bit implies every descendant holds
//! it too. Propagation relies on this to stop at the first descendant that
//! already holds every pushed bit.
//!
//! Which bits an edit sets, clears and pushes is written down once, in
//! [`Edit::transition`].

use bitflags::bitflags;

bitflags! {
    /// A set of stale cached values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// Local matrix rotation/scale block is stale
        const LOCAL_MAT = 1 << 0;
        /// World matrix is stale
        const WORLD_MAT = 1 << 1;
        /// Inverse world matrix is stale
        const INV_WORLD_MAT = 1 << 2;
        /// World rotation is stale
        const WORLD_ROT = 1 << 3;
        /// Cascade color is stale
        const CASCADE_COLOR = 1 << 4;
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl DirtyFlags {
    /// Nothing stale
    pub const NONE: Self = Self::empty();

    pub const WORLD_AND_INV_MAT: Self = Self::WORLD_MAT.union(Self::INV_WORLD_MAT);
    pub const WORLD_ALL: Self = Self::WORLD_AND_INV_MAT.union(Self::WORLD_ROT);
    pub const LOCAL_AND_WORLD_ALL: Self = Self::LOCAL_MAT.union(Self::WORLD_ALL);
    pub const LOCAL_AND_WORLD_EXCEPT_WORLD_ROT: Self =
        Self::LOCAL_AND_WORLD_ALL.difference(Self::WORLD_ROT);
    pub const ALL_MAT: Self = Self::LOCAL_MAT.union(Self::WORLD_AND_INV_MAT);
    pub const ALL: Self = Self::LOCAL_AND_WORLD_ALL.union(Self::CASCADE_COLOR);

    /// The subset of these bits that descendants receive.
    #[must_use]
    #[inline]
    pub const fn inherited(self) -> Self {
        self.difference(Self::LOCAL_MAT)
    }
}

// ============================================================================
// Edit transitions
// ============================================================================

/// Kinds of writes that invalidate cached node state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edit {
    /// Local translation changed
    LocalPosition,
    /// Local rotation changed
    LocalRotation,
    /// Local scale changed
    LocalScale,
    /// Full local matrix written; rotation and scale decomposed from it
    LocalMatrix,
    /// Translation, rotation and scale all written
    LocalTrs,
    /// World translation written; local translation solved from it
    WorldPosition,
    /// World rotation written; local rotation solved from it
    WorldRotation,
    /// Full world matrix written; local matrix solved from it
    WorldMatrix,
    /// Own tint changed
    Color,
}

/// Bits an [`Edit`] sets and clears on the edited node, and pushes to its
/// descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyTransition {
    pub set: DirtyFlags,
    pub clear: DirtyFlags,
    pub propagate: DirtyFlags,
}

impl DirtyTransition {
    const fn new(set: DirtyFlags, clear: DirtyFlags, propagate: DirtyFlags) -> Self {
        Self {
            set,
            clear,
            propagate,
        }
    }

    /// Apply to a node's current flags.
    #[must_use]
    #[inline]
    pub const fn apply(self, dirty: DirtyFlags) -> DirtyFlags {
        dirty.difference(self.clear).union(self.set)
    }
}

impl Edit {
    /// The propagation table.
    #[must_use]
    pub const fn transition(self) -> DirtyTransition {
        use DirtyFlags as D;

        match self {
            Self::LocalPosition => {
                DirtyTransition::new(D::WORLD_AND_INV_MAT, D::NONE, D::WORLD_AND_INV_MAT)
            }
            Self::LocalRotation => {
                DirtyTransition::new(D::LOCAL_AND_WORLD_ALL, D::NONE, D::WORLD_ALL)
            }
            Self::LocalScale => DirtyTransition::new(D::ALL_MAT, D::NONE, D::WORLD_AND_INV_MAT),
            Self::LocalMatrix => DirtyTransition::new(D::WORLD_ALL, D::LOCAL_MAT, D::WORLD_ALL),
            Self::LocalTrs => DirtyTransition::new(D::LOCAL_AND_WORLD_ALL, D::NONE, D::WORLD_ALL),
            Self::WorldPosition => {
                DirtyTransition::new(D::INV_WORLD_MAT, D::NONE, D::WORLD_AND_INV_MAT)
            }
            // The world rotation was just written, so it is the one value
            // that is already current.
            Self::WorldRotation => DirtyTransition::new(
                D::LOCAL_AND_WORLD_EXCEPT_WORLD_ROT,
                D::WORLD_ROT,
                D::WORLD_ALL,
            ),
            Self::WorldMatrix => DirtyTransition::new(
                D::INV_WORLD_MAT.union(D::WORLD_ROT),
                D::WORLD_MAT.union(D::LOCAL_MAT),
                D::WORLD_ALL,
            ),
            Self::Color => DirtyTransition::new(D::CASCADE_COLOR, D::NONE, D::CASCADE_COLOR),
        }
    }
}
