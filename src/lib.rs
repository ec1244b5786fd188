//! A scene graph with lazy transform and color propagation
//!
//! This crate provides:
//! - A node hierarchy stored in a generational arena, with an intrusive
//!   sibling list and reference-counted ownership
//! - Lazily recomputed local, world and inverse world matrices, world
//!   rotation and cascaded tint color, driven by dirty flags
//! - Child traversal that tolerates restructuring from inside the callback
//! - Typed components hosted by nodes
//! - RON/JSON scene snapshots

pub mod component;
pub mod config;
pub mod error;
pub mod graph;
pub mod math;
pub mod snapshot;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::component::Component;
    pub use crate::config::{ALL_LAYERS, SceneGraphConfig};
    pub use crate::error::SceneError;
    pub use crate::graph::{DirtyFlags, Edit, Node, NodeId, SceneGraph};
    pub use crate::math::{Color, Transform};
    pub use crate::snapshot::{SceneSnapshot, SerializedNode};
    pub use glam::{Mat4, Quat, Vec3, Vec4};
}
