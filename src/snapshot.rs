//! Scene snapshots
//!
//! A [`SceneSnapshot`] is a flat, serializable description of a subtree:
//! names, layers, local transforms, tints and the parent/child structure.
//! Snapshots save and load as RON or JSON.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::graph::{NodeId, SceneGraph};
use crate::math::{Color, Transform};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// One node in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    pub name: String,
    #[serde(default = "default_layer")]
    pub layer: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Local transform
    #[serde(default)]
    pub transform: Transform,
    /// Own tint, absent for untinted nodes
    #[serde(default)]
    pub color: Option<Color>,
    /// Index of the parent node (if any)
    #[serde(default)]
    pub parent_index: Option<usize>,
    /// Child node indices, in sibling order
    #[serde(default)]
    pub children_indices: Vec<usize>,
}

fn default_layer() -> u32 {
    crate::config::ALL_LAYERS
}

fn default_active() -> bool {
    true
}

impl Default for SerializedNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            layer: default_layer(),
            active: true,
            transform: Transform::IDENTITY,
            color: None,
            parent_index: None,
            children_indices: Vec::new(),
        }
    }
}

/// A serializable subtree. The first node is the subtree's root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Snapshot name
    pub name: String,
    /// Format version for compatibility
    pub version: u32,
    /// Nodes in depth-first order
    pub nodes: Vec<SerializedNode>,
}

impl SceneSnapshot {
    /// Create a new empty snapshot
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: SNAPSHOT_VERSION,
            nodes: Vec::new(),
        }
    }

    /// Record the subtree rooted at `root`. Stale handles give an empty
    /// snapshot.
    #[must_use]
    pub fn capture(graph: &SceneGraph, root: NodeId) -> Self {
        let mut snapshot = Self::new(
            graph
                .node(root)
                .map(|n| n.name().to_string())
                .unwrap_or_default(),
        );
        if !graph.is_alive(root) {
            return snapshot;
        }

        let mut indices: FxHashMap<NodeId, usize> = FxHashMap::default();
        for id in std::iter::once(root).chain(graph.descendants(root)) {
            let Some(node) = graph.node(id) else {
                continue;
            };
            let index = snapshot.nodes.len();
            indices.insert(id, index);

            let parent_index = if id == root {
                None
            } else {
                node.parent().and_then(|p| indices.get(&p).copied())
            };
            if let Some(parent_index) = parent_index {
                snapshot.nodes[parent_index].children_indices.push(index);
            }

            snapshot.nodes.push(SerializedNode {
                name: node.name().to_string(),
                layer: node.layer(),
                active: node.is_active(),
                transform: graph.local_transform(id).unwrap_or_default(),
                color: node.color(),
                parent_index,
                children_indices: Vec::new(),
            });
        }

        log::debug!("captured {} nodes into snapshot {:?}", snapshot.nodes.len(), snapshot.name);
        snapshot
    }

    /// Build the snapshot's nodes into `graph`.
    ///
    /// Returns the detached root, owned by the caller, or `None` for an empty
    /// snapshot. Nodes unreachable from the first node's child lists are
    /// dropped.
    pub fn instantiate(&self, graph: &mut SceneGraph) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }

        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|data| {
                let id = graph.create_named(data.name.clone());
                if let Some(node) = graph.node_mut(id) {
                    node.set_layer(data.layer);
                    node.set_active(data.active);
                }
                graph.set_local_transform(id, &data.transform);
                if let Some(color) = data.color {
                    graph.set_color(id, color);
                }
                id
            })
            .collect();

        for (index, data) in self.nodes.iter().enumerate() {
            for &child_index in &data.children_indices {
                match ids.get(child_index) {
                    Some(&child) if child_index != 0 => {
                        graph.add_child(ids[index], child);
                    }
                    _ => log::warn!("snapshot {:?}: bad child index {child_index}", self.name),
                }
            }
        }

        // Every node but the root is now held by its parent.
        for &id in &ids[1..] {
            graph.release(id);
        }
        Some(ids[0])
    }

    /// Get the number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize to a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, SceneError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::SerializeError(e.to_string()))
    }

    /// Parse from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid snapshot
    pub fn from_ron_str(text: &str) -> Result<Self, SceneError> {
        ron::from_str(text).map_err(|e| SceneError::DeserializeError(e.to_string()))
    }

    /// Save the snapshot to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Load a snapshot from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Save the snapshot to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| SceneError::SerializeError(e.to_string()))?;
        fs::write(path, json_string)?;
        Ok(())
    }

    /// Load a snapshot from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| SceneError::DeserializeError(e.to_string()))
    }
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
