//! Scene graph configuration

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Layer mask with every bit set; new nodes belong to all layers.
pub const ALL_LAYERS: u32 = u32::MAX;

/// Scene graph configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneGraphConfig {
    /// Number of node slots reserved up front
    pub initial_capacity: usize,
    /// Layer mask given to newly created nodes
    pub default_layer: u32,
    /// Whether newly created nodes start active
    pub default_active: bool,
    /// Resume slots reserved per node on its first child traversal
    pub traversal_stack_capacity: usize,
}

impl Default for SceneGraphConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            default_layer: ALL_LAYERS,
            default_active: true,
            traversal_stack_capacity: 4,
        }
    }
}

impl SceneGraphConfig {
    /// Set the number of node slots reserved up front
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the layer mask for new nodes
    pub fn with_default_layer(mut self, layer: u32) -> Self {
        self.default_layer = layer;
        self
    }

    /// Set whether new nodes start active
    pub fn with_default_active(mut self, active: bool) -> Self {
        self.default_active = active;
        self
    }

    /// Set the traversal stack reservation
    pub fn with_traversal_stack_capacity(mut self, capacity: usize) -> Self {
        self.traversal_stack_capacity = capacity;
        self
    }

    /// Parse a configuration from RON text. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_ron(text: &str) -> Result<Self, SceneError> {
        ron::from_str(text).map_err(|e| SceneError::ConfigError(e.to_string()))
    }
}
