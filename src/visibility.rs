//! Per-layer geometry visibility.
//!
//! Layers unknown to the store are treated as fully visible.

use crate::models::VectorLayer;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Geometry kinds a vector layer is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Fill,
    Line,
    Circle,
}

impl LayerType {
    pub const ALL: [LayerType; 3] = [LayerType::Fill, LayerType::Line, LayerType::Circle];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Fill => "fill",
            LayerType::Line => "line",
            LayerType::Circle => "circle",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fill" => Ok(LayerType::Fill),
            "line" => Ok(LayerType::Line),
            "circle" => Ok(LayerType::Circle),
            other => Err(format!("unknown layer type: {other}")),
        }
    }
}

/// Visibility flags of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    pub fill: bool,
    pub line: bool,
    pub circle: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            fill: true,
            line: true,
            circle: true,
        }
    }
}

impl LayerVisibility {
    pub fn get(&self, kind: LayerType) -> bool {
        match kind {
            LayerType::Fill => self.fill,
            LayerType::Line => self.line,
            LayerType::Circle => self.circle,
        }
    }

    pub fn set(&mut self, kind: LayerType, visible: bool) {
        match kind {
            LayerType::Fill => self.fill = visible,
            LayerType::Line => self.line = visible,
            LayerType::Circle => self.circle = visible,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayerVisibilityStore {
    layers: AHashMap<String, LayerVisibility>,
}

impl LayerVisibilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from tileset metadata; every listed layer starts fully visible.
    pub fn set_layers_from_metadata(&mut self, layers: &[VectorLayer]) {
        self.layers = layers
            .iter()
            .map(|l| (l.id.clone(), LayerVisibility::default()))
            .collect();
        log::debug!("visibility reset for {} layer(s)", self.layers.len());
    }

    /// Flip one geometry flag. Unknown layers are ignored.
    pub fn toggle_layer_type(&mut self, layer_id: &str, kind: LayerType, visible: bool) {
        if let Some(v) = self.layers.get_mut(layer_id) {
            v.set(kind, visible);
        }
    }

    pub fn layer_visibility(&self, layer_id: &str, kind: LayerType) -> bool {
        self.layers.get(layer_id).map(|v| v.get(kind)).unwrap_or(true)
    }

    pub fn clear_layers(&mut self) {
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Sorted copy of the map for display or serialization.
    pub fn snapshot(&self) -> BTreeMap<String, LayerVisibility> {
        self.layers
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}
