use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::NodeKind;

/// Default footprints per node kind. The size resolver consults this table so
/// new kinds can be added without touching layout logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSizeConfig {
    pub text_width: f32,
    pub text_height: f32,
    pub media_width: f32,
    pub media_height: f32,
    pub table_width: f32,
    pub table_height: f32,
    pub service_width: f32,
    pub service_height: f32,
    pub icon_width: f32,
    pub icon_height: f32,
    pub group_width: f32,
    pub group_height: f32,
    pub fallback_width: f32,
    pub fallback_height: f32,
}

impl Default for NodeSizeConfig {
    fn default() -> Self {
        Self {
            text_width: 200.0,
            text_height: 100.0,
            media_width: 240.0,
            media_height: 180.0,
            table_width: 280.0,
            table_height: 200.0,
            service_width: 200.0,
            service_height: 100.0,
            icon_width: 64.0,
            icon_height: 64.0,
            group_width: 400.0,
            group_height: 300.0,
            fallback_width: 150.0,
            fallback_height: 50.0,
        }
    }
}

impl NodeSizeConfig {
    pub fn default_for(&self, kind: NodeKind) -> (f32, f32) {
        match kind {
            NodeKind::Text => (self.text_width, self.text_height),
            NodeKind::Media => (self.media_width, self.media_height),
            NodeKind::Table => (self.table_width, self.table_height),
            NodeKind::Service => (self.service_width, self.service_height),
            NodeKind::Icon => (self.icon_width, self.icon_height),
            NodeKind::Group => (self.group_width, self.group_height),
            NodeKind::Shape => (self.fallback_width, self.fallback_height),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Padding between a group's border and its content, on all sides.
    pub padding: f32,
    /// Extra inset reserved at the top of a group for its label header.
    pub header_inset: f32,
    /// Spacing used when estimating stacked child content before layout.
    pub child_spacing: f32,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            header_inset: 40.0,
            child_spacing: 24.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Fixed offset from the origin at which the tree is anchored after the
    /// root shift.
    pub root_padding: f32,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self { root_padding: 48.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub iterations: usize,
    /// Scale applied to the ideal edge length derived from node sizes.
    pub ideal_length_scale: f32,
    /// Initial displacement limit as a fraction of the layout radius.
    pub initial_temperature: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            ideal_length_scale: 1.25,
            initial_temperature: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialConfig {
    /// Extra clearance added between consecutive rings.
    pub ring_gap: f32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self { ring_gap: 40.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub iterations: usize,
    /// Early-exit threshold on the largest per-node move in one sweep.
    pub epsilon: f32,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            iterations: 120,
            epsilon: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub max_iterations: usize,
    /// Overlaps at or below this depth are left alone.
    pub overlap_threshold: f32,
    /// Margin added around each node before testing for overlap.
    pub margin: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 32,
            overlap_threshold: 2.0,
            margin: 12.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub sizes: NodeSizeConfig,
    pub group: GroupConfig,
    pub hierarchy: HierarchyConfig,
    pub force: ForceConfig,
    pub radial: RadialConfig,
    pub stress: StressConfig,
    pub collision: CollisionConfig,
}

/// Loads a config overlay from a JSON file. Every field defaults, so partial
/// files are fine; no path yields the built-in defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config: LayoutConfig = serde_json::from_str(&contents)?;
    Ok(config)
}
