use std::path::Path;

use serde::{Deserialize, Serialize};

/// Primary flow axis of a layout. Unknown tokens fall back to `Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down,
    Up,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "down" | "tb" | "td" => Self::Down,
            "up" | "bt" => Self::Up,
            "left" | "rl" => Self::Left,
            _ => Self::Right,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Layout strategy. Unknown names fall back to the default layered strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Layered,
    Tree,
    Grid,
    Force,
    Radial,
    Stress,
    Ranked,
    Hierarchy,
    Cluster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    Layered,
    Ranked,
    Hierarchy,
}

impl Algorithm {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "tree" | "mrtree" => Self::Tree,
            "grid" | "box" => Self::Grid,
            "force" => Self::Force,
            "radial" => Self::Radial,
            "stress" => Self::Stress,
            "ranked" | "dagre" => Self::Ranked,
            "hierarchy" | "tidytree" => Self::Hierarchy,
            "cluster" => Self::Cluster,
            _ => Self::Layered,
        }
    }

    pub fn family(self) -> AlgorithmFamily {
        match self {
            Self::Layered | Self::Tree | Self::Grid | Self::Force | Self::Radial | Self::Stress => {
                AlgorithmFamily::Layered
            }
            Self::Ranked => AlgorithmFamily::Ranked,
            Self::Hierarchy | Self::Cluster => AlgorithmFamily::Hierarchy,
        }
    }
}

/// Side of a node where an edge attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl HandleSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Node kind, used only to pick a default footprint in the size resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Text,
    Media,
    Table,
    Service,
    Icon,
    Group,
    #[default]
    Shape,
}

impl NodeKind {
    pub fn is_group(self) -> bool {
        matches!(self, Self::Group)
    }
}

/// A node as the engine sees it. `x`/`y` are the top-left corner; when
/// `parent_id` is set they are relative to the parent container's top-left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Measured size, if the caller already knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// Explicit style override, primarily set on group containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Whether the node's extent is constrained to stay within its parent.
    #[serde(default)]
    pub clamp_to_parent: bool,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            style_width: None,
            style_height: None,
            parent_id: None,
            clamp_to_parent: false,
        }
    }
}

/// Rendering type of an edge connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Default,
    /// Dedicated connector for edges inside strict-hierarchy layouts.
    Hierarchy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<HandleSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<HandleSide>,
    #[serde(default)]
    pub kind: EdgeKind,
}

impl LayoutEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            kind: EdgeKind::Default,
        }
    }
}

/// A one-shot grouping request: "these node ids belong to group `id` with
/// label `label`". Consumed by the grouping materializer, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub node_ids: Vec<String>,
}

/// JSON exchange format consumed by the CLI and wasm surfaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<LayoutNode>,
    #[serde(default)]
    pub edges: Vec<LayoutEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupMetadata>,
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid layout document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Document {
    pub fn from_str(raw: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_direction_falls_back_to_right() {
        assert_eq!(Direction::from_token("diagonal"), Direction::Right);
        assert_eq!(Direction::from_token("TB"), Direction::Down);
        assert_eq!(Direction::from_token("left"), Direction::Left);
    }

    #[test]
    fn unknown_algorithm_falls_back_to_layered() {
        assert_eq!(Algorithm::from_name("quantum"), Algorithm::Layered);
        assert_eq!(Algorithm::from_name("mrtree"), Algorithm::Tree);
        assert_eq!(Algorithm::from_name("dagre"), Algorithm::Ranked);
        assert_eq!(Algorithm::from_name("cluster").family(), AlgorithmFamily::Hierarchy);
    }

    #[test]
    fn document_parses_minimal_json() {
        let doc = Document::from_str(
            r#"{"nodes":[{"id":"a","kind":"service"}],"edges":[{"id":"e1","source":"a","target":"a"}]}"#,
        )
        .unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].kind, NodeKind::Service);
        assert_eq!(doc.edges[0].kind, EdgeKind::Default);
    }

    #[test]
    fn document_rejects_malformed_json() {
        assert!(Document::from_str("{nodes: [").is_err());
    }
}
