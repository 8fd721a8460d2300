use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::model::{Algorithm, AlgorithmFamily, Direction, Document, LayoutEdge, LayoutNode};

mod collision;
mod compound;
mod force;
mod grid;
mod grouping;
mod handles;
mod hierarchy;
mod layered;
mod radial;
mod ranked;
mod size;
mod stress;
mod tree;

pub use collision::resolve_collisions;
pub use grouping::{apply_grouping, fit_group_bounds};
pub use handles::infer_handles;
pub use size::resolve_size;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub direction: Direction,
    /// `(between_siblings, between_ranks)` in pixels.
    pub spacing: (f32, f32),
    pub algorithm: Algorithm,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Right,
            spacing: (60.0, 80.0),
            algorithm: Algorithm::Layered,
        }
    }
}

/// Result snapshot returned by every layout call. The input collections are
/// never mutated; callers decide whether to replace or merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

/// Working state for one layout call: absolute top-left rectangle per node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placed {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Lays out a node/edge snapshot and returns a new snapshot with updated
/// positions and normalized edge handles. Dangling edges (an endpoint id not
/// present in the node set) are dropped from the output.
pub fn compute_layout(
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> Layout {
    let parents = valid_parents(nodes);
    let mut placed = absolute_placed(nodes, &parents, config);
    let edges: Vec<LayoutEdge> = edges
        .iter()
        .filter(|edge| placed.contains_key(&edge.source) && placed.contains_key(&edge.target))
        .cloned()
        .collect();
    let ids: Vec<String> = nodes.iter().map(|node| node.id.clone()).collect();

    let mut hierarchy_ids: HashSet<String> = HashSet::new();
    match options.algorithm.family() {
        AlgorithmFamily::Hierarchy => {
            let cluster = options.algorithm == Algorithm::Cluster;
            if hierarchy::layout_hierarchy(&mut placed, &ids, &edges, options, cluster) {
                hierarchy::shift_to_root_padding(&mut placed, config.hierarchy.root_padding);
                hierarchy_ids = ids.iter().cloned().collect();
            }
        }
        AlgorithmFamily::Ranked => {
            ranked::layout_ranked(&mut placed, nodes, &edges, options);
        }
        AlgorithmFamily::Layered => {
            layered::layout_family(&mut placed, nodes, &edges, &parents, options, config);
            // The root shift only applies when the flat graph is provably a
            // tree; for general graphs it is a no-op.
            if parents.is_empty() && hierarchy::strict_root(&ids, &edges).is_some() {
                hierarchy::shift_to_root_padding(&mut placed, config.hierarchy.root_padding);
            }
        }
    }

    let out_nodes = write_back(nodes, &parents, &placed);
    let out_edges = handles::normalize_handles(edges, &hierarchy_ids, options.direction);
    Layout {
        nodes: out_nodes,
        edges: out_edges,
    }
}

/// Full document pipeline: layout, then (when group metadata is present)
/// materialize the groups and run a second layout pass so inter-group
/// spacing accounts for the new containers.
pub fn layout_document(doc: &Document, options: &LayoutOptions, config: &LayoutConfig) -> Layout {
    let first = compute_layout(&doc.nodes, &doc.edges, options, config);
    if doc.groups.is_empty() {
        return first;
    }
    let grouped = apply_grouping(&first.nodes, &doc.groups, config);
    compute_layout(&grouped, &first.edges, options, config)
}

/// Maps each node to its parent, keeping only parents that resolve to a node
/// in the same input set and whose chain does not cycle. Anything else is
/// treated as absent.
pub(crate) fn valid_parents(nodes: &[LayoutNode]) -> HashMap<String, String> {
    let mut raw: HashMap<&str, &str> = HashMap::new();
    let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    for node in nodes {
        if let Some(parent) = node.parent_id.as_deref()
            && ids.contains(parent)
            && parent != node.id
        {
            raw.insert(node.id.as_str(), parent);
        }
    }

    let mut parents = HashMap::new();
    for node in nodes {
        let Some(parent) = raw.get(node.id.as_str()) else {
            continue;
        };
        // Guard against parent cycles on malformed input.
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(node.id.as_str());
        let mut current = *parent;
        let mut cyclic = false;
        while let Some(next) = raw.get(current) {
            if !seen.insert(current) {
                cyclic = true;
                break;
            }
            current = next;
        }
        if !cyclic && seen.insert(current) {
            parents.insert(node.id.clone(), (*parent).to_string());
        }
    }
    parents
}

/// Resolves every node to an absolute rectangle (child positions in the input
/// are relative to their parent).
pub(crate) fn absolute_placed(
    nodes: &[LayoutNode],
    parents: &HashMap<String, String>,
    config: &LayoutConfig,
) -> BTreeMap<String, Placed> {
    let by_id: HashMap<&str, &LayoutNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let mut placed = BTreeMap::new();
    for node in nodes {
        let (width, height) = resolve_size(node, config);
        let (mut x, mut y) = (node.x, node.y);
        let mut current = node.id.as_str();
        while let Some(parent) = parents.get(current) {
            if let Some(parent_node) = by_id.get(parent.as_str()) {
                x += parent_node.x;
                y += parent_node.y;
            }
            current = parent.as_str();
        }
        placed.insert(node.id.clone(), Placed { x, y, width, height });
    }
    placed
}

/// Converts the absolute working rectangles back into caller-facing nodes,
/// preserving input order and relative positioning for children.
fn write_back(
    nodes: &[LayoutNode],
    parents: &HashMap<String, String>,
    placed: &BTreeMap<String, Placed>,
) -> Vec<LayoutNode> {
    nodes
        .iter()
        .map(|node| {
            let mut out = node.clone();
            let Some(rect) = placed.get(&node.id) else {
                return out;
            };
            let (mut x, mut y) = (rect.x, rect.y);
            if let Some(parent) = parents.get(&node.id)
                && let Some(parent_rect) = placed.get(parent)
            {
                x -= parent_rect.x;
                y -= parent_rect.y;
            }
            out.x = x;
            out.y = y;
            if node.kind.is_group() {
                out.style_width = Some(rect.width);
                out.style_height = Some(rect.height);
            }
            out
        })
        .collect()
}

/// Bounding box over a set of placed rectangles. Returns `None` for an empty
/// set.
pub(crate) fn bounds_of<'a, I>(rects: I) -> Option<(f32, f32, f32, f32)>
where
    I: IntoIterator<Item = &'a Placed>,
{
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    let mut any = false;
    for rect in rects {
        any = true;
        min_x = min_x.min(rect.x);
        min_y = min_y.min(rect.y);
        max_x = max_x.max(rect.x + rect.width);
        max_y = max_y.max(rect.y + rect.height);
    }
    any.then_some((min_x, min_y, max_x - min_x, max_y - min_y))
}
