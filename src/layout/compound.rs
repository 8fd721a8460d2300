use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::model::{LayoutEdge, LayoutNode};

use super::Placed;

/// Nesting structure of one layout call. Group nodes become containers; all
/// maps are keyed by node id and preserve input order in their value lists.
#[derive(Debug)]
pub(super) struct CompoundGraph {
    /// Nodes with no (valid) parent, in input order.
    pub top_ids: Vec<String>,
    /// Container ids in post-order, children before their enclosing group.
    pub groups_post_order: Vec<String>,
    /// Direct children per container, in input order.
    pub children: HashMap<String, Vec<String>>,
}

pub(super) fn build_graph(
    nodes: &[LayoutNode],
    parents: &HashMap<String, String>,
) -> CompoundGraph {
    let mut top_ids = Vec::new();
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    for node in nodes {
        match parents.get(&node.id) {
            Some(parent) => children.entry(parent.clone()).or_default().push(node.id.clone()),
            None => top_ids.push(node.id.clone()),
        }
    }

    let mut groups_post_order = Vec::new();
    let mut stack: Vec<(String, bool)> = top_ids
        .iter()
        .rev()
        .filter(|id| children.contains_key(*id))
        .map(|id| (id.clone(), false))
        .collect();
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            groups_post_order.push(id);
            continue;
        }
        stack.push((id.clone(), true));
        if let Some(kids) = children.get(&id) {
            for kid in kids.iter().rev() {
                if children.contains_key(kid) {
                    stack.push((kid.clone(), false));
                }
            }
        }
    }

    CompoundGraph {
        top_ids,
        groups_post_order,
        children,
    }
}

/// Ancestor of `id` that is a direct child of `level` (`None` = top level).
/// Returns `None` when `id` does not live under `level`.
fn ancestor_at_level<'a>(
    id: &'a str,
    parents: &'a HashMap<String, String>,
    level: Option<&str>,
) -> Option<&'a str> {
    let mut current = id;
    loop {
        let parent = parents.get(current).map(String::as_str);
        if parent == level {
            return Some(current);
        }
        current = parent?;
    }
}

/// Edges participating in the layout of one nesting level. Endpoints are
/// promoted to the level's direct children; promoted self-loops are dropped
/// and duplicate promoted pairs are deduped.
pub(super) fn edges_at_level(
    edges: &[LayoutEdge],
    parents: &HashMap<String, String>,
    level: Option<&str>,
) -> Vec<LayoutEdge> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut out = Vec::new();
    for edge in edges {
        let Some(source) = ancestor_at_level(&edge.source, parents, level) else {
            continue;
        };
        let Some(target) = ancestor_at_level(&edge.target, parents, level) else {
            continue;
        };
        if source == target {
            continue;
        }
        if !seen.insert((source.to_string(), target.to_string())) {
            continue;
        }
        let mut promoted = edge.clone();
        promoted.source = source.to_string();
        promoted.target = target.to_string();
        out.push(promoted);
    }
    out
}

/// Pre-layout estimate of a container's content: width from the widest child,
/// height from stacking the children with inter-child spacing.
pub(super) fn content_estimate(
    child_ids: &[String],
    placed: &BTreeMap<String, Placed>,
    config: &LayoutConfig,
) -> (f32, f32) {
    let mut width: f32 = 0.0;
    let mut height: f32 = 0.0;
    let mut count = 0usize;
    for id in child_ids {
        let Some(rect) = placed.get(id) else {
            continue;
        };
        width = width.max(rect.width);
        height += rect.height;
        count += 1;
    }
    if count > 1 {
        height += config.group.child_spacing * (count as f32 - 1.0);
    }
    (width, height)
}
