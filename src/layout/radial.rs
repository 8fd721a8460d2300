use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::config::LayoutConfig;
use crate::model::LayoutEdge;

use super::{LayoutOptions, Placed};

/// Radial placement: the best-connected node of each component becomes the
/// hub, BFS levels become concentric rings, and each subtree gets an angular
/// span proportional to its leaf count. Components line up left to right.
pub(super) fn place(
    ids: &[String],
    edges: &[LayoutEdge],
    placed: &BTreeMap<String, Placed>,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let mut positions = HashMap::new();
    if ids.is_empty() {
        return positions;
    }

    let id_set: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        if source == target || !id_set.contains(source) || !id_set.contains(target) {
            continue;
        }
        adjacency.entry(source).or_default().push(target);
        adjacency.entry(target).or_default().push(source);
    }

    let degree = |id: &str| adjacency.get(id).map(Vec::len).unwrap_or(0);
    let max_diagonal = ids
        .iter()
        .filter_map(|id| placed.get(id))
        .map(|rect| (rect.width * rect.width + rect.height * rect.height).sqrt())
        .fold(0.0_f32, f32::max);
    let ring_step = max_diagonal + config.radial.ring_gap + options.spacing.0;

    let mut visited: HashSet<&str> = HashSet::new();
    let mut component_offset = 0.0_f32;
    loop {
        // Hub election: highest degree among unvisited, input order breaks ties.
        let Some(root) = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !visited.contains(id))
            .max_by_key(|id| (degree(id), std::cmp::Reverse(position_of(ids, id))))
        else {
            break;
        };

        // BFS tree of the component.
        let mut parent: HashMap<&str, &str> = HashMap::new();
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut level: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(root);
        visited.insert(root);
        level.insert(root, 0);
        while let Some(current) = queue.pop_front() {
            order.push(current);
            if let Some(neighbors) = adjacency.get(current) {
                for &next in neighbors {
                    if visited.insert(next) {
                        parent.insert(next, current);
                        children.entry(current).or_default().push(next);
                        level.insert(next, level[current] + 1);
                        queue.push_back(next);
                    }
                }
            }
        }

        let mut leaves: HashMap<&str, usize> = HashMap::new();
        for id in order.iter().rev() {
            let count = children
                .get(id)
                .map(|kids| kids.iter().map(|kid| leaves[kid]).sum::<usize>())
                .filter(|total| *total > 0)
                .unwrap_or(1);
            leaves.insert(id, count);
        }

        // Angular spans: the root owns the full circle, children split their
        // parent's span by leaf weight.
        let tau = std::f32::consts::TAU;
        let mut span: HashMap<&str, (f32, f32)> = HashMap::new();
        span.insert(root, (0.0, tau));
        for id in &order {
            let Some(kids) = children.get(id) else {
                continue;
            };
            let (start, width) = span[id];
            let total: usize = kids.iter().map(|kid| leaves[kid]).sum();
            let mut cursor = start;
            for kid in kids {
                let share = width * leaves[kid] as f32 / total as f32;
                span.insert(kid, (cursor, share));
                cursor += share;
            }
        }

        let mut max_extent = 0.0_f32;
        for id in &order {
            let Some(rect) = placed.get(*id) else {
                continue;
            };
            let (start, width) = span[id];
            let angle = start + width / 2.0;
            let radius = level[id] as f32 * ring_step;
            let cx = component_offset + radius * angle.cos();
            let cy = radius * angle.sin();
            positions.insert(
                (*id).to_string(),
                (cx - rect.width / 2.0, cy - rect.height / 2.0),
            );
            max_extent = max_extent.max(radius + rect.width.max(rect.height));
        }
        component_offset += max_extent * 2.0 + ring_step;
    }

    positions
}

fn position_of(ids: &[String], id: &str) -> usize {
    ids.iter().position(|candidate| candidate == id).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{absolute_placed, valid_parents};
    use crate::model::{LayoutNode, NodeKind};

    fn star() -> (Vec<LayoutNode>, Vec<LayoutEdge>) {
        let mut nodes = vec![LayoutNode::new("hub", NodeKind::Service)];
        let mut edges = Vec::new();
        for i in 0..5 {
            nodes.push(LayoutNode::new(format!("s{i}"), NodeKind::Icon));
            edges.push(LayoutEdge::new(format!("e{i}"), "hub", format!("s{i}")));
        }
        (nodes, edges)
    }

    #[test]
    fn hub_sits_at_the_component_center() {
        let (nodes, edges) = star();
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let config = LayoutConfig::default();
        let parents = valid_parents(&nodes);
        let placed = absolute_placed(&nodes, &parents, &config);
        let positions = place(&ids, &edges, &placed, &LayoutOptions::default(), &config);
        let hub = placed.get("hub").unwrap();
        let (hx, hy) = positions["hub"];
        let (hcx, hcy) = (hx + hub.width / 2.0, hy + hub.height / 2.0);
        for i in 0..5 {
            let key = format!("s{i}");
            let rect = placed.get(&key).unwrap();
            let (x, y) = positions[&key];
            let (cx, cy) = (x + rect.width / 2.0, y + rect.height / 2.0);
            let dist = ((cx - hcx).powi(2) + (cy - hcy).powi(2)).sqrt();
            assert!(dist > 1.0, "satellite {key} collapsed onto the hub");
        }
    }

    #[test]
    fn spokes_share_the_same_ring() {
        let (nodes, edges) = star();
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let config = LayoutConfig::default();
        let parents = valid_parents(&nodes);
        let placed = absolute_placed(&nodes, &parents, &config);
        let positions = place(&ids, &edges, &placed, &LayoutOptions::default(), &config);
        let hub = placed.get("hub").unwrap();
        let (hx, hy) = positions["hub"];
        let (hcx, hcy) = (hx + hub.width / 2.0, hy + hub.height / 2.0);
        let mut radii = Vec::new();
        for i in 0..5 {
            let key = format!("s{i}");
            let rect = placed.get(&key).unwrap();
            let (x, y) = positions[&key];
            let (cx, cy) = (x + rect.width / 2.0, y + rect.height / 2.0);
            radii.push(((cx - hcx).powi(2) + (cy - hcy).powi(2)).sqrt());
        }
        for radius in &radii {
            assert!((radius - radii[0]).abs() < 0.5);
        }
    }
}
