use std::collections::{BTreeMap, HashMap, HashSet};

use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

use crate::model::{Direction, LayoutEdge, LayoutNode};

use super::{LayoutOptions, Placed};

fn dagre_rankdir(direction: Direction) -> &'static str {
    match direction {
        Direction::Down => "tb",
        Direction::Up => "bt",
        Direction::Left => "rl",
        Direction::Right => "lr",
    }
}

/// Runs the rank solver over a node subset and returns top-left positions
/// keyed by id. `None` when the solver applied no coordinates.
pub(super) fn place_dagre(
    ids: &[String],
    edges: &[LayoutEdge],
    placed: &BTreeMap<String, Placed>,
    direction: Direction,
    spacing: (f32, f32),
) -> Option<HashMap<String, (f32, f32)>> {
    if ids.is_empty() {
        return None;
    }

    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some(dagre_rankdir(direction).to_string());
    graph_config.nodesep = Some(spacing.0);
    graph_config.ranksep = Some(spacing.1);
    graph_config.marginx = Some(8.0);
    graph_config.marginy = Some(8.0);
    dagre_graph.set_graph(graph_config);

    for (order, node_id) in ids.iter().enumerate() {
        let Some(rect) = placed.get(node_id) else {
            continue;
        };
        let mut node = DagreNode::default();
        node.width = rect.width;
        node.height = rect.height;
        node.order = Some(order);
        dagre_graph.set_node(node_id.clone(), Some(node));
    }

    let node_set: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut edge_set: HashSet<(String, String)> = HashSet::new();
    for edge in edges {
        if !node_set.contains(edge.source.as_str()) || !node_set.contains(edge.target.as_str()) {
            continue;
        }
        let from = edge.source.clone();
        let to = edge.target.clone();
        if !edge_set.insert((from.clone(), to.clone())) {
            continue;
        }
        let edge_label = DagreEdge::default();
        let _ = dagre_graph.set_edge(&from, &to, Some(edge_label), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    let mut positions = HashMap::new();
    for node_id in ids {
        let Some(dagre_node) = dagre_graph.node(node_id) else {
            continue;
        };
        let Some(rect) = placed.get(node_id) else {
            continue;
        };
        // The solver reports node centers; convert to top-left.
        positions.insert(
            node_id.clone(),
            (dagre_node.x - rect.width / 2.0, dagre_node.y - rect.height / 2.0),
        );
    }

    (!positions.is_empty()).then_some(positions)
}

/// Rank-based family: single-pass hierarchical ranking for flat graphs.
/// Group containers are excluded (no native nesting); when the solver yields
/// nothing the pass degrades to identity rather than failing.
pub(super) fn layout_ranked(
    placed: &mut BTreeMap<String, Placed>,
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    options: &LayoutOptions,
) {
    let ids: Vec<String> = nodes
        .iter()
        .filter(|node| !node.kind.is_group())
        .map(|node| node.id.clone())
        .collect();
    let group_ids: HashSet<&str> = nodes
        .iter()
        .filter(|node| node.kind.is_group())
        .map(|node| node.id.as_str())
        .collect();
    let flat_edges: Vec<LayoutEdge> = edges
        .iter()
        .filter(|edge| {
            !group_ids.contains(edge.source.as_str()) && !group_ids.contains(edge.target.as_str())
        })
        .cloned()
        .collect();

    let Some(positions) = place_dagre(&ids, &flat_edges, placed, options.direction, options.spacing)
    else {
        return;
    };
    for (id, (x, y)) in positions {
        if let Some(rect) = placed.get_mut(&id) {
            rect.x = x;
            rect.y = y;
        }
    }
}
