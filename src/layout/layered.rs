use std::collections::{BTreeMap, HashMap};

use crate::config::LayoutConfig;
use crate::model::{Algorithm, LayoutEdge, LayoutNode};

use super::{compound, force, grid, radial, ranked, stress, tree, LayoutOptions, Placed};

/// Layered/hierarchical family: solves each group's children in local
/// coordinates (post-order, so nested groups are sized before their parent),
/// derives container sizes, then solves the top level over promoted edges
/// with groups as sized super-nodes.
pub(super) fn layout_family(
    placed: &mut BTreeMap<String, Placed>,
    nodes: &[LayoutNode],
    edges: &[LayoutEdge],
    parents: &HashMap<String, String>,
    options: &LayoutOptions,
    config: &LayoutConfig,
) {
    let graph = compound::build_graph(nodes, parents);
    let padding = config.group.padding;
    let header = config.group.header_inset;

    let mut local: HashMap<String, HashMap<String, (f32, f32)>> = HashMap::new();
    for group_id in &graph.groups_post_order {
        let Some(kids) = graph.children.get(group_id) else {
            continue;
        };
        let level_edges = compound::edges_at_level(edges, parents, Some(group_id));
        let positions = place_subset(kids, &level_edges, placed, options, config);

        let mut content_width = 0.0_f32;
        let mut content_height = 0.0_f32;
        for kid in kids {
            let (Some((x, y)), Some(rect)) = (positions.get(kid), placed.get(kid)) else {
                continue;
            };
            content_width = content_width.max(x + rect.width);
            content_height = content_height.max(y + rect.height);
        }
        let (est_width, est_height) = compound::content_estimate(kids, placed, config);

        if let Some(rect) = placed.get_mut(group_id) {
            rect.width = rect
                .width
                .max(content_width + 2.0 * padding)
                .max(est_width + 2.0 * padding);
            rect.height = rect
                .height
                .max(content_height + 2.0 * padding + header)
                .max(est_height + 2.0 * padding + header);
        }
        local.insert(group_id.clone(), positions);
    }

    let top_edges = compound::edges_at_level(edges, parents, None);
    let top_positions = place_subset(&graph.top_ids, &top_edges, placed, options, config);
    for (id, (x, y)) in &top_positions {
        if let Some(rect) = placed.get_mut(id) {
            rect.x = *x;
            rect.y = *y;
        }
    }

    // Parents before children so container origins are final when their
    // content is anchored.
    for group_id in graph.groups_post_order.iter().rev() {
        let Some(origin) = placed.get(group_id).map(|rect| (rect.x, rect.y)) else {
            continue;
        };
        let Some(positions) = local.get(group_id) else {
            continue;
        };
        for (kid, (x, y)) in positions {
            if let Some(rect) = placed.get_mut(kid) {
                rect.x = origin.0 + padding + x;
                rect.y = origin.1 + header + padding + y;
            }
        }
    }
}

/// Places one nesting level with the selected strategy and normalizes the
/// result so the content's top-left corner sits at the origin.
fn place_subset(
    ids: &[String],
    edges: &[LayoutEdge],
    placed: &BTreeMap<String, Placed>,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let mut positions = match options.algorithm {
        Algorithm::Tree => tree::place(ids, edges, placed, options, config),
        Algorithm::Grid => grid::place(ids, edges, placed, options, config),
        Algorithm::Force => force::place(ids, edges, placed, options, config),
        Algorithm::Radial => radial::place(ids, edges, placed, options, config),
        Algorithm::Stress => stress::place(ids, edges, placed, options, config),
        _ => ranked::place_dagre(ids, edges, placed, options.direction, options.spacing)
            .unwrap_or_else(|| grid::place(ids, edges, placed, options, config)),
    };

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    for (x, y) in positions.values() {
        min_x = min_x.min(*x);
        min_y = min_y.min(*y);
    }
    if min_x != f32::MAX {
        for (x, y) in positions.values_mut() {
            *x -= min_x;
            *y -= min_y;
        }
    }
    positions
}
