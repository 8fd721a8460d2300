use std::collections::{BTreeMap, HashMap};

use crate::config::LayoutConfig;
use crate::model::LayoutEdge;

use super::{hierarchy, LayoutOptions, Placed};

/// Multi-root free-tree strategy: derives a spanning forest from the edges
/// (first incoming edge wins, cycles broken) and places each tree with the
/// tidy placement, stacking roots along the cross axis.
pub(super) fn place(
    ids: &[String],
    edges: &[LayoutEdge],
    placed: &BTreeMap<String, Placed>,
    options: &LayoutOptions,
    _config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let forest = hierarchy::build_forest(ids, edges);
    let mut scratch: BTreeMap<String, Placed> = ids
        .iter()
        .filter_map(|id| placed.get(id).map(|rect| (id.clone(), *rect)))
        .collect();
    hierarchy::place_forest(&forest, &mut scratch, options.direction, options.spacing, false);
    scratch
        .into_iter()
        .map(|(id, rect)| (id, (rect.x, rect.y)))
        .collect()
}
