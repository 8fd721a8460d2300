use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::model::{Direction, EdgeKind, HandleSide, LayoutEdge, LayoutNode};

use super::resolve_size;

fn hierarchy_pair(direction: Direction) -> (HandleSide, HandleSide) {
    match direction {
        Direction::Down => (HandleSide::Bottom, HandleSide::Top),
        Direction::Up => (HandleSide::Top, HandleSide::Bottom),
        Direction::Left => (HandleSide::Left, HandleSide::Right),
        Direction::Right => (HandleSide::Right, HandleSide::Left),
    }
}

/// Normalizes connection sides after layout. Edges whose endpoints both
/// belong to the strict-hierarchy subset get the handle pair dictated by the
/// layout direction and the dedicated hierarchy connector type; all other
/// edges keep whatever the caller supplied.
pub(super) fn normalize_handles(
    edges: Vec<LayoutEdge>,
    hierarchy_ids: &HashSet<String>,
    direction: Direction,
) -> Vec<LayoutEdge> {
    edges
        .into_iter()
        .map(|mut edge| {
            if hierarchy_ids.contains(&edge.source) && hierarchy_ids.contains(&edge.target) {
                let (source, target) = hierarchy_pair(direction);
                edge.source_handle = Some(source);
                edge.target_handle = Some(target);
                edge.kind = EdgeKind::Hierarchy;
            }
            edge
        })
        .collect()
}

/// Infers attachment sides from the relative centers of two nodes: when the
/// horizontal distance dominates, the edge leaves through the left/right
/// sides, otherwise through top/bottom. Used by editor layers when the
/// caller supplied no handles.
pub fn infer_handles(
    source: &LayoutNode,
    target: &LayoutNode,
    config: &LayoutConfig,
) -> (HandleSide, HandleSide) {
    let (sw, sh) = resolve_size(source, config);
    let (tw, th) = resolve_size(target, config);
    let dx = (target.x + tw / 2.0) - (source.x + sw / 2.0);
    let dy = (target.y + th / 2.0) - (source.y + sh / 2.0);
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            (HandleSide::Right, HandleSide::Left)
        } else {
            (HandleSide::Left, HandleSide::Right)
        }
    } else if dy >= 0.0 {
        (HandleSide::Bottom, HandleSide::Top)
    } else {
        (HandleSide::Top, HandleSide::Bottom)
    }
}
