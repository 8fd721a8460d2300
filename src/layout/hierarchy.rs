use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{Direction, LayoutEdge};

use super::{LayoutOptions, Placed};

/// Identifies the single root of a strict hierarchy: every node has at most
/// one incoming edge, exactly one node has none, and every node is reachable
/// from it without cycles. Returns `None` otherwise.
pub(super) fn strict_root(ids: &[String], edges: &[LayoutEdge]) -> Option<String> {
    let id_set: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut incoming: HashMap<&str, usize> = HashMap::new();
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        if !id_set.contains(edge.source.as_str()) || !id_set.contains(edge.target.as_str()) {
            continue;
        }
        *incoming.entry(edge.target.as_str()).or_insert(0) += 1;
        children
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }
    if incoming.values().any(|count| *count > 1) {
        return None;
    }
    let mut roots = ids
        .iter()
        .filter(|id| !incoming.contains_key(id.as_str()));
    let root = roots.next()?;
    if roots.next().is_some() {
        return None;
    }

    // Reachability check also rules out cycles among non-root nodes.
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![root.as_str()];
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            return None;
        }
        if let Some(kids) = children.get(current) {
            stack.extend(kids.iter().copied());
        }
    }
    (visited.len() == ids.len()).then(|| root.clone())
}

/// Tree structure derived from edges: `target`'s parent is `source`.
pub(super) struct Forest {
    pub roots: Vec<String>,
    pub children: HashMap<String, Vec<String>>,
}

/// Builds a forest for an arbitrary graph: the first incoming edge wins, self
/// loops and back edges that would close a cycle are skipped.
pub(super) fn build_forest(ids: &[String], edges: &[LayoutEdge]) -> Forest {
    let id_set: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut parent: HashMap<String, String> = HashMap::new();
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    for edge in edges {
        if edge.source == edge.target
            || !id_set.contains(edge.source.as_str())
            || !id_set.contains(edge.target.as_str())
            || parent.contains_key(&edge.target)
        {
            continue;
        }
        // Reject edges whose source already descends from the target.
        let mut current = edge.source.as_str();
        let mut cyclic = false;
        let mut seen: HashSet<&str> = HashSet::new();
        while let Some(next) = parent.get(current) {
            if next == &edge.target || !seen.insert(current) {
                cyclic = true;
                break;
            }
            current = next.as_str();
        }
        if cyclic {
            continue;
        }
        parent.insert(edge.target.clone(), edge.source.clone());
        children
            .entry(edge.source.clone())
            .or_default()
            .push(edge.target.clone());
    }
    let roots = ids
        .iter()
        .filter(|id| !parent.contains_key(*id))
        .cloned()
        .collect();
    Forest { roots, children }
}

fn extents(rect: &Placed, direction: Direction) -> (f32, f32) {
    // (primary, cross): primary runs along the flow axis.
    if direction.is_horizontal() {
        (rect.width, rect.height)
    } else {
        (rect.height, rect.width)
    }
}

fn subtree_cross_extent(
    id: &str,
    forest: &Forest,
    placed: &BTreeMap<String, Placed>,
    direction: Direction,
    sibling_spacing: f32,
    memo: &mut HashMap<String, f32>,
) -> f32 {
    if let Some(value) = memo.get(id) {
        return *value;
    }
    let own = placed
        .get(id)
        .map(|rect| extents(rect, direction).1)
        .unwrap_or(0.0);
    let mut extent = own;
    if let Some(kids) = forest.children.get(id)
        && !kids.is_empty()
    {
        let mut total = 0.0;
        for kid in kids {
            total += subtree_cross_extent(kid, forest, placed, direction, sibling_spacing, memo);
        }
        total += sibling_spacing * (kids.len() as f32 - 1.0);
        extent = extent.max(total);
    }
    memo.insert(id.to_string(), extent);
    extent
}

fn depths(forest: &Forest) -> (HashMap<String, usize>, usize) {
    let mut depth: HashMap<String, usize> = HashMap::new();
    let mut max_depth = 0;
    let mut stack: Vec<(&str, usize)> = forest.roots.iter().map(|r| (r.as_str(), 0)).collect();
    while let Some((id, d)) = stack.pop() {
        depth.insert(id.to_string(), d);
        max_depth = max_depth.max(d);
        if let Some(kids) = forest.children.get(id) {
            stack.extend(kids.iter().map(|kid| (kid.as_str(), d + 1)));
        }
    }
    (depth, max_depth)
}

#[allow(clippy::too_many_arguments)]
fn assign(
    id: &str,
    primary: f32,
    cross_start: f32,
    forest: &Forest,
    placed: &BTreeMap<String, Placed>,
    direction: Direction,
    spacing: (f32, f32),
    cross_memo: &HashMap<String, f32>,
    cluster: Option<(&HashMap<String, usize>, usize, f32)>,
    out: &mut HashMap<String, (f32, f32)>,
) {
    let Some(rect) = placed.get(id) else {
        return;
    };
    let (own_primary, own_cross) = extents(rect, direction);
    let subtree = cross_memo.get(id).copied().unwrap_or(own_cross);
    let node_cross = cross_start + (subtree - own_cross) / 2.0;

    // Cluster placement quantizes ranks and drops leaves to the deepest one.
    let node_primary = match cluster {
        Some((depth_map, max_depth, step)) => {
            let is_leaf = forest.children.get(id).map_or(true, Vec::is_empty);
            let depth = if is_leaf {
                max_depth
            } else {
                depth_map.get(id).copied().unwrap_or(0)
            };
            depth as f32 * step
        }
        None => primary,
    };
    out.insert(id.to_string(), (node_primary, node_cross));

    let child_primary = primary + own_primary + spacing.1;
    let mut cursor = cross_start;
    if let Some(kids) = forest.children.get(id) {
        // Center a lone child run under a wider parent.
        let mut total = 0.0;
        for kid in kids {
            total += cross_memo.get(kid).copied().unwrap_or(0.0);
        }
        if kids.len() > 1 {
            total += spacing.0 * (kids.len() as f32 - 1.0);
        }
        cursor = cross_start + (subtree - total) / 2.0;
        for kid in kids {
            let kid_extent = cross_memo.get(kid).copied().unwrap_or(0.0);
            assign(
                kid,
                child_primary,
                cursor,
                forest,
                placed,
                direction,
                spacing,
                cross_memo,
                cluster,
                out,
            );
            cursor += kid_extent + spacing.0;
        }
    }
}

/// Places a forest in abstract (primary, cross) space and maps the result to
/// x/y according to `direction`, mutating `placed`. Roots stack along the
/// cross axis in input order.
pub(super) fn place_forest(
    forest: &Forest,
    placed: &mut BTreeMap<String, Placed>,
    direction: Direction,
    spacing: (f32, f32),
    cluster: bool,
) {
    let mut cross_memo: HashMap<String, f32> = HashMap::new();
    for root in &forest.roots {
        subtree_cross_extent(root, forest, placed, direction, spacing.0, &mut cross_memo);
    }

    let cluster_info = if cluster {
        let (depth_map, max_depth) = depths(forest);
        let max_primary = placed
            .values()
            .map(|rect| extents(rect, direction).0)
            .fold(0.0_f32, f32::max);
        Some((depth_map, max_depth, max_primary + spacing.1))
    } else {
        None
    };

    let mut abstract_pos: HashMap<String, (f32, f32)> = HashMap::new();
    let mut cursor = 0.0;
    for root in &forest.roots {
        let extent = cross_memo.get(root).copied().unwrap_or(0.0);
        assign(
            root,
            0.0,
            cursor,
            forest,
            placed,
            direction,
            spacing,
            &cross_memo,
            cluster_info
                .as_ref()
                .map(|(depth_map, max_depth, step)| (depth_map, *max_depth, *step)),
            &mut abstract_pos,
        );
        cursor += extent + spacing.0;
    }

    for (id, (primary, cross)) in abstract_pos {
        let Some(rect) = placed.get_mut(&id) else {
            continue;
        };
        match direction {
            Direction::Right => {
                rect.x = primary;
                rect.y = cross;
            }
            Direction::Left => {
                rect.x = -(primary + rect.width);
                rect.y = cross;
            }
            Direction::Down => {
                rect.y = primary;
                rect.x = cross;
            }
            Direction::Up => {
                rect.y = -(primary + rect.height);
                rect.x = cross;
            }
        }
    }
}

/// Strict-hierarchy family. Returns false (leaving positions untouched) when
/// the graph has no single unambiguous root.
pub(super) fn layout_hierarchy(
    placed: &mut BTreeMap<String, Placed>,
    ids: &[String],
    edges: &[LayoutEdge],
    options: &LayoutOptions,
    cluster: bool,
) -> bool {
    let Some(root) = strict_root(ids, edges) else {
        return false;
    };
    let mut forest = build_forest(ids, edges);
    // A strict hierarchy has exactly one root.
    forest.roots = vec![root];
    place_forest(&forest, placed, options.direction, options.spacing, cluster);
    true
}

/// Shifts all placed rectangles so the leftmost node sits exactly at the
/// root padding, and the topmost at the same offset.
pub(super) fn shift_to_root_padding(placed: &mut BTreeMap<String, Placed>, padding: f32) {
    let Some((min_x, min_y, _, _)) = super::bounds_of(placed.values()) else {
        return;
    };
    let dx = padding - min_x;
    let dy = padding - min_y;
    for rect in placed.values_mut() {
        rect.x += dx;
        rect.y += dy;
    }
}
