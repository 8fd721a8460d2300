use std::collections::{HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::model::{GroupMetadata, LayoutNode, NodeKind};

use super::resolve_size;

/// Materializes group membership metadata onto a flat, already-positioned
/// node list: computes each group's bounding box from its members, creates
/// the container, reparents members with container-relative positions, and
/// orders the result so containers precede their children. Requests whose
/// members are all missing are skipped; no empty containers are created.
pub fn apply_grouping(
    nodes: &[LayoutNode],
    groups: &[GroupMetadata],
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    let by_id: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();

    let mut claimed: HashSet<&str> = HashSet::new();
    let mut materialized: Vec<(&GroupMetadata, Vec<usize>)> = Vec::new();
    for group in groups {
        let mut members = Vec::new();
        for id in &group.node_ids {
            if let Some(&idx) = by_id.get(id.as_str())
                && !claimed.contains(id.as_str())
            {
                claimed.insert(nodes[idx].id.as_str());
                members.push(idx);
            }
        }
        if !members.is_empty() {
            materialized.push((group, members));
        }
    }

    let padding = config.group.padding;
    let header = config.group.header_inset;
    let mut out = Vec::with_capacity(nodes.len() + materialized.len());
    for node in nodes {
        if !claimed.contains(node.id.as_str()) {
            out.push(node.clone());
        }
    }

    for (group, members) in materialized {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for &idx in &members {
            let node = &nodes[idx];
            let (width, height) = resolve_size(node, config);
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.x + width);
            max_y = max_y.max(node.y + height);
        }

        let group_x = min_x - padding;
        let group_y = min_y - padding - header;
        let mut container = LayoutNode::new(group.id.clone(), NodeKind::Group);
        container.label = Some(group.label.clone());
        container.x = group_x;
        container.y = group_y;
        container.style_width = Some(max_x - min_x + 2.0 * padding);
        container.style_height = Some(max_y - min_y + 2.0 * padding + header);
        out.push(container);

        for &idx in &members {
            let mut member = nodes[idx].clone();
            member.x -= group_x;
            member.y -= group_y;
            member.parent_id = Some(group.id.clone());
            member.clamp_to_parent = true;
            out.push(member);
        }
    }
    out
}

/// Refits every existing group container around its current children:
/// recomputes the combined bounding box, derives the container size the same
/// way `apply_grouping` does, and re-centers the children horizontally while
/// anchoring them below the label header. Parent relations are not changed.
pub fn fit_group_bounds(nodes: &[LayoutNode], config: &LayoutConfig) -> Vec<LayoutNode> {
    let padding = config.group.padding;
    let header = config.group.header_inset;

    let mut children_of: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        if let Some(parent) = node.parent_id.as_deref() {
            children_of.entry(parent).or_default().push(idx);
        }
    }

    let mut out: Vec<LayoutNode> = nodes.to_vec();
    for (idx, node) in nodes.iter().enumerate() {
        if !node.kind.is_group() {
            continue;
        }
        let Some(kids) = children_of.get(node.id.as_str()) else {
            continue;
        };

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for &kid in kids {
            let child = &nodes[kid];
            let (width, height) = resolve_size(child, config);
            min_x = min_x.min(child.x);
            min_y = min_y.min(child.y);
            max_x = max_x.max(child.x + width);
            max_y = max_y.max(child.y + height);
        }

        let content_width = max_x - min_x;
        let content_height = max_y - min_y;
        let group_width = content_width + 2.0 * padding;
        let group_height = content_height + 2.0 * padding + header;
        out[idx].style_width = Some(group_width);
        out[idx].style_height = Some(group_height);

        // Content centered horizontally, anchored below the header.
        let dx = (group_width - content_width) / 2.0 - min_x;
        let dy = header + padding - min_y;
        for &kid in kids {
            out[kid].x += dx;
            out[kid].y += dy;
        }
    }
    out
}
