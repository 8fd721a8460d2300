use std::collections::HashMap;

use crate::config::{CollisionConfig, LayoutConfig};
use crate::model::LayoutNode;

use super::{resolve_size, valid_parents};

/// Iteratively separates overlapping nodes. Every unordered pair is compared
/// in absolute coordinates with each rectangle inflated by the configured
/// margin, so nodes end up with clear space between them rather than touching
/// borders; only pairs on the same parent chain are exempt, so a container
/// never fights its own content. Each pass pushes overlapping pairs apart
/// along the axis of least penetration and stops early once a pass makes no
/// correction. Deterministic for identical input.
pub fn resolve_collisions(
    nodes: &[LayoutNode],
    params: &CollisionConfig,
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    let mut out: Vec<LayoutNode> = nodes.to_vec();
    if nodes.len() < 2 || params.max_iterations == 0 {
        return out;
    }

    let parents = valid_parents(nodes);
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let sizes: Vec<(f32, f32)> = nodes.iter().map(|node| resolve_size(node, config)).collect();

    let on_parent_chain = |from: usize, to: usize| -> bool {
        let mut current = nodes[from].id.as_str();
        while let Some(parent) = parents.get(current) {
            if *parent == nodes[to].id {
                return true;
            }
            current = parent.as_str();
        }
        false
    };

    for _ in 0..params.max_iterations {
        // Absolute positions are rebuilt per pass, so a descendant of a
        // pushed container picks the shift up on the next pass.
        let mut abs: Vec<(f32, f32)> = out
            .iter()
            .map(|node| {
                let (mut x, mut y) = (node.x, node.y);
                let mut current = node.id.as_str();
                while let Some(parent) = parents.get(current) {
                    if let Some(&pi) = index.get(parent.as_str()) {
                        x += out[pi].x;
                        y += out[pi].y;
                    }
                    current = parent.as_str();
                }
                (x, y)
            })
            .collect();

        let mut corrections = 0usize;
        for i in 0..out.len() {
            for j in (i + 1)..out.len() {
                if on_parent_chain(i, j) || on_parent_chain(j, i) {
                    continue;
                }
                let (iw, ih) = sizes[i];
                let (jw, jh) = sizes[j];
                let margin = params.margin;
                let overlap_x =
                    (abs[i].0 + iw).min(abs[j].0 + jw) - abs[i].0.max(abs[j].0) + 2.0 * margin;
                let overlap_y =
                    (abs[i].1 + ih).min(abs[j].1 + jh) - abs[i].1.max(abs[j].1) + 2.0 * margin;
                if overlap_x <= 0.0 || overlap_y <= 0.0 {
                    continue;
                }
                let penetration = overlap_x.min(overlap_y);
                if penetration <= params.overlap_threshold {
                    continue;
                }

                let push = penetration / 2.0;
                if overlap_x <= overlap_y {
                    let (ci, cj) = (abs[i].0 + iw / 2.0, abs[j].0 + jw / 2.0);
                    let sign = separation_sign(ci, cj, &out[i].id, &out[j].id);
                    out[i].x -= sign * push;
                    out[j].x += sign * push;
                    abs[i].0 -= sign * push;
                    abs[j].0 += sign * push;
                } else {
                    let (ci, cj) = (abs[i].1 + ih / 2.0, abs[j].1 + jh / 2.0);
                    let sign = separation_sign(ci, cj, &out[i].id, &out[j].id);
                    out[i].y -= sign * push;
                    out[j].y += sign * push;
                    abs[i].1 -= sign * push;
                    abs[j].1 += sign * push;
                }
                corrections += 1;
            }
        }
        if corrections == 0 {
            break;
        }
    }
    out
}

// +1.0 keeps i on the low side of the axis; coincident centers break the
// tie by id so repeated runs separate the same pair the same way.
fn separation_sign(center_i: f32, center_j: f32, id_i: &str, id_j: &str) -> f32 {
    if center_i < center_j {
        1.0
    } else if center_i > center_j {
        -1.0
    } else if id_i <= id_j {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    fn sized(id: &str, x: f32, y: f32) -> LayoutNode {
        let mut node = LayoutNode::new(id, NodeKind::Shape);
        node.width = Some(100.0);
        node.height = Some(60.0);
        node.x = x;
        node.y = y;
        node
    }

    fn abs_of(nodes: &[LayoutNode], id: &str) -> (f32, f32) {
        let node = nodes.iter().find(|n| n.id == id).unwrap();
        let (mut x, mut y) = (node.x, node.y);
        let mut current = node;
        while let Some(parent_id) = current.parent_id.as_deref() {
            let Some(parent) = nodes.iter().find(|n| n.id == parent_id) else {
                break;
            };
            x += parent.x;
            y += parent.y;
            current = parent;
        }
        (x, y)
    }

    fn expanded_overlap(nodes: &[LayoutNode], a: &str, b: &str, margin: f32) -> f32 {
        let (ax, ay) = abs_of(nodes, a);
        let (bx, by) = abs_of(nodes, b);
        let ox = (ax + 100.0).min(bx + 100.0) - ax.max(bx) + 2.0 * margin;
        let oy = (ay + 60.0).min(by + 60.0) - ay.max(by) + 2.0 * margin;
        if ox > 0.0 && oy > 0.0 { ox.min(oy) } else { 0.0 }
    }

    #[test]
    fn overlapping_pair_gets_pushed_apart() {
        let nodes = vec![sized("a", 0.0, 0.0), sized("b", 40.0, 10.0)];
        let config = LayoutConfig::default();
        let out = resolve_collisions(&nodes, &config.collision, &config);
        assert!(
            expanded_overlap(&out, "a", "b", config.collision.margin)
                <= config.collision.overlap_threshold
        );
        // "a" starts left of "b" and stays there.
        assert!(out[0].x < out[1].x);
    }

    #[test]
    fn gap_narrower_than_the_margin_is_widened() {
        let config = LayoutConfig::default();
        // 5px apart: the rectangles themselves are clear of each other but
        // their margin-inflated footprints are not.
        let nodes = vec![sized("a", 0.0, 0.0), sized("b", 105.0, 0.0)];
        let out = resolve_collisions(&nodes, &config.collision, &config);
        let gap = out[1].x - (out[0].x + 100.0);
        assert!(gap + 0.01 >= 2.0 * config.collision.margin - config.collision.overlap_threshold);
    }

    #[test]
    fn fully_coincident_nodes_still_separate() {
        let nodes = vec![sized("a", 50.0, 50.0), sized("b", 50.0, 50.0)];
        let config = LayoutConfig::default();
        let out = resolve_collisions(&nodes, &config.collision, &config);
        assert!(
            expanded_overlap(&out, "a", "b", config.collision.margin)
                <= config.collision.overlap_threshold
        );
    }

    #[test]
    fn container_and_its_own_content_are_exempt() {
        let mut group = LayoutNode::new("g", NodeKind::Group);
        group.style_width = Some(400.0);
        group.style_height = Some(300.0);
        let mut child = sized("c", 40.0, 80.0);
        child.parent_id = Some("g".to_string());
        let config = LayoutConfig::default();
        let out = resolve_collisions(&[group, child], &config.collision, &config);
        assert_eq!((out[0].x, out[0].y), (0.0, 0.0));
        assert_eq!((out[1].x, out[1].y), (40.0, 80.0));
    }

    #[test]
    fn group_child_is_separated_from_an_outside_node() {
        let mut group = LayoutNode::new("g", NodeKind::Group);
        group.style_width = Some(400.0);
        group.style_height = Some(300.0);
        let mut child = sized("c", 10.0, 10.0);
        child.parent_id = Some("g".to_string());
        let outsider = sized("t", 20.0, 20.0);
        let config = LayoutConfig::default();
        let out = resolve_collisions(&[group, child, outsider], &config.collision, &config);
        assert!(
            expanded_overlap(&out, "c", "t", config.collision.margin)
                <= config.collision.overlap_threshold,
            "child of g still overlaps the outside node"
        );
    }

    #[test]
    fn dangling_parent_does_not_shield_a_node() {
        let mut a = sized("a", 0.0, 0.0);
        a.parent_id = Some("ghost".to_string());
        let b = sized("b", 5.0, 5.0);
        let config = LayoutConfig::default();
        let out = resolve_collisions(&[a, b], &config.collision, &config);
        assert!(
            expanded_overlap(&out, "a", "b", config.collision.margin)
                <= config.collision.overlap_threshold
        );
    }

    #[test]
    fn zero_iteration_budget_returns_the_input() {
        let nodes = vec![sized("a", 0.0, 0.0), sized("b", 5.0, 5.0)];
        let config = LayoutConfig::default();
        let params = CollisionConfig {
            max_iterations: 0,
            ..config.collision.clone()
        };
        let out = resolve_collisions(&nodes, &params, &config);
        for (before, after) in nodes.iter().zip(&out) {
            assert_eq!((before.x, before.y), (after.x, after.y));
        }
    }

    #[test]
    fn expanded_overlap_below_threshold_is_tolerated() {
        let config = LayoutConfig::default();
        // Gap of 23px leaves 1px of margin-expanded overlap, under the 2px
        // threshold.
        let nodes = vec![sized("a", 0.0, 0.0), sized("b", 123.0, 0.0)];
        let out = resolve_collisions(&nodes, &config.collision, &config);
        assert_eq!(out[0].x, 0.0);
        assert_eq!(out[1].x, 123.0);
    }

    #[test]
    fn disjoint_layout_is_untouched() {
        let nodes = vec![sized("a", 0.0, 0.0), sized("b", 400.0, 0.0)];
        let config = LayoutConfig::default();
        let out = resolve_collisions(&nodes, &config.collision, &config);
        for (before, after) in nodes.iter().zip(&out) {
            assert_eq!(before.x, after.x);
            assert_eq!(before.y, after.y);
        }
    }
}
