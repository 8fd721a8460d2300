use std::collections::BTreeSet;

use flowlayout::{
    apply_grouping, compute_layout, fit_group_bounds, layout_document, resolve_collisions,
    resolve_size, Algorithm, Direction, Document, GroupMetadata, HandleSide, Layout, LayoutConfig,
    LayoutEdge, LayoutNode, LayoutOptions, NodeKind,
};

fn node(id: &str, kind: NodeKind) -> LayoutNode {
    LayoutNode::new(id, kind)
}

fn sized(id: &str, x: f32, y: f32, width: f32, height: f32) -> LayoutNode {
    let mut out = node(id, NodeKind::Shape);
    out.x = x;
    out.y = y;
    out.width = Some(width);
    out.height = Some(height);
    out
}

fn sample_graph() -> (Vec<LayoutNode>, Vec<LayoutEdge>) {
    let nodes = vec![
        node("api", NodeKind::Service),
        node("db", NodeKind::Table),
        node("cache", NodeKind::Service),
        node("docs", NodeKind::Text),
        node("logo", NodeKind::Icon),
    ];
    let edges = vec![
        LayoutEdge::new("e1", "api", "db"),
        LayoutEdge::new("e2", "api", "cache"),
        LayoutEdge::new("e3", "db", "docs"),
        LayoutEdge::new("e4", "cache", "logo"),
    ];
    (nodes, edges)
}

fn all_algorithms() -> [Algorithm; 9] {
    [
        Algorithm::Layered,
        Algorithm::Tree,
        Algorithm::Grid,
        Algorithm::Force,
        Algorithm::Radial,
        Algorithm::Stress,
        Algorithm::Ranked,
        Algorithm::Hierarchy,
        Algorithm::Cluster,
    ]
}

fn positions_of(layout: &Layout) -> Vec<(String, f32, f32)> {
    layout
        .nodes
        .iter()
        .map(|n| (n.id.clone(), n.x, n.y))
        .collect()
}

#[test]
fn identical_inputs_give_identical_positions() {
    let (nodes, edges) = sample_graph();
    let config = LayoutConfig::default();
    for algorithm in all_algorithms() {
        let options = LayoutOptions {
            algorithm,
            ..LayoutOptions::default()
        };
        let first = compute_layout(&nodes, &edges, &options, &config);
        let second = compute_layout(&nodes, &edges, &options, &config);
        assert_eq!(
            positions_of(&first),
            positions_of(&second),
            "{algorithm:?} is not deterministic"
        );
    }
}

#[test]
fn node_and_edge_ids_survive_every_algorithm() {
    let (nodes, edges) = sample_graph();
    let config = LayoutConfig::default();
    let node_ids: BTreeSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edge_ids: BTreeSet<&str> = edges.iter().map(|e| e.id.as_str()).collect();
    for algorithm in all_algorithms() {
        let options = LayoutOptions {
            algorithm,
            ..LayoutOptions::default()
        };
        let layout = compute_layout(&nodes, &edges, &options, &config);
        let out_nodes: BTreeSet<&str> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        let out_edges: BTreeSet<&str> = layout.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(node_ids, out_nodes, "{algorithm:?} changed the node set");
        assert_eq!(edge_ids, out_edges, "{algorithm:?} changed the edge set");
    }
}

#[test]
fn grouping_preserves_member_ids() {
    let nodes = vec![
        sized("a", 0.0, 0.0, 100.0, 50.0),
        sized("b", 200.0, 0.0, 100.0, 50.0),
        sized("c", 500.0, 0.0, 100.0, 50.0),
    ];
    let groups = vec![GroupMetadata {
        id: "g1".to_string(),
        label: "pair".to_string(),
        node_ids: vec!["a".to_string(), "b".to_string()],
    }];
    let out = apply_grouping(&nodes, &groups, &LayoutConfig::default());
    let ids: BTreeSet<&str> = out.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, BTreeSet::from(["a", "b", "c", "g1"]));
}

#[test]
fn children_stay_inside_their_container() {
    let config = LayoutConfig::default();
    let nodes = vec![
        sized("a", 0.0, 0.0, 100.0, 50.0),
        sized("b", 200.0, 120.0, 100.0, 50.0),
    ];
    let groups = vec![GroupMetadata {
        id: "g1".to_string(),
        label: String::new(),
        node_ids: vec!["a".to_string(), "b".to_string()],
    }];
    for pass in [
        apply_grouping(&nodes, &groups, &config),
        fit_group_bounds(&apply_grouping(&nodes, &groups, &config), &config),
    ] {
        let group = pass.iter().find(|n| n.id == "g1").unwrap();
        let (gw, gh) = resolve_size(group, &config);
        for child in pass.iter().filter(|n| n.parent_id.as_deref() == Some("g1")) {
            let (cw, ch) = resolve_size(child, &config);
            assert!(child.x >= config.group.padding - 0.01);
            assert!(child.y >= config.group.header_inset + config.group.padding - 0.01);
            assert!(child.x + cw <= gw - config.group.padding + 0.01);
            assert!(child.y + ch <= gh - config.group.padding + 0.01);
        }
    }
}

fn total_overlap(nodes: &[LayoutNode], config: &LayoutConfig) -> f32 {
    let mut total = 0.0;
    for (i, a) in nodes.iter().enumerate() {
        let (aw, ah) = resolve_size(a, config);
        for b in &nodes[i + 1..] {
            let (bw, bh) = resolve_size(b, config);
            let ox = (a.x + aw).min(b.x + bw) - a.x.max(b.x);
            let oy = (a.y + ah).min(b.y + bh) - a.y.max(b.y);
            if ox > 0.0 && oy > 0.0 {
                total += ox.min(oy);
            }
        }
    }
    total
}

#[test]
fn collision_resolution_converges_within_budget() {
    let config = LayoutConfig::default();
    // A pile of mutually overlapping nodes.
    let nodes: Vec<LayoutNode> = (0..8)
        .map(|i| sized(&format!("n{i}"), (i % 3) as f32 * 30.0, (i / 3) as f32 * 20.0, 100.0, 60.0))
        .collect();
    let before = total_overlap(&nodes, &config);
    let out = resolve_collisions(&nodes, &config.collision, &config);
    let after = total_overlap(&out, &config);
    assert!(after <= before);

    // Either every remaining overlap is within tolerance or the iteration
    // budget was the limiting factor; with 8 nodes the default budget is
    // comfortably enough to fully separate them.
    for (i, a) in out.iter().enumerate() {
        let (aw, ah) = resolve_size(a, &config);
        for b in &out[i + 1..] {
            let (bw, bh) = resolve_size(b, &config);
            let ox = (a.x + aw).min(b.x + bw) - a.x.max(b.x);
            let oy = (a.y + ah).min(b.y + bh) - a.y.max(b.y);
            if ox > 0.0 && oy > 0.0 {
                assert!(
                    ox.min(oy) <= config.collision.overlap_threshold,
                    "{} and {} still overlap",
                    a.id,
                    b.id
                );
            }
        }
    }
}

#[test]
fn hierarchy_handles_follow_direction_not_geometry() {
    let nodes = vec![
        node("root", NodeKind::Service),
        node("left", NodeKind::Service),
        node("right", NodeKind::Service),
    ];
    let edges = vec![
        LayoutEdge::new("e1", "root", "left"),
        LayoutEdge::new("e2", "root", "right"),
    ];
    let options = LayoutOptions {
        algorithm: Algorithm::Hierarchy,
        direction: Direction::Right,
        ..LayoutOptions::default()
    };
    let layout = compute_layout(&nodes, &edges, &options, &LayoutConfig::default());
    for edge in &layout.edges {
        assert_eq!(edge.source_handle, Some(HandleSide::Right));
        assert_eq!(edge.target_handle, Some(HandleSide::Left));
    }
}

#[test]
fn dangling_edges_are_dropped_without_panicking() {
    let (nodes, mut edges) = sample_graph();
    edges.push(LayoutEdge::new("ghost", "api", "missing"));
    let config = LayoutConfig::default();
    for algorithm in all_algorithms() {
        let options = LayoutOptions {
            algorithm,
            ..LayoutOptions::default()
        };
        let layout = compute_layout(&nodes, &edges, &options, &config);
        assert!(
            layout.edges.iter().all(|e| e.id != "ghost"),
            "{algorithm:?} kept a dangling edge"
        );
    }
}

#[test]
fn hierarchy_root_lands_on_the_fixed_padding() {
    let nodes = vec![
        node("a", NodeKind::Service),
        node("b", NodeKind::Service),
        node("c", NodeKind::Service),
    ];
    let edges = vec![
        LayoutEdge::new("e1", "a", "b"),
        LayoutEdge::new("e2", "a", "c"),
    ];
    let options = LayoutOptions {
        algorithm: Algorithm::Hierarchy,
        direction: Direction::Left,
        spacing: (80.0, 60.0),
    };
    let config = LayoutConfig::default();
    let layout = compute_layout(&nodes, &edges, &options, &config);
    let leftmost = layout
        .nodes
        .iter()
        .map(|n| n.x)
        .fold(f32::MAX, f32::min);
    assert_eq!(leftmost, config.hierarchy.root_padding);
}

#[test]
fn grouping_scenario_wraps_both_members() {
    let config = LayoutConfig::default();
    let nodes = vec![
        sized("a", 0.0, 0.0, 100.0, 50.0),
        sized("b", 200.0, 0.0, 100.0, 50.0),
    ];
    let groups = vec![GroupMetadata {
        id: "g1".to_string(),
        label: String::new(),
        node_ids: vec!["a".to_string(), "b".to_string()],
    }];
    let out = apply_grouping(&nodes, &groups, &config);
    let group = out.iter().find(|n| n.id == "g1").unwrap();
    assert!(group.style_width.unwrap() >= 300.0 + 2.0 * config.group.padding);
    for id in ["a", "b"] {
        let member = out.iter().find(|n| n.id == id).unwrap();
        assert_eq!(member.parent_id.as_deref(), Some("g1"));
    }
}

#[test]
fn document_pipeline_materializes_groups_and_relayouts() {
    let doc = Document::from_str(
        r#"{
            "nodes": [
                {"id": "a", "kind": "service"},
                {"id": "b", "kind": "service"},
                {"id": "c", "kind": "table"}
            ],
            "edges": [
                {"id": "e1", "source": "a", "target": "b"},
                {"id": "e2", "source": "b", "target": "c"}
            ],
            "groups": [
                {"id": "backend", "label": "Backend", "node_ids": ["a", "b"]}
            ]
        }"#,
    )
    .unwrap();
    let config = LayoutConfig::default();
    let layout = layout_document(&doc, &LayoutOptions::default(), &config);
    let group = layout.nodes.iter().find(|n| n.id == "backend").unwrap();
    assert_eq!(group.kind, NodeKind::Group);
    assert_eq!(group.label.as_deref(), Some("Backend"));
    for id in ["a", "b"] {
        let member = layout.nodes.iter().find(|n| n.id == id).unwrap();
        assert_eq!(member.parent_id.as_deref(), Some("backend"));
    }
    let outsider = layout.nodes.iter().find(|n| n.id == "c").unwrap();
    assert!(outsider.parent_id.is_none());
}
