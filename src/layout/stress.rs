use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::config::LayoutConfig;
use crate::model::LayoutEdge;

use super::{grid, LayoutOptions, Placed};

/// Stress-majorization placement: target distances are BFS hop counts scaled
/// by an ideal edge length, seeded from the grid packing and relaxed with
/// Gauss-Seidel sweeps in id order. Deterministic by construction.
pub(super) fn place(
    ids: &[String],
    edges: &[LayoutEdge],
    placed: &BTreeMap<String, Placed>,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let count = ids.len();
    if count == 0 {
        return HashMap::new();
    }
    let index: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); count];
    for edge in edges {
        let (Some(&a), Some(&b)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };
        if a != b {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }

    let mut diagonal_sum = 0.0;
    for id in ids {
        if let Some(rect) = placed.get(id) {
            diagonal_sum += (rect.width * rect.width + rect.height * rect.height).sqrt();
        }
    }
    let ideal = diagonal_sum / count as f32 + options.spacing.1;

    // Hop distances per node pair; unreachable pairs carry no constraint.
    let mut hops: Vec<Vec<Option<usize>>> = vec![vec![None; count]; count];
    for start in 0..count {
        let mut queue = VecDeque::new();
        hops[start][start] = Some(0);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            let d = hops[start][current].unwrap_or(0);
            for &next in &adjacency[current] {
                if hops[start][next].is_none() {
                    hops[start][next] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
    }

    // Seed from the deterministic grid packing, as centers.
    let seed = grid::place(ids, edges, placed, options, config);
    let mut centers: Vec<(f32, f32)> = ids
        .iter()
        .map(|id| {
            let rect = placed.get(id);
            let (x, y) = seed.get(id).copied().unwrap_or((0.0, 0.0));
            match rect {
                Some(rect) => (x + rect.width / 2.0, y + rect.height / 2.0),
                None => (x, y),
            }
        })
        .collect();

    for _ in 0..config.stress.iterations.max(1) {
        let mut max_move = 0.0_f32;
        for i in 0..count {
            let mut weight_sum = 0.0_f32;
            let mut target = (0.0_f32, 0.0_f32);
            for j in 0..count {
                if i == j {
                    continue;
                }
                let Some(hop) = hops[i][j] else {
                    continue;
                };
                let desired = hop as f32 * ideal;
                let weight = 1.0 / (desired * desired);
                let dx = centers[i].0 - centers[j].0;
                let dy = centers[i].1 - centers[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                target.0 += weight * (centers[j].0 + desired * dx / dist);
                target.1 += weight * (centers[j].1 + desired * dy / dist);
                weight_sum += weight;
            }
            if weight_sum <= f32::EPSILON {
                continue;
            }
            let next = (target.0 / weight_sum, target.1 / weight_sum);
            let moved =
                ((next.0 - centers[i].0).powi(2) + (next.1 - centers[i].1).powi(2)).sqrt();
            max_move = max_move.max(moved);
            centers[i] = next;
        }
        if max_move < config.stress.epsilon {
            break;
        }
    }

    let mut positions = HashMap::new();
    for (i, id) in ids.iter().enumerate() {
        let Some(rect) = placed.get(id) else {
            continue;
        };
        positions.insert(
            id.clone(),
            (
                centers[i].0 - rect.width / 2.0,
                centers[i].1 - rect.height / 2.0,
            ),
        );
    }
    positions
}
