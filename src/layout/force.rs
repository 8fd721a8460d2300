use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::model::LayoutEdge;

use super::{LayoutOptions, Placed};

/// Deterministic force-directed placement. Nodes start on a golden-angle
/// spiral (no RNG) and relax under the usual repulsive/attractive pair of
/// forces with a linearly cooling displacement cap, so identical inputs give
/// identical outputs.
pub(super) fn place(
    ids: &[String],
    edges: &[LayoutEdge],
    placed: &BTreeMap<String, Placed>,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let count = ids.len();
    let mut positions = HashMap::new();
    if count == 0 {
        return positions;
    }
    let index: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut diagonal_sum = 0.0;
    for id in ids {
        if let Some(rect) = placed.get(id) {
            diagonal_sum += (rect.width * rect.width + rect.height * rect.height).sqrt();
        }
    }
    let ideal = (diagonal_sum / count as f32 + options.spacing.0) * config.force.ideal_length_scale;

    // Golden-angle spiral seed.
    let mut centers: Vec<(f32, f32)> = Vec::with_capacity(count);
    let radius = ideal * (count as f32).sqrt() / 2.0;
    for i in 0..count {
        let angle = i as f32 * 2.399_963;
        let r = radius * (((i + 1) as f32) / count as f32).sqrt();
        centers.push((r * angle.cos(), r * angle.sin()));
    }

    let mut pairs: HashSet<(usize, usize)> = HashSet::new();
    for edge in edges {
        let (Some(&a), Some(&b)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };
        if a != b {
            pairs.insert((a.min(b), a.max(b)));
        }
    }
    let mut springs: Vec<(usize, usize)> = pairs.into_iter().collect();
    springs.sort_unstable();

    let iterations = config.force.iterations.max(1);
    let start_temp = (radius * 2.0 * config.force.initial_temperature).max(ideal);
    for step in 0..iterations {
        let temperature =
            start_temp * (1.0 - step as f32 / iterations as f32) + ideal * 0.01;
        let mut displacement = vec![(0.0_f32, 0.0_f32); count];

        for a in 0..count {
            for b in (a + 1)..count {
                let dx = centers[a].0 - centers[b].0;
                let dy = centers[a].1 - centers[b].1;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let repulse = ideal * ideal / dist;
                let (ux, uy) = (dx / dist, dy / dist);
                displacement[a].0 += ux * repulse;
                displacement[a].1 += uy * repulse;
                displacement[b].0 -= ux * repulse;
                displacement[b].1 -= uy * repulse;
            }
        }

        for &(a, b) in &springs {
            let dx = centers[a].0 - centers[b].0;
            let dy = centers[a].1 - centers[b].1;
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let attract = dist * dist / ideal;
            let (ux, uy) = (dx / dist, dy / dist);
            displacement[a].0 -= ux * attract;
            displacement[a].1 -= uy * attract;
            displacement[b].0 += ux * attract;
            displacement[b].1 += uy * attract;
        }

        for i in 0..count {
            let (dx, dy) = displacement[i];
            let len = (dx * dx + dy * dy).sqrt();
            if len <= f32::EPSILON {
                continue;
            }
            let capped = len.min(temperature);
            centers[i].0 += dx / len * capped;
            centers[i].1 += dy / len * capped;
        }
    }

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
