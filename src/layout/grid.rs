use std::collections::{BTreeMap, HashMap};

use crate::config::LayoutConfig;
use crate::model::LayoutEdge;

use super::{LayoutOptions, Placed};

/// Uniform grid packing: input order, near-square cell count, per-row and
/// per-column extents. Edges are ignored. Vertical flows fill row-major,
/// horizontal flows column-major.
pub(super) fn place(
    ids: &[String],
    _edges: &[LayoutEdge],
    placed: &BTreeMap<String, Placed>,
    options: &LayoutOptions,
    _config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let count = ids.len();
    let mut positions = HashMap::new();
    if count == 0 {
        return positions;
    }
    let columns = (count as f32).sqrt().ceil() as usize;
    let rows = count.div_ceil(columns);

    let cell = |index: usize| -> (usize, usize) {
        if options.direction.is_horizontal() {
            (index / rows, index % rows)
        } else {
            (index % columns, index / columns)
        }
    };

    let mut col_widths = vec![0.0_f32; columns];
    let mut row_heights = vec![0.0_f32; rows];
    for (index, id) in ids.iter().enumerate() {
        let Some(rect) = placed.get(id) else {
            continue;
        };
        let (col, row) = cell(index);
        col_widths[col] = col_widths[col].max(rect.width);
        row_heights[row] = row_heights[row].max(rect.height);
    }

    let mut col_offsets = vec![0.0_f32; columns];
    for col in 1..columns {
        col_offsets[col] = col_offsets[col - 1] + col_widths[col - 1] + options.spacing.0;
    }
    let mut row_offsets = vec![0.0_f32; rows];
    for row in 1..rows {
        row_offsets[row] = row_offsets[row - 1] + row_heights[row - 1] + options.spacing.1;
    }

    for (index, id) in ids.iter().enumerate() {
        if !placed.contains_key(id) {
            continue;
        }
        let (col, row) = cell(index);
        positions.insert(id.clone(), (col_offsets[col], row_offsets[row]));
    }
    positions
}
