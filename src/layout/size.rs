use crate::config::LayoutConfig;
use crate::model::LayoutNode;

/// Effective `(width, height)` of a node. Explicit style sizes win for
/// groups, then a measured size, then the kind default from the size table.
/// Never returns a zero or negative dimension.
pub fn resolve_size(node: &LayoutNode, config: &LayoutConfig) -> (f32, f32) {
    if node.kind.is_group()
        && let (Some(width), Some(height)) = (node.style_width, node.style_height)
        && width > 0.0
        && height > 0.0
    {
        return (width, height);
    }
    if let (Some(width), Some(height)) = (node.width, node.height)
        && width > 0.0
        && height > 0.0
    {
        return (width, height);
    }
    let (width, height) = config.sizes.default_for(node.kind);
    (width.max(1.0), height.max(1.0))
}
