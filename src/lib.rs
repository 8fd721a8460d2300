#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod model;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{load_config, LayoutConfig};
pub use layout::{
    apply_grouping, compute_layout, fit_group_bounds, infer_handles, layout_document,
    resolve_collisions, resolve_size, Layout, LayoutOptions,
};
pub use model::{
    Algorithm, Direction, Document, EdgeKind, GroupMetadata, HandleSide, LayoutEdge, LayoutNode,
    NodeKind,
};
