#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod overrides;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, PlacementConfig, RenderConfig, load_config, parse_config};
pub use error::ValidationError;
pub use geometry::{Point, Rect};
pub use ir::{Node, Side};
pub use layout::{LeaderCurve, PlacedLabel, PlacementKind, compute_placements};
pub use overrides::{Override, Overrides, load_overrides, parse_overrides};
pub use parser::{extract_nodes, strip_annotations};
pub use render::{insert_annotations, render_annotations};
pub use theme::AnnotationTheme;
