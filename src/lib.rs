#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod document;
pub mod editor;
pub mod ir;
pub mod layout;
#[cfg(feature = "cli")]
pub mod logging;
pub mod path;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, PlacementConfig, load_config};
pub use document::{DocumentError, load_tree, parse_document, save_tree, to_json};
pub use ir::{Edge, EdgeKind, Graph, Node, NodeKind, Person};
pub use layout::{compute_layout, reset_layout};
pub use path::find_path;
