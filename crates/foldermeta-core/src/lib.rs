//! Core types for foldermeta.
//!
//! This crate provides the data structures shared by the foldermeta
//! workspace: typed metadata nodes, the marker file grammar, resolve
//! configuration and errors.

mod config;
mod error;
pub mod marker;
mod node;
mod tree;

pub use config::{ResolveConfig, ResolveConfigBuilder};
pub use error::ResolveError;
pub use marker::{MARKER_PREFIX, Marker};
pub use node::{Lifecycle, Node, NodeKind, NodeType, ProjectInfo, Walk};
pub use tree::{MetadataTree, TreeStats};
