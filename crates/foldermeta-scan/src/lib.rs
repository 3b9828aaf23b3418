//! Marker-file resolver for foldermeta.
//!
//! This crate walks a directory tree, reads the `.folder.<type>` marker
//! files it finds and assembles the typed repo → platform → project
//! hierarchy.
//!
//! # Overview
//!
//! - **Serial, sorted traversal** via jwalk, so child order is
//!   lexicographic by directory name
//! - **Fail fast**: the first malformed, ambiguous or misplaced marker
//!   aborts the resolve
//! - **Configurable** root-type enforcement, hierarchy rules, depth limits
//!   and ignore patterns
//!
//! # Example
//!
//! ```rust,no_run
//! use foldermeta_scan::{FolderResolver, ResolveConfig};
//!
//! let config = ResolveConfig::new("/path/to/repo");
//! let tree = FolderResolver::new().resolve(&config).unwrap();
//!
//! println!("Repo: {}", tree.root.name);
//! println!("Projects: {}", tree.total_projects());
//! ```
//!
//! For a quick look at the root node only:
//!
//! ```rust,no_run
//! let root = foldermeta_scan::resolve("/path/to/repo").unwrap();
//! for project in root.projects() {
//!     println!("{} ({})", project.name, project.path.display());
//! }
//! ```

#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;
mod resolver;

pub use resolver::{FolderResolver, resolve};

// Re-export core types for convenience
pub use foldermeta_core::{
    Lifecycle, Marker, MetadataTree, Node, NodeKind, NodeType, ProjectInfo, ResolveConfig,
    ResolveError, TreeStats,
};
