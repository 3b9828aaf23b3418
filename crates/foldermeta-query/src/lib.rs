//! Queries over resolved foldermeta trees.
//!
//! This crate provides read-only views of a resolved tree:
//!
//! - **Project filtering** - select projects by language, team, owner,
//!   lifecycle, tags or a name glob
//! - **Catalog summary** - project counts grouped by lifecycle, language,
//!   team and tag
//!
//! ```rust,ignore
//! use foldermeta_query::{CatalogSummary, ProjectFilter, ProjectQuery};
//! use foldermeta_scan::Lifecycle;
//!
//! let root = foldermeta_scan::resolve("/path/to/repo").unwrap();
//!
//! let filter = ProjectFilter::builder()
//!     .lifecycle(Lifecycle::Production)
//!     .tags(vec!["api".to_string()])
//!     .build()
//!     .unwrap();
//! for project in ProjectQuery::new(filter).unwrap().run(&root) {
//!     println!("{}", project.name);
//! }
//!
//! let summary = CatalogSummary::from_node(&root);
//! println!("{} projects, {} deprecated", summary.projects, summary.deprecated.len());
//! ```

mod error;
mod filter;
mod summary;

pub use error::QueryError;
pub use filter::{ProjectFilter, ProjectFilterBuilder, ProjectQuery};
pub use summary::CatalogSummary;

// Re-export core types
pub use foldermeta_core::{Lifecycle, Node, NodeType};
