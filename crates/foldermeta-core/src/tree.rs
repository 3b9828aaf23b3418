//! Resolved tree container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::ResolveConfig;
use crate::node::{Node, NodeType};

/// Summary statistics for a resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Number of repo nodes.
    pub repos: u64,
    /// Number of platform nodes.
    pub platforms: u64,
    /// Number of project nodes.
    pub projects: u64,
    /// Directories walked, typed or not.
    pub directories_visited: u64,
    /// Marker files read and parsed.
    pub markers_read: u64,
    /// Deepest typed directory, relative to the root.
    pub max_depth: u32,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a typed directory.
    pub fn record_node(&mut self, node_type: NodeType, depth: u32) {
        match node_type {
            NodeType::Repo => self.repos += 1,
            NodeType::Platform => self.platforms += 1,
            NodeType::Project => self.projects += 1,
        }
        self.markers_read += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a walked directory.
    pub fn record_dir(&mut self) {
        self.directories_visited += 1;
    }

    /// Total typed nodes.
    pub fn total_nodes(&self) -> u64 {
        self.repos + self.platforms + self.projects
    }
}

/// Complete resolved tree with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataTree {
    /// Root node of the tree.
    pub root: Node,

    /// Canonical root path that was resolved.
    pub root_path: PathBuf,

    /// When this resolve was performed.
    pub resolved_at: SystemTime,

    /// Duration of the resolve.
    pub resolve_duration: Duration,

    /// Configuration used.
    pub config: ResolveConfig,

    /// Summary statistics.
    pub stats: TreeStats,
}

impl MetadataTree {
    /// Create a new metadata tree.
    pub fn new(
        root: Node,
        root_path: PathBuf,
        config: ResolveConfig,
        stats: TreeStats,
        resolve_duration: Duration,
    ) -> Self {
        Self {
            root,
            root_path,
            resolved_at: SystemTime::now(),
            resolve_duration,
            config,
            stats,
        }
    }

    /// Consume the tree, keeping only the root node.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Get the total number of projects.
    pub fn total_projects(&self) -> u64 {
        self.stats.projects
    }
}
