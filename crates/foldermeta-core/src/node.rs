//! Typed metadata nodes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Declared role of a directory, encoded in its marker file name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeType {
    /// Repository root.
    Repo,
    /// Grouping of projects (may nest).
    Platform,
    /// Leaf unit of work.
    Project,
}

impl NodeType {
    /// Marker file name for this type, e.g. `.folder.repo`.
    pub fn marker_file_name(self) -> String {
        format!("{}{self}", crate::marker::MARKER_PREFIX)
    }

    /// Whether a directory of this type may sit below a typed `parent`.
    ///
    /// `None` stands for the resolve root. Repos only appear at the root
    /// and projects never have typed children.
    pub fn allowed_under(self, parent: Option<NodeType>) -> bool {
        match (parent, self) {
            (None, _) => true,
            (Some(NodeType::Project), _) => false,
            (Some(_), NodeType::Repo) => false,
            (Some(_), NodeType::Platform | NodeType::Project) => true,
        }
    }
}

/// Declared maturity stage of a project.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Lifecycle {
    Development,
    Staging,
    Production,
    Deprecated,
}

impl Lifecycle {
    /// Check if the project is live (staging or production).
    pub fn is_live(self) -> bool {
        matches!(self, Lifecycle::Staging | Lifecycle::Production)
    }
}

/// Project-only metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Implementation language.
    pub language: CompactString,
    /// Version string, kept verbatim.
    pub version: CompactString,
    /// Owning group.
    pub owner: CompactString,
    /// Responsible team.
    pub team: CompactString,
    /// Maturity stage.
    pub lifecycle: Lifecycle,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<CompactString>,
}

impl ProjectInfo {
    /// Check if the project carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Type of node and associated metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Repo,
    Platform,
    Project(ProjectInfo),
}

impl NodeKind {
    /// The bare type token.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Repo => NodeType::Repo,
            NodeKind::Platform => NodeType::Platform,
            NodeKind::Project(_) => NodeType::Project,
        }
    }
}

/// One typed directory in a resolved tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node type and type-specific metadata.
    pub kind: NodeKind,

    /// Declared name (from the marker, not the directory).
    pub name: CompactString,

    /// Optional free-form description.
    pub description: Option<CompactString>,

    /// Directory holding the marker file.
    pub path: PathBuf,

    /// Keys the marker grammar does not know, in file order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<CompactString, CompactString>,

    /// Typed children, ordered by directory name.
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node with no children.
    pub fn new(kind: NodeKind, name: impl Into<CompactString>, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: None,
            path: path.into(),
            extra: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<CompactString>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the node type.
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Project metadata, if this is a project.
    pub fn project(&self) -> Option<&ProjectInfo> {
        match &self.kind {
            NodeKind::Project(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_project(&self) -> bool {
        matches!(self.kind, NodeKind::Project(_))
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Pre-order iterator over this node and all descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// First node (pre-order) with the given declared name.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.walk().find(|node| node.name == name)
    }

    /// All project nodes in pre-order.
    pub fn projects(&self) -> impl Iterator<Item = &Node> {
        self.walk().filter(|node| node.is_project())
    }

    /// Count nodes of a given type in this subtree.
    pub fn count(&self, node_type: NodeType) -> usize {
        self.walk().filter(|n| n.node_type() == node_type).count()
    }
}

/// Pre-order traversal returned by [`Node::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reversed so the first child is visited next
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
