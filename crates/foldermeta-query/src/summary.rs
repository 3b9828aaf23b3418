//! Catalog summary over a resolved tree.

use std::collections::BTreeMap;

use compact_str::CompactString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use foldermeta_core::{Lifecycle, Node, NodeType};

/// Project counts grouped by their metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    /// Number of platform nodes.
    pub platforms: usize,
    /// Number of project nodes.
    pub projects: usize,
    /// Projects per lifecycle stage.
    pub by_lifecycle: BTreeMap<Lifecycle, usize>,
    /// Projects per language (as declared).
    pub by_language: BTreeMap<CompactString, usize>,
    /// Projects per team.
    pub by_team: BTreeMap<CompactString, usize>,
    /// Projects carrying each tag.
    pub by_tag: BTreeMap<CompactString, usize>,
    /// Names of deprecated projects, in pre-order.
    pub deprecated: Vec<CompactString>,
}

impl CatalogSummary {
    /// Summarize the subtree rooted at `root`.
    pub fn from_node(root: &Node) -> Self {
        let projects: Vec<_> = root
            .projects()
            .filter_map(|node| node.project().map(|info| (node, info)))
            .collect();

        let by_lifecycle = projects
            .iter()
            .map(|(_, info)| info.lifecycle)
            .counts()
            .into_iter()
            .collect();
        let by_language = projects
            .iter()
            .map(|(_, info)| info.language.clone())
            .counts()
            .into_iter()
            .collect();
        let by_team = projects
            .iter()
            .map(|(_, info)| info.team.clone())
            .counts()
            .into_iter()
            .collect();
        let by_tag = projects
            .iter()
            .flat_map(|(_, info)| info.tags.iter().cloned())
            .counts()
            .into_iter()
            .collect();

        let deprecated = projects
            .iter()
            .filter(|(_, info)| info.lifecycle == Lifecycle::Deprecated)
            .map(|(node, _)| node.name.clone())
            .collect();

        Self {
            platforms: root.count(NodeType::Platform),
            projects: projects.len(),
            by_lifecycle,
            by_language,
            by_team,
            by_tag,
            deprecated,
        }
    }

    /// Number of projects in a lifecycle stage.
    pub fn in_stage(&self, lifecycle: Lifecycle) -> usize {
        self.by_lifecycle.get(&lifecycle).copied().unwrap_or(0)
    }

    /// Check if any project is deprecated.
    pub fn has_deprecated(&self) -> bool {
        !self.deprecated.is_empty()
    }

    /// The most used tag, ties broken alphabetically.
    pub fn top_tag(&self) -> Option<(&str, usize)> {
        self.by_tag
            .iter()
            .max_by(|(a_tag, a), (b_tag, b)| a.cmp(b).then_with(|| b_tag.cmp(a_tag)))
            .map(|(tag, count)| (tag.as_str(), *count))
    }
}
