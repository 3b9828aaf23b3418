//! Project filtering.

use derive_builder::Builder;
use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};

use foldermeta_core::{Lifecycle, Node};

use crate::error::QueryError;

/// Criteria a project must meet. Unset criteria match everything.
#[derive(Debug, Clone, Default, Builder, Serialize, Deserialize)]
#[builder(setter(into, strip_option), default)]
pub struct ProjectFilter {
    /// Implementation language (case-insensitive).
    #[serde(default)]
    pub language: Option<String>,

    /// Responsible team (exact).
    #[serde(default)]
    pub team: Option<String>,

    /// Owning group (exact).
    #[serde(default)]
    pub owner: Option<String>,

    /// Lifecycle stage.
    #[serde(default)]
    pub lifecycle: Option<Lifecycle>,

    /// Tags that must all be present.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Glob over the declared project name.
    #[serde(default)]
    pub name_glob: Option<String>,
}

impl ProjectFilter {
    /// Create a new filter builder.
    pub fn builder() -> ProjectFilterBuilder {
        ProjectFilterBuilder::default()
    }
}

/// A compiled [`ProjectFilter`].
#[derive(Debug, Clone)]
pub struct ProjectQuery {
    filter: ProjectFilter,
    name_matcher: Option<GlobMatcher>,
}

impl ProjectQuery {
    /// Compile a filter.
    pub fn new(filter: ProjectFilter) -> Result<Self, QueryError> {
        let name_matcher = filter
            .name_glob
            .as_deref()
            .map(|pattern| {
                Glob::new(pattern)
                    .map(|glob| glob.compile_matcher())
                    .map_err(|source| QueryError::InvalidGlob {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .transpose()?;

        Ok(Self {
            filter,
            name_matcher,
        })
    }

    /// Query matching every project.
    pub fn all() -> Self {
        Self {
            filter: ProjectFilter::default(),
            name_matcher: None,
        }
    }

    pub fn filter(&self) -> &ProjectFilter {
        &self.filter
    }

    /// Check a single node. Non-project nodes never match.
    pub fn matches(&self, node: &Node) -> bool {
        let Some(info) = node.project() else {
            return false;
        };
        let f = &self.filter;

        if let Some(language) = &f.language {
            if !info.language.eq_ignore_ascii_case(language) {
                return false;
            }
        }
        if f.team.as_deref().is_some_and(|team| info.team != team) {
            return false;
        }
        if f.owner.as_deref().is_some_and(|owner| info.owner != owner) {
            return false;
        }
        if f.lifecycle.is_some_and(|lifecycle| info.lifecycle != lifecycle) {
            return false;
        }
        if !f.tags.iter().all(|tag| info.has_tag(tag)) {
            return false;
        }
        if let Some(matcher) = &self.name_matcher {
            if !matcher.is_match(node.name.as_str()) {
                return false;
            }
        }
        true
    }

    /// All matching projects below (and including) `root`, in pre-order.
    pub fn run<'a>(&self, root: &'a Node) -> Vec<&'a Node> {
        root.projects().filter(|node| self.matches(node)).collect()
    }
}
