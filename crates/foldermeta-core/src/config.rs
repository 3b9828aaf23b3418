//! Resolve configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Configuration for resolve operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ResolveConfig {
    /// Root directory to resolve.
    pub root: PathBuf,

    /// Follow symbolic links to directories.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Descend into hidden directories (starting with .).
    #[builder(default = "false")]
    #[serde(default)]
    pub include_hidden: bool,

    /// Maximum directory depth below the root (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Directory names to skip (glob syntax).
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// The root must carry a repo marker.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub require_repo_root: bool,

    /// Reject repos below the root and typed children of projects.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub strict_hierarchy: bool,
}

fn default_true() -> bool {
    true
}

impl ResolveConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            Some(_) => {}
        }
        if let Some(ref patterns) = self.ignore_patterns {
            for pattern in patterns {
                Glob::new(pattern).map_err(|e| format!("Invalid ignore pattern: {e}"))?;
            }
        }
        Ok(())
    }
}

impl ResolveConfig {
    /// Create a new resolve config builder.
    pub fn builder() -> ResolveConfigBuilder {
        ResolveConfigBuilder::default()
    }

    /// Create a simple config for resolving a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            include_hidden: false,
            max_depth: None,
            ignore_patterns: Vec::new(),
            require_repo_root: true,
            strict_hierarchy: true,
        }
    }

    /// Compile the ignore patterns into a matcher.
    pub fn ignore_matcher(&self) -> Result<GlobSet, ResolveError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|e| ResolveError::InvalidConfig {
                message: format!("Invalid ignore pattern '{pattern}': {e}"),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ResolveError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Check if hidden directories should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ResolveConfig::builder()
            .root("/srv/repo")
            .max_depth(Some(4))
            .require_repo_root(false)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/repo"));
        assert_eq!(config.max_depth, Some(4));
        assert!(!config.require_repo_root);
        assert!(config.strict_hierarchy);
        assert!(!config.include_hidden);
    }

    #[test]
    fn test_config_builder_validation() {
        assert!(ResolveConfig::builder().build().is_err());
        assert!(ResolveConfig::builder().root("").build().is_err());
        assert!(
            ResolveConfig::builder()
                .root("/srv")
                .ignore_patterns(vec!["[unclosed".to_string()])
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_ignore_matcher() {
        let mut config = ResolveConfig::new("/srv");
        config.ignore_patterns = vec!["node_modules".to_string(), "build-*".to_string()];
        let matcher = config.ignore_matcher().unwrap();

        assert!(matcher.is_match("node_modules"));
        assert!(matcher.is_match("build-debug"));
        assert!(!matcher.is_match("backend"));

        config.ignore_patterns = vec!["a{b".to_string()];
        assert!(matches!(
            config.ignore_matcher(),
            Err(ResolveError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_should_skip_hidden() {
        let mut config = ResolveConfig::new("/srv");
        assert!(config.should_skip_hidden(".git"));
        assert!(!config.should_skip_hidden("backend"));

        config.include_hidden = true;
        assert!(!config.should_skip_hidden(".git"));
    }

    #[test]
    fn test_serde_defaults() {
        let config: ResolveConfig = serde_json::from_str(r#"{"root": "/srv"}"#).unwrap();
        assert!(config.require_repo_root);
        assert!(config.strict_hierarchy);
        assert!(config.ignore_patterns.is_empty());
    }
}
