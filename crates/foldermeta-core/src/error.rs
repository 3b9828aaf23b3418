//! Error types for resolve operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::node::NodeType;

/// Errors that can occur while resolving a marker tree.
///
/// Every variant carries the path it was detected at. A resolve aborts on
/// the first error; no partial tree is ever returned.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Path not found, or a resolve root that is not a directory.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walker reported an error.
    #[error("Walk error at {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// The resolve root carries no marker file.
    #[error("No marker file in root directory: {path}")]
    MissingMarker { path: PathBuf },

    /// More than one marker file in a single directory.
    #[error("Multiple marker files in {path}: {}", .markers.join(", "))]
    AmbiguousMarker { path: PathBuf, markers: Vec<String> },

    /// Marker suffix or `type:` value is not a known node type.
    #[error("Unknown node type '{type_name}' in {path}")]
    UnknownType { path: PathBuf, type_name: String },

    /// The `type:` key disagrees with the marker file name.
    #[error("Marker {path} is named for '{expected}' but declares '{declared}'")]
    TypeMismatch {
        path: PathBuf,
        expected: NodeType,
        declared: NodeType,
    },

    /// A required key is absent (or empty).
    #[error("Missing required field '{field}' for {node_type} marker {path}")]
    MissingField {
        path: PathBuf,
        node_type: NodeType,
        field: &'static str,
    },

    /// Malformed marker body.
    #[error("Parse error in {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A typed directory sits where the hierarchy does not allow it.
    #[error("{node_type} marker not allowed {}: {path}", placement(.parent))]
    MisplacedMarker {
        path: PathBuf,
        node_type: NodeType,
        /// Type of the nearest typed ancestor, `None` at the resolve root.
        parent: Option<NodeType>,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A marker holds a key or value its body cannot represent.
    #[error("Cannot render field '{field}': {message}")]
    Unrenderable { field: String, message: String },
}

fn placement(parent: &Option<NodeType>) -> String {
    match parent {
        Some(parent) => format!("below a {parent}"),
        None => "at the resolve root".to_string(),
    }
}

impl ResolveError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a parse error.
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Path the error was detected at, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::Io { path, .. }
            | Self::Walk { path, .. }
            | Self::MissingMarker { path }
            | Self::AmbiguousMarker { path, .. }
            | Self::UnknownType { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::MissingField { path, .. }
            | Self::Parse { path, .. }
            | Self::MisplacedMarker { path, .. } => Some(path),
            Self::InvalidConfig { .. } | Self::Unrenderable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_io() {
        let err = ResolveError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ResolveError::PermissionDenied { .. }));

        let err = ResolveError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn test_misplaced_message() {
        let err = ResolveError::MisplacedMarker {
            path: PathBuf::from("/r/backend"),
            node_type: NodeType::Platform,
            parent: None,
        };
        assert_eq!(
            err.to_string(),
            "platform marker not allowed at the resolve root: /r/backend"
        );

        let err = ResolveError::MisplacedMarker {
            path: PathBuf::from("/r/a/b"),
            node_type: NodeType::Project,
            parent: Some(NodeType::Project),
        };
        assert!(err.to_string().contains("below a project"));
    }

    #[test]
    fn test_error_path() {
        let err = ResolveError::parse("/r/.folder.repo", 3, "expected 'key: value'");
        assert_eq!(err.path(), Some(std::path::Path::new("/r/.folder.repo")));

        let err = ResolveError::InvalidConfig {
            message: "bad".into(),
        };
        assert!(err.path().is_none());

        let err = ResolveError::Unrenderable {
            field: "tags".into(),
            message: "tag 'a,b' contains ','".into(),
        };
        assert!(err.path().is_none());
        assert_eq!(
            err.to_string(),
            "Cannot render field 'tags': tag 'a,b' contains ','"
        );
    }
}
