//! Marker file grammar.
//!
//! A marker body is a list of `key: value` lines. Blank lines and lines
//! starting with `#` are ignored. A value wrapped in matching single or
//! double quotes is unquoted, and an empty value counts as absent. The
//! `tags` key takes a bracketed, comma-separated list.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use compact_str::CompactString;
use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::node::{Lifecycle, Node, NodeKind, NodeType, ProjectInfo};

/// File name prefix shared by all marker files.
pub const MARKER_PREFIX: &str = ".folder.";

/// Type suffix of a marker file name, e.g. `"repo"` for `.folder.repo`.
///
/// Returns `None` for names that are not marker files at all. The suffix is
/// not validated here; unknown suffixes are still markers.
pub fn marker_suffix(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(MARKER_PREFIX)
        .filter(|suffix| !suffix.is_empty())
}

/// Parsed contents of one marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: NodeKind,
    pub name: CompactString,
    pub description: Option<CompactString>,
    pub extra: IndexMap<CompactString, CompactString>,
}

/// A raw value and the line it came from.
struct Field<'a> {
    line: usize,
    value: &'a str,
}

impl Marker {
    /// Create a marker with no description or extra keys.
    pub fn new(kind: NodeKind, name: impl Into<CompactString>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: None,
            extra: IndexMap::new(),
        }
    }

    pub fn repo(name: impl Into<CompactString>) -> Self {
        Self::new(NodeKind::Repo, name)
    }

    pub fn platform(name: impl Into<CompactString>) -> Self {
        Self::new(NodeKind::Platform, name)
    }

    pub fn project(name: impl Into<CompactString>, info: ProjectInfo) -> Self {
        Self::new(NodeKind::Project(info), name)
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<CompactString>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an extra key.
    pub fn with_extra(
        mut self,
        key: impl Into<CompactString>,
        value: impl Into<CompactString>,
    ) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Read and parse a marker file. The expected type comes from the file
    /// name.
    pub fn read(path: &Path) -> Result<Self, ResolveError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let Some(suffix) = marker_suffix(&file_name) else {
            return Err(ResolveError::UnknownType {
                path: path.to_path_buf(),
                type_name: file_name.to_string(),
            });
        };
        let expected = NodeType::from_str(suffix).map_err(|_| ResolveError::UnknownType {
            path: path.to_path_buf(),
            type_name: suffix.to_string(),
        })?;

        let text = std::fs::read_to_string(path).map_err(|e| ResolveError::io(path, e))?;
        Self::parse(&text, expected, path)
    }

    /// Parse a marker body. `path` is used for error reporting only.
    pub fn parse(text: &str, expected: NodeType, path: &Path) -> Result<Self, ResolveError> {
        let mut fields = scan_fields(text, path)?;

        let Some(declared) = fields.shift_remove("type") else {
            return Err(ResolveError::MissingField {
                path: path.to_path_buf(),
                node_type: expected,
                field: "type",
            });
        };
        let declared =
            NodeType::from_str(declared.value).map_err(|_| ResolveError::UnknownType {
                path: path.to_path_buf(),
                type_name: declared.value.to_string(),
            })?;
        if declared != expected {
            return Err(ResolveError::TypeMismatch {
                path: path.to_path_buf(),
                expected,
                declared,
            });
        }

        let name = require(&mut fields, "name", expected, path)?;
        let description = fields.shift_remove("description").map(|f| f.value.into());

        let kind = match expected {
            NodeType::Repo => NodeKind::Repo,
            NodeType::Platform => NodeKind::Platform,
            NodeType::Project => {
                let language = require(&mut fields, "language", expected, path)?;
                let version = require(&mut fields, "version", expected, path)?;
                let owner = require(&mut fields, "owner", expected, path)?;
                let team = require(&mut fields, "team", expected, path)?;

                let Some(lifecycle) = fields.shift_remove("lifecycle") else {
                    return Err(missing(path, expected, "lifecycle"));
                };
                let lifecycle = Lifecycle::from_str(lifecycle.value).map_err(|_| {
                    ResolveError::parse(
                        path,
                        lifecycle.line,
                        format!("unknown lifecycle '{}'", lifecycle.value),
                    )
                })?;

                let tags = match fields.shift_remove("tags") {
                    Some(field) => parse_tags(field.value, field.line, path)?,
                    None => BTreeSet::new(),
                };

                NodeKind::Project(ProjectInfo {
                    language,
                    version,
                    owner,
                    team,
                    lifecycle,
                    tags,
                })
            }
        };

        let extra = fields
            .into_iter()
            .map(|(key, field)| (CompactString::from(key), CompactString::from(field.value)))
            .collect();

        Ok(Self {
            kind,
            name,
            description,
            extra,
        })
    }

    /// Render the marker body in canonical key order.
    ///
    /// Values that parsing would trim or unquote are wrapped in double
    /// quotes, so the body parses back to an equal marker. Fails with
    /// [`ResolveError::Unrenderable`] for keys and values the grammar cannot
    /// carry.
    pub fn render(&self) -> Result<String, ResolveError> {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(out, "type: {}", self.node_type());
        let _ = writeln!(out, "name: {}", encode_value("name", &self.name)?);
        if let Some(description) = &self.description {
            let _ = writeln!(out, "description: {}", encode_value("description", description)?);
        }
        if let NodeKind::Project(info) = &self.kind {
            let _ = writeln!(out, "language: {}", encode_value("language", &info.language)?);
            let _ = writeln!(out, "version: {}", encode_value("version", &info.version)?);
            let _ = writeln!(out, "owner: {}", encode_value("owner", &info.owner)?);
            let _ = writeln!(out, "team: {}", encode_value("team", &info.team)?);
            let _ = writeln!(out, "lifecycle: {}", info.lifecycle);
            if !info.tags.is_empty() {
                let tags = info
                    .tags
                    .iter()
                    .map(|tag| encode_tag(tag))
                    .collect::<Result<Vec<_>, _>>()?;
                let _ = writeln!(out, "tags: [{}]", tags.join(", "));
            }
        }
        for (key, value) in &self.extra {
            self.check_extra_key(key)?;
            let _ = writeln!(out, "{key}: {}", encode_value(key, value)?);
        }
        Ok(out)
    }

    /// Reject extra keys that would not parse back into `extra`.
    fn check_extra_key(&self, key: &str) -> Result<(), ResolveError> {
        let reserved = match self.kind {
            NodeKind::Project(_) => PROJECT_KEYS,
            NodeKind::Repo | NodeKind::Platform => &PROJECT_KEYS[..3],
        };
        let problem = if key.is_empty() {
            "empty key"
        } else if reserved.contains(&key) {
            "key is reserved for this marker type"
        } else if key.contains([':', '\n', '\r']) {
            "key contains ':' or a line break"
        } else if key.starts_with('#') {
            "key starts a comment"
        } else if key.trim() != key {
            "key has surrounding whitespace"
        } else {
            return Ok(());
        };
        Err(unrenderable(key, problem))
    }

    /// Build the node for the directory holding this marker.
    pub fn into_node(self, dir: impl Into<PathBuf>) -> Node {
        Node {
            kind: self.kind,
            name: self.name,
            description: self.description,
            path: dir.into(),
            extra: self.extra,
            children: Vec::new(),
        }
    }
}

/// Keys the grammar assigns a meaning to. The first three apply to every
/// marker type.
const PROJECT_KEYS: &[&str] = &[
    "type",
    "name",
    "description",
    "language",
    "version",
    "owner",
    "team",
    "lifecycle",
    "tags",
];

/// Split a body into non-empty fields, rejecting malformed lines and
/// repeated keys.
fn scan_fields<'a>(text: &'a str, path: &Path) -> Result<IndexMap<&'a str, Field<'a>>, ResolveError> {
    let mut fields = IndexMap::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            return Err(ResolveError::parse(path, line, "expected 'key: value'"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ResolveError::parse(path, line, "empty key"));
        }
        if fields.contains_key(key) {
            return Err(ResolveError::parse(path, line, format!("duplicate key '{key}'")));
        }

        let value = unquote(value.trim());
        fields.insert(key, Field { line, value });
    }

    // Empty values count as absent, but still take part in the repeat check
    fields.retain(|_, field| !field.value.is_empty());
    Ok(fields)
}

/// Parse `[a, b, c]` into a tag set.
fn parse_tags(raw: &str, line: usize, path: &Path) -> Result<BTreeSet<CompactString>, ResolveError> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ResolveError::parse(path, line, "tags must be a bracketed list"))?
        .trim();

    if inner.is_empty() {
        return Ok(BTreeSet::new());
    }

    inner
        .split(',')
        .map(|tag| {
            let tag = unquote(tag.trim());
            if tag.is_empty() {
                Err(ResolveError::parse(path, line, "empty tag in list"))
            } else {
                Ok(CompactString::from(tag))
            }
        })
        .collect()
}

/// Encode a scalar value so that `scan_fields` reads it back unchanged.
fn encode_value(field: &str, value: &str) -> Result<String, ResolveError> {
    if value.is_empty() {
        return Err(unrenderable(field, "empty value reads back as absent"));
    }
    if value.contains(['\n', '\r']) {
        return Err(unrenderable(field, "value contains a line break"));
    }
    if value.trim() != value || unquote(value) != value {
        Ok(format!("\"{value}\""))
    } else {
        Ok(value.to_string())
    }
}

fn encode_tag(tag: &str) -> Result<String, ResolveError> {
    if tag.contains(',') {
        return Err(unrenderable("tags", format!("tag '{tag}' contains ','")));
    }
    encode_value("tags", tag)
}

fn unrenderable(field: &str, message: impl Into<String>) -> ResolveError {
    ResolveError::Unrenderable {
        field: field.to_string(),
        message: message.into(),
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn require(
    fields: &mut IndexMap<&str, Field<'_>>,
    field: &'static str,
    node_type: NodeType,
    path: &Path,
) -> Result<CompactString, ResolveError> {
    fields
        .shift_remove(field)
        .map(|f| CompactString::from(f.value))
        .ok_or_else(|| missing(path, node_type, field))
}

fn missing(path: &Path, node_type: NodeType, field: &'static str) -> ResolveError {
    ResolveError::MissingField {
        path: path.to_path_buf(),
        node_type,
        field,
    }
}
