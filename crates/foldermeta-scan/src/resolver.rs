//! JWalk-based marker tree resolver.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};
use tracing::{debug, trace};

use foldermeta_core::marker::marker_suffix;
use foldermeta_core::{Marker, MetadataTree, Node, NodeType, ResolveConfig, ResolveError, TreeStats};

/// Resolves a directory tree of marker files into typed nodes.
///
/// The walk is serial and reads directories in sorted order, so the child
/// order of every node is lexicographic by directory name.
#[derive(Debug, Default, Clone, Copy)]
pub struct FolderResolver;

impl FolderResolver {
    /// Create a new resolver.
    pub fn new() -> Self {
        Self
    }

    /// Resolve the tree rooted at `config.root`.
    pub fn resolve(&self, config: &ResolveConfig) -> Result<MetadataTree, ResolveError> {
        let start = Instant::now();
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ResolveError::io(&config.root, e))?;

        // A root that is not a directory is reported like a missing one
        if !root_path.is_dir() {
            return Err(ResolveError::NotFound { path: root_path });
        }

        debug!(root = %root_path.display(), "resolving marker tree");

        let mut stats = TreeStats::new();
        let listing = self.collect_entries(config, &root_path, &mut stats)?;
        let root_node = self.build_tree(config, &root_path, listing, &mut stats)?;

        let resolve_duration = start.elapsed();
        debug!(
            root = %root_path.display(),
            nodes = stats.total_nodes(),
            directories = stats.directories_visited,
            elapsed_ms = resolve_duration.as_millis() as u64,
            "resolved marker tree"
        );

        Ok(MetadataTree::new(
            root_node,
            root_path,
            config.clone(),
            stats,
            resolve_duration,
        ))
    }

    /// Collect directories and marker files using jwalk.
    fn collect_entries(
        &self,
        config: &ResolveConfig,
        root_path: &Path,
        stats: &mut TreeStats,
    ) -> Result<Listing, ResolveError> {
        let ignore = config.ignore_matcher()?;
        let include_hidden = config.include_hidden;

        // Marker files of a directory sit one level below it
        let dir_depth_limit = config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX);
        let walk_depth_limit = dir_depth_limit.saturating_add(1);

        let walker = WalkDir::new(root_path)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(false)
            .follow_links(config.follow_symlinks)
            .min_depth(0)
            .max_depth(walk_depth_limit)
            .process_read_dir(move |depth, _parent, _state, children| {
                // The first read yields the root itself, which is never filtered
                if depth.is_none() {
                    return;
                }
                children.retain(|entry| match entry {
                    Ok(entry) if entry.file_type().is_dir() => {
                        let name = entry.file_name().to_string_lossy();
                        let skip = (!include_hidden && name.starts_with('.'))
                            || ignore.is_match(&*name);
                        if skip {
                            debug!(path = %entry.path().display(), "skipping directory");
                        }
                        !skip
                    }
                    _ => true,
                });
            });

        let mut listing = Listing::default();

        for entry_result in walker {
            let entry = entry_result.map_err(walk_error)?;
            let path = entry.path();
            let depth = entry.depth();

            if entry.file_type().is_dir() {
                if depth > dir_depth_limit {
                    continue;
                }
                stats.record_dir();
                if depth > 0 {
                    if let Some(parent) = path.parent() {
                        listing
                            .subdirs
                            .entry(parent.to_path_buf())
                            .or_default()
                            .push(path);
                    }
                }
            } else {
                let file_name = entry.file_name().to_string_lossy();
                if marker_suffix(&file_name).is_none() {
                    continue;
                }
                if let Some(parent) = path.parent() {
                    listing
                        .markers
                        .entry(parent.to_path_buf())
                        .or_default()
                        .push(path.clone());
                }
            }
        }

        Ok(listing)
    }

    /// Build the typed tree from collected entries.
    fn build_tree(
        &self,
        config: &ResolveConfig,
        root_path: &Path,
        mut listing: Listing,
        stats: &mut TreeStats,
    ) -> Result<Node, ResolveError> {
        let Some(marker) = self.read_marker(root_path, &mut listing)? else {
            return Err(ResolveError::MissingMarker {
                path: root_path.to_path_buf(),
            });
        };

        let node_type = marker.node_type();
        if config.require_repo_root && node_type != NodeType::Repo {
            return Err(ResolveError::MisplacedMarker {
                path: root_path.to_path_buf(),
                node_type,
                parent: None,
            });
        }

        stats.record_node(node_type, 0);
        let mut root = marker.into_node(root_path);
        root.children =
            self.build_children(config, root_path, 0, Some(node_type), &mut listing, stats)?;
        Ok(root)
    }

    /// Build the nodes found at or below `dir`.
    ///
    /// An untyped directory yields the typed nodes below it, so they attach
    /// to the nearest typed ancestor.
    fn build_nodes(
        &self,
        config: &ResolveConfig,
        dir: &Path,
        depth: u32,
        parent: Option<NodeType>,
        listing: &mut Listing,
        stats: &mut TreeStats,
    ) -> Result<Vec<Node>, ResolveError> {
        let Some(marker) = self.read_marker(dir, listing)? else {
            return self.build_children(config, dir, depth, parent, listing, stats);
        };

        let node_type = marker.node_type();
        if config.strict_hierarchy && !node_type.allowed_under(parent) {
            return Err(ResolveError::MisplacedMarker {
                path: dir.to_path_buf(),
                node_type,
                parent,
            });
        }

        trace!(path = %dir.display(), %node_type, name = %marker.name, "typed directory");
        stats.record_node(node_type, depth);

        let mut node = marker.into_node(dir);
        node.children = self.build_children(config, dir, depth, Some(node_type), listing, stats)?;
        Ok(vec![node])
    }

    fn build_children(
        &self,
        config: &ResolveConfig,
        dir: &Path,
        depth: u32,
        parent: Option<NodeType>,
        listing: &mut Listing,
        stats: &mut TreeStats,
    ) -> Result<Vec<Node>, ResolveError> {
        let mut subdirs = listing.subdirs.remove(dir).unwrap_or_default();
        subdirs.sort();

        let mut nodes = Vec::new();
        for subdir in subdirs {
            nodes.extend(self.build_nodes(config, &subdir, depth + 1, parent, listing, stats)?);
        }
        Ok(nodes)
    }

    /// Read the single marker of a directory, if it has one.
    fn read_marker(&self, dir: &Path, listing: &mut Listing) -> Result<Option<Marker>, ResolveError> {
        let markers = listing.markers.remove(dir).unwrap_or_default();
        match markers.as_slice() {
            [] => Ok(None),
            [marker] => Marker::read(marker).map(Some),
            _ => {
                let mut names: Vec<String> = markers
                    .iter()
                    .filter_map(|m| m.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .collect();
                names.sort();
                Err(ResolveError::AmbiguousMarker {
                    path: dir.to_path_buf(),
                    markers: names,
                })
            }
        }
    }
}

/// Resolve `root` with the default configuration and return the root node.
pub fn resolve(root: impl AsRef<Path>) -> Result<Node, ResolveError> {
    let config = ResolveConfig::new(root.as_ref());
    FolderResolver::new().resolve(&config).map(MetadataTree::into_root)
}

/// Directories and marker files keyed by parent directory.
#[derive(Debug, Default)]
struct Listing {
    subdirs: HashMap<PathBuf, Vec<PathBuf>>,
    markers: HashMap<PathBuf, Vec<PathBuf>>,
}

fn walk_error(err: jwalk::Error) -> ResolveError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    match err.io_error().map(|e| e.kind()) {
        Some(std::io::ErrorKind::PermissionDenied) => ResolveError::PermissionDenied { path },
        _ => ResolveError::Walk {
            path,
            message: err.to_string(),
        },
    }
}
