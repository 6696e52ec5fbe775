//! Depth-first search of a directory tree for a source file by stem.
//!
//! The walk keeps its own stack of open directory listings instead of
//! recursing, which lets it bound the depth and remember the canonical path
//! of every directory it entered. A symlink cycle therefore ends the branch
//! instead of looping forever.

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Limits applied to every directory search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    /// Deepest nesting below a search root that is still listed
    pub max_depth: usize,

    /// Whether symlinked directories are descended
    pub follow_symlinks: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            follow_symlinks: true,
        }
    }
}

/// One search over the trees below the configured roots.
///
/// Entries are taken in directory-listing order. A subdirectory is searched
/// as soon as it is met, before the remaining entries of its parent, and the
/// first matching file ends the whole search.
pub struct DirSearch<'a> {
    ignored: &'a FxHashSet<String>,
    extensions: &'a [String],
    options: WalkOptions,
    directories_visited: usize,
}

impl<'a> DirSearch<'a> {
    pub fn new(
        ignored: &'a FxHashSet<String>,
        extensions: &'a [String],
        options: WalkOptions,
    ) -> Self {
        Self {
            ignored,
            extensions,
            options,
            directories_visited: 0,
        }
    }

    /// Number of directories listed so far by this search.
    pub fn directories_visited(&self) -> usize {
        self.directories_visited
    }

    /// Searches `root` for a file whose stem is `target` and whose extension
    /// is accepted. Unreadable directories are skipped.
    pub fn find(&mut self, root: &Path, target: &str) -> Option<PathBuf> {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<(fs::ReadDir, usize)> = Vec::new();
        self.enter(root, 0, &mut stack, &mut visited);

        loop {
            let Some((entries, depth)) = stack.last_mut() else {
                return None;
            };
            let depth = *depth;
            let Some(entry) = entries.next() else {
                stack.pop();
                continue;
            };
            let Ok(entry) = entry else {
                continue;
            };

            let path = entry.path();
            // fs::metadata follows symlinks, so a link to a file is a file
            let Ok(metadata) = fs::metadata(&path) else {
                continue;
            };

            if metadata.is_dir() {
                if self.ignored.contains(entry.file_name().to_string_lossy().as_ref()) {
                    continue;
                }
                let is_link = entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);
                if is_link && !self.options.follow_symlinks {
                    continue;
                }
                if depth + 1 > self.options.max_depth {
                    log::warn!(
                        "Not descending into {}: deeper than {} levels",
                        path.display(),
                        self.options.max_depth
                    );
                    continue;
                }
                self.enter(&path, depth + 1, &mut stack, &mut visited);
            } else if metadata.is_file() && self.matches(&path, target) {
                return Some(path);
            }
        }
    }

    fn enter(
        &mut self,
        dir: &Path,
        depth: usize,
        stack: &mut Vec<(fs::ReadDir, usize)>,
        visited: &mut FxHashSet<PathBuf>,
    ) {
        if let Ok(canonical) = fs::canonicalize(dir) {
            if !visited.insert(canonical) {
                log::warn!(
                    "Skipping {}: directory already searched (symlink cycle?)",
                    dir.display()
                );
                return;
            }
        }

        match fs::read_dir(dir) {
            Ok(entries) => {
                log::trace!("Searching {}", dir.display());
                self.directories_visited += 1;
                stack.push((entries, depth));
            }
            Err(err) => {
                log::trace!("Cannot list {}: {}", dir.display(), err);
            }
        }
    }

    fn matches(&self, path: &Path, target: &str) -> bool {
        let accepted = path
            .extension()
            .and_then(OsStr::to_str)
            .map_or(false, |ext| self.extensions.iter().any(|e| e == ext));

        accepted && path.file_stem().and_then(OsStr::to_str) == Some(target)
    }
}
