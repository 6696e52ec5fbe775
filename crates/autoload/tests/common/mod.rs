#![allow(dead_code)]

use autoload::{AutoloadError, AutoloadResult, ClassCache, ClassMap};
use std::{fs, path::{Path, PathBuf}};
use tempfile::TempDir;

/// Creates a temporary directory holding the given files.
/// Paths are relative to the directory root; each file's contents is its own
/// relative path, which makes loaded units easy to tell apart.
///
/// # Panics
/// Panics if the temporary directory or file creation fails.
pub fn setup_tree(files: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    for relative_path in files {
        write_file(temp_dir.path(), relative_path);
    }

    temp_dir
}

pub fn write_file(root: &Path, relative_path: &str) -> PathBuf {
    let full_path = root.join(relative_path);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
    }
    fs::write(&full_path, relative_path)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", full_path, e));
    full_path
}

/// In-memory cache collaborator that records every table it is given.
#[derive(Debug, Default)]
pub struct RecordingCache {
    pub preload: Option<ClassMap>,
    pub fail_load: bool,
    pub loads: usize,
    pub stored: Vec<ClassMap>,
}

impl RecordingCache {
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            preload: Some(
                entries
                    .iter()
                    .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }
}

impl ClassCache for RecordingCache {
    fn load(&mut self) -> AutoloadResult<Option<ClassMap>> {
        self.loads += 1;
        if self.fail_load {
            return Err(AutoloadError::CacheRead {
                path: PathBuf::from("memory"),
                message: "backing store unavailable".to_string(),
            });
        }
        Ok(self.preload.clone())
    }

    fn cache(&mut self, classes: &ClassMap) {
        self.stored.push(classes.clone());
    }
}
