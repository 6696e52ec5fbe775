//! Persistence of resolved type names across process restarts.
//!
//! The resolver never stores anything itself. It hands its memo table to a
//! [`ClassCache`] collaborator, which decides where and how to keep it.

use crate::error::{AutoloadError, AutoloadResult};
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Mapping from normalized type name to the file that defines it.
pub type ClassMap = FxHashMap<String, PathBuf>;

/// A store for the resolver's memo table.
pub trait ClassCache {
    /// Returns previously persisted entries, or `None` if nothing was stored.
    ///
    /// An error here makes [`Resolver::set_cache`](crate::Resolver::set_cache)
    /// reject the collaborator.
    fn load(&mut self) -> AutoloadResult<Option<ClassMap>>;

    /// Receives the full memo table after every successful load.
    fn cache(&mut self, classes: &ClassMap);
}

/// On-disk layout of a [`TomlFileCache`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    classes: BTreeMap<String, PathBuf>,
}

/// A [`ClassCache`] that keeps the class map in a TOML file.
///
/// ```toml
/// [classes]
/// "app::models::User" = "/srv/app/models/User.plx"
/// ```
#[derive(Debug, Clone)]
pub struct TomlFileCache {
    path: PathBuf,
}

impl TomlFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `classes` through a temporary sibling file so readers never see
    /// a half-written table.
    pub fn store(&self, classes: &ClassMap) -> AutoloadResult<()> {
        let write_error = |message: String| AutoloadError::CacheWrite {
            path: self.path.clone(),
            message,
        };

        let file = CacheFile {
            classes: classes.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        };
        let contents = toml::to_string(&file).map_err(|e| write_error(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, contents).map_err(|e| write_error(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| write_error(e.to_string()))?;

        log::debug!("Stored {} classes in {}", classes.len(), self.path.display());
        Ok(())
    }
}

impl ClassCache for TomlFileCache {
    fn load(&mut self) -> AutoloadResult<Option<ClassMap>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let read_error = |message: String| AutoloadError::CacheRead {
            path: self.path.clone(),
            message,
        };
        let contents = fs::read_to_string(&self.path).map_err(|e| read_error(e.to_string()))?;
        let file: CacheFile = toml::from_str(&contents).map_err(|e| read_error(e.to_string()))?;

        log::debug!("Loaded {} classes from {}", file.classes.len(), self.path.display());
        Ok(Some(file.classes.into_iter().collect()))
    }

    fn cache(&mut self, classes: &ClassMap) {
        if let Err(err) = self.store(classes) {
            log::warn!("{}", err);
        }
    }
}
