use crate::error::{AutoloadError, AutoloadResult};
use crate::name::{DEFAULT_EXTENSION, DEFAULT_SEPARATOR};
use crate::walk::WalkOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Contents of an `autoload.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutoloadConfig {
    /// Directories searched, in priority order
    pub roots: Vec<PathBuf>,

    /// Directory basenames never descended into
    pub ignore: Vec<String>,

    /// File extensions that may define a type
    pub extensions: Vec<String>,

    /// Namespace separator of type names
    pub separator: String,

    /// Limits of the directory walk
    pub walk: WalkOptions,

    /// Optional class map persistence
    pub cache: Option<CacheConfig>,
}

impl Default for AutoloadConfig {
    fn default() -> Self {
        Self {
            roots: vec![],
            ignore: vec![],
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            separator: DEFAULT_SEPARATOR.to_string(),
            walk: WalkOptions::default(),
            cache: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// File holding the persisted class map
    pub path: PathBuf,

    /// Whether the persisted map is merged in when the cache is attached
    #[serde(default = "default_load_on_set")]
    pub load_on_set: bool,
}

pub fn default_load_on_set() -> bool {
    true
}

impl AutoloadConfig {
    /// Reads `path` and resolves relative roots and the cache path against
    /// the directory containing it.
    pub fn from_file(path: impl AsRef<Path>) -> AutoloadResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| AutoloadError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: AutoloadConfig =
            toml::from_str(&contents).map_err(|err| AutoloadError::ConfigParse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.roots = config.roots.iter().map(|root| base.join(root)).collect();
        if let Some(cache) = config.cache.as_mut() {
            cache.path = base.join(&cache.path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AutoloadResult<()> {
        if self.separator.is_empty() {
            return Err(AutoloadError::InvalidConfiguration(
                "`separator` must not be empty".to_string(),
            ));
        }
        if self.extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(AutoloadError::InvalidConfiguration(
                "`extensions` must name at least one extension".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromStr for AutoloadConfig {
    type Err = AutoloadError;

    /// Parses a configuration; relative paths stay relative to the working
    /// directory.
    fn from_str(contents: &str) -> AutoloadResult<Self> {
        let config: AutoloadConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}
