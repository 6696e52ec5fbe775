//! Reading a resolved source file into the runtime.
//!
//! The loader receives a path and nothing else; it has no access to the
//! resolver that produced the path.

use std::fs;
use std::path::{Path, PathBuf};

/// A source file read by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedUnit {
    pub path: PathBuf,
    /// Raw file contents; no encoding is assumed
    pub source: Vec<u8>,
}

/// Reads the file at `path`. Contents are not validated.
pub fn require_file(path: &Path) -> std::io::Result<LoadedUnit> {
    let source = fs::read(path)?;
    log::debug!("Loaded {} ({} bytes)", path.display(), source.len());
    Ok(LoadedUnit {
        path: path.to_path_buf(),
        source,
    })
}
