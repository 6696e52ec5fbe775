use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the autoload crate.
pub type AutoloadResult<T> = Result<T, AutoloadError>;

/// Errors raised while configuring a resolver or loading a resolved file.
///
/// A type that cannot be found is not an error: lookups report misses as
/// `None` so that other loaders in the hook chain get their turn.
#[derive(Debug, Error, Diagnostic)]
pub enum AutoloadError {
    /// A cache collaborator or configuration value cannot be used
    #[error("Invalid autoload configuration: {0}")]
    #[diagnostic(
        code(autoload::invalid_configuration),
        help("Check the cache collaborator and the values in autoload.toml")
    )]
    InvalidConfiguration(String),

    /// The configuration file could not be read
    #[error("Error reading autoload configuration {path}")]
    #[diagnostic(
        code(autoload::config_read),
        help("Make sure the file exists and has proper permissions")
    )]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for `AutoloadConfig`
    #[error("Invalid autoload configuration in {path}: {message}")]
    #[diagnostic(
        code(autoload::config_parse),
        help("Check your autoload.toml syntax")
    )]
    ConfigParse {
        path: PathBuf,
        message: String,
    },

    /// A persisted class map could not be read back
    #[error("Error reading class cache {path}: {message}")]
    #[diagnostic(
        code(autoload::cache_read),
        help("Delete the cache file to rebuild it from a fresh search")
    )]
    CacheRead {
        path: PathBuf,
        message: String,
    },

    /// A class map could not be persisted
    #[error("Error writing class cache {path}: {message}")]
    #[diagnostic(code(autoload::cache_write))]
    CacheWrite {
        path: PathBuf,
        message: String,
    },

    /// The file a type resolved to could not be loaded
    #[error("Failed to load `{type_name}` from {path}")]
    #[diagnostic(
        code(autoload::load),
        help("A memoized path is not re-checked on disk; clear the class cache if files moved")
    )]
    Load {
        type_name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Conversion used when parsing a configuration string, where there is no file path
impl From<toml::de::Error> for AutoloadError {
    fn from(err: toml::de::Error) -> Self {
        AutoloadError::ConfigParse {
            path: PathBuf::new(),
            message: err.to_string(),
        }
    }
}
