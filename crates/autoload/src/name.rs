//! Helpers for fully-qualified type names such as `app::models::User`.

use std::path::{PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Namespace separator used by Parallax type names.
pub const DEFAULT_SEPARATOR: &str = "::";

/// Extension of Parallax source files.
pub const DEFAULT_EXTENSION: &str = "plx";

/// Strips a single leading separator, so `::app::User` and `app::User`
/// share one memo entry.
pub fn normalize<'a>(type_name: &'a str, separator: &str) -> &'a str {
    if separator.is_empty() {
        return type_name;
    }
    type_name.strip_prefix(separator).unwrap_or(type_name)
}

/// The last segment of a type name, which is the file stem searched for.
pub fn basename<'a>(type_name: &'a str, separator: &str) -> &'a str {
    if separator.is_empty() {
        return type_name;
    }
    type_name.rsplit(separator).next().unwrap_or(type_name)
}

/// Builds the literal path probed before any directory search: every
/// separator becomes a path separator, the result is rooted at the
/// filesystem root and `extension` is appended.
///
/// The path is not joined with any search root, so it only hits when the
/// type name spells out an absolute location.
pub fn probe_path(type_name: &str, separator: &str, extension: &str) -> PathBuf {
    let relative = if separator.is_empty() {
        type_name.to_string()
    } else {
        type_name.split(separator).collect::<Vec<_>>().join(MAIN_SEPARATOR_STR)
    };
    PathBuf::from(format!("{MAIN_SEPARATOR}{relative}.{extension}"))
}
