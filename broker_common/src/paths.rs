//! Path helpers for command-line arguments.

use std::path::{Path, PathBuf};

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
pub fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// True if `path` exists and is a regular file.
pub fn is_file_exist(path: &Path) -> bool {
    path.exists() && path.is_file()
}
