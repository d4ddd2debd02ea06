// SPDX-FileCopyrightText: 2026 ImageIO Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Searchpath merging and splitting.

use std::path::PathBuf;

/// Separator between directories in a searchpath string.
#[cfg(windows)]
pub const SEARCHPATH_SEPARATOR: char = ';';
/// Separator between directories in a searchpath string.
#[cfg(not(windows))]
pub const SEARCHPATH_SEPARATOR: char = ':';

/// Environment variable holding the supplementary plugin searchpath.
pub const DEFAULT_LIBRARY_PATH_ENV: &str = "IMAGEIO_LIBRARY_PATH";

/// Read a supplementary searchpath from the environment, ignoring empty values.
pub fn library_path_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}

/// Merge the environment-provided path ahead of the caller's searchpath.
pub fn merge_library_path(library_path: Option<&str>, searchpath: &str) -> String {
    match library_path {
        Some(lib) if !lib.is_empty() => {
            if searchpath.is_empty() {
                lib.to_string()
            } else {
                format!("{lib}{SEARCHPATH_SEPARATOR}{searchpath}")
            }
        }
        _ => searchpath.to_string(),
    }
}

/// Split a searchpath into its directories, in order.
///
/// Empty segments and entries that are not existing directories are dropped.
pub fn searchpath_split(searchpath: &str) -> Vec<PathBuf> {
    if searchpath.is_empty() {
        return Vec::new();
    }
    std::env::split_paths(searchpath)
        .filter(|dir| !dir.as_os_str().is_empty() && dir.is_dir())
        .collect()
}
