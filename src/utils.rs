//! Utility functions for path handling

use std::path::{Component, Path};

/// Convert a tree-relative path to Bazel package format (forward slashes,
/// no leading or trailing separator)
///
/// Bazel labels always use `/`, even when the host does not.
pub fn path_to_label_format(path: &Path) -> String {
  path
    .components()
    .filter_map(|c| match c {
      Component::Normal(part) => Some(part.to_string_lossy()),
      _ => None,
    })
    .collect::<Vec<_>>()
    .join("/")
}
