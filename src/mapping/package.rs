//! A crate package inside the source tree and its reverse-dependency tests

use crate::core::env::Env;
use crate::core::error::{PathError, ResultExt, UpdaterError, UpdaterResult};
use crate::query::GraphQuery;
use crate::utils::path_to_label_format;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A Bazel package resolved against the tree root
#[derive(Debug, Clone)]
pub struct Package {
  /// Absolute path to the package directory
  pub dir: PathBuf,

  /// Path relative to the tree root, in label format (`external/rust/crates/libc`)
  pub dir_rel: String,

  /// Reverse-dependency test names, deduplicated across variants
  pub rdep_tests: BTreeSet<String>,
}

impl Package {
  /// Resolve `path` and query the tests depending on its modules.
  ///
  /// Relative paths are taken against the current directory. Queries run
  /// from the package directory.
  pub fn resolve(path: &Path, env: &Env, graph: &impl GraphQuery) -> UpdaterResult<Self> {
    let dir = std::path::absolute(path).with_context(|| format!("Failed to resolve {}", path.display()))?;
    let dir_rel = relative_to_root(&dir, env.build_top())?;

    let modules = graph.query_modules(&dir, &dir_rel)?;
    let rdep_tests = graph.query_rdep_tests(&dir, &modules)?;

    Ok(Self {
      dir,
      dir_rel,
      rdep_tests,
    })
  }
}

/// Path of `dir` below `root` in label format
pub fn relative_to_root(dir: &Path, root: &Path) -> UpdaterResult<String> {
  dir
    .strip_prefix(root)
    .map(path_to_label_format)
    .map_err(|_| {
      UpdaterError::Path(PathError::NotUnderRoot {
        path: dir.to_path_buf(),
        root: root.to_path_buf(),
      })
    })
}
