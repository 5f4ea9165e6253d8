//! Build graph queries
//!
//! - **bazel**: `soong_ui` + `tools/bazel` backend (the only one in use)
//! - **rdeps**: parsing `label_kind` output and selecting test targets
//!
//! Everything that needs the graph goes through [`GraphQuery`], so package
//! resolution can be exercised against canned query output.

pub mod bazel;
pub mod rdeps;

pub use bazel::Bazel;

use crate::core::config::MappingPolicy;
use crate::core::error::UpdaterResult;
use crate::ui::progress::QueryProgress;
use std::collections::BTreeSet;
use std::path::Path;

/// Read access to a queryable build graph
pub trait GraphQuery {
  /// Run one `query` with the given arguments from `cwd`, returning stdout
  fn run_query(&self, cwd: &Path, args: &[&str]) -> UpdaterResult<String>;

  /// Tables used to filter query results
  fn policy(&self) -> &MappingPolicy;

  /// All modules defined under a tree-relative package path, minus known noise
  fn query_modules(&self, cwd: &Path, package: &str) -> UpdaterResult<BTreeSet<String>> {
    let pattern = format!("//{}:all", package);
    let out = self.run_query(cwd, &[&pattern])?;
    Ok(
      non_empty_lines(&out)
        .filter(|module| !self.policy().is_noise(module))
        .map(String::from)
        .collect(),
    )
  }

  /// Raw `<rule-kind> rule <label>` lines for everything depending on `module`
  fn query_rdeps(&self, cwd: &Path, module: &str) -> UpdaterResult<Vec<String>> {
    let expr = format!("rdeps(//..., {})", module);
    let out = self.run_query(cwd, &[&expr, "--output=label_kind"])?;
    Ok(non_empty_lines(&out).map(String::from).collect())
  }

  /// Whether a module lives under a tree that must never be test-selected
  fn is_excluded(&self, module: &str) -> bool {
    self.policy().is_path_excluded(module)
  }

  /// Union of reverse-dependency test names over all `modules`
  fn query_rdep_tests(&self, cwd: &Path, modules: &BTreeSet<String>) -> UpdaterResult<BTreeSet<String>> {
    let mut tests = BTreeSet::new();
    let mut progress = QueryProgress::new(modules.len(), "Querying reverse dependencies");

    for module in modules {
      let rdeps = self.query_rdeps(cwd, module)?;
      tests.extend(rdeps::select_tests(rdeps.iter().map(String::as_str), |label| {
        self.is_excluded(label)
      }));
      progress.inc();
    }

    Ok(tests)
  }
}

fn non_empty_lines(out: &str) -> impl Iterator<Item = &str> {
  out.lines().map(str::trim).filter(|line| !line.is_empty())
}
