//! TEST_MAPPING generation
//!
//! The file is a JSON document behind a `//` comment header:
//!
//! ```text
//! // Generated by update-crate-tests for tests that depend on this crate.
//! {
//!   "presubmit": [
//!     {
//!       "name": "libc_test"
//!     }
//!   ]
//! }
//! ```

use super::package::Package;
use crate::core::config::{MappingPolicy, TestOptions};
use crate::core::env::Env;
use crate::core::error::{ResultExt, UpdaterResult};
use crate::query::GraphQuery;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed file name written into the package directory
pub const TEST_MAPPING_FILE: &str = "TEST_MAPPING";

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// Generated by update-crate-tests for tests that depend on this crate.";

/// One presubmit test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestEntry {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub options: Option<TestOptions>,
}

/// The document serialized into TEST_MAPPING
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestMappingDoc {
  pub presubmit: Vec<TestEntry>,
}

impl TestMappingDoc {
  /// Build from a deduplicated test set.
  ///
  /// Excluded names are dropped, option overrides attached verbatim, and
  /// entries sorted by name.
  pub fn from_tests(tests: &BTreeSet<String>, policy: &MappingPolicy) -> Self {
    let mut presubmit: Vec<TestEntry> = tests
      .iter()
      .filter(|name| !policy.is_test_excluded(name))
      .map(|name| TestEntry {
        name: name.clone(),
        options: policy.options_for(name).cloned(),
      })
      .collect();
    presubmit.sort_by(|a, b| a.name.cmp(&b.name));

    Self { presubmit }
  }

  /// Header line, then JSON with 2-space indent and sorted keys, then a newline
  pub fn render(&self) -> UpdaterResult<String> {
    // Going through Value sorts object keys
    let value = serde_json::to_value(self)?;
    let json = serde_json::to_string_pretty(&value)?;
    Ok(format!("{}\n{}\n", GENERATED_HEADER, json))
  }

  /// Overwrite `<dir>/TEST_MAPPING`
  pub fn write_to(&self, dir: &Path) -> UpdaterResult<PathBuf> {
    let path = dir.join(TEST_MAPPING_FILE);
    let content = self.render()?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
  }
}

/// A TEST_MAPPING file for one package
pub struct TestMapping {
  pub package: Package,
}

impl TestMapping {
  /// Resolve the package at `path` and its reverse-dependency tests
  pub fn new(path: &Path, env: &Env, graph: &impl GraphQuery) -> UpdaterResult<Self> {
    Ok(Self {
      package: Package::resolve(path, env, graph)?,
    })
  }

  /// The document for this package, or `None` when no test depends on it
  pub fn to_doc(&self, policy: &MappingPolicy) -> Option<TestMappingDoc> {
    if self.package.rdep_tests.is_empty() {
      return None;
    }
    Some(TestMappingDoc::from_tests(&self.package.rdep_tests, policy))
  }

  /// Generate the TEST_MAPPING file.
  ///
  /// Writes nothing when no test depends on the package. In dry-run mode
  /// the rendered file is printed instead.
  pub fn create(&self, policy: &MappingPolicy, dry_run: bool) -> UpdaterResult<()> {
    let Some(doc) = self.to_doc(policy) else {
      println!("No tests depend on {}; TEST_MAPPING left unchanged.", self.package.dir_rel);
      return Ok(());
    };

    if dry_run {
      println!("DRY RUN: Would write {}:", self.package.dir.join(TEST_MAPPING_FILE).display());
      print!("{}", doc.render()?);
      return Ok(());
    }

    doc.write_to(&self.package.dir)?;
    println!("TEST_MAPPING successfully updated for {}!", self.package.dir_rel);
    Ok(())
  }
}
