//! Policy tables for test selection (built-in defaults or a TOML file)

use crate::core::error::{ResultExt, UpdaterError, UpdaterResult};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Option overrides attached to one test entry, e.g. `[{"test-timeout": "600000"}]`
pub type TestOptions = Vec<BTreeMap<String, String>>;

/// Lookup tables steering which tests end up in TEST_MAPPING.
///
/// Built once at startup and passed by reference. Every table has a
/// built-in default; a policy file only needs to name the tables it changes.
///
/// # Example
///
/// ```toml
/// exclude_tests = ["aidl_test_rust_client"]
/// exclude_paths = ["//external/crosvm"]
///
/// [test_options]
/// ring_device_test_src_lib = [{ "test-timeout" = "100000" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MappingPolicy {
  /// Per-test option overrides, attached verbatim.
  /// Consider fixing the upstream crate before adding entries here.
  #[serde(default = "default_test_options")]
  pub test_options: BTreeMap<String, TestOptions>,

  /// Test names never written to TEST_MAPPING
  #[serde(default = "default_exclude_tests")]
  pub exclude_tests: BTreeSet<String>,

  /// Label prefixes of known-incompatible or vendored trees
  #[serde(default = "default_exclude_paths")]
  pub exclude_paths: Vec<String>,

  /// Substrings marking modules skipped before rdeps queries
  #[serde(default = "default_module_noise")]
  pub module_noise: Vec<String>,
}

fn default_test_options() -> BTreeMap<String, TestOptions> {
  let timeout = |ms: &str| vec![BTreeMap::from([("test-timeout".to_string(), ms.to_string())])];
  BTreeMap::from([
    ("ring_device_test_tests_digest_tests".to_string(), timeout("600000")),
    ("ring_device_test_src_lib".to_string(), timeout("100000")),
  ])
}

fn default_exclude_tests() -> BTreeSet<String> {
  ["aidl_test_rust_client", "aidl_test_rust_service"]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_exclude_paths() -> Vec<String> {
  [
    "//external/adhd",
    "//external/crosvm",
    "//external/libchromeos-rs",
    "//external/vm_tools",
  ]
  .into_iter()
  .map(String::from)
  .collect()
}

fn default_module_noise() -> Vec<String> {
  vec!["windows_x86".to_string()]
}

impl Default for MappingPolicy {
  fn default() -> Self {
    Self {
      test_options: default_test_options(),
      exclude_tests: default_exclude_tests(),
      exclude_paths: default_exclude_paths(),
      module_noise: default_module_noise(),
    }
  }
}

impl MappingPolicy {
  /// Load a policy file; omitted tables keep their defaults
  pub fn load(path: &Path) -> UpdaterResult<Self> {
    if !path.exists() {
      return Err(UpdaterError::with_help(
        format!("Policy file not found: {}", path.display()),
        "Pass an existing TOML file to --config, or omit it to use the built-in tables",
      ));
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read policy from {}", path.display()))?;
    Self::parse(&content).with_context(|| format!("Failed to parse policy from {}", path.display()))
  }

  /// Parse policy TOML text
  pub fn parse(content: &str) -> UpdaterResult<Self> {
    let policy: MappingPolicy = toml_edit::de::from_str(content)?;
    Ok(policy)
  }

  /// Load from `path` when given, otherwise the built-in tables
  pub fn resolve(path: Option<&Path>) -> UpdaterResult<Self> {
    match path {
      Some(p) => Self::load(p),
      None => Ok(Self::default()),
    }
  }

  /// Whether a test name is on the exclusion list
  pub fn is_test_excluded(&self, name: &str) -> bool {
    self.exclude_tests.contains(name)
  }

  /// Option overrides for a test, if any
  pub fn options_for(&self, name: &str) -> Option<&TestOptions> {
    self.test_options.get(name)
  }

  /// Whether a module label lives under an excluded tree
  pub fn is_path_excluded(&self, label: &str) -> bool {
    self.exclude_paths.iter().any(|prefix| label.starts_with(prefix.as_str()))
  }

  /// Whether a module label is known noise for rdeps queries
  pub fn is_noise(&self, label: &str) -> bool {
    self.module_noise.iter().any(|marker| label.contains(marker.as_str()))
  }
}
