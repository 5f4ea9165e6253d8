//! Reverse-dependency parsing and test selection
//!
//! `bazel query --output=label_kind` prints one target per line as
//! `<rule-kind> rule <label>`. A test shows up once per build variant
//! (`//pkg:name--android_arm64`, `//pkg:name--android_x86_64`, ...), so names
//! are truncated at the first `--` and collected into a set.

use std::collections::BTreeSet;

/// Rule kinds that denote a runnable Rust test
const TEST_RULE_KINDS: [&str; 2] = ["rust_test", "rust_test_"];

/// Separator bazel places between a target name and its variant suffix
const VARIANT_SEPARATOR: &str = "--";

/// One parsed `label_kind` line (the literal `rule` field is dropped)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdepRecord<'a> {
  /// Rule kind, e.g. `rust_test` or `rust_library`
  pub kind: &'a str,
  /// Owning target label, e.g. `//external/rust/crates/libc:libc_test--x86`
  pub label: &'a str,
}

impl<'a> RdepRecord<'a> {
  /// Parse a line; `None` if it has fewer than three fields
  pub fn parse(line: &'a str) -> Option<Self> {
    let mut fields = line.split_whitespace();
    let kind = fields.next()?;
    let _rule = fields.next()?;
    let label = fields.next()?;
    Some(Self { kind, label })
  }

  pub fn is_test(&self) -> bool {
    TEST_RULE_KINDS.contains(&self.kind)
  }

  /// Bare test name with the variant suffix removed
  pub fn test_name(&self) -> &'a str {
    test_name(self.label)
  }
}

/// Strip the package and variant suffix from a label.
///
/// `//pkg:name--variant123` becomes `name`. Truncation is at the FIRST
/// separator, so `a--b--c` yields `a`.
pub fn test_name(label: &str) -> &str {
  let target = label.split_once(':').map_or(label, |(_, target)| target);
  target.split(VARIANT_SEPARATOR).next().unwrap_or(target)
}

/// Select test names from rdeps output lines.
///
/// Keeps lines whose rule kind is a test rule and whose label is not
/// `is_excluded`. Malformed lines are skipped.
pub fn select_tests<'a, I, F>(lines: I, is_excluded: F) -> BTreeSet<String>
where
  I: IntoIterator<Item = &'a str>,
  F: Fn(&str) -> bool,
{
  lines
    .into_iter()
    .filter_map(RdepRecord::parse)
    .filter(|record| record.is_test())
    .filter(|record| !is_excluded(record.label))
    .map(|record| record.test_name().to_string())
    .collect()
}
