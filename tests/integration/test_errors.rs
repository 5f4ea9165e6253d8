//! Integration tests for fatal error paths

use crate::helpers::{TestTree, run_updater};
use anyhow::Result;

#[test]
fn test_missing_build_top() -> Result<()> {
  let tree = TestTree::new()?;
  tree.install()?;

  let output = run_updater(&tree.path, None, &[])?;
  assert!(!output.status.success());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.starts_with("Error: $ANDROID_BUILD_TOP is not defined"), "{}", stderr);
  assert!(stderr.contains("build/envsetup.sh"), "{}", stderr);

  Ok(())
}

#[test]
fn test_package_outside_tree() -> Result<()> {
  let tree = TestTree::new()?;
  tree.install()?;
  let outside = tempfile::TempDir::new()?;

  let output = run_updater(&tree.path, Some(&tree.path), &[outside.path().to_str().unwrap()])?;
  assert!(!output.status.success());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Error: The path"), "{}", stderr);
  assert!(stderr.contains(&outside.path().display().to_string()), "{}", stderr);
  assert!(stderr.contains(&format!("is not under {}", tree.path.display())), "{}", stderr);
  assert!(!outside.path().join("TEST_MAPPING").exists());

  Ok(())
}

#[test]
fn test_soong_failure_reports_output() -> Result<()> {
  let mut tree = TestTree::new()?;
  let pkg = tree.add_package("lib/foo")?;
  tree.fail_soong("GENERATE_BAZEL_FILES=1", "FAILED: ninja exploded");
  tree.install()?;

  let output = run_updater(&tree.path, Some(&tree.path), &[pkg.to_str().unwrap()])?;
  assert_eq!(output.status.code(), Some(2));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Error: Unable to generate bazel workspace"), "{}", stderr);
  assert!(stderr.contains("FAILED: ninja exploded"), "{}", stderr);
  assert!(tree.bazel_calls()?.is_empty());
  assert!(!tree.read_file("soong.log")?.contains("queryview"));

  Ok(())
}

#[test]
fn test_queryview_failure_reports_output() -> Result<()> {
  let mut tree = TestTree::new()?;
  let pkg = tree.add_package("lib/foo")?;
  tree.fail_soong("queryview", "FAILED: queryview out of memory");
  tree.install()?;

  let output = run_updater(&tree.path, Some(&tree.path), &[pkg.to_str().unwrap()])?;
  assert_eq!(output.status.code(), Some(2));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Error: Unable to build bazel queryview"), "{}", stderr);
  assert!(stderr.contains("FAILED: queryview out of memory"), "{}", stderr);
  assert!(tree.read_file("soong.log")?.contains("GENERATE_BAZEL_FILES=1 nothing"));
  assert!(tree.bazel_calls()?.is_empty());
  assert!(!tree.file_exists("lib/foo/TEST_MAPPING"));

  Ok(())
}

#[test]
fn test_bazel_query_failure_reports_stderr() -> Result<()> {
  let mut tree = TestTree::new()?;
  let pkg = tree.add_package("lib/foo")?;
  tree.fail_bazel("ERROR: no such package lib/foo");
  tree.install()?;

  let output = run_updater(&tree.path, Some(&tree.path), &[pkg.to_str().unwrap()])?;
  assert_eq!(output.status.code(), Some(2));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Error: Bazel query failed"), "{}", stderr);
  assert!(stderr.contains("//lib/foo:all"), "{}", stderr);
  assert!(stderr.contains("ERROR: no such package"), "{}", stderr);
  assert!(!tree.file_exists("lib/foo/TEST_MAPPING"));

  Ok(())
}

#[test]
fn test_first_failure_stops_batch() -> Result<()> {
  let mut tree = TestTree::new()?;
  let good = tree.add_package("lib/foo")?;
  tree
    .answer("//lib/foo:all", &["//lib/foo:libfoo"])
    .answer("rdeps(//..., //lib/foo:libfoo)", &["rust_test rule //lib/foo:foo_test"]);
  tree.install()?;

  let output = run_updater(
    &tree.path,
    Some(&tree.path),
    &["/definitely/not/in/tree", good.to_str().unwrap()],
  )?;
  assert!(!output.status.success());
  assert!(!tree.file_exists("lib/foo/TEST_MAPPING"));

  Ok(())
}

#[test]
fn test_missing_policy_file() -> Result<()> {
  let tree = TestTree::new()?;
  tree.install()?;

  let output = run_updater(&tree.path, Some(&tree.path), &["--config", "/nonexistent/policy.toml"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Error: Policy file not found"), "{}", stderr);

  Ok(())
}
