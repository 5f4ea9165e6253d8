//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A fake source tree with stand-ins for `soong_ui.bash` and `tools/bazel`
pub struct TestTree {
  _root: TempDir,
  pub path: PathBuf,
  answers: Vec<(String, Vec<String>)>,
  soong_failure: Option<(String, String)>,
  bazel_failure: Option<String>,
}

impl TestTree {
  /// Create an empty tree
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self {
      _root: root,
      path,
      answers: Vec::new(),
      soong_failure: None,
      bazel_failure: None,
    })
  }

  /// Create a package directory and return its absolute path
  pub fn add_package(&self, rel: &str) -> Result<PathBuf> {
    let dir = self.path.join(rel);
    fs::create_dir_all(&dir)?;
    Ok(dir)
  }

  /// Make the fake bazel print `lines` for a query whose expression is `query`
  pub fn answer(&mut self, query: &str, lines: &[&str]) -> &mut Self {
    self
      .answers
      .push((query.to_string(), lines.iter().map(|l| l.to_string()).collect()));
    self
  }

  /// Make the soong_ui step whose arguments contain `step_arg` fail with `message`
  pub fn fail_soong(&mut self, step_arg: &str, message: &str) -> &mut Self {
    self.soong_failure = Some((step_arg.to_string(), message.to_string()));
    self
  }

  /// Make every bazel query print `stderr` to stderr and exit 7
  pub fn fail_bazel(&mut self, stderr: &str) -> &mut Self {
    self.bazel_failure = Some(stderr.to_string());
    self
  }

  /// Write the fake tools into the tree
  pub fn install(&self) -> Result<()> {
    let mut soong = "#!/bin/sh\necho \"$PWD $*\" >> \"$PWD/soong.log\"\n".to_string();
    if let Some((step_arg, msg)) = &self.soong_failure {
      soong.push_str(&format!("case \"$*\" in\n  *'{}'*)\n    echo '{}'\n    exit 1\n    ;;\nesac\n", step_arg, msg));
    }
    soong.push_str("exit 0\n");
    write_script(&self.path.join("build/soong/soong_ui.bash"), &soong)?;

    let log = self.path.join("bazel.log");
    let mut bazel = format!("#!/bin/sh\necho \"$PWD|$3\" >> '{}'\n", log.display());
    if let Some(stderr) = &self.bazel_failure {
      bazel.push_str(&format!("echo '{}' >&2\nexit 7\n", stderr));
    }
    bazel.push_str("case \"$3\" in\n");
    for (query, lines) in &self.answers {
      bazel.push_str(&format!("  '{}')\n", query));
      for line in lines {
        bazel.push_str(&format!("    echo '{}'\n", line));
      }
      bazel.push_str("    ;;\n");
    }
    bazel.push_str("esac\nexit 0\n");
    write_script(&self.path.join("tools/bazel"), &bazel)?;

    Ok(())
  }

  /// Lines of `<cwd>|<query>` recorded by the fake bazel
  pub fn bazel_calls(&self) -> Result<Vec<String>> {
    let log = fs::read_to_string(self.path.join("bazel.log")).unwrap_or_default();
    Ok(log.lines().map(String::from).collect())
  }

  /// Read a file relative to the tree root
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(fs::read_to_string(self.path.join(path))?)
  }

  /// Check if a file exists relative to the tree root
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }
}

fn write_script(path: &Path, content: &str) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(path, content)?;
  fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
  Ok(())
}

/// Run update-crate-tests with `ANDROID_BUILD_TOP` set to `build_top` (or unset)
pub fn run_updater(cwd: &Path, build_top: Option<&Path>, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_update-crate-tests");

  let mut cmd = Command::new(bin);
  cmd.current_dir(cwd).args(args);
  match build_top {
    Some(top) => cmd.env("ANDROID_BUILD_TOP", top),
    None => cmd.env_remove("ANDROID_BUILD_TOP"),
  };

  cmd.output().context("Failed to run update-crate-tests")
}

/// Like [`run_updater`] but fails unless the command succeeds
pub fn run_updater_ok(cwd: &Path, build_top: &Path, args: &[&str]) -> Result<Output> {
  let output = run_updater(cwd, Some(build_top), args)?;
  if !output.status.success() {
    anyhow::bail!(
      "update-crate-tests failed: {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      String::from_utf8_lossy(&output.stdout),
      String::from_utf8_lossy(&output.stderr)
    );
  }
  Ok(output)
}
