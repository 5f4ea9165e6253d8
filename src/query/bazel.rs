//! Bazel queryview backend
//!
//! Construction regenerates the Bazel export files through `soong_ui` and
//! builds the `queryview` workspace, which takes a couple of minutes on a
//! full tree. Queries then run `tools/bazel query --config=queryview`.
//!
//! Each subprocess gets an explicit working directory; the process working
//! directory is never changed. `soong_ui` must run from the tree root.

use crate::core::config::MappingPolicy;
use crate::core::env::Env;
use crate::core::error::{ConfigError, QueryError, UpdaterError, UpdaterResult};
use crate::query::GraphQuery;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Bazel wrapper over a generated queryview
pub struct Bazel<'p> {
  /// `<root>/tools/bazel`
  bazel_path: PathBuf,

  policy: &'p MappingPolicy,
}

impl<'p> Bazel<'p> {
  /// Generate the Bazel workspace and build the queryview.
  ///
  /// Fails on non-Linux hosts and when either `soong_ui` step exits
  /// non-zero; the error carries the step's combined output.
  pub fn init(env: &Env, policy: &'p MappingPolicy) -> UpdaterResult<Self> {
    check_platform(std::env::consts::OS)?;

    let root = env.build_top();
    let soong_ui = root.join("build").join("soong").join("soong_ui.bash");

    println!("Generating Bazel files...");
    run_soong_ui(
      &soong_ui,
      root,
      &["--make-mode", "GENERATE_BAZEL_FILES=1", "nothing"],
      "Unable to generate bazel workspace",
    )?;

    println!("Building Bazel Queryview. This can take a couple of minutes...");
    run_soong_ui(
      &soong_ui,
      root,
      &["--build-mode", "--all-modules", "--dir=.", "queryview"],
      "Unable to build bazel queryview",
    )?;

    Ok(Self {
      bazel_path: root.join("tools").join("bazel"),
      policy,
    })
  }
}

impl GraphQuery for Bazel<'_> {
  fn run_query(&self, cwd: &Path, args: &[&str]) -> UpdaterResult<String> {
    let output = Command::new(&self.bazel_path)
      .current_dir(cwd)
      .args(["query", "--config=queryview"])
      .args(args)
      .output()
      .map_err(|e| spawn_failed(&self.bazel_path, e))?;

    if !output.status.success() {
      return Err(UpdaterError::Query(QueryError::QueryFailed {
        command: format!("bazel query --config=queryview {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }

  fn policy(&self) -> &MappingPolicy {
    self.policy
  }
}

/// Only Linux hosts are supported
pub fn check_platform(os: &str) -> UpdaterResult<()> {
  if os == "linux" {
    Ok(())
  } else {
    Err(UpdaterError::Config(ConfigError::UnsupportedPlatform { os: os.to_string() }))
  }
}

fn run_soong_ui(soong_ui: &Path, root: &Path, args: &[&str], step: &str) -> UpdaterResult<()> {
  let output = Command::new(soong_ui)
    .current_dir(root)
    .args(args)
    .output()
    .map_err(|e| spawn_failed(soong_ui, e))?;

  if !output.status.success() {
    return Err(UpdaterError::Query(QueryError::BuildFailed {
      step: step.to_string(),
      output: combined_output(&output),
    }));
  }

  Ok(())
}

/// stdout followed by stderr, the way a shell `2>&1` capture reads
fn combined_output(output: &Output) -> String {
  let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
  combined.push_str(&String::from_utf8_lossy(&output.stderr));
  combined
}

fn spawn_failed(program: &Path, err: std::io::Error) -> UpdaterError {
  UpdaterError::Query(QueryError::SpawnFailed {
    program: program.to_path_buf(),
    reason: err.to_string(),
  })
}
