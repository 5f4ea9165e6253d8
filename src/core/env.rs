//! Execution environment - resolve the source tree root once at startup
//!
//! The tree root comes from `ANDROID_BUILD_TOP`, which `build/envsetup.sh`
//! and `lunch` export. Everything downstream takes paths from here rather
//! than from the process working directory.

use crate::core::error::{ConfigError, UpdaterError, UpdaterResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the variable holding the absolute tree root
pub const BUILD_TOP_VAR: &str = "ANDROID_BUILD_TOP";

/// Resolved execution environment
#[derive(Debug, Clone)]
pub struct Env {
  /// Absolute path to the top of the source tree
  pub build_top: PathBuf,
}

impl Env {
  /// Read the tree root from the process environment
  pub fn load() -> UpdaterResult<Self> {
    Self::from_value(std::env::var_os(BUILD_TOP_VAR))
  }

  /// Build from an already-looked-up variable value
  pub fn from_value(value: Option<OsString>) -> UpdaterResult<Self> {
    match value {
      Some(top) if !top.is_empty() => Ok(Self {
        build_top: PathBuf::from(top),
      }),
      _ => Err(UpdaterError::Config(ConfigError::MissingEnv {
        var: BUILD_TOP_VAR.to_string(),
      })),
    }
  }

  /// Tree root as Path reference (convenience)
  pub fn build_top(&self) -> &Path {
    &self.build_top
  }
}
