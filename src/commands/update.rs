//! `update-crate-tests [PATH]...` - regenerate TEST_MAPPING files
//!
//! Paths are processed in order. The first failure aborts the run; later
//! paths are left untouched.

use crate::core::config::MappingPolicy;
use crate::core::env::Env;
use crate::core::error::UpdaterResult;
use crate::mapping::TestMapping;
use crate::query::GraphQuery;
use std::path::PathBuf;

/// Run the update command over every path
pub fn run_update(
  env: &Env,
  graph: &impl GraphQuery,
  policy: &MappingPolicy,
  paths: &[PathBuf],
  dry_run: bool,
) -> UpdaterResult<()> {
  for path in paths {
    let mapping = TestMapping::new(path, env, graph)?;
    mapping.create(policy, dry_run)?;
  }
  Ok(())
}
