//! CLI commands for update-crate-tests
//!
//! - **update**: regenerate TEST_MAPPING for each package path

pub mod update;

pub use update::run_update;
