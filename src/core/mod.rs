//! Shared building blocks
//!
//! - **config**: exclusion and option tables (built-in or from a TOML file)
//! - **env**: tree root resolution from `ANDROID_BUILD_TOP`
//! - **error**: error types with exit codes and help messages

pub mod config;
pub mod env;
pub mod error;
