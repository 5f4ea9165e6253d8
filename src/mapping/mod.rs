//! Package resolution and TEST_MAPPING generation
//!
//! - **package**: locate a crate in the tree and collect its rdep tests
//! - **test_mapping**: build, render and write the TEST_MAPPING document

pub mod package;
pub mod test_mapping;

pub use test_mapping::TestMapping;
