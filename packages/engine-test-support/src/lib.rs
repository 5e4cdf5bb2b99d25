//! Engine test support utilities
//!
//! This crate provides utilities shared by the engine's unit and
//! integration tests: unified logging initialization and unique
//! test-data helpers.

pub mod test_logging;
pub mod unique_helpers;
