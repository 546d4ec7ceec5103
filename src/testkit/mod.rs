//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Pool and roster builders
//! - [`scenario`] - Canned pools for the batch scenarios plus a brute-force
//!   showdown optimum to check solver results against
//! - [`csv`] - Salary file contents in DraftKings layout

pub mod csv;
pub mod domain;
pub mod scenario;
