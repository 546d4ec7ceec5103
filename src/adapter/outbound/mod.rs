//! Outbound adapters: salary and injury files in, lineup files out.

pub mod csv;
pub mod discovery;
