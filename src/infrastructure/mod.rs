//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration loading and contest format presets.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`sport`] - Roster shape presets per contest format

pub mod config;
pub mod sport;
