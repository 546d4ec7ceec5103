//! CLI module graph.

pub mod check;
pub mod command;
pub mod input;
pub mod optimize;
pub mod output;
pub mod table;
