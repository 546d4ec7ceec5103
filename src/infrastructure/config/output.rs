//! Output configuration: the `[output]` table.

use std::path::PathBuf;

use serde::Deserialize;

/// Where and how lineup files are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving the CSV files.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Present lineups by projected points, best first.
    #[serde(default = "default_true")]
    pub sort_by_points: bool,
    /// Append a timestamp to file names so runs never overwrite each other.
    #[serde(default = "default_true")]
    pub timestamped: bool,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

const fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            sort_by_points: true,
            timestamped: true,
        }
    }
}
