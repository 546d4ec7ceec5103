//! Injury exclusion list reader.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

const PLAYER: &[&str] = &["Player", "Name"];

/// Read the player names listed in an injury CSV at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or has no `Player` column.
pub fn load_injury_list(path: &Path) -> Result<HashSet<String>> {
    let file = std::fs::File::open(path)?;
    let names = read_injury_list(file)?;
    info!(path = %path.display(), players = names.len(), "Loaded injury list");
    Ok(names)
}

/// Read injured player names from any reader.
///
/// Names are trimmed; blank cells are ignored.
///
/// # Errors
///
/// Returns an error if the CSV is malformed or has no `Player` column.
pub fn read_injury_list<R: Read>(reader: R) -> Result<HashSet<String>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?;
    let column = PLAYER
        .iter()
        .find_map(|alias| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(alias))
        })
        .ok_or_else(|| Error::Parse("injury list has no 'Player' column".to_string()))?;

    let mut names = HashSet::new();
    for record in reader.records() {
        let record = record?;
        if let Some(name) = record.get(column).map(str::trim).filter(|n| !n.is_empty()) {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}
