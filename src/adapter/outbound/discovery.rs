//! Salary file discovery.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

/// File name prefix of DraftKings salary exports.
pub const SALARY_FILE_PREFIX: &str = "DKSalaries";

/// Directories searched when no salary file is given: the working
/// directory, then the user's Downloads directory.
#[must_use]
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(downloads) = dirs::download_dir() {
        dirs.push(downloads);
    }
    dirs
}

fn is_salary_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(SALARY_FILE_PREFIX)
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Newest `DKSalaries*.csv` in the first directory that has one.
#[must_use]
pub fn find_salary_file(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in search_dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        let newest = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_salary_file(p))
            .map(|p| {
                let modified = p
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (modified, p)
            })
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        if let Some((_, path)) = newest {
            debug!(path = %path.display(), "Found salary file");
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn matches_prefix_and_extension() {
        assert!(is_salary_file(Path::new("/tmp/DKSalaries (3).csv")));
        assert!(is_salary_file(Path::new("DKSalaries.CSV")));
        assert!(!is_salary_file(Path::new("salaries.csv")));
        assert!(!is_salary_file(Path::new("DKSalaries.xlsx")));
    }

    #[test]
    fn first_directory_with_a_match_wins() {
        let empty = tempfile::tempdir().unwrap();
        let with_file = tempfile::tempdir().unwrap();
        fs::write(with_file.path().join("notes.txt"), "x").unwrap();
        fs::write(with_file.path().join("DKSalaries.csv"), "ID\n").unwrap();

        let found = find_salary_file(&[
            empty.path().to_path_buf(),
            with_file.path().to_path_buf(),
        ])
        .unwrap();
        assert_eq!(found.file_name().unwrap(), "DKSalaries.csv");
    }

    #[test]
    fn nothing_found() {
        let empty = tempfile::tempdir().unwrap();
        assert!(find_salary_file(&[empty.path().to_path_buf()]).is_none());
    }
}
