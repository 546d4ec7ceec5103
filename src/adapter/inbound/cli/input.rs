//! Configuration and player-pool loading shared by the CLI handlers.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::adapter::outbound::csv::{load_injury_list, SalaryFile};
use crate::adapter::outbound::discovery::{default_search_dirs, find_salary_file};
use crate::domain::{PlayerPool, RosterShape};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;
use crate::infrastructure::sport::Sport;
use crate::port::PoolSource;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Load the configuration file.
///
/// An explicit path must exist. Without one, `config.toml` in the working
/// directory is used when present and the built-in defaults otherwise.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG).is_file() => Config::load(DEFAULT_CONFIG),
        None => Ok(Config::default()),
    }
}

/// A validated pool and the file it came from.
#[derive(Debug)]
pub struct LoadedPool {
    pub path: PathBuf,
    pub pool: PlayerPool,
    /// Names removed by the injury list.
    pub excluded: usize,
}

/// Read a salary file into a validated pool.
///
/// Falls back to salary-file discovery when `path` is `None`.
///
/// # Errors
///
/// Returns an error if no salary file can be found or read, or when no
/// valid entity remains.
pub fn load_pool(
    path: Option<&Path>,
    injuries: Option<&Path>,
    sport: Sport,
    shape: &RosterShape,
) -> Result<LoadedPool> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let dirs = default_search_dirs();
            let found = find_salary_file(&dirs).ok_or(ConfigError::MissingField { field: "pool" })?;
            info!(path = %found.display(), "Discovered salary file");
            found
        }
    };

    let excluded_names = match injuries {
        Some(list) => load_injury_list(list)?,
        None => HashSet::new(),
    };
    let excluded = excluded_names.len();

    let source = SalaryFile::new(&path, shape.clone(), sport.captain_source()).excluding(excluded_names);
    let pool = PlayerPool::from_records(source.records()?)?;

    Ok(LoadedPool {
        path,
        pool,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SALARIES: &str = "\
Position,Name + ID,Name,ID,Roster Position,Salary,Game Info,TeamAbbrev,AvgPointsPerGame
G,A'ja Wilson (1),A'ja Wilson,1,UTIL,10000,LVA@NYL 07/01/2025,LVA,45.5
F,Breanna Stewart (2),Breanna Stewart,2,UTIL,9800,LVA@NYL 07/01/2025,NYL,44.0
G,Kelsey Plum (3),Kelsey Plum,3,UTIL,7000,LVA@NYL 07/01/2025,LVA,30.0
";

    #[test]
    fn explicit_missing_config_is_an_error() {
        assert!(load_config(Some(Path::new("/no/such/config.toml"))).is_err());
    }

    #[test]
    fn pool_honours_injury_list() {
        let dir = tempfile::tempdir().unwrap();
        let salaries = dir.path().join("DKSalaries.csv");
        std::fs::write(&salaries, SALARIES).unwrap();
        let injuries = dir.path().join("injuries.csv");
        let mut file = std::fs::File::create(&injuries).unwrap();
        writeln!(file, "Player\nKelsey Plum").unwrap();

        let shape = Sport::Showdown.roster_shape().unwrap();
        let loaded = load_pool(Some(&salaries), Some(&injuries), Sport::Showdown, &shape).unwrap();

        assert_eq!(loaded.pool.len(), 2);
        assert_eq!(loaded.excluded, 1);
        assert_eq!(loaded.path, salaries);
    }
}
