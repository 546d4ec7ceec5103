//! DraftKings-style salary file reader.
//!
//! Maps the salary CSV onto [`EntityBuilder`] records for the pool. Captain
//! rows (`Roster Position` equal to the captain slot) are folded into the
//! base entity with the same name and team; the captain form is always
//! derived by multiplier, never from the captain row's own salary. The
//! captain row's id is kept for upload files.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::{Entity, EntityBuilder, EntityId, RosterShape, SlotId, TeamId};
use crate::error::{Error, Result};
use crate::port::PoolSource;

const ID: &[&str] = &["ID"];
const NAME: &[&str] = &["Name"];
const NAME_ID: &[&str] = &["Name + ID"];
const TEAM: &[&str] = &["TeamAbbrev", "Team"];
const SALARY: &[&str] = &["Salary"];
const PROJECTION: &[&str] = &["AvgPointsPerGame", "FPPG"];
const POSITION: &[&str] = &["Roster Position", "Position"];
const GAME_INFO: &[&str] = &["Game Info"];

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    id: Option<usize>,
    name: Option<usize>,
    name_id: Option<usize>,
    team: usize,
    salary: usize,
    projection: Option<usize>,
    position: usize,
    game_info: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        // Aliases are tried in order, so "Roster Position" wins over "Position".
        let find = |aliases: &[&str]| {
            aliases.iter().find_map(|a| {
                headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(a))
            })
        };
        let required = |aliases: &[&'static str]| {
            find(aliases).ok_or_else(|| Error::Parse(format!("missing column '{}'", aliases[0])))
        };

        let columns = Self {
            id: find(ID),
            name: find(NAME),
            name_id: find(NAME_ID),
            team: required(TEAM)?,
            salary: required(SALARY)?,
            projection: find(PROJECTION),
            position: required(POSITION)?,
            game_info: find(GAME_INFO),
        };
        if columns.name.is_none() && columns.name_id.is_none() {
            return Err(Error::Parse("missing column 'Name'".to_string()));
        }
        if columns.id.is_none() && columns.name_id.is_none() {
            return Err(Error::Parse("missing column 'ID'".to_string()));
        }
        Ok(columns)
    }
}

/// Split `"Jane Doe (12345)"` into name and id.
fn split_name_id(field: &str) -> (String, Option<String>) {
    match field.split_once('(') {
        Some((name, rest)) => {
            let id = rest.trim_end().trim_end_matches(')').trim();
            (
                name.trim().to_string(),
                (!id.is_empty()).then(|| id.to_string()),
            )
        }
        None => (field.trim().to_string(), None),
    }
}

fn parse_salary(field: &str) -> Option<i64> {
    let cleaned: String = field
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();
    cleaned
        .parse::<i64>()
        .ok()
        .or_else(|| cleaned.parse::<Decimal>().ok().and_then(|d| d.trunc().to_i64()))
}

/// One parsed row before folding.
struct Row {
    builder: EntityBuilder,
    captain_row: bool,
}

/// Salary CSV bound to a roster shape.
#[derive(Debug, Clone)]
pub struct SalaryFile {
    path: PathBuf,
    shape: RosterShape,
    captain_source: Option<SlotId>,
    excluded_names: HashSet<String>,
}

impl SalaryFile {
    /// Read `path` for a roster of `shape`.
    ///
    /// Entities eligible for `captain_source` are also made eligible for the
    /// shape's captain slot.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, shape: RosterShape, captain_source: Option<SlotId>) -> Self {
        Self {
            path: path.into(),
            shape,
            captain_source,
            excluded_names: HashSet::new(),
        }
    }

    /// Drop entities whose name is in `names` (e.g. an injury list).
    #[must_use]
    pub fn excluding(mut self, names: HashSet<String>) -> Self {
        self.excluded_names = names;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse records from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV is malformed or a required column is
    /// missing. Rows with unusable fields are skipped with a warning.
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<EntityBuilder>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let columns = Columns::resolve(reader.headers()?)?;

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            if let Some(row) = self.parse_row(&columns, &record, line + 2) {
                rows.push(row);
            }
        }

        let records = self.fold_captains(rows);
        let before = records.len();
        let records: Vec<EntityBuilder> = records
            .into_iter()
            .filter(|r| !self.excluded_names.contains(r.name().trim()))
            .collect();
        if before != records.len() {
            info!(excluded = before - records.len(), "Excluded listed players");
        }

        debug!(records = records.len(), "Parsed salary file");
        Ok(records)
    }

    fn parse_row(&self, columns: &Columns, record: &StringRecord, line: usize) -> Option<Row> {
        let get = |i: Option<usize>| i.and_then(|i| record.get(i)).map(str::trim);

        let (mut name, mut id) = get(columns.name_id)
            .map(split_name_id)
            .unwrap_or_default();
        if let Some(n) = get(columns.name).filter(|n| !n.is_empty()) {
            name = n.to_string();
        }
        if let Some(i) = get(columns.id).filter(|i| !i.is_empty()) {
            id = Some(i.to_string());
        }
        let Some(id) = id else {
            warn!(line, "Row has no player id, skipping");
            return None;
        };

        let team = get(Some(columns.team)).unwrap_or_default();
        let Some(salary) = get(Some(columns.salary)).and_then(parse_salary) else {
            warn!(line, id = %id, "Unreadable salary, skipping");
            return None;
        };
        let projection = match get(columns.projection).filter(|p| !p.is_empty()) {
            Some(p) => match p.parse::<Decimal>() {
                Ok(p) => p,
                Err(_) => {
                    warn!(line, id = %id, value = p, "Unreadable projection, skipping");
                    return None;
                }
            },
            None => Decimal::ZERO,
        };

        let positions: Vec<SlotId> = get(Some(columns.position))
            .unwrap_or_default()
            .split('/')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(SlotId::from)
            .collect();
        let captain = self.shape.captain_slot().map(|s| s.id.clone());
        let captain_row =
            positions.len() == 1 && captain.as_ref().is_some_and(|c| *c == positions[0]);

        let mut builder = Entity::builder(EntityId::from(id), name, TeamId::from(team))
            .salary(salary)
            .projection(projection)
            .matchup(get(columns.game_info));
        for slot in positions {
            if self.shape.slot(&slot).is_some() {
                if let (Some(source), Some(captain)) = (&self.captain_source, &captain) {
                    if *source == slot {
                        builder = builder.eligible(captain.clone());
                    }
                }
                builder = builder.eligible(slot);
            }
        }

        Some(Row {
            builder,
            captain_row,
        })
    }

    fn fold_captains(&self, rows: Vec<Row>) -> Vec<EntityBuilder> {
        let Some(captain) = self.shape.captain_slot().map(|s| s.id.clone()) else {
            return rows.into_iter().map(|r| r.builder).collect();
        };

        let key = |b: &EntityBuilder| (b.name().to_string(), b.team().clone());
        let (captains, bases): (Vec<Row>, Vec<Row>) = rows.into_iter().partition(|r| r.captain_row);
        let base_keys: HashSet<(String, TeamId)> = bases.iter().map(|r| key(&r.builder)).collect();

        let mut folded: HashMap<(String, TeamId), EntityId> = HashMap::new();
        for row in &captains {
            let k = key(&row.builder);
            if base_keys.contains(&k) {
                folded.insert(k, row.builder.id().clone());
            } else {
                warn!(
                    id = %row.builder.id(),
                    name = row.builder.name(),
                    "Captain row without a matching base row, skipping"
                );
            }
        }

        bases
            .into_iter()
            .map(|r| match folded.get(&key(&r.builder)) {
                Some(captain_id) => r
                    .builder
                    .eligible(captain.clone())
                    .with_captain_id(captain_id.clone()),
                None => r.builder,
            })
            .collect()
    }
}

impl PoolSource for SalaryFile {
    fn records(&self) -> Result<Vec<EntityBuilder>> {
        let file = std::fs::File::open(&self.path)?;
        info!(path = %self.path.display(), "Reading salary file");
        self.read_from(file)
    }
}
