//! Lineup CSV output.
//!
//! Writes three files per batch: a detailed file with one row per filled
//! slot, an upload-ready roster file with one row of site ids per lineup,
//! and a totals-only summary. A captain slot is written with the id of the
//! entity's own captain row when the salary file had one.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{Lineup, RosterShape};
use crate::error::Result;
use crate::port::LineupSink;

const DETAILED_STEM: &str = "optimized_lineups";
const ROSTER_STEM: &str = "lineup";
const SUMMARY_STEM: &str = "lineup_summary";

/// Paths written for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub detailed: PathBuf,
    pub roster: PathBuf,
    pub summary: PathBuf,
}

impl OutputFiles {
    fn in_dir(dir: &Path, stamp: Option<&str>) -> Self {
        let name = |stem: &str| match stamp {
            Some(stamp) => dir.join(format!("{stem}_{stamp}.csv")),
            None => dir.join(format!("{stem}.csv")),
        };
        Self {
            detailed: name(DETAILED_STEM),
            roster: name(ROSTER_STEM),
            summary: name(SUMMARY_STEM),
        }
    }
}

/// Writes lineups as CSV files into a directory.
#[derive(Debug, Clone)]
pub struct CsvLineupWriter {
    files: OutputFiles,
}

impl CsvLineupWriter {
    /// Writer for `dir`, with a `YYYYMMDD_HHMMSS` suffix when `timestamped`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, timestamped: bool) -> Self {
        let stamp = timestamped.then(|| chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
        Self::with_stamp(dir, stamp.as_deref())
    }

    /// Writer with an explicit file name suffix.
    #[must_use]
    pub fn with_stamp(dir: impl AsRef<Path>, stamp: Option<&str>) -> Self {
        Self {
            files: OutputFiles::in_dir(dir.as_ref(), stamp),
        }
    }

    #[must_use]
    pub fn files(&self) -> &OutputFiles {
        &self.files
    }

    fn write_detailed(&self, lineups: &[Lineup]) -> Result<()> {
        let mut out = csv::Writer::from_path(&self.files.detailed)?;
        out.write_record([
            "Lineup",
            "Slot",
            "ID",
            "Name",
            "Team",
            "Opponent",
            "Salary",
            "Projected Points",
            "Effective Points",
        ])?;
        for lineup in lineups {
            let index = lineup.index().to_string();
            for slot in lineup.slots() {
                let salary = slot.salary.normalize().to_string();
                let projected = slot.projected_points.round_dp(2).normalize().to_string();
                let effective = slot.effective_points.round_dp(2).normalize().to_string();
                out.write_record([
                    index.as_str(),
                    slot.slot.as_str(),
                    slot.upload_id().as_str(),
                    slot.name.as_str(),
                    slot.team.as_str(),
                    slot.opponent.as_str(),
                    salary.as_str(),
                    projected.as_str(),
                    effective.as_str(),
                ])?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn write_roster(&self, lineups: &[Lineup], shape: &RosterShape) -> Result<()> {
        let mut out = csv::Writer::from_path(&self.files.roster)?;
        let labels = shape.expanded_labels();
        out.write_record(labels.iter().map(|l| l.as_str()))?;
        for lineup in lineups {
            let mut row = Vec::with_capacity(labels.len());
            for slot in shape.slots() {
                row.extend(lineup.in_slot(&slot.id).map(|s| s.upload_id().as_str()));
            }
            out.write_record(&row)?;
        }
        out.flush()?;
        Ok(())
    }

    fn write_summary(&self, lineups: &[Lineup]) -> Result<()> {
        let mut out = csv::Writer::from_path(&self.files.summary)?;
        out.write_record([
            "Lineup",
            "Total Salary",
            "Projected Points",
            "Effective Points",
            "Teams",
        ])?;
        for lineup in lineups {
            let summary = lineup.summary();
            out.write_record([
                summary.index.to_string(),
                summary.total_salary.normalize().to_string(),
                summary.total_projected_points.round_dp(2).normalize().to_string(),
                summary.total_effective_points.round_dp(2).normalize().to_string(),
                summary.teams.to_string(),
            ])?;
        }
        out.flush()?;
        Ok(())
    }
}

impl LineupSink for CsvLineupWriter {
    fn write_lineups(&mut self, lineups: &[Lineup], shape: &RosterShape) -> Result<()> {
        if let Some(dir) = self.files.detailed.parent() {
            std::fs::create_dir_all(dir)?;
        }
        self.write_detailed(lineups)?;
        self.write_roster(lineups, shape)?;
        self.write_summary(lineups)?;

        info!(
            lineups = lineups.len(),
            detailed = %self.files.detailed.display(),
            roster = %self.files.roster.display(),
            summary = %self.files.summary.display(),
            "Wrote lineup files"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, LineupSlot, SlotId, SlotSpec, TeamId};
    use rust_decimal_macros::dec;

    fn slot(slot: &str, id: &str, team: &str, points: rust_decimal::Decimal) -> LineupSlot {
        LineupSlot {
            slot: SlotId::from(slot),
            entity_id: EntityId::from(id),
            captain_id: None,
            name: format!("Player {id}"),
            team: TeamId::from(team),
            opponent: TeamId::unknown(),
            salary: dec!(5000),
            projected_points: points,
            effective_points: points,
            counts_toward_team_limits: true,
        }
    }

    fn shape() -> RosterShape {
        RosterShape::try_new(
            vec![SlotSpec::captain("CPT", 1), SlotSpec::new("UTIL", 2)],
            50_000,
            5,
            0,
        )
        .unwrap()
    }

    #[test]
    fn file_names_carry_stamp() {
        let writer = CsvLineupWriter::with_stamp("/out", Some("20250101_120000"));
        assert_eq!(
            writer.files().detailed,
            PathBuf::from("/out/optimized_lineups_20250101_120000.csv")
        );
        let plain = CsvLineupWriter::with_stamp("/out", None);
        assert_eq!(plain.files().roster, PathBuf::from("/out/lineup.csv"));
    }

    #[test]
    fn writes_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let lineup = Lineup::new(
            2,
            vec![
                slot("CPT", "1", "LVA", dec!(75)),
                slot("UTIL", "2", "LVA", dec!(40)),
                slot("UTIL", "3", "NYL", dec!(30.25)),
            ],
        );
        let mut writer = CsvLineupWriter::with_stamp(dir.path(), None);
        writer.write_lineups(&[lineup], &shape()).unwrap();

        let roster = std::fs::read_to_string(&writer.files().roster).unwrap();
        assert_eq!(roster, "CPT,UTIL,UTIL\n1,2,3\n");

        let detailed = std::fs::read_to_string(&writer.files().detailed).unwrap();
        assert!(detailed.starts_with("Lineup,Slot,ID,Name,Team,Opponent"));
        assert!(detailed.contains("2,UTIL,3,Player 3,NYL,Unknown,5000,30.25,30.25"));

        let summary = std::fs::read_to_string(&writer.files().summary).unwrap();
        assert!(summary.contains("2,15000,145.25,145.25,2"));
    }

    #[test]
    fn captain_slot_uses_captain_row_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut captain = slot("CPT", "1", "LVA", dec!(75));
        captain.captain_id = Some(EntityId::from("901"));
        let lineup = Lineup::new(
            1,
            vec![
                captain,
                slot("UTIL", "2", "LVA", dec!(40)),
                slot("UTIL", "3", "NYL", dec!(30)),
            ],
        );
        let mut writer = CsvLineupWriter::with_stamp(dir.path(), None);
        writer.write_lineups(&[lineup], &shape()).unwrap();

        let roster = std::fs::read_to_string(&writer.files().roster).unwrap();
        assert_eq!(roster, "CPT,UTIL,UTIL\n901,2,3\n");
        let detailed = std::fs::read_to_string(&writer.files().detailed).unwrap();
        assert!(detailed.contains("1,CPT,901,Player 1,LVA"));
    }
}
