//! Terminal rendering of finished lineups.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::application::{BatchReport, EntityUsage};
use crate::domain::{Lineup, RosterShape};

/// Teams with at least this many selections are marked as a stack.
pub const STACK_MARKER_MIN: u32 = 3;

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "Opp")]
    opponent: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "Proj")]
    projected: String,
}

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "Lineups")]
    appearances: u32,
    #[tabled(rename = "Share")]
    share: String,
}

fn usage_rows(usage: &[EntityUsage]) -> Vec<UsageRow> {
    usage
        .iter()
        .map(|u| UsageRow {
            name: u.name.clone(),
            team: u.team.to_string(),
            appearances: u.appearances,
            share: if u.at_cap() {
                format!("{}% MAX", u.percent)
            } else {
                format!("{}%", u.percent)
            },
        })
        .collect()
}

fn rows(lineup: &Lineup) -> Vec<SlotRow> {
    lineup
        .slots()
        .iter()
        .map(|s| {
            let stacked = s.counts_toward_team_limits
                && lineup.team_counts().get(&s.team).copied().unwrap_or(0) >= STACK_MARKER_MIN;
            SlotRow {
                slot: s.slot.to_string(),
                name: s.name.clone(),
                team: if stacked {
                    format!("{}*", s.team)
                } else {
                    s.team.to_string()
                },
                opponent: s.opponent.to_string(),
                salary: s.salary.normalize().to_string(),
                projected: s.projected_points.round_dp(2).to_string(),
            }
        })
        .collect()
}

/// Print one lineup as a table followed by its totals.
pub fn print_lineup(position: usize, lineup: &Lineup, shape: &RosterShape) {
    if output::is_json() {
        output::json_record(
            "lineup",
            json!({
                "position": position,
                "lineup": lineup,
            }),
        );
        return;
    }
    if output::is_quiet() {
        return;
    }

    let summary = lineup.summary();
    output::section(&format!(
        "Lineup {position} {}",
        output::muted(format!("(attempt {})", lineup.index()))
    ));
    output::lines(&Table::new(rows(lineup)).to_string());
    output::field(
        "Salary",
        format!(
            "{} {}",
            summary.total_salary.normalize(),
            output::muted(format!("({} left)", summary.remaining(shape.salary_cap()).normalize()))
        ),
    );
    output::field(
        "Projected",
        output::highlight(summary.total_projected_points.round_dp(2)),
    );
    if output::verbosity() > 0 {
        output::field("Effective", summary.total_effective_points.round_dp(2));
        output::field("Teams", summary.teams);
    }
}

/// Print how often each entity was used across the batch.
///
/// Entities at their appearance cap are marked `MAX`.
pub fn print_usage(report: &BatchReport) {
    if report.usage.is_empty() {
        return;
    }
    if output::is_json() {
        output::json_record(
            "usage",
            json!({
                "produced": report.produced(),
                "entities": report.usage,
            }),
        );
        return;
    }
    if output::is_quiet() {
        return;
    }

    output::section(&format!("Usage across {} lineups", report.produced()));
    output::lines(&Table::new(usage_rows(&report.usage)).to_string());
}

/// Print the requested vs produced line and failure counts.
pub fn print_batch_summary(report: &BatchReport) {
    let produced = report.produced();
    let line = format!("requested {}, produced {produced}", report.requested);

    if output::is_json() {
        output::json_record(
            "batch",
            json!({
                "requested": report.requested,
                "produced": produced,
                "failed": report.failed(),
                "cancelled": report.cancelled,
                "stopped_early": report.stopped_early,
            }),
        );
        return;
    }

    output::section("Summary");
    if report.is_complete() {
        output::success(&line);
    } else {
        output::warning(&line);
    }
    if report.failed() > 0 {
        output::field("Failed", output::negative(report.failed()));
    }
    if report.cancelled {
        output::note("Batch cancelled; lineups accepted so far were kept");
    }
    if report.stopped_early {
        output::note("Stopped at the first failed attempt");
    }
}
