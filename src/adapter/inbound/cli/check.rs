//! Handlers for `check config` and `check pool`.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::PoolArgs;
use crate::adapter::inbound::cli::input;
use crate::adapter::inbound::cli::output;
use crate::domain::{PlayerPool, RosterShape, SlotId};
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate a configuration file without loading a pool.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;
    let shape = config.roster_shape()?;
    let settings = config.batch_settings()?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Sport", config.sport);
    output::field("Roster", roster_labels(&shape));
    output::field("Salary cap", shape.salary_cap());
    output::field("Max per team", shape.max_from_one_team());
    output::field("Min teams", shape.min_teams_represented());
    output::field("Lineups", settings.num_lineups);
    output::field("Diversity", settings.effective_diversity());
    match &settings.stack {
        Some(stack) => output::field("Stack", format!("{} x{}", stack.team, stack.count)),
        None => output::field("Stack", "none"),
    }
    if !settings.exposure_caps.is_empty() {
        output::field("Exposure caps", settings.exposure_caps.len());
    }
    output::note("Pool-dependent checks run when a salary file is loaded");

    Ok(())
}

/// Load a salary file and report the pool it produces.
pub fn execute_pool(args: &PoolArgs) -> Result<()> {
    let mut config = input::load_config(args.config.as_deref())?;
    if let Some(sport) = args.sport {
        config.sport = sport;
    }
    let shape = config.roster_shape()?;
    let loaded = input::load_pool(
        args.pool.as_deref(),
        args.injuries.as_deref(),
        config.sport,
        &shape,
    )?;
    let eligibility = slot_eligibility(&loaded.pool, &shape);

    if output::is_json() {
        output::json_record(
            "pool",
            json!({
                "path": loaded.path.display().to_string(),
                "sport": config.sport.as_str(),
                "entities": loaded.pool.len(),
                "teams": loaded.pool.teams().len(),
                "rejected": loaded.pool.rejected().len(),
                "excluded": loaded.excluded,
                "eligible": eligibility
                    .iter()
                    .map(|(slot, n)| (slot.to_string(), *n))
                    .collect::<BTreeMap<_, _>>(),
            }),
        );
        return Ok(());
    }

    output::section("Pool Check");
    output::field("Salary file", loaded.path.display());
    output::field("Sport", config.sport);
    output::field("Entities", loaded.pool.len());
    let teams: Vec<String> = loaded.pool.teams().iter().map(ToString::to_string).collect();
    output::field("Teams", teams.join(", "));
    if loaded.excluded > 0 {
        output::field("Excluded", loaded.excluded);
    }

    output::section("Eligibility");
    let mut short = false;
    for slot in shape.slots() {
        let available = eligibility.get(&slot.id).copied().unwrap_or(0);
        let cell = format!("{available} eligible, {} required", slot.count);
        if available < slot.count as usize {
            short = true;
            output::field(slot.id.as_str(), output::negative(cell));
        } else {
            output::field(slot.id.as_str(), cell);
        }
    }

    for rejected in loaded.pool.rejected() {
        output::warning(&rejected.to_string());
    }
    if short {
        output::warning("Some slots cannot be filled from this pool");
    } else {
        output::success("Pool can fill every slot");
    }

    Ok(())
}

fn roster_labels(shape: &RosterShape) -> String {
    shape
        .slots()
        .iter()
        .map(|s| format!("{}:{}", s.id, s.count))
        .collect::<Vec<_>>()
        .join(" ")
}

fn slot_eligibility(pool: &PlayerPool, shape: &RosterShape) -> BTreeMap<SlotId, usize> {
    shape
        .slots()
        .iter()
        .map(|s| (s.id.clone(), pool.eligible_for(&s.id).count()))
        .collect()
}
