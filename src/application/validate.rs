//! Pre-solve configuration checks.
//!
//! Everything here can be decided from the pool, the roster shape and the
//! settings alone, so a contradictory batch fails before the first solve.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::warn;

use super::settings::BatchSettings;
use crate::domain::{PlayerPool, RosterShape};
use crate::error::ConfigError;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

fn conflict(first: &'static str, second: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Conflict {
        first,
        second,
        reason: reason.into(),
    }
}

/// Check a batch for contradictions before any solving begins.
///
/// # Errors
///
/// Returns the first [`ConfigError`] found, naming the offending option (and
/// the option it conflicts with, where there is one).
pub fn validate_batch(
    pool: &PlayerPool,
    shape: &RosterShape,
    settings: &BatchSettings,
) -> Result<(), ConfigError> {
    validate_settings(settings)?;
    check_team_limits(pool, shape, settings)?;
    check_slots(pool, shape)?;

    let size = shape.size();
    if settings.player_diversity > size {
        return Err(conflict(
            "player_diversity",
            "roster_shape",
            format!(
                "{} entities cannot differ in a roster of {size}",
                settings.player_diversity
            ),
        ));
    }

    for id in settings.exposure_caps.keys() {
        if pool.get(id).is_none() {
            warn!(entity = %id, "Exposure cap for entity not in pool");
        }
    }

    Ok(())
}

/// Range checks that need neither the pool nor the roster shape.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for the first out-of-range option.
pub fn validate_settings(settings: &BatchSettings) -> Result<(), ConfigError> {
    if settings.num_lineups == 0 {
        return Err(invalid("num_lineups", "must be at least 1"));
    }
    if !(0.0..1.0).contains(&settings.randomness) {
        return Err(invalid(
            "randomness",
            format!("{} is outside [0, 1)", settings.randomness),
        ));
    }
    if let Some(fraction) = settings.min_salary_used_fraction {
        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(invalid(
                "min_salary_used_fraction",
                format!("{fraction} is outside [0, 1]"),
            ));
        }
    }
    if !settings.fade_teams.is_empty()
        && (settings.fade_dampening <= Decimal::ZERO || settings.fade_dampening >= Decimal::ONE)
    {
        return Err(invalid(
            "fade_dampening",
            format!("{} is outside (0, 1)", settings.fade_dampening),
        ));
    }
    for (id, fraction) in &settings.exposure_caps {
        if *fraction < Decimal::ZERO || *fraction > Decimal::ONE {
            return Err(invalid(
                "exposure_constraints",
                format!("{id}: {fraction} is outside [0, 1]"),
            ));
        }
    }
    Ok(())
}

fn check_team_limits(
    pool: &PlayerPool,
    shape: &RosterShape,
    settings: &BatchSettings,
) -> Result<(), ConfigError> {
    let toggles = settings.toggles;
    let max = shape.max_from_one_team();
    if toggles.max_from_team && max == 0 {
        return Err(invalid("max_from_one_team", "must be at least 1"));
    }

    let counted_slots: BTreeSet<_> = shape
        .slots()
        .iter()
        .filter(|s| s.counts_toward_team_limits)
        .map(|s| &s.id)
        .collect();
    let counted_size: u32 = shape
        .slots()
        .iter()
        .filter(|s| s.counts_toward_team_limits)
        .map(|s| s.count)
        .sum();

    if let Some(stack) = settings.stack.as_ref().filter(|s| toggles.stacking && s.count > 0) {
        if toggles.max_from_team && stack.count > max {
            return Err(conflict(
                "stack_count",
                "max_from_one_team",
                format!("stack of {} exceeds team limit of {max}", stack.count),
            ));
        }
        let available = pool
            .on_team(&stack.team)
            .filter(|e| e.eligible_slots().iter().any(|s| counted_slots.contains(s)))
            .count();
        if available == 0 {
            return Err(conflict(
                "stack_team",
                "player_pool",
                format!("team {} has no eligible entities", stack.team),
            ));
        }
        if stack.count as usize > available {
            return Err(conflict(
                "stack_count",
                "stack_team",
                format!(
                    "stack of {} but team {} has only {available} eligible entities",
                    stack.count, stack.team
                ),
            ));
        }
    }

    let min_teams = shape.min_teams_represented();
    if toggles.min_teams && min_teams > 0 {
        let teams = pool
            .entities()
            .iter()
            .filter(|e| e.eligible_slots().iter().any(|s| counted_slots.contains(s)))
            .map(|e| e.team())
            .collect::<BTreeSet<_>>()
            .len();
        if min_teams as usize > teams {
            return Err(conflict(
                "min_teams_represented",
                "player_pool",
                format!("{min_teams} teams required but the pool has {teams}"),
            ));
        }
        if min_teams > counted_size {
            return Err(conflict(
                "min_teams_represented",
                "roster_shape",
                format!("{min_teams} teams required but only {counted_size} slots count toward teams"),
            ));
        }
    }

    Ok(())
}

fn check_slots(pool: &PlayerPool, shape: &RosterShape) -> Result<(), ConfigError> {
    for slot in shape.slots() {
        let eligible = pool.eligible_for(&slot.id).count();
        if (slot.count as usize) > eligible {
            return Err(conflict(
                "roster_shape",
                "player_pool",
                format!(
                    "slot {} needs {} entities but only {eligible} are eligible",
                    slot.id, slot.count
                ),
            ));
        }
    }
    if shape.size() as usize > pool.len() {
        return Err(conflict(
            "roster_shape",
            "player_pool",
            format!(
                "roster of {} exceeds pool of {} entities",
                shape.size(),
                pool.len()
            ),
        ));
    }
    Ok(())
}
