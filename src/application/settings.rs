//! Batch settings consumed by the lineup generator.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{EntityId, TeamId};

/// Default projection multiplier applied to faded teams.
pub const DEFAULT_FADE_DAMPENING: Decimal = dec!(0.8);

/// Minimum-selection rule for one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRule {
    pub team: TeamId,
    pub count: u32,
}

/// Switches for each constraint family of the lineup model.
///
/// Everything is on by default; an option that is unset (no stack team, no
/// minimum salary) is skipped regardless of its switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintToggles {
    pub slot_fill: bool,
    pub single_occupancy: bool,
    pub salary_cap: bool,
    pub min_salary: bool,
    pub max_from_team: bool,
    pub min_teams: bool,
    pub stacking: bool,
    pub exposure: bool,
    pub diversity: bool,
}

impl Default for ConstraintToggles {
    fn default() -> Self {
        Self {
            slot_fill: true,
            single_occupancy: true,
            salary_cap: true,
            min_salary: true,
            max_from_team: true,
            min_teams: true,
            stacking: true,
            exposure: true,
            diversity: true,
        }
    }
}

/// Everything a batch needs besides the pool and roster shape.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSettings {
    /// Lineups to attempt.
    pub num_lineups: u32,
    pub stack: Option<StackRule>,
    /// Lower bound on used salary as a fraction of the cap.
    pub min_salary_used_fraction: Option<Decimal>,
    /// Entities that must differ from every accepted lineup.
    pub player_diversity: u32,
    /// Maximum fraction of the batch each listed entity may appear in.
    pub exposure_caps: HashMap<EntityId, Decimal>,
    /// Absolute appearance cap for every entity.
    pub max_player_appearances: Option<u32>,
    pub fade_teams: BTreeSet<TeamId>,
    pub fade_dampening: Decimal,
    /// Symmetric projection noise in `[0, 1)`.
    pub randomness: f64,
    /// Per-solve time limit; expiry counts as a failed attempt.
    pub solve_time_limit: Option<Duration>,
    /// Ceiling on attempts, below `num_lineups` to cut a batch short.
    pub max_attempts: Option<u32>,
    /// Stop at the first failed attempt instead of moving on.
    pub stop_on_failure: bool,
    /// Permit an accepted lineup identical to an earlier one.
    pub allow_duplicates: bool,
    pub toggles: ConstraintToggles,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            num_lineups: 1,
            stack: None,
            min_salary_used_fraction: None,
            player_diversity: 0,
            exposure_caps: HashMap::new(),
            max_player_appearances: None,
            fade_teams: BTreeSet::new(),
            fade_dampening: DEFAULT_FADE_DAMPENING,
            randomness: 0.0,
            solve_time_limit: None,
            max_attempts: None,
            stop_on_failure: false,
            allow_duplicates: false,
            toggles: ConstraintToggles::default(),
        }
    }
}

impl BatchSettings {
    /// Diversity actually enforced between accepted lineups.
    ///
    /// At least 1 unless duplicates are allowed, so a lineup is never
    /// silently accepted twice.
    #[must_use]
    pub fn effective_diversity(&self) -> u32 {
        if self.allow_duplicates {
            self.player_diversity
        } else {
            self.player_diversity.max(1)
        }
    }

    /// Maximum appearances allowed for `id` over the batch, if capped.
    ///
    /// A fractional cap `c` allows `ceil(c × num_lineups)` appearances; when
    /// both caps apply the tighter one wins.
    #[must_use]
    pub fn appearance_cap(&self, id: &EntityId) -> Option<u32> {
        let fractional = self.exposure_caps.get(id).map(|fraction| {
            (fraction * Decimal::from(self.num_lineups))
                .ceil()
                .to_u32()
                .unwrap_or(u32::MAX)
        });
        match (fractional, self.max_player_appearances) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Attempts this batch will make at most.
    #[must_use]
    pub fn attempt_budget(&self) -> u32 {
        self.max_attempts
            .map_or(self.num_lineups, |max| max.min(self.num_lineups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diversity_floor_prevents_duplicates() {
        let mut settings = BatchSettings::default();
        assert_eq!(settings.effective_diversity(), 1);

        settings.allow_duplicates = true;
        assert_eq!(settings.effective_diversity(), 0);

        settings.player_diversity = 3;
        settings.allow_duplicates = false;
        assert_eq!(settings.effective_diversity(), 3);
    }

    #[test]
    fn fractional_cap_rounds_up() {
        let id = EntityId::from("7");
        let settings = BatchSettings {
            num_lineups: 3,
            exposure_caps: HashMap::from([(id.clone(), dec!(0.5))]),
            ..Default::default()
        };
        assert_eq!(settings.appearance_cap(&id), Some(2));
        assert_eq!(settings.appearance_cap(&EntityId::from("8")), None);
    }

    #[test]
    fn zero_fraction_excludes_entity() {
        let id = EntityId::from("7");
        let settings = BatchSettings {
            num_lineups: 10,
            exposure_caps: HashMap::from([(id.clone(), Decimal::ZERO)]),
            ..Default::default()
        };
        assert_eq!(settings.appearance_cap(&id), Some(0));
    }

    #[test]
    fn tighter_cap_wins() {
        let id = EntityId::from("7");
        let settings = BatchSettings {
            num_lineups: 10,
            exposure_caps: HashMap::from([(id.clone(), dec!(0.5))]),
            max_player_appearances: Some(2),
            ..Default::default()
        };
        assert_eq!(settings.appearance_cap(&id), Some(2));
        assert_eq!(settings.appearance_cap(&EntityId::from("x")), Some(2));
    }

    #[test]
    fn attempt_budget_respects_ceiling() {
        let settings = BatchSettings {
            num_lineups: 10,
            max_attempts: Some(4),
            ..Default::default()
        };
        assert_eq!(settings.attempt_budget(), 4);
    }
}
