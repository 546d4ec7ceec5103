//! Optimizer configuration: the `[optimizer]` table.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::{BatchSettings, StackRule, DEFAULT_FADE_DAMPENING};
use crate::domain::{EntityId, RosterShape, TeamId};
use crate::error::ConfigError;

/// Batch options.
///
/// `salary_cap`, `max_from_one_team` and `min_teams_represented` override
/// the sport preset when set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizerConfig {
    #[serde(default = "default_num_lineups")]
    pub num_lineups: u32,
    #[serde(default)]
    pub salary_cap: Option<u32>,
    #[serde(default)]
    pub stack_team: Option<String>,
    #[serde(default)]
    pub stack_count: Option<u32>,
    #[serde(default)]
    pub max_from_one_team: Option<u32>,
    #[serde(default)]
    pub min_teams_represented: Option<u32>,
    #[serde(default)]
    pub min_salary_used_fraction: Option<Decimal>,
    #[serde(default)]
    pub player_diversity: u32,
    /// Entity id to maximum fraction of the batch.
    #[serde(default)]
    pub exposure_constraints: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub fade_teams: Vec<String>,
    #[serde(default = "default_fade_dampening")]
    pub fade_dampening: Decimal,
    #[serde(default)]
    pub randomness: f64,
    #[serde(default)]
    pub max_player_appearances: Option<u32>,
    /// Seed for the projection noise; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub solve_time_limit_secs: Option<f64>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub stop_on_failure: bool,
    #[serde(default)]
    pub allow_duplicates: bool,
}

const fn default_num_lineups() -> u32 {
    1
}

fn default_fade_dampening() -> Decimal {
    DEFAULT_FADE_DAMPENING
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            num_lineups: default_num_lineups(),
            salary_cap: None,
            stack_team: None,
            stack_count: None,
            max_from_one_team: None,
            min_teams_represented: None,
            min_salary_used_fraction: None,
            player_diversity: 0,
            exposure_constraints: BTreeMap::new(),
            fade_teams: Vec::new(),
            fade_dampening: default_fade_dampening(),
            randomness: 0.0,
            max_player_appearances: None,
            seed: None,
            solve_time_limit_secs: None,
            max_attempts: None,
            stop_on_failure: false,
            allow_duplicates: false,
        }
    }
}

impl OptimizerConfig {
    /// Apply the preset overrides to `shape`.
    #[must_use]
    pub fn apply_to_shape(&self, mut shape: RosterShape) -> RosterShape {
        if let Some(cap) = self.salary_cap {
            shape = shape.with_salary_cap(cap);
        }
        if let Some(max) = self.max_from_one_team {
            shape = shape.with_max_from_one_team(max);
        }
        if let Some(min) = self.min_teams_represented {
            shape = shape.with_min_teams_represented(min);
        }
        shape
    }

    /// Convert to the settings the generator consumes.
    ///
    /// # Errors
    ///
    /// Returns an error if only one of `stack_team` / `stack_count` is set,
    /// or the time limit is not a positive number of seconds.
    pub fn batch_settings(&self) -> Result<BatchSettings, ConfigError> {
        let stack = match (self.stack_team.as_deref().map(str::trim), self.stack_count) {
            (Some(team), Some(count)) if !team.is_empty() => Some(StackRule {
                team: TeamId::from(team),
                count,
            }),
            (Some(team), None) if !team.is_empty() => {
                return Err(ConfigError::MissingField {
                    field: "stack_count",
                })
            }
            (None, Some(count)) if count > 0 => {
                return Err(ConfigError::MissingField { field: "stack_team" })
            }
            _ => None,
        };

        let solve_time_limit = match self.solve_time_limit_secs {
            Some(secs) if secs.is_finite() && secs > 0.0 => {
                let limit = Duration::try_from_secs_f64(secs).map_err(|e| {
                    ConfigError::InvalidValue {
                        field: "solve_time_limit_secs",
                        reason: format!("{secs} seconds: {e}"),
                    }
                })?;
                Some(limit)
            }
            Some(secs) => {
                return Err(ConfigError::InvalidValue {
                    field: "solve_time_limit_secs",
                    reason: format!("{secs} is not a positive number of seconds"),
                })
            }
            None => None,
        };

        let exposure_caps: HashMap<EntityId, Decimal> = self
            .exposure_constraints
            .iter()
            .map(|(id, fraction)| (EntityId::from(id.trim()), *fraction))
            .collect();
        let fade_teams: BTreeSet<TeamId> = self
            .fade_teams
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(TeamId::from)
            .collect();

        Ok(BatchSettings {
            num_lineups: self.num_lineups,
            stack,
            min_salary_used_fraction: self.min_salary_used_fraction,
            player_diversity: self.player_diversity,
            exposure_caps,
            max_player_appearances: self.max_player_appearances,
            fade_teams,
            fade_dampening: self.fade_dampening,
            randomness: self.randomness,
            solve_time_limit,
            max_attempts: self.max_attempts,
            stop_on_failure: self.stop_on_failure,
            allow_duplicates: self.allow_duplicates,
            ..BatchSettings::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sport::Sport;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_produce_a_single_lineup() {
        let settings = OptimizerConfig::default().batch_settings().unwrap();
        assert_eq!(settings.num_lineups, 1);
        assert_eq!(settings.fade_dampening, dec!(0.8));
        assert!(settings.stack.is_none());
    }

    #[test]
    fn stack_needs_both_halves() {
        let config = OptimizerConfig {
            stack_team: Some("LVA".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.batch_settings(),
            Err(ConfigError::MissingField {
                field: "stack_count"
            })
        ));

        let config = OptimizerConfig {
            stack_count: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            config.batch_settings(),
            Err(ConfigError::MissingField { field: "stack_team" })
        ));
    }

    #[test]
    fn overrides_replace_preset_limits() {
        let config = OptimizerConfig {
            salary_cap: Some(60_000),
            max_from_one_team: Some(4),
            ..Default::default()
        };
        let shape = config.apply_to_shape(Sport::Showdown.roster_shape().unwrap());
        assert_eq!(shape.salary_cap(), 60_000);
        assert_eq!(shape.max_from_one_team(), 4);
        assert_eq!(shape.min_teams_represented(), 2);
    }

    #[test]
    fn rejects_non_positive_time_limit() {
        let config = OptimizerConfig {
            solve_time_limit_secs: Some(0.0),
            ..Default::default()
        };
        assert!(config.batch_settings().is_err());
    }

    #[test]
    fn rejects_time_limit_beyond_duration_range() {
        let config = OptimizerConfig {
            solve_time_limit_secs: Some(1e300),
            ..Default::default()
        };
        assert!(matches!(
            config.batch_settings(),
            Err(ConfigError::InvalidValue {
                field: "solve_time_limit_secs",
                ..
            })
        ));
    }
}
