//! Per-solve projection adjustment: random noise and team fades.

use std::collections::BTreeSet;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::{EntityId, PlayerPool, Points, TeamId};

/// Produces the effective objective coefficient of every entity for one solve.
///
/// Fading multiplies a team's projections by a dampening factor; it never
/// excludes anyone. Noise is a symmetric multiplier drawn independently per
/// entity on every call.
#[derive(Debug, Clone)]
pub struct ProjectionAdjuster {
    randomness: f64,
    fade_teams: BTreeSet<TeamId>,
    fade_dampening: Decimal,
}

impl ProjectionAdjuster {
    /// Create an adjuster.
    ///
    /// `randomness` is expected in `[0, 1)` and `fade_dampening` in `(0, 1)`;
    /// both are checked before a batch starts.
    #[must_use]
    pub fn new(randomness: f64, fade_teams: BTreeSet<TeamId>, fade_dampening: Decimal) -> Self {
        Self {
            randomness,
            fade_teams,
            fade_dampening,
        }
    }

    /// Adjuster that returns base projections unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(0.0, BTreeSet::new(), Decimal::ONE)
    }

    /// Whether `team` is faded.
    #[must_use]
    pub fn is_faded(&self, team: &TeamId) -> bool {
        self.fade_teams.contains(team)
    }

    /// Draw effective projections for the next solve.
    pub fn adjust<R: Rng + ?Sized>(&self, pool: &PlayerPool, rng: &mut R) -> EffectiveProjections {
        let values = pool
            .entities()
            .iter()
            .map(|entity| {
                let mut projection = entity.projection();
                if self.is_faded(entity.team()) {
                    projection *= self.fade_dampening;
                }
                if self.randomness > 0.0 {
                    projection *= self.noise(rng);
                }
                projection
            })
            .collect();

        EffectiveProjections { values }
    }

    fn noise<R: Rng + ?Sized>(&self, rng: &mut R) -> Decimal {
        let factor = 1.0 + rng.gen_range(-self.randomness..=self.randomness);
        match Decimal::try_from(factor) {
            Ok(d) => d.round_dp(6),
            Err(e) => {
                warn!(factor, error = %e, "Unrepresentable noise factor, using 1");
                Decimal::ONE
            }
        }
    }
}

/// Effective coefficients for one solve, aligned with
/// [`PlayerPool::entities`]. Never persisted beyond that solve.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveProjections {
    values: Vec<Points>,
}

impl EffectiveProjections {
    /// Projection of the entity at pool position `index`.
    #[must_use]
    pub fn at(&self, index: usize) -> Points {
        self.values.get(index).copied().unwrap_or(Decimal::ZERO)
    }

    /// Projection of `id`, if it is in `pool`.
    #[must_use]
    pub fn get(&self, pool: &PlayerPool, id: &EntityId) -> Option<Points> {
        pool.position(id).map(|i| self.at(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
