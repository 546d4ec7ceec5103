//! Candidate entities (players, drivers, constructors) and their validation.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::error::DomainError;
use super::matchup::resolve_opponent;
use super::money::{Points, Salary};
use super::roster::SlotSpec;
use super::{EntityId, SlotId, TeamId};

/// Captain multiplier used by single-game formats for both cost and score.
pub const DEFAULT_CAPTAIN_MULTIPLIER: Decimal = dec!(1.5);

/// One selectable entity in a player pool.
///
/// Fields are private; construction goes through [`Entity::builder`] so a
/// constructed entity always has a positive salary, a non-negative projection
/// and at least one eligible slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    id: EntityId,
    name: String,
    team: TeamId,
    opponent: TeamId,
    salary: u32,
    projection: Points,
    eligible_slots: BTreeSet<SlotId>,
    captain_salary_multiplier: Decimal,
    captain_score_multiplier: Decimal,
    captain_id: Option<EntityId>,
}

impl Entity {
    /// Start building an entity.
    pub fn builder(id: EntityId, name: impl Into<String>, team: impl Into<TeamId>) -> EntityBuilder {
        EntityBuilder::new(id, name, team)
    }

    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn team(&self) -> &TeamId {
        &self.team
    }

    /// Opponent team, `Unknown` when the matchup could not be resolved.
    #[must_use]
    pub fn opponent(&self) -> &TeamId {
        &self.opponent
    }

    /// Base salary in whole currency units.
    #[must_use]
    pub fn salary(&self) -> u32 {
        self.salary
    }

    /// Base projected points.
    #[must_use]
    pub fn projection(&self) -> Points {
        self.projection
    }

    #[must_use]
    pub fn eligible_slots(&self) -> &BTreeSet<SlotId> {
        &self.eligible_slots
    }

    #[must_use]
    pub fn is_eligible(&self, slot: &SlotId) -> bool {
        self.eligible_slots.contains(slot)
    }

    #[must_use]
    pub fn captain_salary_multiplier(&self) -> Decimal {
        self.captain_salary_multiplier
    }

    #[must_use]
    pub fn captain_score_multiplier(&self) -> Decimal {
        self.captain_score_multiplier
    }

    /// Site id of this entity's own captain row, when the salary file
    /// listed one.
    #[must_use]
    pub fn captain_id(&self) -> Option<&EntityId> {
        self.captain_id.as_ref()
    }

    /// Salary charged when this entity fills `slot`.
    #[must_use]
    pub fn salary_in(&self, slot: &SlotSpec) -> Salary {
        let base = Decimal::from(self.salary);
        if slot.captain {
            base * self.captain_salary_multiplier
        } else {
            base
        }
    }

    /// Points credited for `projection` when this entity fills `slot`.
    ///
    /// Only the multiplier is slot-dependent; callers pass either the base
    /// projection or an adjusted one.
    #[must_use]
    pub fn points_in(&self, slot: &SlotSpec, projection: Points) -> Points {
        if slot.captain {
            projection * self.captain_score_multiplier
        } else {
            projection
        }
    }

    /// Copy of this entity with one more eligible slot.
    #[must_use]
    pub fn with_eligible(mut self, slot: SlotId) -> Self {
        self.eligible_slots.insert(slot);
        self
    }
}

/// Builder for [`Entity`].
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    id: EntityId,
    name: String,
    team: TeamId,
    opponent: Option<TeamId>,
    salary: i64,
    projection: Decimal,
    eligible_slots: BTreeSet<SlotId>,
    captain_salary_multiplier: Decimal,
    captain_score_multiplier: Decimal,
    captain_id: Option<EntityId>,
}

impl EntityBuilder {
    fn new(id: EntityId, name: impl Into<String>, team: impl Into<TeamId>) -> Self {
        Self {
            id,
            name: name.into(),
            team: team.into(),
            opponent: None,
            salary: 0,
            projection: Decimal::ZERO,
            eligible_slots: BTreeSet::new(),
            captain_salary_multiplier: DEFAULT_CAPTAIN_MULTIPLIER,
            captain_score_multiplier: DEFAULT_CAPTAIN_MULTIPLIER,
            captain_id: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn team(&self) -> &TeamId {
        &self.team
    }

    /// Whether `slot` has been added to the eligible set.
    #[must_use]
    pub fn is_eligible(&self, slot: &SlotId) -> bool {
        self.eligible_slots.contains(slot)
    }

    #[must_use]
    pub fn salary(mut self, salary: i64) -> Self {
        self.salary = salary;
        self
    }

    #[must_use]
    pub fn projection(mut self, projection: Decimal) -> Self {
        self.projection = projection;
        self
    }

    #[must_use]
    pub fn eligible(mut self, slot: SlotId) -> Self {
        self.eligible_slots.insert(slot);
        self
    }

    #[must_use]
    pub fn eligible_slots(mut self, slots: impl IntoIterator<Item = SlotId>) -> Self {
        self.eligible_slots.extend(slots);
        self
    }

    /// Set the opponent directly.
    #[must_use]
    pub fn opponent(mut self, opponent: TeamId) -> Self {
        self.opponent = Some(opponent);
        self
    }

    /// Resolve the opponent from a matchup field such as `"AAA@BBB"`.
    #[must_use]
    pub fn matchup(mut self, field: Option<&str>) -> Self {
        self.opponent = Some(resolve_opponent(field, &self.team));
        self
    }

    #[must_use]
    pub fn captain_multipliers(mut self, salary: Decimal, score: Decimal) -> Self {
        self.captain_salary_multiplier = salary;
        self.captain_score_multiplier = score;
        self
    }

    /// Id to report when the entity fills the captain slot.
    #[must_use]
    pub fn with_captain_id(mut self, id: EntityId) -> Self {
        self.captain_id = Some(id);
        self
    }

    /// Build the entity, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the salary is not positive, the projection is
    /// negative, no slot is eligible, or a captain multiplier is not positive.
    pub fn build(self) -> Result<Entity, DomainError> {
        let id = self.id.to_string();
        let salary = u32::try_from(self.salary)
            .ok()
            .filter(|s| *s > 0)
            .ok_or(DomainError::NonPositiveSalary {
                id: id.clone(),
                salary: self.salary,
            })?;
        if self.projection < Decimal::ZERO {
            return Err(DomainError::NegativeProjection {
                id,
                projection: self.projection,
            });
        }
        if self.eligible_slots.is_empty() {
            return Err(DomainError::NoEligibleSlots { id });
        }
        for multiplier in [self.captain_salary_multiplier, self.captain_score_multiplier] {
            if multiplier <= Decimal::ZERO {
                return Err(DomainError::NonPositiveMultiplier { id, multiplier });
            }
        }

        Ok(Entity {
            id: self.id,
            name: self.name,
            opponent: self.opponent.unwrap_or_else(TeamId::unknown),
            team: self.team,
            salary,
            projection: self.projection,
            eligible_slots: self.eligible_slots,
            captain_salary_multiplier: self.captain_salary_multiplier,
            captain_score_multiplier: self.captain_score_multiplier,
            captain_id: self.captain_id,
        })
    }
}
