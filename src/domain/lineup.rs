//! Lineup results: one per accepted solve, never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Serialize;

use super::money::{Points, Salary};
use super::{EntityId, SlotId, TeamId};

/// One filled slot of a lineup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupSlot {
    pub slot: SlotId,
    pub entity_id: EntityId,
    /// Site id of the entity's captain row; set only in a captain slot.
    pub captain_id: Option<EntityId>,
    pub name: String,
    pub team: TeamId,
    pub opponent: TeamId,
    /// Slot-adjusted salary (captain form costs `salary × multiplier`).
    pub salary: Salary,
    /// Base projection scaled by the slot's score multiplier.
    pub projected_points: Points,
    /// Adjusted projection (noise, fades) scaled by the slot's score
    /// multiplier; the coefficient the solver maximized.
    pub effective_points: Points,
    /// Whether this slot counts toward team limits.
    pub counts_toward_team_limits: bool,
}

impl LineupSlot {
    /// Id the contest site expects for this slot.
    #[must_use]
    pub fn upload_id(&self) -> &EntityId {
        self.captain_id.as_ref().unwrap_or(&self.entity_id)
    }
}

/// An accepted lineup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineup {
    index: u32,
    slots: Vec<LineupSlot>,
    total_salary: Salary,
    total_projected_points: Points,
    total_effective_points: Points,
    team_counts: BTreeMap<TeamId, u32>,
}

impl Lineup {
    /// Assemble a lineup from its filled slots.
    ///
    /// `index` is the 1-based attempt number that produced it. Slots are
    /// kept in the given order; totals are derived here.
    #[must_use]
    pub fn new(index: u32, slots: Vec<LineupSlot>) -> Self {
        let total_salary = slots.iter().map(|s| s.salary).sum();
        let total_projected_points = slots.iter().map(|s| s.projected_points).sum();
        let total_effective_points = slots.iter().map(|s| s.effective_points).sum();

        let mut team_counts = BTreeMap::new();
        for slot in slots.iter().filter(|s| s.counts_toward_team_limits) {
            *team_counts.entry(slot.team.clone()).or_insert(0) += 1;
        }

        Self {
            index,
            slots,
            total_salary,
            total_projected_points,
            total_effective_points,
            team_counts,
        }
    }

    /// 1-based attempt number that produced this lineup.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Filled slots in roster order.
    #[must_use]
    pub fn slots(&self) -> &[LineupSlot] {
        &self.slots
    }

    #[must_use]
    pub fn total_salary(&self) -> Salary {
        self.total_salary
    }

    #[must_use]
    pub fn total_projected_points(&self) -> Points {
        self.total_projected_points
    }

    #[must_use]
    pub fn total_effective_points(&self) -> Points {
        self.total_effective_points
    }

    /// Selections per team, counting only slots subject to team limits.
    #[must_use]
    pub fn team_counts(&self) -> &BTreeMap<TeamId, u32> {
        &self.team_counts
    }

    /// Distinct entities in this lineup.
    #[must_use]
    pub fn entity_ids(&self) -> BTreeSet<&EntityId> {
        self.slots.iter().map(|s| &s.entity_id).collect()
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.slots.iter().any(|s| &s.entity_id == id)
    }

    /// Number of entities this lineup shares with `other`.
    #[must_use]
    pub fn shared_with(&self, other: &Lineup) -> usize {
        self.entity_ids().intersection(&other.entity_ids()).count()
    }

    /// Slots filled by `slot`.
    pub fn in_slot<'a>(&'a self, slot: &'a SlotId) -> impl Iterator<Item = &'a LineupSlot> + 'a {
        self.slots.iter().filter(move |s| &s.slot == slot)
    }

    /// Totals-only view.
    #[must_use]
    pub fn summary(&self) -> LineupSummary {
        LineupSummary {
            index: self.index,
            total_salary: self.total_salary,
            total_projected_points: self.total_projected_points,
            total_effective_points: self.total_effective_points,
            teams: self.team_counts.len(),
        }
    }
}

/// Lineup totals for quick comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineupSummary {
    pub index: u32,
    pub total_salary: Salary,
    pub total_projected_points: Points,
    pub total_effective_points: Points,
    pub teams: usize,
}

impl LineupSummary {
    /// Unused salary under `cap`.
    #[must_use]
    pub fn remaining(&self, cap: u32) -> Decimal {
        Decimal::from(cap) - self.total_salary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn slot(slot: &str, id: &str, team: &str, salary: Decimal, points: Decimal) -> LineupSlot {
        LineupSlot {
            slot: SlotId::from(slot),
            entity_id: EntityId::from(id),
            captain_id: None,
            name: format!("Player {id}"),
            team: TeamId::from(team),
            opponent: TeamId::unknown(),
            salary,
            projected_points: points,
            effective_points: points,
            counts_toward_team_limits: slot != "CNSTR",
        }
    }

    #[test]
    fn totals_are_derived_from_slots() {
        let lineup = Lineup::new(
            1,
            vec![
                slot("CPT", "1", "LVA", dec!(15000), dec!(60)),
                slot("UTIL", "2", "LVA", dec!(9000), dec!(30)),
                slot("UTIL", "3", "NYL", dec!(8000), dec!(25.5)),
            ],
        );

        assert_eq!(lineup.total_salary(), dec!(32000));
        assert_eq!(lineup.total_projected_points(), dec!(115.5));
        assert_eq!(lineup.team_counts()[&TeamId::from("LVA")], 2);
        assert_eq!(lineup.summary().teams, 2);
        assert_eq!(lineup.summary().remaining(50_000), dec!(18000));
    }

    #[test]
    fn team_exempt_slots_are_not_counted() {
        let lineup = Lineup::new(
            1,
            vec![
                slot("D", "1", "RBR", dec!(9000), dec!(30)),
                slot("CNSTR", "9", "RBR", dec!(7000), dec!(20)),
            ],
        );
        assert_eq!(lineup.team_counts()[&TeamId::from("RBR")], 1);
    }

    #[test]
    fn shared_entities_are_counted() {
        let a = Lineup::new(
            1,
            vec![
                slot("UTIL", "1", "LVA", dec!(1), dec!(1)),
                slot("UTIL", "2", "LVA", dec!(1), dec!(1)),
            ],
        );
        let b = Lineup::new(
            2,
            vec![
                slot("UTIL", "2", "LVA", dec!(1), dec!(1)),
                slot("UTIL", "3", "NYL", dec!(1), dec!(1)),
            ],
        );
        assert_eq!(a.shared_with(&b), 1);
        assert!(b.contains(&EntityId::from("3")));
    }
}
