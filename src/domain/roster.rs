//! Roster shapes: which slots a lineup must fill and the limits around them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::SlotId;

/// One slot category in a roster shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Slot label.
    pub id: SlotId,
    /// Exact number of entities that must fill this slot.
    pub count: u32,
    /// Whether occupants of this slot use their captain multipliers.
    #[serde(default)]
    pub captain: bool,
    /// Whether occupants count toward max-from-team, min-teams and stacking.
    ///
    /// Constructor-style slots in F1 showdown are team-exempt.
    #[serde(default = "default_counts_toward_team_limits")]
    pub counts_toward_team_limits: bool,
}

const fn default_counts_toward_team_limits() -> bool {
    true
}

impl SlotSpec {
    /// A regular slot that counts toward team limits.
    pub fn new(id: impl Into<SlotId>, count: u32) -> Self {
        Self {
            id: id.into(),
            count,
            captain: false,
            counts_toward_team_limits: true,
        }
    }

    /// A captain slot.
    pub fn captain(id: impl Into<SlotId>, count: u32) -> Self {
        Self {
            captain: true,
            ..Self::new(id, count)
        }
    }

    /// Mark this slot as exempt from team limits.
    #[must_use]
    pub fn team_exempt(mut self) -> Self {
        self.counts_toward_team_limits = false;
        self
    }
}

/// Required slots plus the salary and team limits of one contest format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterShape {
    slots: Vec<SlotSpec>,
    salary_cap: u32,
    max_from_one_team: u32,
    min_teams_represented: u32,
}

impl RosterShape {
    /// Create a roster shape, validating the slot list.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no slots with a positive count, a slot
    /// label repeats, or more than one captain slot is declared.
    pub fn try_new(
        slots: Vec<SlotSpec>,
        salary_cap: u32,
        max_from_one_team: u32,
        min_teams_represented: u32,
    ) -> Result<Self, DomainError> {
        let slots: Vec<SlotSpec> = slots.into_iter().filter(|s| s.count > 0).collect();
        if slots.is_empty() {
            return Err(DomainError::EmptyRoster);
        }

        let mut seen = HashSet::new();
        for slot in &slots {
            if !seen.insert(slot.id.clone()) {
                return Err(DomainError::DuplicateSlot {
                    slot: slot.id.to_string(),
                });
            }
        }

        if slots.iter().filter(|s| s.captain).count() > 1 {
            return Err(DomainError::MultipleCaptainSlots);
        }

        Ok(Self {
            slots,
            salary_cap,
            max_from_one_team,
            min_teams_represented,
        })
    }

    /// Slots in roster order.
    #[must_use]
    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }

    /// Look up a slot by label.
    #[must_use]
    pub fn slot(&self, id: &SlotId) -> Option<&SlotSpec> {
        self.slots.iter().find(|s| &s.id == id)
    }

    /// Position of a slot in roster order.
    #[must_use]
    pub fn slot_index(&self, id: &SlotId) -> Option<usize> {
        self.slots.iter().position(|s| &s.id == id)
    }

    /// The captain slot, if this is a captain format.
    #[must_use]
    pub fn captain_slot(&self) -> Option<&SlotSpec> {
        self.slots.iter().find(|s| s.captain)
    }

    /// Total number of entities in a complete lineup.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.slots.iter().map(|s| s.count).sum()
    }

    /// Slot labels expanded by count, e.g. `P, P, C, 1B, ...`.
    #[must_use]
    pub fn expanded_labels(&self) -> Vec<SlotId> {
        self.slots
            .iter()
            .flat_map(|s| std::iter::repeat(s.id.clone()).take(s.count as usize))
            .collect()
    }

    #[must_use]
    pub const fn salary_cap(&self) -> u32 {
        self.salary_cap
    }

    #[must_use]
    pub const fn max_from_one_team(&self) -> u32 {
        self.max_from_one_team
    }

    #[must_use]
    pub const fn min_teams_represented(&self) -> u32 {
        self.min_teams_represented
    }

    /// Replace the salary cap.
    #[must_use]
    pub fn with_salary_cap(mut self, salary_cap: u32) -> Self {
        self.salary_cap = salary_cap;
        self
    }

    /// Replace the per-team maximum.
    #[must_use]
    pub fn with_max_from_one_team(mut self, max: u32) -> Self {
        self.max_from_one_team = max;
        self
    }

    /// Replace the minimum number of represented teams.
    #[must_use]
    pub fn with_min_teams_represented(mut self, min: u32) -> Self {
        self.min_teams_represented = min;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showdown() -> RosterShape {
        RosterShape::try_new(
            vec![SlotSpec::captain("CPT", 1), SlotSpec::new("UTIL", 5)],
            50_000,
            5,
            2,
        )
        .unwrap()
    }

    #[test]
    fn size_sums_slot_counts() {
        assert_eq!(showdown().size(), 6);
    }

    #[test]
    fn captain_slot_is_found() {
        let shape = showdown();
        assert_eq!(shape.captain_slot().unwrap().id, SlotId::from("CPT"));
    }

    #[test]
    fn expanded_labels_repeat_by_count() {
        let labels: Vec<String> = showdown()
            .expanded_labels()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, vec!["CPT", "UTIL", "UTIL", "UTIL", "UTIL", "UTIL"]);
    }

    #[test]
    fn zero_count_slots_are_dropped() {
        let shape = RosterShape::try_new(
            vec![SlotSpec::new("P", 2), SlotSpec::new("DH", 0)],
            50_000,
            5,
            1,
        )
        .unwrap();
        assert!(shape.slot(&SlotId::from("DH")).is_none());
    }

    #[test]
    fn rejects_empty_roster() {
        let result = RosterShape::try_new(vec![], 50_000, 5, 1);
        assert_eq!(result, Err(DomainError::EmptyRoster));
    }

    #[test]
    fn rejects_duplicate_slot() {
        let result = RosterShape::try_new(
            vec![SlotSpec::new("OF", 1), SlotSpec::new("OF", 2)],
            50_000,
            5,
            1,
        );
        assert!(matches!(result, Err(DomainError::DuplicateSlot { .. })));
    }

    #[test]
    fn rejects_two_captain_slots() {
        let result = RosterShape::try_new(
            vec![SlotSpec::captain("CPT", 1), SlotSpec::captain("MVP", 1)],
            50_000,
            5,
            1,
        );
        assert_eq!(result, Err(DomainError::MultipleCaptainSlots));
    }

    #[test]
    fn team_exempt_slot_is_marked() {
        let slot = SlotSpec::new("CNSTR", 1).team_exempt();
        assert!(!slot.counts_toward_team_limits);
    }
}
