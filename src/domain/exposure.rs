//! Per-batch exposure tracking.

use std::collections::HashMap;

use super::{EntityId, Lineup};

/// Appearance counts and accepted lineups for one batch.
///
/// Counts only grow; the state is reset by creating a new one per batch.
#[derive(Debug, Default, Clone)]
pub struct ExposureState {
    appearances: HashMap<EntityId, u32>,
    accepted: Vec<Lineup>,
}

impl ExposureState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted lineup.
    pub fn record(&mut self, lineup: Lineup) {
        for id in lineup.entity_ids() {
            *self.appearances.entry(id.clone()).or_insert(0) += 1;
        }
        self.accepted.push(lineup);
    }

    /// Appearances of `id` so far.
    #[must_use]
    pub fn appearances(&self, id: &EntityId) -> u32 {
        self.appearances.get(id).copied().unwrap_or(0)
    }

    /// Every entity used so far with its appearance count, in no
    /// particular order.
    pub fn counts(&self) -> impl Iterator<Item = (&EntityId, u32)> + '_ {
        self.appearances.iter().map(|(id, n)| (id, *n))
    }

    /// Accepted lineups in acceptance order.
    #[must_use]
    pub fn accepted(&self) -> &[Lineup] {
        &self.accepted
    }

    #[must_use]
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Consume the state, returning the accepted lineups.
    #[must_use]
    pub fn into_lineups(self) -> Vec<Lineup> {
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineupSlot, SlotId, TeamId};
    use rust_decimal_macros::dec;

    fn lineup(index: u32, ids: &[&str]) -> Lineup {
        let slots = ids
            .iter()
            .map(|id| LineupSlot {
                slot: SlotId::from("UTIL"),
                entity_id: EntityId::from(*id),
                captain_id: None,
                name: (*id).to_string(),
                team: TeamId::from("LVA"),
                opponent: TeamId::unknown(),
                salary: dec!(1000),
                projected_points: dec!(10),
                effective_points: dec!(10),
                counts_toward_team_limits: true,
            })
            .collect();
        Lineup::new(index, slots)
    }

    #[test]
    fn counts_accumulate_across_lineups() {
        let mut state = ExposureState::new();
        state.record(lineup(1, &["a", "b"]));
        state.record(lineup(2, &["b", "c"]));

        assert_eq!(state.appearances(&EntityId::from("a")), 1);
        assert_eq!(state.appearances(&EntityId::from("b")), 2);
        assert_eq!(state.appearances(&EntityId::from("z")), 0);
        assert_eq!(state.accepted_count(), 2);
        assert_eq!(state.counts().map(|(_, n)| n).sum::<u32>(), 4);
        assert_eq!(state.into_lineups()[1].index(), 2);
    }
}
