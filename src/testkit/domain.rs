//! Builders for pools and roster shapes used across tests.

use rust_decimal::Decimal;

use crate::domain::{Entity, EntityBuilder, EntityId, PlayerPool, RosterShape, SlotId, SlotSpec};

/// `CPT:1` captain plus `UTIL:5`, cap 50,000, at most 5 per team, at least
/// 2 teams.
pub fn showdown_shape() -> RosterShape {
    RosterShape::try_new(
        vec![SlotSpec::captain("CPT", 1), SlotSpec::new("UTIL", 5)],
        50_000,
        5,
        2,
    )
    .expect("showdown shape")
}

/// Incrementally builds a pool with sequential ids `"1"`, `"2"`, ...
#[derive(Debug, Default)]
pub struct PoolBuilder {
    records: Vec<EntityBuilder>,
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> EntityId {
        EntityId::from((self.records.len() + 1).to_string())
    }

    /// Add an entity eligible for `CPT` and `UTIL`.
    pub fn showdown(self, team: &str, salary: i64, projection: Decimal) -> Self {
        self.with_slots(team, salary, projection, &["CPT", "UTIL"])
    }

    /// Add an entity eligible for `UTIL` only.
    pub fn utility(self, team: &str, salary: i64, projection: Decimal) -> Self {
        self.with_slots(team, salary, projection, &["UTIL"])
    }

    /// Add an entity eligible for exactly `slots`.
    pub fn with_slots(mut self, team: &str, salary: i64, projection: Decimal, slots: &[&str]) -> Self {
        let id = self.next_id();
        let name = format!("Player {id}");
        self.records.push(
            Entity::builder(id, name, team)
                .salary(salary)
                .projection(projection)
                .eligible_slots(slots.iter().map(|s| SlotId::from(*s))),
        );
        self
    }

    pub fn build(self) -> PlayerPool {
        PlayerPool::from_records(self.records).expect("valid test pool")
    }
}

/// Ids of `lineup` sorted, for set comparisons.
pub fn ids(lineup: &crate::domain::Lineup) -> Vec<String> {
    let mut ids: Vec<String> = lineup.slots().iter().map(|s| s.entity_id.to_string()).collect();
    ids.sort();
    ids
}
