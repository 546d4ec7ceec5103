//! The immutable candidate pool for one run.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use super::entity::{Entity, EntityBuilder};
use super::error::DomainError;
use super::{EntityId, SlotId, TeamId};

/// Read-only collection of candidate entities.
///
/// Built once per run; exclusion (e.g. injured players) happens before
/// construction. There are no mutation methods.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPool {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
    rejected: Vec<DomainError>,
}

impl PlayerPool {
    /// Build a pool from already-validated entities.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateEntity`] when an id repeats and
    /// [`DomainError::EmptyPool`] when `entities` is empty.
    pub fn try_new(entities: Vec<Entity>) -> Result<Self, DomainError> {
        Self::assemble(entities, Vec::new())
    }

    /// Build a pool from raw entity builders.
    ///
    /// Records that fail validation are logged, kept in [`Self::rejected`],
    /// and left out of the pool.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateEntity`] when an id repeats and
    /// [`DomainError::EmptyPool`] when no valid record remains.
    pub fn from_records(records: impl IntoIterator<Item = EntityBuilder>) -> Result<Self, DomainError> {
        let mut entities = Vec::new();
        let mut rejected = Vec::new();
        for record in records {
            match record.build() {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(error = %e, "Rejected player record");
                    rejected.push(e);
                }
            }
        }
        Self::assemble(entities, rejected)
    }

    fn assemble(entities: Vec<Entity>, rejected: Vec<DomainError>) -> Result<Self, DomainError> {
        if entities.is_empty() {
            return Err(DomainError::EmptyPool {
                rejected: rejected.len(),
            });
        }

        let mut index = HashMap::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            if index.insert(entity.id().clone(), i).is_some() {
                return Err(DomainError::DuplicateEntity {
                    id: entity.id().to_string(),
                });
            }
        }

        Ok(Self {
            entities,
            index,
            rejected,
        })
    }

    /// All candidates in input order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity by id.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    /// Position of an entity in [`Self::entities`].
    #[must_use]
    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Entities on `team`.
    pub fn on_team<'a>(&'a self, team: &'a TeamId) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.team() == team)
    }

    /// Entities eligible for `slot`.
    pub fn eligible_for<'a>(&'a self, slot: &'a SlotId) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.is_eligible(slot))
    }

    /// Distinct teams, sorted.
    #[must_use]
    pub fn teams(&self) -> BTreeSet<TeamId> {
        self.entities.iter().map(|e| e.team().clone()).collect()
    }

    /// Records dropped during construction.
    #[must_use]
    pub fn rejected(&self) -> &[DomainError] {
        &self.rejected
    }
}
