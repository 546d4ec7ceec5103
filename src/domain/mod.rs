//! Sport-agnostic domain types.

pub mod constraint;
pub mod error;
pub mod matchup;

mod entity;
mod exposure;
mod id;
mod lineup;
mod money;
mod pool;
mod roster;

pub use constraint::{Constraint, ConstraintKind, ConstraintSense, VariableBounds};
pub use entity::{Entity, EntityBuilder, DEFAULT_CAPTAIN_MULTIPLIER};
pub use error::DomainError;
pub use exposure::ExposureState;
pub use id::{EntityId, SlotId, TeamId};
pub use lineup::{Lineup, LineupSlot, LineupSummary};
pub use matchup::{resolve_opponent, Matchup};
pub use money::{Points, Salary};
pub use pool::PlayerPool;
pub use roster::{RosterShape, SlotSpec};
