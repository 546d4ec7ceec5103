//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `try_new` constructors that validate inputs,
//! and by [`PlayerPool`](super::PlayerPool) when the candidate set is unusable.
//!
//! # Examples
//!
//! Handling validation errors:
//!
//! ```
//! use lineupsmith::domain::{DomainError, Entity, EntityId, SlotId};
//! use rust_decimal_macros::dec;
//!
//! // A zero salary will fail validation
//! let result = Entity::builder(EntityId::new("1"), "Player One", "LVA")
//!     .salary(0)
//!     .projection(dec!(20))
//!     .eligible(SlotId::new("UTIL"))
//!     .build();
//!
//! assert!(matches!(result, Err(DomainError::NonPositiveSalary { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
///
/// Surfaced to operators as data errors: the player pool (or one of its
/// records) cannot be used to build lineups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Salary must be a positive integer.
    #[error("entity {id}: salary must be positive, got {salary}")]
    NonPositiveSalary {
        /// Offending entity.
        id: String,
        /// The invalid salary that was provided.
        salary: i64,
    },

    /// Projections cannot be negative.
    #[error("entity {id}: projection must be non-negative, got {projection}")]
    NegativeProjection {
        /// Offending entity.
        id: String,
        /// The invalid projection that was provided.
        projection: Decimal,
    },

    /// Every entity must be eligible for at least one slot.
    #[error("entity {id}: no eligible roster slots")]
    NoEligibleSlots {
        /// Offending entity.
        id: String,
    },

    /// Entity identifiers must be unique within a pool.
    #[error("duplicate entity id {id}")]
    DuplicateEntity {
        /// The repeated identifier.
        id: String,
    },

    /// Captain multipliers must be positive.
    #[error("entity {id}: captain multiplier must be positive, got {multiplier}")]
    NonPositiveMultiplier {
        /// Offending entity.
        id: String,
        /// The invalid multiplier.
        multiplier: Decimal,
    },

    /// The pool contained no usable entities after filtering.
    #[error("player pool is empty after filtering ({rejected} records rejected)")]
    EmptyPool {
        /// Number of records that failed validation.
        rejected: usize,
    },

    /// Roster shapes need at least one slot with a positive count.
    #[error("roster shape has no slots")]
    EmptyRoster,

    /// A slot label was declared twice in one roster shape.
    #[error("roster shape declares slot {slot} more than once")]
    DuplicateSlot {
        /// The repeated slot label.
        slot: String,
    },

    /// A roster shape may declare at most one captain slot.
    #[error("roster shape declares more than one captain slot")]
    MultipleCaptainSlots,
}
