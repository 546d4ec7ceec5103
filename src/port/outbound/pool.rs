//! Input port for raw player records.

use crate::domain::EntityBuilder;
use crate::error::Result;

/// Source of normalized player records.
///
/// Implementations perform column mapping, name parsing and exclusion
/// filtering; validation happens when the records are built into a
/// [`PlayerPool`](crate::domain::PlayerPool).
pub trait PoolSource {
    /// Load all records.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot be read.
    fn records(&self) -> Result<Vec<EntityBuilder>>;
}
