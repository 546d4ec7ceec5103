//! Output ports for generated lineups.

use crate::domain::{Lineup, RosterShape};
use crate::error::Result;

/// Destination for a finished batch of lineups.
///
/// Implementations receive lineups in presentation order and must not
/// reorder slots within a lineup.
pub trait LineupSink {
    /// Write `lineups` for a roster of `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written.
    fn write_lineups(&mut self, lineups: &[Lineup], shape: &RosterShape) -> Result<()>;
}
