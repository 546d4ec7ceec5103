//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the engine's external collaborators: the ILP
//! solver backend, the player-record source, and lineup output.

pub mod pool;
pub mod report;
pub mod solver;
