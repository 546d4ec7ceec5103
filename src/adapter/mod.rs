//! Implementations of ports (hexagonal adapters).

pub mod inbound;
pub mod outbound;
pub mod solver;
