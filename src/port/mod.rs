//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points of the optimizer. They are traits that
//! adapters implement to integrate with external systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Salary  │            │   Solver    │              │  Lineup   │
//! │   CSV   │            │  (HiGHS)    │              │  Writers  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`PoolSource`] - Normalized player records
//! - [`Solver`] - ILP optimization backend
//! - [`LineupSink`] - Lineup output

pub mod outbound;

pub use outbound::pool::PoolSource;
pub use outbound::report::LineupSink;
pub use outbound::solver::{IlpProblem, LpProblem, LpSolution, SolutionStatus, Solver};
