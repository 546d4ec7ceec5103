//! Lineupsmith - daily fantasy lineup optimization with integer programming.
//!
//! Each lineup is the optimum of a binary program over (entity, slot)
//! assignments: maximize adjusted projected points subject to slot counts,
//! the salary cap, team limits, stacking and exposure rules. A batch solves
//! one program per lineup; each accepted lineup adds diversity rows and
//! exposure counts to the next program.
//!
//! # Architecture
//!
//! - [`domain`] - Entities, pools, roster shapes, lineups, sparse constraints
//! - [`port`] - Solver, pool source and lineup sink traits
//! - [`application`] - Projection adjustment, model building, batch generation
//! - [`adapter`] - HiGHS solver, salary/injury CSV readers, lineup writers, CLI
//! - [`infrastructure`] - TOML configuration and sport presets
//!
//! # Example
//!
//! ```no_run
//! use lineupsmith::adapter::outbound::csv::SalaryFile;
//! use lineupsmith::adapter::solver::HiGHSSolver;
//! use lineupsmith::application::{BatchSettings, LineupGenerator};
//! use lineupsmith::domain::PlayerPool;
//! use lineupsmith::infrastructure::sport::Sport;
//! use lineupsmith::port::PoolSource;
//! use rand::SeedableRng;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sport = Sport::Showdown;
//!     let shape = sport.roster_shape()?;
//!     let source = SalaryFile::new("DKSalaries.csv", shape.clone(), sport.captain_source());
//!     let pool = PlayerPool::from_records(source.records()?)?;
//!
//!     let settings = BatchSettings { num_lineups: 10, ..Default::default() };
//!     let solver = HiGHSSolver::new();
//!     let report = LineupGenerator::new(&pool, &shape, &settings, &solver)?
//!         .run(rand::rngs::StdRng::seed_from_u64(7))?;
//!     println!("requested {}, produced {}", report.requested, report.produced());
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
