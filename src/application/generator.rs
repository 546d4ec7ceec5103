//! Multi-lineup batch generation.
//!
//! A batch walks `Idle -> Building(i) -> Solving(i) -> Accepted(i) | Failed(i)`
//! for `i = 1..=N`. Every accepted lineup tightens the next model through
//! the exposure counts and the diversity rows built from it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::model::ConstraintModelBuilder;
use super::projection::ProjectionAdjuster;
use super::settings::BatchSettings;
use super::validate::validate_batch;
use crate::domain::{EntityId, ExposureState, Lineup, PlayerPool, RosterShape, TeamId};
use crate::error::{ConfigError, Result};
use crate::port::{SolutionStatus, Solver};

/// Result of a single attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Accepted(Lineup),
    /// No feasible optimum for this attempt's model.
    Infeasible,
    /// The per-solve time limit expired.
    TimedOut,
}

impl AttemptOutcome {
    #[must_use]
    pub fn status(&self) -> AttemptStatus {
        match self {
            Self::Accepted(_) => AttemptStatus::Accepted,
            Self::Infeasible => AttemptStatus::Infeasible,
            Self::TimedOut => AttemptStatus::TimedOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Accepted,
    Infeasible,
    TimedOut,
}

impl AttemptStatus {
    #[must_use]
    pub fn is_failure(self) -> bool {
        !matches!(self, Self::Accepted)
    }
}

/// What happened at one lineup index.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptSummary {
    /// 1-based attempt index.
    pub index: u32,
    pub status: AttemptStatus,
    /// Entities held out by exposure caps for this attempt.
    pub excluded: usize,
    /// Effective objective value of the accepted lineup.
    pub points: Option<Decimal>,
}

/// Mutable state threaded through one batch.
///
/// Owns the exposure counts, the accepted lineups and the random source;
/// nothing survives between batches.
#[derive(Debug)]
pub struct BatchContext<R> {
    pub exposure: ExposureState,
    pub rng: R,
}

impl<R: Rng> BatchContext<R> {
    pub fn new(rng: R) -> Self {
        Self {
            exposure: ExposureState::new(),
            rng,
        }
    }
}

/// Shared flag for stopping a batch between attempts.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How often one entity appeared across the accepted lineups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityUsage {
    pub id: EntityId,
    pub name: String,
    pub team: TeamId,
    pub appearances: u32,
    /// Share of produced lineups, as a percentage with one decimal.
    pub percent: Decimal,
    /// Appearance cap from the exposure settings, if any.
    pub cap: Option<u32>,
}

impl EntityUsage {
    /// The entity hit its appearance cap.
    #[must_use]
    pub fn at_cap(&self) -> bool {
        self.cap.is_some_and(|cap| self.appearances >= cap)
    }
}

/// Outcome of a whole batch: zero to `requested` lineups.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub requested: u32,
    /// Accepted lineups in acceptance order.
    pub lineups: Vec<Lineup>,
    pub attempts: Vec<AttemptSummary>,
    /// Entities used at least once, most used first.
    pub usage: Vec<EntityUsage>,
    /// Stopped by a [`CancelFlag`].
    pub cancelled: bool,
    /// Stopped at the first failure (`stop_on_failure`).
    pub stopped_early: bool,
}

impl BatchReport {
    #[must_use]
    pub fn produced(&self) -> usize {
        self.lineups.len()
    }

    /// Attempts that ended infeasible or timed out.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.status.is_failure())
            .count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.produced() == self.requested as usize
    }

    /// Lineups in presentation order: by projected points, highest first,
    /// when `by_points`, otherwise in acceptance order. Ties keep
    /// acceptance order.
    #[must_use]
    pub fn presentation_order(&self, by_points: bool) -> Vec<Lineup> {
        let mut lineups = self.lineups.clone();
        if by_points {
            lineups.sort_by(|a, b| b.total_projected_points().cmp(&a.total_projected_points()));
        }
        lineups
    }
}

/// Runs sequential solves over a validated pool and settings.
pub struct LineupGenerator<'a> {
    pool: &'a PlayerPool,
    shape: &'a RosterShape,
    settings: &'a BatchSettings,
    solver: &'a dyn Solver,
    adjuster: ProjectionAdjuster,
    cancel: CancelFlag,
}

impl<'a> LineupGenerator<'a> {
    /// Create a generator, checking the batch for contradictions first.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the settings contradict each other, the
    /// roster shape or the pool.
    pub fn new(
        pool: &'a PlayerPool,
        shape: &'a RosterShape,
        settings: &'a BatchSettings,
        solver: &'a dyn Solver,
    ) -> std::result::Result<Self, ConfigError> {
        validate_batch(pool, shape, settings)?;

        let adjuster = ProjectionAdjuster::new(
            settings.randomness,
            settings.fade_teams.clone(),
            settings.fade_dampening,
        );

        Ok(Self {
            pool,
            shape,
            settings,
            solver,
            adjuster,
            cancel: CancelFlag::new(),
        })
    }

    /// Use `flag` to stop the batch between attempts.
    #[must_use]
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// Run a full batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the solver backend fails; infeasible and
    /// timed-out attempts are recorded in the report.
    pub fn run<R: Rng>(&self, rng: R) -> Result<BatchReport> {
        self.run_with(rng, |_| {})
    }

    /// Run a full batch, calling `observer` after every attempt.
    ///
    /// # Errors
    ///
    /// Returns an error only if the solver backend fails.
    pub fn run_with<R, F>(&self, rng: R, mut observer: F) -> Result<BatchReport>
    where
        R: Rng,
        F: FnMut(&AttemptSummary),
    {
        let mut ctx = BatchContext::new(rng);
        let budget = self.settings.attempt_budget();
        let mut attempts = Vec::with_capacity(budget as usize);
        let mut cancelled = false;
        let mut stopped_early = false;

        info!(
            solver = self.solver.name(),
            requested = self.settings.num_lineups,
            pool = self.pool.len(),
            roster = self.shape.size(),
            "Starting lineup batch"
        );

        for index in 1..=budget {
            if self.cancel.is_cancelled() {
                info!(index, "Batch cancelled");
                cancelled = true;
                break;
            }

            let (outcome, excluded) = self.attempt(index, &mut ctx)?;
            let summary = AttemptSummary {
                index,
                status: outcome.status(),
                excluded,
                points: match &outcome {
                    AttemptOutcome::Accepted(lineup) => Some(lineup.total_effective_points()),
                    _ => None,
                },
            };

            match outcome {
                AttemptOutcome::Accepted(lineup) => {
                    info!(
                        index,
                        salary = %lineup.total_salary(),
                        points = %lineup.total_projected_points(),
                        "Lineup accepted"
                    );
                    ctx.exposure.record(lineup);
                }
                AttemptOutcome::Infeasible => {
                    warn!(index, "No feasible lineup for attempt");
                }
                AttemptOutcome::TimedOut => {
                    warn!(index, "Solver timed out, attempt dropped");
                }
            }

            let failed = summary.status.is_failure();
            observer(&summary);
            attempts.push(summary);

            if failed && self.settings.stop_on_failure {
                stopped_early = true;
                break;
            }
        }

        let usage = self.usage(&ctx.exposure);
        let report = BatchReport {
            requested: self.settings.num_lineups,
            lineups: ctx.exposure.into_lineups(),
            attempts,
            usage,
            cancelled,
            stopped_early,
        };

        info!(
            requested = report.requested,
            produced = report.produced(),
            failed = report.failed(),
            "Lineup batch finished"
        );

        Ok(report)
    }

    fn usage(&self, exposure: &ExposureState) -> Vec<EntityUsage> {
        let produced = Decimal::from(exposure.accepted_count());
        let mut usage: Vec<EntityUsage> = exposure
            .counts()
            .filter_map(|(id, appearances)| {
                let entity = self.pool.get(id)?;
                let percent = if produced.is_zero() {
                    Decimal::ZERO
                } else {
                    (Decimal::from(appearances) * Decimal::ONE_HUNDRED / produced).round_dp(1)
                };
                Some(EntityUsage {
                    id: id.clone(),
                    name: entity.name().to_string(),
                    team: entity.team().clone(),
                    appearances,
                    percent,
                    cap: self.settings.appearance_cap(id),
                })
            })
            .collect();
        usage.sort_by(|a, b| {
            b.appearances
                .cmp(&a.appearances)
                .then_with(|| a.id.cmp(&b.id))
        });
        usage
    }

    /// Build and solve the model for one index against the current context.
    ///
    /// Returns the outcome and the number of entities held out by exposure
    /// caps. The context is not modified beyond consuming random draws.
    ///
    /// # Errors
    ///
    /// Returns an error only if the solver backend fails.
    pub fn attempt<R: Rng>(
        &self,
        index: u32,
        ctx: &mut BatchContext<R>,
    ) -> Result<(AttemptOutcome, usize)> {
        let projections = self.adjuster.adjust(self.pool, &mut ctx.rng);
        let model = ConstraintModelBuilder::new(self.pool, self.shape, self.settings)
            .build(&projections, &ctx.exposure);
        let excluded = model.excluded().len();
        if excluded > 0 {
            debug!(index, excluded = ?model.excluded(), "Entities held out by exposure caps");
        }

        let solution = self.solver.solve_ilp(model.problem())?;
        let outcome = match solution.status {
            SolutionStatus::Optimal => match model.decode(&solution, index) {
                Some(lineup) => AttemptOutcome::Accepted(lineup),
                None => {
                    warn!(index, "Solver returned an assignment that is not a valid lineup");
                    AttemptOutcome::Infeasible
                }
            },
            SolutionStatus::Infeasible | SolutionStatus::Unbounded => AttemptOutcome::Infeasible,
            SolutionStatus::TimedOut => AttemptOutcome::TimedOut,
        };

        Ok((outcome, excluded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Entity, EntityId, SlotId, SlotSpec};
    use crate::port::{IlpProblem, LpSolution};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    /// Replays a fixed list of statuses, then keeps returning the last one.
    struct Scripted {
        statuses: Mutex<Vec<SolutionStatus>>,
        calls: Mutex<u32>,
    }

    impl Scripted {
        fn new(statuses: Vec<SolutionStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl Solver for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn solve_ilp(&self, _problem: &IlpProblem) -> Result<LpSolution> {
            *self.calls.lock().unwrap() += 1;
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.remove(0)
            } else {
                statuses[0]
            };
            Ok(LpSolution::without_values(status))
        }
    }

    struct Broken;

    impl Solver for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn solve_ilp(&self, _problem: &IlpProblem) -> Result<LpSolution> {
            Err(crate::error::Error::Solver("backend crashed".into()))
        }
    }

    fn fixture() -> (PlayerPool, RosterShape) {
        let pool = PlayerPool::from_records((0..8).map(|i| {
            let team = if i % 2 == 0 { "LVA" } else { "NYL" };
            Entity::builder(EntityId::from(i.to_string()), format!("P{i}"), team)
                .salary(5_000)
                .projection(dec!(20))
                .eligible_slots([SlotId::from("CPT"), SlotId::from("UTIL")])
        }))
        .unwrap();
        let shape = RosterShape::try_new(
            vec![SlotSpec::captain("CPT", 1), SlotSpec::new("UTIL", 5)],
            50_000,
            5,
            2,
        )
        .unwrap();
        (pool, shape)
    }

    #[test]
    fn failed_attempts_advance_index() {
        let (pool, shape) = fixture();
        let settings = BatchSettings {
            num_lineups: 3,
            ..Default::default()
        };
        let solver = Scripted::new(vec![
            SolutionStatus::Infeasible,
            SolutionStatus::TimedOut,
            SolutionStatus::Unbounded,
        ]);
        let generator = LineupGenerator::new(&pool, &shape, &settings, &solver).unwrap();

        let report = generator.run(StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(solver.calls(), 3);
        assert_eq!(report.produced(), 0);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.attempts[1].status, AttemptStatus::TimedOut);
        assert_eq!(report.attempts[2].status, AttemptStatus::Infeasible);
        assert!(!report.is_complete());
    }

    #[test]
    fn optimal_without_valid_assignment_is_infeasible() {
        let (pool, shape) = fixture();
        let settings = BatchSettings::default();
        let solver = Scripted::new(vec![SolutionStatus::Optimal]);
        let generator = LineupGenerator::new(&pool, &shape, &settings, &solver).unwrap();

        let report = generator.run(StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(report.attempts[0].status, AttemptStatus::Infeasible);
    }

    #[test]
    fn stop_on_failure_ends_batch() {
        let (pool, shape) = fixture();
        let settings = BatchSettings {
            num_lineups: 5,
            stop_on_failure: true,
            ..Default::default()
        };
        let solver = Scripted::new(vec![SolutionStatus::Infeasible]);
        let generator = LineupGenerator::new(&pool, &shape, &settings, &solver).unwrap();

        let report = generator.run(StdRng::seed_from_u64(1)).unwrap();
        assert!(report.stopped_early);
        assert_eq!(solver.calls(), 1);
    }

    #[test]
    fn attempt_ceiling_limits_solves() {
        let (pool, shape) = fixture();
        let settings = BatchSettings {
            num_lineups: 5,
            max_attempts: Some(2),
            ..Default::default()
        };
        let solver = Scripted::new(vec![SolutionStatus::Infeasible]);
        let generator = LineupGenerator::new(&pool, &shape, &settings, &solver).unwrap();

        let report = generator.run(StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(solver.calls(), 2);
        assert_eq!(report.requested, 5);
    }

    #[test]
    fn cancelled_before_first_attempt() {
        let (pool, shape) = fixture();
        let settings = BatchSettings {
            num_lineups: 3,
            ..Default::default()
        };
        let solver = Scripted::new(vec![SolutionStatus::Infeasible]);
        let flag = CancelFlag::new();
        flag.cancel();
        let generator = LineupGenerator::new(&pool, &shape, &settings, &solver)
            .unwrap()
            .with_cancel(flag);

        let report = generator.run(StdRng::seed_from_u64(1)).unwrap();
        assert!(report.cancelled);
        assert_eq!(solver.calls(), 0);
    }

    #[test]
    fn observer_sees_every_attempt() {
        let (pool, shape) = fixture();
        let settings = BatchSettings {
            num_lineups: 4,
            ..Default::default()
        };
        let solver = Scripted::new(vec![SolutionStatus::Infeasible]);
        let generator = LineupGenerator::new(&pool, &shape, &settings, &solver).unwrap();

        let mut seen = Vec::new();
        generator
            .run_with(StdRng::seed_from_u64(1), |a| seen.push(a.index))
            .unwrap();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn backend_failure_propagates() {
        let (pool, shape) = fixture();
        let settings = BatchSettings::default();
        let generator = LineupGenerator::new(&pool, &shape, &settings, &Broken).unwrap();
        assert!(generator.run(StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn contradictory_settings_rejected_up_front() {
        let (pool, shape) = fixture();
        let settings = BatchSettings {
            num_lineups: 0,
            ..Default::default()
        };
        let solver = Scripted::new(vec![SolutionStatus::Infeasible]);
        assert!(LineupGenerator::new(&pool, &shape, &settings, &solver).is_err());
        assert_eq!(solver.calls(), 0);
    }

    fn picked(index: u32, ids: &[&str]) -> Lineup {
        let slots = ids
            .iter()
            .map(|id| crate::domain::LineupSlot {
                slot: SlotId::from("UTIL"),
                entity_id: EntityId::from(*id),
                captain_id: None,
                name: format!("P{id}"),
                team: TeamId::from("LVA"),
                opponent: TeamId::unknown(),
                salary: dec!(5000),
                projected_points: dec!(20),
                effective_points: dec!(20),
                counts_toward_team_limits: true,
            })
            .collect();
        Lineup::new(index, slots)
    }

    #[test]
    fn usage_reports_share_and_cap() {
        let (pool, shape) = fixture();
        let settings = BatchSettings {
            num_lineups: 4,
            max_player_appearances: Some(3),
            ..Default::default()
        };
        let solver = Scripted::new(vec![SolutionStatus::Infeasible]);
        let generator = LineupGenerator::new(&pool, &shape, &settings, &solver).unwrap();

        let mut exposure = ExposureState::new();
        exposure.record(picked(1, &["0", "1"]));
        exposure.record(picked(2, &["0", "2"]));
        exposure.record(picked(3, &["0", "1"]));
        let usage = generator.usage(&exposure);

        let ids: Vec<&str> = usage.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
        assert_eq!(usage[0].percent, dec!(100));
        assert!(usage[0].at_cap());
        assert_eq!(usage[1].percent, dec!(66.7));
        assert!(!usage[1].at_cap());
        assert_eq!(usage[2].percent, dec!(33.3));
        assert_eq!(usage[2].name, "P2");
    }
}
