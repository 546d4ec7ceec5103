//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is a high-performance open-source linear/mixed-integer programming solver.
//! This implementation wraps it using the good_lp crate for ergonomic Rust usage.

use std::time::{Duration, Instant};

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::domain::ConstraintSense;
use crate::error::{Error, Result};
use crate::port::{IlpProblem, LpSolution, SolutionStatus, Solver};

/// HiGHS-based ILP solver.
#[derive(Debug, Default, Clone)]
pub struct HiGHSSolver {
    time_limit: Option<Duration>,
}

impl HiGHSSolver {
    /// Create a new HiGHS solver instance without a time limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every solve by `limit`; expiry is reported as
    /// [`SolutionStatus::TimedOut`].
    #[must_use]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }
}

impl Solver for HiGHSSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve_ilp(&self, problem: &IlpProblem) -> Result<LpSolution> {
        let n = problem.lp.num_vars();
        if n == 0 {
            return Ok(LpSolution {
                values: vec![],
                objective: Decimal::ZERO,
                status: SolutionStatus::Optimal,
            });
        }

        let mut is_integer = vec![false; n];
        for &i in &problem.integer_vars {
            if let Some(flag) = is_integer.get_mut(i) {
                *flag = true;
            }
        }

        let mut vars = variables!();
        let mut var_list: Vec<Variable> = Vec::with_capacity(n);
        for (i, bounds) in problem.lp.bounds.iter().enumerate() {
            let mut v = variable();
            if let Some(lb) = bounds.lower {
                v = v.min(to_f64(lb));
            }
            if let Some(ub) = bounds.upper {
                v = v.max(to_f64(ub));
            }
            if is_integer[i] {
                v = v.integer();
            }
            var_list.push(vars.add(v));
        }

        let objective: Expression = var_list
            .iter()
            .zip(problem.lp.objective.iter())
            .map(|(v, c)| to_f64(*c) * *v)
            .sum();

        let mut model = vars.minimise(&objective).using(highs);
        if let Some(limit) = self.time_limit {
            model = model.set_time_limit(limit.as_secs_f64());
        }

        for constr in &problem.lp.constraints {
            let lhs: Expression = constr
                .terms
                .iter()
                .filter_map(|(i, c)| var_list.get(*i).map(|v| to_f64(*c) * *v))
                .sum();
            let rhs = to_f64(constr.rhs);

            model = match constr.sense {
                ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
                ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
                ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
            };
        }

        trace!(
            variables = n,
            constraints = problem.lp.constraints.len(),
            "Solving with HiGHS"
        );

        let started = Instant::now();
        let result = model.solve();
        let timed_out = self
            .time_limit
            .is_some_and(|limit| started.elapsed() >= limit);

        match result {
            Ok(_) if timed_out => Ok(LpSolution::without_values(SolutionStatus::TimedOut)),
            Ok(solution) => {
                let values: Vec<Decimal> = var_list
                    .iter()
                    .map(|v| Decimal::try_from(solution.value(*v)).unwrap_or(Decimal::ZERO))
                    .collect();
                let objective = problem.lp.objective_at(&values);
                debug!(objective = %objective, elapsed_ms = started.elapsed().as_millis(), "HiGHS optimal");

                Ok(LpSolution {
                    values,
                    objective,
                    status: SolutionStatus::Optimal,
                })
            }
            Err(ResolutionError::Infeasible) => {
                Ok(LpSolution::without_values(SolutionStatus::Infeasible))
            }
            Err(ResolutionError::Unbounded) => {
                Ok(LpSolution::without_values(SolutionStatus::Unbounded))
            }
            Err(_) if timed_out => Ok(LpSolution::without_values(SolutionStatus::TimedOut)),
            Err(e) => Err(Error::Solver(e.to_string())),
        }
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, ConstraintKind, VariableBounds};
    use crate::port::LpProblem;
    use rust_decimal_macros::dec;

    fn binary_problem(objective: Vec<Decimal>, constraints: Vec<Constraint>) -> IlpProblem {
        let n = objective.len();
        IlpProblem::all_binary(LpProblem {
            objective,
            constraints,
            bounds: vec![VariableBounds::binary(); n],
        })
    }

    #[test]
    fn test_solver_name() {
        assert_eq!(HiGHSSolver::new().name(), "highs");
    }

    #[test]
    fn test_binary_ilp() {
        // Maximize x + 2y subject to x + y <= 1
        let problem = binary_problem(
            vec![dec!(-1), dec!(-2)],
            vec![Constraint::leq(
                ConstraintKind::SingleOccupancy,
                Constraint::unit_terms([0, 1]),
                Decimal::ONE,
            )],
        );

        let solution = HiGHSSolver::new().solve_ilp(&problem).unwrap();

        assert!(solution.is_optimal());
        assert!(solution.values[0] < dec!(0.5));
        assert!(solution.values[1] > dec!(0.5));
        assert!((solution.objective + dec!(2)).abs() < dec!(0.01));
    }

    #[test]
    fn test_pinned_variable_is_never_selected() {
        let mut problem = binary_problem(
            vec![dec!(-10), dec!(-1)],
            vec![Constraint::eq(
                ConstraintKind::SlotFill,
                Constraint::unit_terms([0, 1]),
                Decimal::ONE,
            )],
        );
        problem.lp.bounds[0] = VariableBounds::pinned_zero();

        let solution = HiGHSSolver::new().solve_ilp(&problem).unwrap();

        assert!(solution.is_optimal());
        assert!(solution.values[0] < dec!(0.5));
        assert!(solution.values[1] > dec!(0.5));
    }

    #[test]
    fn test_infeasible_is_a_status() {
        let problem = binary_problem(
            vec![dec!(-1), dec!(-1)],
            vec![Constraint::geq(
                ConstraintKind::SlotFill,
                Constraint::unit_terms([0, 1]),
                dec!(3),
            )],
        );

        let solution = HiGHSSolver::new().solve_ilp(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_empty_problem() {
        let problem = IlpProblem::all_binary(LpProblem::new(0));
        let solution = HiGHSSolver::new().solve_ilp(&problem).unwrap();

        assert!(solution.is_optimal());
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_generous_time_limit_still_optimal() {
        let problem = binary_problem(
            vec![dec!(-3), dec!(-2), dec!(-1)],
            vec![Constraint::leq(
                ConstraintKind::SalaryCap,
                vec![(0, dec!(2)), (1, dec!(1)), (2, dec!(1))],
                dec!(2),
            )],
        );
        let solver = HiGHSSolver::new().with_time_limit(Some(Duration::from_secs(30)));

        let solution = solver.solve_ilp(&problem).unwrap();

        assert!(solution.is_optimal());
        assert!((solution.objective + dec!(3)).abs() < dec!(0.01));
    }

    #[test]
    fn test_expired_time_limit_reports_timed_out() {
        // 40-item knapsack; a 1ns budget is always spent by the time HiGHS returns.
        let n = 40;
        let objective: Vec<Decimal> = (0..n).map(|i| -Decimal::from(17 + (i * 31) % 23)).collect();
        let weights: Vec<(usize, Decimal)> =
            (0..n).map(|i| (i, Decimal::from(11 + (i * 7) % 19))).collect();
        let problem = binary_problem(
            objective,
            vec![Constraint::leq(ConstraintKind::SalaryCap, weights, dec!(173))],
        );
        let solver = HiGHSSolver::new().with_time_limit(Some(Duration::from_nanos(1)));

        let solution = solver.solve_ilp(&problem).unwrap();

        assert_eq!(solution.status, SolutionStatus::TimedOut);
        assert!(solution.values.is_empty());
    }
}
