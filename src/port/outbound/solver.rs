//! Solver port for integer linear programming.
//!
//! Defines the trait the lineup generator uses to solve one roster model,
//! together with the problem and solution types.
//!
//! # Overview
//!
//! - [`Solver`]: Core ILP solver interface
//! - [`LpProblem`] / [`IlpProblem`]: Problem definitions
//! - [`LpSolution`]: Solution representation

use rust_decimal::Decimal;

use crate::domain::{Constraint, VariableBounds};
use crate::error::Result;

/// Integer linear programming solver.
///
/// Implementations wrap specific solver backends (HiGHS, CBC, etc.) and
/// are treated as correct black boxes: given a well-formed model they
/// return an optimum or report that none was found.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a batch can run on a blocking
/// worker thread.
///
/// # Implementation Notes
///
/// - Infeasible and unbounded models are reported through
///   [`SolutionStatus`], not as errors.
/// - A configured time limit that expires must yield
///   [`SolutionStatus::TimedOut`].
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Solve an integer linear programming problem.
    ///
    /// Minimizes the objective function with integer constraints on specified
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backend itself fails (not for
    /// infeasibility or timeouts).
    fn solve_ilp(&self, problem: &IlpProblem) -> Result<LpSolution>;
}

/// Linear programming problem definition.
///
/// Represents a minimization problem of the form:
///
/// ```text
/// minimize    c^T * x
/// subject to  constraints
///             bounds on x
/// ```
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Objective function coefficients.
    ///
    /// The solver minimizes `c^T * x` where `c` is this vector.
    pub objective: Vec<Decimal>,

    /// Linear constraints on the variables.
    pub constraints: Vec<Constraint>,

    /// Lower and upper bounds for each variable.
    pub bounds: Vec<VariableBounds>,
}

impl LpProblem {
    /// Create a new LP problem with the specified number of variables.
    ///
    /// Initializes all objective coefficients to zero and all variable bounds
    /// to their defaults.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            objective: vec![Decimal::ZERO; num_vars],
            constraints: Vec::new(),
            bounds: vec![VariableBounds::default(); num_vars],
        }
    }

    /// Return the number of decision variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Objective value at dense `values`.
    #[must_use]
    pub fn objective_at(&self, values: &[Decimal]) -> Decimal {
        self.objective
            .iter()
            .zip(values)
            .map(|(c, v)| c * v)
            .sum()
    }
}

/// Integer linear programming problem definition.
///
/// Extends a linear programming problem with integer constraints on specified
/// variables.
#[derive(Debug, Clone)]
pub struct IlpProblem {
    /// Underlying linear programming problem.
    pub lp: LpProblem,

    /// Indices of variables constrained to integer values.
    ///
    /// Variables not in this list are continuous (relaxed).
    pub integer_vars: Vec<usize>,
}

impl IlpProblem {
    /// Create an ILP problem from an LP with specified integer variables.
    #[must_use]
    pub const fn new(lp: LpProblem, integer_vars: Vec<usize>) -> Self {
        Self { lp, integer_vars }
    }

    /// Create an ILP with all variables constrained to integer values.
    #[must_use]
    pub fn all_binary(lp: LpProblem) -> Self {
        let integer_vars: Vec<usize> = (0..lp.num_vars()).collect();
        Self { lp, integer_vars }
    }
}

/// Solution to an integer programming problem.
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Values for each decision variable (empty unless optimal).
    pub values: Vec<Decimal>,

    /// Objective function value.
    pub objective: Decimal,

    /// Termination status of the solver.
    pub status: SolutionStatus,
}

impl LpSolution {
    /// A solution carrying only a non-optimal status.
    #[must_use]
    pub fn without_values(status: SolutionStatus) -> Self {
        Self {
            values: Vec::new(),
            objective: Decimal::ZERO,
            status,
        }
    }

    /// Return `true` if the solver found an optimal solution.
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Termination status of an optimization solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Solver found a globally optimal solution.
    Optimal,

    /// No feasible solution exists.
    Infeasible,

    /// Objective function is unbounded.
    Unbounded,

    /// The configured time limit expired before optimality was proven.
    TimedOut,
}
