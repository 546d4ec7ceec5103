//! Linear constraint types for lineup integer programs.
//!
//! Constraints are sparse: a lineup model has one variable per
//! (entity, eligible slot) pair plus team indicators, and most rows touch
//! only a handful of them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a constraint row encodes. Used for logging and model inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    SlotFill,
    SingleOccupancy,
    SalaryCap,
    MinSalary,
    MaxFromTeam,
    TeamLink,
    MinTeams,
    Stack,
    Diversity,
}

/// A single linear constraint: `sum(coef * x[var]) {>=, <=, =} rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// `(variable index, coefficient)` pairs. Absent variables have coefficient 0.
    pub terms: Vec<(usize, Decimal)>,
    /// Constraint sense (>=, <=, =).
    pub sense: ConstraintSense,
    /// Right-hand side value.
    pub rhs: Decimal,
    pub kind: ConstraintKind,
}

impl Constraint {
    /// Create a >= constraint.
    #[must_use]
    pub const fn geq(kind: ConstraintKind, terms: Vec<(usize, Decimal)>, rhs: Decimal) -> Self {
        Self {
            terms,
            sense: ConstraintSense::GreaterEqual,
            rhs,
            kind,
        }
    }

    /// Create a <= constraint.
    #[must_use]
    pub const fn leq(kind: ConstraintKind, terms: Vec<(usize, Decimal)>, rhs: Decimal) -> Self {
        Self {
            terms,
            sense: ConstraintSense::LessEqual,
            rhs,
            kind,
        }
    }

    /// Create an = constraint.
    #[must_use]
    pub const fn eq(kind: ConstraintKind, terms: Vec<(usize, Decimal)>, rhs: Decimal) -> Self {
        Self {
            terms,
            sense: ConstraintSense::Equal,
            rhs,
            kind,
        }
    }

    /// Sum of unit coefficients over `vars`.
    pub fn unit_terms(vars: impl IntoIterator<Item = usize>) -> Vec<(usize, Decimal)> {
        vars.into_iter().map(|v| (v, Decimal::ONE)).collect()
    }

    /// Evaluate the left-hand side against dense variable values.
    #[must_use]
    pub fn lhs(&self, values: &[Decimal]) -> Decimal {
        self.terms
            .iter()
            .map(|(v, c)| values.get(*v).copied().unwrap_or(Decimal::ZERO) * c)
            .sum()
    }

    /// Whether dense `values` satisfy this constraint.
    #[must_use]
    pub fn is_satisfied(&self, values: &[Decimal]) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            ConstraintSense::GreaterEqual => lhs >= self.rhs,
            ConstraintSense::LessEqual => lhs <= self.rhs,
            ConstraintSense::Equal => lhs == self.rhs,
        }
    }
}

/// Constraint sense (comparison operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSense {
    /// Greater than or equal (>=).
    GreaterEqual,
    /// Less than or equal (<=).
    LessEqual,
    /// Equal (=).
    Equal,
}

/// Bounds on a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableBounds {
    /// Lower bound (None = -infinity).
    pub lower: Option<Decimal>,
    /// Upper bound (None = +infinity).
    pub upper: Option<Decimal>,
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: None,
        }
    }
}

impl VariableBounds {
    /// Binary variable bounds [0, 1].
    #[must_use]
    pub const fn binary() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: Some(Decimal::ONE),
        }
    }

    /// Variable pinned to zero.
    #[must_use]
    pub const fn pinned_zero() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: Some(Decimal::ZERO),
        }
    }

    /// Non-negative variable [0, +inf).
    #[must_use]
    pub fn non_negative() -> Self {
        Self::default()
    }

    /// Bounded variable [lower, upper].
    #[must_use]
    pub const fn bounded(lower: Decimal, upper: Decimal) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    /// Returns true if the upper bound forces the variable to zero.
    #[must_use]
    pub fn is_pinned_zero(&self) -> bool {
        self.upper == Some(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sparse_lhs_ignores_missing_variables() {
        let c = Constraint::leq(
            ConstraintKind::SalaryCap,
            vec![(0, dec!(5000)), (2, dec!(7000))],
            dec!(10000),
        );
        let values = vec![Decimal::ONE, Decimal::ONE, Decimal::ZERO];
        assert_eq!(c.lhs(&values), dec!(5000));
        assert!(c.is_satisfied(&values));
    }

    #[test]
    fn equality_checks_exactly() {
        let c = Constraint::eq(
            ConstraintKind::SlotFill,
            Constraint::unit_terms([0, 1]),
            Decimal::ONE,
        );
        assert!(c.is_satisfied(&[Decimal::ONE, Decimal::ZERO]));
        assert!(!c.is_satisfied(&[Decimal::ONE, Decimal::ONE]));
    }

    #[test]
    fn pinned_bounds_are_detected() {
        assert!(VariableBounds::pinned_zero().is_pinned_zero());
        assert!(!VariableBounds::binary().is_pinned_zero());
    }
}
