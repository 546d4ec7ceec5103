//! Numeric types for salary and fantasy points.

use rust_decimal::Decimal;

/// Slot-adjusted salary. Base salaries are whole units, but a captain form
/// costs `salary × 1.5`, so adjusted salaries are kept exact as Decimal.
pub type Salary = Decimal;

/// Fantasy points represented as a Decimal for exact multiplier math.
pub type Points = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn captain_salary_stays_exact() {
        let salary: Salary = Decimal::from(7_300u32) * dec!(1.5);
        assert_eq!(salary, dec!(10950));

        let points: Points = dec!(33.3) * dec!(1.5);
        assert_eq!(points, dec!(49.95));
    }
}
