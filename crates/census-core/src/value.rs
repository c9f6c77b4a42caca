//! Measured values and their arithmetic
//!
//! A [`Value`] is a decimal magnitude with an optional margin of error.
//! An absent magnitude means the stored cell could not be read as a number;
//! it is carried through arithmetic as "unknown" rather than treated as zero.

use std::fmt;

use rust_decimal::{Decimal, MathematicalOps};

use crate::error::{Error, Result};

/// Arithmetic operators understood by [`Value::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Symbol used in formula text
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    fn name(self) -> &'static str {
        match self {
            Operator::Add => "addition",
            Operator::Subtract => "subtraction",
            Operator::Multiply => "multiplication",
            Operator::Divide => "division",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A measurement with an optional margin of error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Value {
    magnitude: Option<Decimal>,
    margin_of_error: Option<Decimal>,
}

impl Value {
    /// Create a value without a margin of error
    pub fn new<D: Into<Decimal>>(magnitude: D) -> Self {
        Self {
            magnitude: Some(magnitude.into()),
            margin_of_error: None,
        }
    }

    /// Create a value carrying a margin of error
    pub fn with_moe<D: Into<Decimal>, M: Into<Decimal>>(magnitude: D, moe: M) -> Self {
        Self {
            magnitude: Some(magnitude.into()),
            margin_of_error: Some(moe.into()),
        }
    }

    /// Create a value from possibly-absent parts
    pub fn from_parts(magnitude: Option<Decimal>, margin_of_error: Option<Decimal>) -> Self {
        Self {
            magnitude,
            margin_of_error,
        }
    }

    /// A value whose magnitude could not be resolved
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Read stored text as a number.
    ///
    /// Tries an integer first and falls back to an exact decimal. Anything
    /// else (empty cells, `.`, footnote markers) gives `None`.
    pub fn from_text(text: &str) -> Option<Self> {
        Self::parse_number(text).map(Self::new)
    }

    /// Parse stored text into a decimal, integer first
    pub fn parse_number(text: &str) -> Option<Decimal> {
        let text = text.trim();
        if !text.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        if let Ok(n) = text.parse::<i64>() {
            return Some(Decimal::from(n));
        }
        Decimal::from_str_exact(text).ok()
    }

    /// The magnitude, if known
    pub fn magnitude(&self) -> Option<Decimal> {
        self.magnitude
    }

    /// The margin of error, if one is attached
    pub fn margin_of_error(&self) -> Option<Decimal> {
        self.margin_of_error
    }

    /// Check if the magnitude is unresolved
    pub fn is_unknown(&self) -> bool {
        self.magnitude.is_none()
    }

    /// Combine two values with an arithmetic operator.
    ///
    /// If either magnitude is unknown the result is unknown, checked before
    /// the zero divisor test.
    pub fn apply(&self, op: Operator, rhs: &Value) -> Result<Value> {
        let (a, b) = match (self.magnitude, rhs.magnitude) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(Value::unknown()),
        };

        let overflow = || Error::Overflow { op: op.name() };
        let magnitude = match op {
            Operator::Add => a.checked_add(b),
            Operator::Subtract => a.checked_sub(b),
            Operator::Multiply => a.checked_mul(b),
            Operator::Divide => {
                if b.is_zero() {
                    return Err(Error::DivisionByZero);
                }
                a.checked_div(b)
            }
        }
        .ok_or_else(overflow)?;

        let margin_of_error = match (self.margin_of_error, rhs.margin_of_error) {
            (Some(m1), Some(m2)) => Some(propagate(op, a, b, m1, m2).ok_or_else(overflow)?),
            _ => None,
        };

        Ok(Value {
            magnitude: Some(magnitude),
            margin_of_error,
        })
    }

    /// `self + rhs`
    pub fn checked_add(&self, rhs: &Value) -> Result<Value> {
        self.apply(Operator::Add, rhs)
    }

    /// `self - rhs`
    pub fn checked_sub(&self, rhs: &Value) -> Result<Value> {
        self.apply(Operator::Subtract, rhs)
    }

    /// `self * rhs`
    pub fn checked_mul(&self, rhs: &Value) -> Result<Value> {
        self.apply(Operator::Multiply, rhs)
    }

    /// `self / rhs`
    pub fn checked_div(&self, rhs: &Value) -> Result<Value> {
        self.apply(Operator::Divide, rhs)
    }
}

impl std::ops::Neg for Value {
    type Output = Value;

    /// Negate the magnitude, keeping the margin of error
    fn neg(self) -> Value {
        Value {
            magnitude: self.magnitude.map(|m| -m),
            margin_of_error: self.margin_of_error,
        }
    }
}

/// Margin of error of `a op b` given margins `m1` and `m2`.
///
/// Sums and differences use the root sum of squares. Products and ratios use
/// relative-error propagation written so that a zero operand stays defined:
/// `sqrt(b²m1² + a²m2²)` and `sqrt(m1² + (a/b)²m2²) / |b|`.
fn propagate(op: Operator, a: Decimal, b: Decimal, m1: Decimal, m2: Decimal) -> Option<Decimal> {
    match op {
        Operator::Add | Operator::Subtract => hypot(m1, m2),
        Operator::Multiply => hypot(b.checked_mul(m1)?, a.checked_mul(m2)?),
        Operator::Divide => {
            let ratio = a.checked_div(b)?;
            hypot(m1, ratio.checked_mul(m2)?)?.checked_div(b.abs())
        }
    }
}

/// `sqrt(x² + y²)`, scaled by the larger term so only the result can overflow
fn hypot(x: Decimal, y: Decimal) -> Option<Decimal> {
    let (x, y) = (x.abs(), y.abs());
    let (hi, lo) = if x >= y { (x, y) } else { (y, x) };
    if hi.is_zero() {
        return Some(Decimal::ZERO);
    }
    let ratio = lo.checked_div(hi)?;
    let scale = Decimal::ONE.checked_add(ratio.checked_mul(ratio)?)?.sqrt()?;
    hi.checked_mul(scale)
}

impl From<Decimal> for Value {
    fn from(magnitude: Decimal) -> Self {
        Value::new(magnitude)
    }
}

impl From<i64> for Value {
    fn from(magnitude: i64) -> Self {
        Value::new(magnitude)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = match self.magnitude {
            Some(m) => m,
            None => return write!(f, "unknown"),
        };
        match (f.precision(), self.margin_of_error) {
            (Some(p), Some(moe)) => write!(f, "{:.*} ± {:.*}", p, magnitude, p, moe),
            (Some(p), None) => write!(f, "{:.*}", p, magnitude),
            (None, Some(moe)) => write!(f, "{} ± {}", magnitude, moe),
            (None, None) => write!(f, "{}", magnitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn assert_close(actual: Option<Decimal>, expected: &str) {
        let actual = actual.expect("margin of error");
        assert!(
            (actual - dec(expected)).abs() < dec("0.0000000001"),
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_from_text_integer() {
        let v = Value::from_text("42").unwrap();
        assert_eq!(v.magnitude(), Some(Decimal::from(42)));
        assert_eq!(v.magnitude().unwrap().scale(), 0);
        assert_eq!(v.margin_of_error(), None);

        let v = Value::from_text(" -7 ").unwrap();
        assert_eq!(v.magnitude(), Some(Decimal::from(-7)));
    }

    #[test]
    fn test_from_text_decimal() {
        let v = Value::from_text("12.50").unwrap();
        assert_eq!(v.magnitude(), Some(dec("12.50")));
    }

    #[test]
    fn test_from_text_rejects_non_numeric() {
        assert_eq!(Value::from_text(""), None);
        assert_eq!(Value::from_text("."), None);
        assert_eq!(Value::from_text("(X)"), None);
        assert_eq!(Value::from_text("N"), None);
        assert_eq!(Value::from_text("1e5"), None);
    }

    #[test]
    fn test_add_combines_moe_as_root_sum_of_squares() {
        let sum = Value::with_moe(10, 1).checked_add(&Value::with_moe(20, 2)).unwrap();
        assert_eq!(sum.magnitude(), Some(Decimal::from(30)));

        assert_close(sum.margin_of_error(), "2.2360679775");
    }

    #[test]
    fn test_subtract_moe_matches_addition() {
        let diff = Value::with_moe(10, 3).checked_sub(&Value::with_moe(4, 4)).unwrap();
        assert_eq!(diff.magnitude(), Some(Decimal::from(6)));
        assert_close(diff.margin_of_error(), "5");
    }

    #[test]
    fn test_moe_dropped_when_one_side_lacks_it() {
        let sum = Value::with_moe(10, 1).checked_add(&Value::new(20)).unwrap();
        assert_eq!(sum.magnitude(), Some(Decimal::from(30)));
        assert_eq!(sum.margin_of_error(), None);

        let product = Value::new(2).checked_mul(&Value::with_moe(5, 1)).unwrap();
        assert_eq!(product.margin_of_error(), None);
    }

    #[test]
    fn test_product_moe() {
        // sqrt(4² * 3² + 10² * 0²) = 12
        let product = Value::with_moe(10, 3).checked_mul(&Value::with_moe(4, 0)).unwrap();
        assert_eq!(product.magnitude(), Some(Decimal::from(40)));
        assert_close(product.margin_of_error(), "12");
    }

    #[test]
    fn test_ratio_moe() {
        // sqrt(6² + (10/2)² * 0²) / 2 = 3
        let ratio = Value::with_moe(10, 6).checked_div(&Value::with_moe(2, 0)).unwrap();
        assert_eq!(ratio.magnitude(), Some(Decimal::from(5)));
        assert_close(ratio.margin_of_error(), "3");
    }

    #[test]
    fn test_large_product_moe_stays_in_range() {
        // b²·m1² alone would exceed Decimal::MAX
        let product = Value::with_moe(10, 1_000_000)
            .checked_mul(&Value::with_moe(300_000_000, 0))
            .unwrap();
        assert_eq!(product.magnitude(), Some(Decimal::from(3_000_000_000i64)));
        assert_close(product.margin_of_error(), "300000000000000");

        let sum = Value::with_moe(1, dec("300000000000000"))
            .checked_add(&Value::with_moe(1, dec("400000000000000")))
            .unwrap();
        assert_close(sum.margin_of_error(), "500000000000000");
    }

    #[test]
    fn test_zero_margins() {
        let product = Value::with_moe(0, 0).checked_mul(&Value::with_moe(5, 0)).unwrap();
        assert_eq!(product.margin_of_error(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            Value::new(1).checked_div(&Value::new(0)),
            Err(Error::DivisionByZero)
        );
        assert_eq!(
            Value::new(1).checked_div(&Value::from_parts(Some(dec("0.00")), None)),
            Err(Error::DivisionByZero)
        );
    }

    #[test]
    fn test_unknown_propagates() {
        let unknown = Value::unknown();
        assert!(unknown.checked_add(&Value::new(1)).unwrap().is_unknown());
        assert!(Value::new(1).checked_mul(&unknown).unwrap().is_unknown());
        // Unknown dividend or divisor never raises
        assert!(unknown.checked_div(&Value::new(0)).unwrap().is_unknown());
        assert!(Value::new(0).checked_div(&unknown).unwrap().is_unknown());
    }

    #[test]
    fn test_overflow() {
        let big = Value::new(Decimal::MAX);
        assert_eq!(
            big.checked_add(&big),
            Err(Error::Overflow { op: "addition" })
        );
    }

    #[test]
    fn test_neg_keeps_moe() {
        let v = -Value::with_moe(5, 2);
        assert_eq!(v.magnitude(), Some(Decimal::from(-5)));
        assert_eq!(v.margin_of_error(), Some(Decimal::from(2)));
        assert!((-Value::unknown()).is_unknown());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::new(30).to_string(), "30");
        assert_eq!(Value::with_moe(30, 2).to_string(), "30 ± 2");
        assert_eq!(Value::unknown().to_string(), "unknown");
        assert_eq!(format!("{:.2}", Value::with_moe(dec("1.5"), 1)), "1.50 ± 1.00");
    }

    proptest! {
        #[test]
        fn prop_integer_text_round_trips(n in any::<i64>()) {
            let v = Value::from_text(&n.to_string()).unwrap();
            prop_assert_eq!(v.magnitude(), Some(Decimal::from(n)));
        }

        #[test]
        fn prop_sum_moe_is_symmetric(a in -1000i64..1000, b in -1000i64..1000, m1 in 0i64..100, m2 in 0i64..100) {
            let x = Value::with_moe(a, m1);
            let y = Value::with_moe(b, m2);
            prop_assert_eq!(x.checked_add(&y).unwrap(), y.checked_add(&x).unwrap());
        }
    }
}
