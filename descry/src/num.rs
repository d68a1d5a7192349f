//! Exact signed integer scalars.
//!
//! The engine is generic over [`Int`]; `i64` serves the unit tests and small
//! inputs, `rug::Integer` (behind the `rug` feature) is the production scalar
//! for inputs whose intermediate coefficients outgrow machine words.

use std::fmt;
use std::hash::Hash;

pub trait Int:
    Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    /// Parses a base-10 literal with optional leading sign.
    fn from_decimal(text: &str) -> Option<Self>;

    fn is_zero(&self) -> bool;
    fn is_negative(&self) -> bool;
    fn is_positive(&self) -> bool;

    fn ref_neg(&self) -> Self;
    fn ref_add(&self, other: &Self) -> Self;
    fn ref_sub(&self, other: &Self) -> Self;
    fn ref_mul(&self, other: &Self) -> Self;
    /// Exact quotient; callers guarantee divisibility.
    fn ref_div(&self, other: &Self) -> Self;
    fn ref_abs(&self) -> Self;
    /// Non-negative greatest common divisor; zero only when both are zero.
    fn ref_gcd(&self, other: &Self) -> Self;
    /// `self += a * b`
    fn add_mul_assign(&mut self, a: &Self, b: &Self);
}

impl Int for i64 {
    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }

    fn from_decimal(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn is_negative(&self) -> bool {
        *self < 0
    }

    fn is_positive(&self) -> bool {
        *self > 0
    }

    fn ref_neg(&self) -> Self {
        -self
    }

    fn ref_add(&self, other: &Self) -> Self {
        self + other
    }

    fn ref_sub(&self, other: &Self) -> Self {
        self - other
    }

    fn ref_mul(&self, other: &Self) -> Self {
        self * other
    }

    fn ref_div(&self, other: &Self) -> Self {
        self / other
    }

    fn ref_abs(&self) -> Self {
        self.abs()
    }

    fn ref_gcd(&self, other: &Self) -> Self {
        let mut a = self.abs();
        let mut b = other.abs();
        while b != 0 {
            let r = a % b;
            a = b;
            b = r;
        }
        a
    }

    fn add_mul_assign(&mut self, a: &Self, b: &Self) {
        *self += a * b;
    }
}

#[cfg(feature = "rug")]
impl Int for rug::Integer {
    fn zero() -> Self {
        rug::Integer::new()
    }

    fn one() -> Self {
        rug::Integer::from(1)
    }

    fn from_decimal(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    fn is_zero(&self) -> bool {
        self.cmp0() == std::cmp::Ordering::Equal
    }

    fn is_negative(&self) -> bool {
        self.cmp0() == std::cmp::Ordering::Less
    }

    fn is_positive(&self) -> bool {
        self.cmp0() == std::cmp::Ordering::Greater
    }

    fn ref_neg(&self) -> Self {
        rug::Integer::from(-self)
    }

    fn ref_add(&self, other: &Self) -> Self {
        rug::Integer::from(self + other)
    }

    fn ref_sub(&self, other: &Self) -> Self {
        rug::Integer::from(self - other)
    }

    fn ref_mul(&self, other: &Self) -> Self {
        rug::Integer::from(self * other)
    }

    fn ref_div(&self, other: &Self) -> Self {
        rug::Integer::from(self / other)
    }

    fn ref_abs(&self) -> Self {
        rug::Integer::from(self.abs_ref())
    }

    fn ref_gcd(&self, other: &Self) -> Self {
        rug::Integer::from(self.gcd_ref(other))
    }

    fn add_mul_assign(&mut self, a: &Self, b: &Self) {
        *self += rug::Integer::from(a * b);
    }
}
