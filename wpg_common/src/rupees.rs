use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const PKR_CURRENCY_CODE: &str = "PKR";
pub const PKR_CURRENCY_CODE_LOWER: &str = "pkr";

//--------------------------------------       Rupees       ----------------------------------------------------------
/// A whole-rupee amount. Signed, so that ledger entries can carry debits as well as credits.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Rupees(i64);

impl Add for Rupees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Rupees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Rupees {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Rupees {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<i64> for Rupees {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Rupees {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in rupees: {0}")]
pub struct RupeesConversionError(String);

impl From<i64> for Rupees {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Rupees {
    type Error = RupeesConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(RupeesConversionError(format!("Value {} is too large to convert to Rupees", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Rupees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rs {}", self.0)
    }
}

impl Rupees {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Rupees::from(500);
        let b = Rupees::from(200);
        assert_eq!(a + b, Rupees::from(700));
        assert_eq!(a - b, Rupees::from(300));
        assert_eq!(-a, Rupees::from(-500));
        assert_eq!(a * 3, Rupees::from(1500));
        let total: Rupees = [a, b].into_iter().sum();
        assert_eq!(total, Rupees::from(700));
    }

    #[test]
    fn display() {
        assert_eq!(Rupees::from(1000).to_string(), "Rs 1000");
    }

    #[test]
    fn positivity() {
        assert!(Rupees::from(1).is_positive());
        assert!(!Rupees::from(0).is_positive());
        assert!(!Rupees::from(-10).is_positive());
    }
}
