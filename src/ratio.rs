use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// result of a division that may be undefined
///
/// Zero denominators and results outside the decimal range both yield
/// `Undefined`, which renders as "undefined".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ratio {
    Defined(Decimal),
    Undefined,
}

impl Ratio {
    /// `numerator / denominator`, undefined when the denominator is zero
    pub fn of(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator.is_zero() {
            return Ratio::Undefined;
        }
        numerator
            .checked_div(denominator)
            .map(Ratio::Defined)
            .unwrap_or(Ratio::Undefined)
    }

    /// wrap a checked computation, undefined when it overflowed
    pub fn from_checked(value: Option<Decimal>) -> Self {
        value.map(Ratio::Defined).unwrap_or(Ratio::Undefined)
    }

    /// same as [`Ratio::of`] scaled by 100
    pub fn percent(numerator: Decimal, denominator: Decimal) -> Self {
        Ratio::of(numerator, denominator).and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
    }

    pub fn map(self, f: impl FnOnce(Decimal) -> Decimal) -> Self {
        match self {
            Ratio::Defined(v) => Ratio::Defined(f(v)),
            Ratio::Undefined => Ratio::Undefined,
        }
    }

    /// like [`Ratio::map`] for computations that can overflow
    pub fn and_then(self, f: impl FnOnce(Decimal) -> Option<Decimal>) -> Self {
        match self {
            Ratio::Defined(v) => Ratio::from_checked(f(v)),
            Ratio::Undefined => Ratio::Undefined,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Ratio::Defined(v) => Some(*v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Ratio::Defined(_))
    }

    /// round a defined value, leave undefined untouched
    pub fn round_dp(self, dp: u32) -> Self {
        self.map(|v| v.round_dp(dp))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{}", v),
            Ratio::Undefined => write!(f, "undefined"),
        }
    }
}

/// what is `percentage`% of `value`
pub fn percent_of(percentage: Decimal, value: Decimal) -> Ratio {
    Ratio::from_checked((percentage / Decimal::ONE_HUNDRED).checked_mul(value))
}

/// what percentage `part` is of `whole`
pub fn what_percent(part: Decimal, whole: Decimal) -> Ratio {
    Ratio::percent(part, whole)
}

/// percentage change from `original` to `current`, relative to |original|
pub fn percent_change(original: Decimal, current: Decimal) -> Ratio {
    match current.checked_sub(original) {
        Some(delta) => Ratio::percent(delta, original.abs()),
        None => Ratio::Undefined,
    }
}

/// increase `value` by `percentage`%
pub fn increase_by(value: Decimal, percentage: Decimal) -> Ratio {
    Ratio::from_checked(
        Decimal::ONE
            .checked_add(percentage / Decimal::ONE_HUNDRED)
            .and_then(|factor| value.checked_mul(factor)),
    )
}

/// decrease `value` by `percentage`%
pub fn decrease_by(value: Decimal, percentage: Decimal) -> Ratio {
    Ratio::from_checked(
        Decimal::ONE
            .checked_sub(percentage / Decimal::ONE_HUNDRED)
            .and_then(|factor| value.checked_mul(factor)),
    )
}
