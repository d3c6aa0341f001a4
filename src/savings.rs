use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::ratio::Ratio;

/// emergency-fund style savings target: cover `target_months` of expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub monthly_expenses: Money,
    pub target_months: u32,
    pub current_savings: Money,
}

/// progress towards a [`SavingsGoal`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub target_amount: Money,
    pub remaining_needed: Money,
    /// capped at 100; undefined when the target is zero
    pub percent_complete: Ratio,
    pub is_complete: bool,
}

impl SavingsGoal {
    pub fn new(monthly_expenses: Money, target_months: u32, current_savings: Money) -> Self {
        Self {
            monthly_expenses,
            target_months,
            current_savings,
        }
    }

    pub fn target_amount(&self) -> Money {
        self.monthly_expenses * Decimal::from(self.target_months)
    }

    pub fn progress(&self) -> GoalProgress {
        let target_amount = self.target_amount();
        let remaining_needed = (target_amount - self.current_savings).max(Money::ZERO);
        let percent_complete = Ratio::percent(
            self.current_savings.as_decimal(),
            target_amount.as_decimal(),
        )
        .map(|p| p.min(Decimal::ONE_HUNDRED));

        GoalProgress {
            target_amount,
            remaining_needed,
            percent_complete,
            is_complete: self.current_savings >= target_amount,
        }
    }
}
