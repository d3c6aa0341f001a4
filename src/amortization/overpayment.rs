use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineSettings;
use crate::decimal::{Money, Rate};

use super::schedule::{step_period, Installment};

/// totals of a payoff run without materialized rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffSimulation {
    pub periods: u32,
    pub total_interest: Money,
    pub final_balance: Money,
}

impl PayoffSimulation {
    pub fn is_paid_off(&self) -> bool {
        self.final_balance.is_zero()
    }
}

/// baseline versus accelerated payoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffComparison {
    pub base_payment: Money,
    pub extra_payment: Money,
    pub baseline_periods: u32,
    pub accelerated_periods: u32,
    pub months_saved: u32,
    /// months saved expressed in years, one decimal
    pub years_saved: Decimal,
    pub baseline_interest: Money,
    pub accelerated_interest: Money,
    pub interest_saved: Money,
}

/// extra payment comparator
#[derive(Debug, Clone, Default)]
pub struct ExtraPaymentComparator {
    settings: EngineSettings,
}

impl ExtraPaymentComparator {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// run a fixed payment to payoff, bounded by the iteration ceiling
    ///
    /// A balance that grows past the representable range ends the run early
    /// with the last representable balance outstanding.
    pub fn simulate(&self, principal: Money, monthly_rate: Rate, payment: Money) -> PayoffSimulation {
        let mut balance = principal.max(Money::ZERO);
        let mut total_interest = Money::ZERO;
        let mut periods = 0;

        while balance.is_positive() && periods < self.settings.max_periods {
            let next = step_period(
                balance,
                monthly_rate,
                Installment::Fixed(payment),
                self.settings.balance_epsilon,
            )
            .and_then(|step| Some((step, total_interest.checked_add(step.interest)?)));

            let Some((step, interest_so_far)) = next else {
                warn!(
                    periods,
                    balance = %balance,
                    "balance exceeds representable range, payoff simulation stopped"
                );
                break;
            };

            total_interest = interest_so_far;
            balance = step.ending_balance;
            periods += 1;
        }

        PayoffSimulation {
            periods,
            total_interest,
            final_balance: balance,
        }
    }

    /// simulate with and without `extra_payment` on top of `base_payment`
    pub fn compare(
        &self,
        principal: Money,
        monthly_rate: Rate,
        base_payment: Money,
        extra_payment: Money,
    ) -> PayoffComparison {
        let baseline = self.simulate(principal, monthly_rate, base_payment);
        let accelerated = self.simulate(principal, monthly_rate, base_payment + extra_payment);

        let months_saved = baseline.periods.saturating_sub(accelerated.periods);
        let interest_saved = baseline
            .total_interest
            .checked_sub(accelerated.total_interest)
            .unwrap_or(Money::ZERO)
            .max(Money::ZERO);
        let years_saved = (Decimal::from(months_saved) / Decimal::from(12)).round_dp(1);

        debug!(
            baseline_periods = baseline.periods,
            accelerated_periods = accelerated.periods,
            interest_saved = %interest_saved,
            "compared extra payment payoff"
        );

        PayoffComparison {
            base_payment,
            extra_payment,
            baseline_periods: baseline.periods,
            accelerated_periods: accelerated.periods,
            months_saved,
            years_saved,
            baseline_interest: baseline.total_interest,
            accelerated_interest: accelerated.total_interest,
            interest_saved,
        }
    }
}

/// compare with default engine settings
pub fn compare_with_extra_payment(
    principal: Money,
    monthly_rate: Rate,
    base_payment: Money,
    extra_payment: Money,
) -> PayoffComparison {
    ExtraPaymentComparator::default().compare(principal, monthly_rate, base_payment, extra_payment)
}
