use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineSettings;
use crate::decimal::{Money, Rate};
use crate::types::PaymentRow;

/// how each period's principal portion is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Installment {
    /// level total payment; principal is whatever remains after interest
    Fixed(Money),
    /// constant principal portion; interest is added on top
    EqualPrincipal(Money),
}

/// outcome of one period of the balance recurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodStep {
    pub interest: Money,
    pub principal: Money,
    pub ending_balance: Money,
}

impl PeriodStep {
    pub fn payment(&self) -> Money {
        self.principal + self.interest
    }
}

/// advance the balance by one period
///
/// Balances that fall below `epsilon` are cleared and the residue is booked
/// as principal, so principal portions always sum to the amount repaid.
/// Returns `None` once the balance no longer fits in a decimal.
pub fn step_period(
    balance: Money,
    monthly_rate: Rate,
    installment: Installment,
    epsilon: Money,
) -> Option<PeriodStep> {
    let interest = balance.checked_accrue(monthly_rate)?;
    let mut principal = match installment {
        Installment::Fixed(payment) => payment.checked_sub(interest)?.min(balance),
        Installment::EqualPrincipal(principal_payment) => principal_payment.min(balance),
    };

    let mut ending_balance = balance.checked_sub(principal)?;
    if ending_balance < epsilon {
        principal = principal.checked_add(ending_balance)?;
        ending_balance = Money::ZERO;
    }

    // the row total must stay representable as well
    principal.checked_add(interest)?;

    Some(PeriodStep {
        interest,
        principal,
        ending_balance,
    })
}

/// month-by-month schedule, possibly cut short by the iteration ceiling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<PaymentRow>,
    /// balance was still outstanding when generation stopped
    pub truncated: bool,
}

impl Schedule {
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            truncated: false,
        }
    }

    pub fn periods(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn total_interest(&self) -> Money {
        self.rows.iter().map(|r| r.interest_portion).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.rows.iter().map(|r| r.principal_portion).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.rows.iter().map(|r| r.scheduled_payment).sum()
    }

    pub fn final_balance(&self) -> Option<Money> {
        self.rows.last().map(|r| r.ending_balance)
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.payment_date)
    }

    /// get payment for specific period
    pub fn get_payment(&self, payment_number: u32) -> Option<&PaymentRow> {
        let index = payment_number.checked_sub(1)?;
        self.rows.get(index as usize)
    }
}

/// schedule generator
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    settings: EngineSettings,
}

impl ScheduleGenerator {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// run the balance recurrence from `principal` to payoff
    ///
    /// Stops after `total_periods` rows, once the balance reaches zero, or at
    /// the iteration ceiling, whichever comes first. A payment that does not
    /// cover interest lets the balance grow until the ceiling or the period
    /// count ends the run; the schedule is then marked truncated.
    pub fn generate(
        &self,
        principal: Money,
        monthly_rate: Rate,
        total_periods: u32,
        installment: Installment,
        start_date: NaiveDate,
    ) -> Schedule {
        if !principal.is_positive() || total_periods == 0 {
            return Schedule::empty();
        }

        let limit = total_periods.min(self.settings.max_periods);
        let mut rows = Vec::with_capacity(limit as usize);
        let mut balance = principal;
        let mut period = 0;
        let mut overflowed = false;

        while period < limit && balance.is_positive() {
            let Some(step) = step_period(balance, monthly_rate, installment, self.settings.balance_epsilon)
            else {
                overflowed = true;
                break;
            };
            period += 1;

            if period == 1 && !step.principal.is_positive() {
                warn!(
                    payment = %step.payment(),
                    interest = %step.interest,
                    "payment does not cover first period interest"
                );
            }

            rows.push(PaymentRow {
                payment_number: period,
                payment_date: add_months(start_date, period),
                scheduled_payment: step.payment(),
                principal_portion: step.principal,
                interest_portion: step.interest,
                ending_balance: step.ending_balance,
            });

            balance = step.ending_balance;
        }

        let truncated = balance.is_positive();
        if overflowed {
            warn!(
                periods = period,
                balance = %balance,
                "balance exceeds representable range, schedule truncated"
            );
        } else if truncated && period == self.settings.max_periods {
            warn!(
                periods = period,
                balance = %balance,
                "schedule truncated at iteration ceiling"
            );
        }

        debug!(
            periods = period,
            principal = %principal,
            truncated,
            "generated amortization schedule"
        );

        Schedule { rows, truncated }
    }
}

/// generate a schedule with default engine settings
pub fn generate_schedule(
    principal: Money,
    monthly_rate: Rate,
    total_periods: u32,
    installment: Installment,
    start_date: NaiveDate,
) -> Schedule {
    ScheduleGenerator::default().generate(principal, monthly_rate, total_periods, installment, start_date)
}

/// add calendar months, clamping the day to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
