use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::amortization::formula::{annuity_payment, equal_principal_payment};
use crate::amortization::overpayment::{ExtraPaymentComparator, PayoffComparison};
use crate::amortization::schedule::{add_months, Installment, Schedule, ScheduleGenerator};
use crate::amortization::yearly::aggregate_by_year;
use crate::config::EngineSettings;
use crate::decimal::{Money, Rate};
use crate::ratio::Ratio;
use crate::types::{AmortizationMethod, LoanParameters, PaymentRow, YearSummary};

/// headline payment figures for the chosen method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPlan {
    Fixed {
        monthly_payment: Money,
    },
    EqualPrincipal {
        principal_payment: Money,
        first_month_payment: Money,
        last_month_payment: Money,
        average_payment: Money,
        /// level annuity payment for the same loan
        standard_payment: Money,
        /// how much lower the average payment is than the annuity, in percent
        savings_vs_standard: Ratio,
    },
}

impl PaymentPlan {
    /// payment due in the first month, excluding escrow
    pub fn first_payment(&self) -> Money {
        match self {
            PaymentPlan::Fixed { monthly_payment } => *monthly_payment,
            PaymentPlan::EqualPrincipal {
                first_month_payment, ..
            } => *first_month_payment,
        }
    }
}

/// everything a calculator needs to render a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub rows: Vec<PaymentRow>,
    pub yearly: Vec<YearSummary>,
    pub payment: PaymentPlan,
    pub monthly_escrow: Money,
    /// first regular payment plus escrow
    pub total_monthly_cost: Money,
    /// total monthly cost plus the extra payment
    pub effective_monthly_cost: Money,
    /// includes interest capitalized during a grace period
    pub total_interest: Money,
    /// interest accrued during the grace period and added to the balance
    pub capitalized_interest: Money,
    pub total_principal: Money,
    pub total_amount_paid: Money,
    pub payoff_date: Option<NaiveDate>,
    pub truncated: bool,
    pub interest_to_principal_ratio: Ratio,
    pub extra_payment_savings: Option<PayoffComparison>,
}

impl AmortizationResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn periods(&self) -> u32 {
        self.rows.len() as u32
    }
}

/// amortization engine
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    settings: EngineSettings,
}

impl AmortizationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// compute the full schedule for `params`
    ///
    /// The time provider only resolves the start date when the parameters
    /// leave it open. Degenerate parameters produce an empty result.
    pub fn compute(&self, params: &LoanParameters, time_provider: &SafeTimeProvider) -> AmortizationResult {
        let start_date = params
            .start_date
            .unwrap_or_else(|| time_provider.now().date_naive());
        let monthly_rate = params.monthly_rate();
        let periods = params.repayment_months();
        let monthly_escrow = params.monthly_escrow();

        if !params.is_amortizable() {
            debug!(principal = %params.principal, term_years = params.term_years, "degenerate loan parameters");
            return self.empty_result(params.method, monthly_escrow);
        }

        let Some((financed, capitalized_interest)) =
            capitalize_grace_interest(params.principal, monthly_rate, params.grace_months)
        else {
            warn!(
                grace_months = params.grace_months,
                "capitalized grace interest exceeds representable range"
            );
            return self.empty_result(params.method, monthly_escrow);
        };
        // the first payment falls one month after the grace period ends
        let start_date = add_months(start_date, params.grace_months);

        let generator = ScheduleGenerator::new(self.settings);
        let extra = params.extra_monthly_payment;

        let (schedule, payment, extra_payment_savings, regular_payment) = match params.method {
            AmortizationMethod::FixedPayment => {
                let monthly_payment = annuity_payment(financed, monthly_rate, periods);
                let schedule = generator.generate(
                    financed,
                    monthly_rate,
                    periods,
                    Installment::Fixed(monthly_payment + extra),
                    start_date,
                );
                let savings = extra.is_positive().then(|| {
                    ExtraPaymentComparator::new(self.settings).compare(
                        financed,
                        monthly_rate,
                        monthly_payment,
                        extra,
                    )
                });
                (schedule, PaymentPlan::Fixed { monthly_payment }, savings, monthly_payment)
            }
            AmortizationMethod::EqualPrincipal => {
                let principal_payment = equal_principal_payment(financed, periods);
                let schedule = generator.generate(
                    financed,
                    monthly_rate,
                    periods,
                    Installment::EqualPrincipal(principal_payment + extra),
                    start_date,
                );
                let standard_payment = annuity_payment(financed, monthly_rate, periods);
                let plan = equal_principal_plan(&schedule, principal_payment, standard_payment);
                // first row already carries the extra principal
                let regular_payment = plan.first_payment() - extra;
                (schedule, plan, None, regular_payment)
            }
        };

        let total_interest = schedule.total_interest() + capitalized_interest;

        AmortizationResult {
            yearly: aggregate_by_year(&schedule.rows),
            payment,
            monthly_escrow,
            total_monthly_cost: regular_payment + monthly_escrow,
            effective_monthly_cost: regular_payment + monthly_escrow + extra,
            total_interest,
            capitalized_interest,
            total_principal: schedule.total_principal() - capitalized_interest,
            total_amount_paid: schedule.total_paid(),
            payoff_date: schedule.payoff_date(),
            truncated: schedule.truncated,
            interest_to_principal_ratio: Ratio::percent(
                total_interest.as_decimal(),
                params.principal.as_decimal(),
            ),
            extra_payment_savings,
            rows: schedule.rows,
        }
    }

    fn empty_result(&self, method: AmortizationMethod, monthly_escrow: Money) -> AmortizationResult {
        let payment = match method {
            AmortizationMethod::FixedPayment => PaymentPlan::Fixed {
                monthly_payment: Money::ZERO,
            },
            AmortizationMethod::EqualPrincipal => PaymentPlan::EqualPrincipal {
                principal_payment: Money::ZERO,
                first_month_payment: Money::ZERO,
                last_month_payment: Money::ZERO,
                average_payment: Money::ZERO,
                standard_payment: Money::ZERO,
                savings_vs_standard: Ratio::Undefined,
            },
        };

        AmortizationResult {
            rows: Vec::new(),
            yearly: Vec::new(),
            payment,
            monthly_escrow,
            total_monthly_cost: monthly_escrow,
            effective_monthly_cost: monthly_escrow,
            total_interest: Money::ZERO,
            capitalized_interest: Money::ZERO,
            total_principal: Money::ZERO,
            total_amount_paid: Money::ZERO,
            payoff_date: None,
            truncated: false,
            interest_to_principal_ratio: Ratio::Undefined,
            extra_payment_savings: None,
        }
    }
}

/// simple interest over the grace months, added to the principal
///
/// Returns the financed balance and the capitalized interest, or `None` when
/// either no longer fits in a decimal.
fn capitalize_grace_interest(principal: Money, monthly_rate: Rate, grace_months: u32) -> Option<(Money, Money)> {
    let capitalized = principal
        .checked_accrue(monthly_rate)?
        .checked_mul(Decimal::from(grace_months))?;
    Some((principal.checked_add(capitalized)?, capitalized))
}

fn equal_principal_plan(schedule: &Schedule, principal_payment: Money, standard_payment: Money) -> PaymentPlan {
    let first_month_payment = schedule
        .rows
        .first()
        .map(|r| r.scheduled_payment)
        .unwrap_or(Money::ZERO);
    let last_month_payment = schedule
        .rows
        .last()
        .map(|r| r.scheduled_payment)
        .unwrap_or(Money::ZERO);
    let average_payment = match schedule.periods() {
        0 => Money::ZERO,
        n => schedule.total_paid() / Decimal::from(n),
    };

    PaymentPlan::EqualPrincipal {
        principal_payment,
        first_month_payment,
        last_month_payment,
        average_payment,
        standard_payment,
        savings_vs_standard: Ratio::percent(
            (standard_payment - average_payment).as_decimal(),
            standard_payment.as_decimal(),
        ),
    }
}

/// compute with default engine settings
pub fn compute_schedule(params: &LoanParameters, time_provider: &SafeTimeProvider) -> AmortizationResult {
    AmortizationEngine::default().compute(params, time_provider)
}
