use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{AmortizationError, Result};

/// amortization method for the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AmortizationMethod {
    /// equal payment amounts throughout term (annuity)
    #[default]
    FixedPayment,
    /// constant principal, interest on remaining balance
    EqualPrincipal,
}

/// inputs for a single amortization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_years: u32,
    #[serde(default)]
    pub method: AmortizationMethod,
    #[serde(default)]
    pub extra_monthly_payment: Money,
    #[serde(default)]
    pub property_tax_annual: Money,
    #[serde(default)]
    pub insurance_annual: Money,
    /// leading months with no payment; their interest is capitalized
    #[serde(default)]
    pub grace_months: u32,
    /// first payment falls one month after this date; `None` means today
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl LoanParameters {
    /// fixed-payment loan with no extras
    pub fn new(principal: Money, annual_rate: Rate, term_years: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_years,
            method: AmortizationMethod::FixedPayment,
            extra_monthly_payment: Money::ZERO,
            property_tax_annual: Money::ZERO,
            insurance_annual: Money::ZERO,
            grace_months: 0,
            start_date: None,
        }
    }

    pub fn with_method(mut self, method: AmortizationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_extra_payment(mut self, extra: Money) -> Self {
        self.extra_monthly_payment = extra;
        self
    }

    pub fn with_escrow(mut self, property_tax_annual: Money, insurance_annual: Money) -> Self {
        self.property_tax_annual = property_tax_annual;
        self.insurance_annual = insurance_annual;
        self
    }

    pub fn with_grace_period(mut self, months: u32) -> Self {
        self.grace_months = months;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn term_months(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    /// months in which payments are due, after any grace period
    pub fn repayment_months(&self) -> u32 {
        self.term_months().saturating_sub(self.grace_months)
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate.monthly_rate()
    }

    /// property tax plus insurance, per month
    pub fn monthly_escrow(&self) -> Money {
        (self.property_tax_annual + self.insurance_annual) / Decimal::from(12)
    }

    /// true when a schedule can be produced at all
    pub fn is_amortizable(&self) -> bool {
        self.principal.is_positive() && self.repayment_months() > 0
    }

    /// check the caller-side preconditions; the engine never calls this itself
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(AmortizationError::InvalidParameters {
                message: format!("principal must be positive, got {}", self.principal),
            });
        }
        if self.term_years == 0 {
            return Err(AmortizationError::InvalidParameters {
                message: "term must be at least one year".to_string(),
            });
        }
        if self.annual_rate.is_negative() {
            return Err(AmortizationError::InvalidParameters {
                message: format!("interest rate cannot be negative, got {}", self.annual_rate),
            });
        }
        if self.grace_months >= self.term_months() {
            return Err(AmortizationError::InvalidParameters {
                message: format!(
                    "grace period of {} months leaves no repayment term",
                    self.grace_months
                ),
            });
        }
        for (name, amount) in [
            ("extra payment", self.extra_monthly_payment),
            ("property tax", self.property_tax_annual),
            ("insurance", self.insurance_annual),
        ] {
            if amount.is_negative() {
                return Err(AmortizationError::InvalidParameters {
                    message: format!("{} cannot be negative, got {}", name, amount),
                });
            }
        }
        Ok(())
    }
}

/// one scheduled payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRow {
    pub payment_number: u32,
    pub payment_date: NaiveDate,
    pub scheduled_payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
}

/// payments folded into one calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub total_payments: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn mortgage() -> LoanParameters {
        LoanParameters::new(
            Money::from_major(200_000),
            Rate::from_percentage(dec!(6.5)),
            30,
        )
    }

    #[test]
    fn test_defaults_and_derived_values() {
        let params = mortgage().with_escrow(Money::from_major(2_400), Money::from_major(1_200));

        assert_eq!(params.method, AmortizationMethod::FixedPayment);
        assert_eq!(params.term_months(), 360);
        assert_eq!(params.monthly_escrow(), Money::from_major(300));
        assert!(params.validate().is_ok());
    }

    #[rstest]
    #[case::zero_principal(Money::ZERO, dec!(6.5), 30)]
    #[case::negative_principal(Money::from_major(-1), dec!(6.5), 30)]
    #[case::zero_term(Money::from_major(1_000), dec!(6.5), 0)]
    #[case::negative_rate(Money::from_major(1_000), dec!(-1), 30)]
    fn test_invalid_parameters(#[case] principal: Money, #[case] rate: Decimal, #[case] years: u32) {
        let params = LoanParameters::new(principal, Rate::from_percentage(rate), years);
        assert!(matches!(
            params.validate(),
            Err(AmortizationError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_negative_extra_payment_rejected() {
        let params = mortgage().with_extra_payment(Money::from_major(-50));
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("extra payment"));
    }

    #[test]
    fn test_zero_rate_is_valid() {
        let params = LoanParameters::new(Money::from_major(12_000), Rate::ZERO, 1);
        assert!(params.validate().is_ok());
        assert!(params.is_amortizable());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let params: LoanParameters = serde_json::from_str(
            r#"{"principal":"100000","annual_rate":"0.06","term_years":30}"#,
        )
        .unwrap();

        assert_eq!(params.principal, Money::from_major(100_000));
        assert_eq!(params.extra_monthly_payment, Money::ZERO);
        assert_eq!(params.start_date, None);
        assert_eq!(params.grace_months, 0);
    }

    #[test]
    fn test_grace_period_shortens_repayment() {
        let params = LoanParameters::new(Money::from_major(50_000), Rate::from_percentage(dec!(5.5)), 10)
            .with_grace_period(6);

        assert_eq!(params.term_months(), 120);
        assert_eq!(params.repayment_months(), 114);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_grace_period_covering_whole_term_rejected() {
        let params = LoanParameters::new(Money::from_major(50_000), Rate::from_percentage(dec!(5.5)), 1)
            .with_grace_period(12);

        assert!(!params.is_amortizable());
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("grace period"));
    }
}
