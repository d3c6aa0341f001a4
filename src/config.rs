use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{AmortizationError, Result};
use crate::types::{AmortizationMethod, LoanParameters};

/// numeric guards for the balance recurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// balances below this are treated as paid off
    pub balance_epsilon: Money,
    /// hard ceiling on generated periods (600 = 50 years of monthly payments)
    pub max_periods: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            balance_epsilon: Money::CENT,
            max_periods: 600,
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        if settings.max_periods == 0 {
            return Err(AmortizationError::InvalidConfiguration {
                message: "max_periods must be at least 1".to_string(),
            });
        }
        if settings.balance_epsilon.is_negative() {
            return Err(AmortizationError::InvalidConfiguration {
                message: format!("balance_epsilon cannot be negative, got {}", settings.balance_epsilon),
            });
        }
        Ok(settings)
    }
}

fn default_loan_amount() -> Money {
    Money::from_major(300_000)
}

fn default_rate_percent() -> Decimal {
    dec!(6.5)
}

fn default_term_years() -> u32 {
    30
}

fn default_student_loan_amount() -> Money {
    Money::from_major(50_000)
}

fn default_student_loan_rate() -> Decimal {
    dec!(5.5)
}

fn default_student_loan_years() -> u32 {
    10
}

fn default_grace_months() -> u32 {
    6
}

/// calculator inputs as submitted by each calculator form
///
/// Rates are entered as percentages (6.5 for 6.5%), tax and insurance as
/// annual amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorConfig {
    Mortgage {
        #[serde(default = "default_loan_amount")]
        loan_amount: Money,
        #[serde(default = "default_rate_percent")]
        interest_rate: Decimal,
        #[serde(default = "default_term_years")]
        term_years: u32,
        #[serde(default)]
        property_tax: Money,
        #[serde(default)]
        home_insurance: Money,
    },
    AdvancedLoan {
        loan_amount: Money,
        #[serde(default)]
        down_payment: Money,
        interest_rate: Decimal,
        term_years: u32,
        #[serde(default)]
        extra_payment: Money,
        #[serde(default)]
        property_tax: Money,
        #[serde(default)]
        home_insurance: Money,
    },
    EqualPrincipal {
        loan_amount: Money,
        interest_rate: Decimal,
        term_years: u32,
    },
    AmortizationSchedule {
        loan_amount: Money,
        interest_rate: Decimal,
        term_years: u32,
        #[serde(default)]
        start_date: Option<NaiveDate>,
    },
    /// repayment starts after a grace period whose interest is capitalized
    StudentLoan {
        #[serde(default = "default_student_loan_amount")]
        loan_amount: Money,
        #[serde(default = "default_student_loan_rate")]
        interest_rate: Decimal,
        #[serde(default = "default_student_loan_years")]
        term_years: u32,
        #[serde(default = "default_grace_months")]
        grace_months: u32,
    },
}

impl CalculatorConfig {
    /// create mortgage configuration
    pub fn mortgage(loan_amount: Money, interest_rate: Decimal, term_years: u32) -> Self {
        CalculatorConfig::Mortgage {
            loan_amount,
            interest_rate,
            term_years,
            property_tax: Money::ZERO,
            home_insurance: Money::ZERO,
        }
    }

    /// create equal principal configuration
    pub fn equal_principal(loan_amount: Money, interest_rate: Decimal, term_years: u32) -> Self {
        CalculatorConfig::EqualPrincipal {
            loan_amount,
            interest_rate,
            term_years,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// map the calculator inputs onto engine parameters
    pub fn to_parameters(&self) -> Result<LoanParameters> {
        let params = match self {
            CalculatorConfig::Mortgage {
                loan_amount,
                interest_rate,
                term_years,
                property_tax,
                home_insurance,
            } => LoanParameters::new(*loan_amount, Rate::from_percentage(*interest_rate), *term_years)
                .with_escrow(*property_tax, *home_insurance),
            CalculatorConfig::AdvancedLoan {
                loan_amount,
                down_payment,
                interest_rate,
                term_years,
                extra_payment,
                property_tax,
                home_insurance,
            } => {
                if down_payment >= loan_amount {
                    return Err(AmortizationError::InvalidConfiguration {
                        message: format!(
                            "down payment {} must be less than loan amount {}",
                            down_payment, loan_amount
                        ),
                    });
                }
                LoanParameters::new(
                    *loan_amount - *down_payment,
                    Rate::from_percentage(*interest_rate),
                    *term_years,
                )
                .with_extra_payment(*extra_payment)
                .with_escrow(*property_tax, *home_insurance)
            }
            CalculatorConfig::EqualPrincipal {
                loan_amount,
                interest_rate,
                term_years,
            } => LoanParameters::new(*loan_amount, Rate::from_percentage(*interest_rate), *term_years)
                .with_method(AmortizationMethod::EqualPrincipal),
            CalculatorConfig::AmortizationSchedule {
                loan_amount,
                interest_rate,
                term_years,
                start_date,
            } => {
                let mut params =
                    LoanParameters::new(*loan_amount, Rate::from_percentage(*interest_rate), *term_years);
                params.start_date = *start_date;
                params
            }
            CalculatorConfig::StudentLoan {
                loan_amount,
                interest_rate,
                term_years,
                grace_months,
            } => LoanParameters::new(*loan_amount, Rate::from_percentage(*interest_rate), *term_years)
                .with_grace_period(*grace_months),
        };

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.balance_epsilon, Money::CENT);
        assert_eq!(settings.max_periods, 600);
    }

    #[test]
    fn test_settings_from_partial_json() {
        let settings = EngineSettings::from_json(r#"{"max_periods": 480}"#).unwrap();
        assert_eq!(settings.max_periods, 480);
        assert_eq!(settings.balance_epsilon, Money::CENT);
    }

    #[test]
    fn test_settings_reject_zero_ceiling() {
        assert!(matches!(
            EngineSettings::from_json(r#"{"max_periods": 0}"#),
            Err(AmortizationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_mortgage_defaults_from_empty_form() {
        let config = CalculatorConfig::from_json(r#"{"calculator":"mortgage"}"#).unwrap();
        let params = config.to_parameters().unwrap();

        assert_eq!(params.principal, Money::from_major(300_000));
        assert_eq!(params.annual_rate, Rate::from_percentage(dec!(6.5)));
        assert_eq!(params.term_years, 30);
        assert_eq!(params.method, AmortizationMethod::FixedPayment);
    }

    #[test]
    fn test_advanced_loan_subtracts_down_payment() {
        let config = CalculatorConfig::from_json(
            r#"{
                "calculator": "advanced_loan",
                "loan_amount": "350000",
                "down_payment": "50000",
                "interest_rate": "7",
                "term_years": 30,
                "extra_payment": "150",
                "property_tax": "3600",
                "home_insurance": "1200"
            }"#,
        )
        .unwrap();
        let params = config.to_parameters().unwrap();

        assert_eq!(params.principal, Money::from_major(300_000));
        assert_eq!(params.extra_monthly_payment, Money::from_major(150));
        assert_eq!(params.monthly_escrow(), Money::from_major(400));
    }

    #[test]
    fn test_advanced_loan_rejects_down_payment_over_amount() {
        let config = CalculatorConfig::AdvancedLoan {
            loan_amount: Money::from_major(100_000),
            down_payment: Money::from_major(100_000),
            interest_rate: dec!(5),
            term_years: 15,
            extra_payment: Money::ZERO,
            property_tax: Money::ZERO,
            home_insurance: Money::ZERO,
        };

        assert!(matches!(
            config.to_parameters(),
            Err(AmortizationError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_equal_principal_method() {
        let params = CalculatorConfig::equal_principal(Money::from_major(200_000), dec!(6.5), 30)
            .to_parameters()
            .unwrap();
        assert_eq!(params.method, AmortizationMethod::EqualPrincipal);
    }

    #[test]
    fn test_schedule_start_date() {
        let config = CalculatorConfig::from_json(
            r#"{"calculator":"amortization_schedule","loan_amount":"250000","interest_rate":"5.5","term_years":20,"start_date":"2025-03-01"}"#,
        )
        .unwrap();
        let params = config.to_parameters().unwrap();

        assert_eq!(params.start_date, NaiveDate::from_ymd_opt(2025, 3, 1));
    }

    #[test]
    fn test_student_loan_defaults() {
        let params = CalculatorConfig::from_json(r#"{"calculator":"student_loan"}"#)
            .unwrap()
            .to_parameters()
            .unwrap();

        assert_eq!(params.principal, Money::from_major(50_000));
        assert_eq!(params.annual_rate, Rate::from_percentage(dec!(5.5)));
        assert_eq!(params.grace_months, 6);
        assert_eq!(params.repayment_months(), 114);
    }

    #[test]
    fn test_student_loan_grace_longer_than_term() {
        let config = CalculatorConfig::from_json(
            r#"{"calculator":"student_loan","term_years":1,"grace_months":18}"#,
        )
        .unwrap();

        assert!(matches!(
            config.to_parameters(),
            Err(AmortizationError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_invalid_inputs_surface_as_errors() {
        let zero_term = CalculatorConfig::mortgage(Money::from_major(100_000), dec!(5), 0);
        assert!(matches!(
            zero_term.to_parameters(),
            Err(AmortizationError::InvalidParameters { .. })
        ));

        assert!(matches!(
            CalculatorConfig::from_json(r#"{"calculator":"unknown"}"#),
            Err(AmortizationError::InvalidConfiguration { .. })
        ));
    }
}
