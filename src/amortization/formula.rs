use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::ratio::Ratio;

/// (1 + r)^n, or `None` when the factor no longer fits in a decimal
pub fn compound_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    let base = Decimal::ONE + rate.as_decimal();
    let mut compound = Decimal::ONE;
    for _ in 0..periods {
        compound = compound.checked_mul(base)?;
    }
    Some(compound)
}

/// level payment that amortizes `principal` over `periods` at `periodic_rate`
///
/// P * r * (1 + r)^n / ((1 + r)^n - 1), straight-line when the rate is zero.
/// For factors too large to represent the payment converges to P * r.
pub fn annuity_payment(principal: Money, periodic_rate: Rate, periods: u32) -> Money {
    if periods == 0 {
        return principal;
    }

    if periodic_rate.is_zero() {
        return principal / Decimal::from(periods);
    }

    let interest_only = principal.accrue(periodic_rate);
    match compound_factor(periodic_rate, periods) {
        Some(compound) if compound != Decimal::ONE => {
            interest_only * (compound / (compound - Decimal::ONE))
        }
        _ => interest_only,
    }
}

/// monthly payment for a fully amortizing loan quoted in years
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_years: u32) -> Money {
    annuity_payment(
        principal,
        annual_rate.monthly_rate(),
        term_years.saturating_mul(12),
    )
}

/// constant principal portion for equal-principal amortization
pub fn equal_principal_payment(principal: Money, periods: u32) -> Money {
    if periods == 0 {
        return principal;
    }
    principal / Decimal::from(periods)
}

/// total installment in an equal-principal period: principal plus interest on the balance
pub fn equal_principal_installment(principal_payment: Money, balance: Money, monthly_rate: Rate) -> Money {
    principal_payment + balance.accrue(monthly_rate)
}

/// payment quote for an interest-only mortgage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestOnlyQuote {
    pub interest_only_months: u32,
    pub interest_only_payment: Money,
    /// principal and interest once amortization starts
    pub amortizing_payment: Money,
    pub monthly_escrow: Money,
    pub current_total_payment: Money,
    pub future_total_payment: Money,
    pub payment_increase: Money,
    /// increase relative to the current total payment
    pub increase_percent: Ratio,
}

/// quote the payment jump when an interest-only period ends
///
/// The full principal is amortized over the years left after the
/// interest-only period.
pub fn interest_only_quote(
    principal: Money,
    annual_rate: Rate,
    interest_only_years: u32,
    amortization_years: u32,
    monthly_escrow: Money,
) -> InterestOnlyQuote {
    let monthly_rate = annual_rate.monthly_rate();
    let interest_only_payment = principal.accrue(monthly_rate);
    let remaining_months = amortization_years
        .saturating_sub(interest_only_years)
        .saturating_mul(12);
    let amortizing_payment = annuity_payment(principal, monthly_rate, remaining_months);

    let current_total_payment = interest_only_payment + monthly_escrow;
    let future_total_payment = amortizing_payment + monthly_escrow;
    let payment_increase = future_total_payment - current_total_payment;

    InterestOnlyQuote {
        interest_only_months: interest_only_years.saturating_mul(12),
        interest_only_payment,
        amortizing_payment,
        monthly_escrow,
        current_total_payment,
        future_total_payment,
        payment_increase,
        increase_percent: Ratio::percent(
            payment_increase.as_decimal(),
            current_total_payment.as_decimal(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thirty_year_mortgage_payment() {
        let payment = monthly_payment(
            Money::from_major(200_000),
            Rate::from_percentage(dec!(6.5)),
            30,
        );

        assert_eq!(payment.round_dp(2), Money::from_decimal(dec!(1264.14)));
    }

    #[rstest]
    #[case(100_000, dec!(12), 1, dec!(8884.88))]
    #[case(100_000, dec!(6), 30, dec!(599.55))]
    #[case(12_000, dec!(0), 1, dec!(1000.00))]
    fn test_monthly_payment(
        #[case] principal: i64,
        #[case] rate: Decimal,
        #[case] years: u32,
        #[case] expected: Decimal,
    ) {
        let payment = monthly_payment(Money::from_major(principal), Rate::from_percentage(rate), years);
        assert_eq!(payment.round_dp(2).as_decimal(), expected);
    }

    #[test]
    fn test_zero_periods_returns_principal() {
        let principal = Money::from_major(5_000);
        assert_eq!(annuity_payment(principal, Rate::from_percentage(dec!(5)), 0), principal);
        assert_eq!(equal_principal_payment(principal, 0), principal);
    }

    #[test]
    fn test_huge_rate_converges_to_interest_only() {
        // 1200% a year overflows (1 + r)^n long before 360 periods
        let principal = Money::from_major(1_000);
        let monthly = Rate::from_percentage(dec!(1200)).monthly_rate();

        assert_eq!(compound_factor(monthly, 360), None);
        assert_eq!(annuity_payment(principal, monthly, 360), principal.accrue(monthly));
    }

    #[test]
    fn test_equal_principal_first_installment() {
        let principal = Money::from_major(200_000);
        let monthly = Rate::from_percentage(dec!(6.5)).monthly_rate();
        let principal_payment = equal_principal_payment(principal, 360);

        assert_eq!(principal_payment.round_dp(2).as_decimal(), dec!(555.56));

        let first = equal_principal_installment(principal_payment, principal, monthly);
        assert_eq!(first.round_dp(2).as_decimal(), dec!(1638.89));
    }

    #[test]
    fn test_interest_only_quote() {
        let quote = interest_only_quote(
            Money::from_major(300_000),
            Rate::from_percentage(dec!(6)),
            10,
            30,
            Money::from_major(400),
        );

        assert_eq!(quote.interest_only_months, 120);
        assert_eq!(quote.interest_only_payment, Money::from_major(1_500));
        assert_eq!(quote.current_total_payment, Money::from_major(1_900));
        // 300k over the remaining 20 years
        assert_eq!(quote.amortizing_payment.round_dp(2).as_decimal(), dec!(2149.29));
        assert!(quote.payment_increase.is_positive());
        assert!(quote.increase_percent.value().unwrap() > dec!(30));
    }

    #[test]
    fn test_interest_only_quote_with_no_escrow_and_zero_rate() {
        let quote = interest_only_quote(Money::from_major(120_000), Rate::ZERO, 5, 15, Money::ZERO);

        assert_eq!(quote.interest_only_payment, Money::ZERO);
        assert_eq!(quote.amortizing_payment, Money::from_major(1_000));
        assert_eq!(quote.increase_percent, Ratio::Undefined);
    }
}
