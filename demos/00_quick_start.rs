/// quick start - a 30 year mortgage and its yearly summary
use loan_amortization_rs::chrono::NaiveDate;
use loan_amortization_rs::{
    compute_schedule, Decimal, LoanParameters, Money, PaymentPlan, Rate, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    let params = LoanParameters::new(Money::from_major(200_000), Rate::from_percentage(Decimal::new(65, 1)), 30)
        .with_escrow(Money::from_major(2_400), Money::from_major(1_200))
        .with_start_date(NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("invalid date")?);
    params.validate()?;

    let result = compute_schedule(&params, &time);

    if let PaymentPlan::Fixed { monthly_payment } = &result.payment {
        println!("principal & interest: {}", monthly_payment.to_fixed(2));
    }
    println!("with taxes & insurance: {}", result.total_monthly_cost.to_fixed(2));
    println!("total interest:         {}", result.total_interest.to_fixed(2));
    if let Some(payoff) = result.payoff_date {
        println!("payoff date:            {}", payoff);
    }

    for year in result.yearly.iter().take(5) {
        println!(
            "{}  principal {:>10}  interest {:>10}  balance {:>12}",
            year.year,
            year.principal_paid.to_fixed(2),
            year.interest_paid.to_fixed(2),
            year.ending_balance.to_fixed(2),
        );
    }

    Ok(())
}
