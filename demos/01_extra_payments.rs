/// extra payments - how much an extra 200 a month saves
use loan_amortization_rs::{CalculatorConfig, SafeTimeProvider, TimeSource, AmortizationEngine, EngineSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    let config = CalculatorConfig::from_json(
        r#"{
            "calculator": "advanced_loan",
            "loan_amount": "120000",
            "down_payment": "20000",
            "interest_rate": "6",
            "term_years": 30,
            "extra_payment": "200"
        }"#,
    )?;
    let params = config.to_parameters()?;

    let engine = AmortizationEngine::new(EngineSettings::default());
    let result = engine.compute(&params, &time);

    if let Some(savings) = &result.extra_payment_savings {
        println!("paid off in {} instead of {} months", savings.accelerated_periods, savings.baseline_periods);
        println!("{} months ({} years) early", savings.months_saved, savings.years_saved);
        println!("interest saved: {}", savings.interest_saved.to_fixed(2));
    }

    Ok(())
}
