/// csv export - equal principal schedule with translated headers
use loan_amortization_rs::{
    CalculatorConfig, DelimitedExporter, Decimal, Money, MonthlyColumn, SafeTimeProvider, ScheduleView,
    TimeSource, compute_schedule,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);

    let params = CalculatorConfig::equal_principal(Money::from_major(50_000), Decimal::new(45, 1), 5)
        .to_parameters()?;
    let result = compute_schedule(&params, &time);

    // yearly view with the default english headers
    print!("{}", DelimitedExporter::new().format_result(&result, ScheduleView::Yearly)?);

    // monthly view for a spanish spreadsheet
    let monthly = DelimitedExporter::new()
        .delimiter(b';')
        .headers(["Número de Pago", "Fecha", "Pago", "Principal", "Intereses", "Saldo"])
        .format(&result.rows, &MonthlyColumn::ALL)?;
    print!("{}", monthly);

    Ok(())
}
