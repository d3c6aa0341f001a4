pub mod amortization;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod export;
pub mod ratio;
pub mod savings;
pub mod types;

// re-export key types
pub use amortization::{
    aggregate_by_year, compare_with_extra_payment, generate_schedule, monthly_payment,
    Installment, PayoffComparison, Schedule,
};
pub use config::{CalculatorConfig, EngineSettings};
pub use decimal::{Money, Rate};
pub use engine::{compute_schedule, AmortizationEngine, AmortizationResult, PaymentPlan};
pub use errors::{AmortizationError, Result};
pub use export::{format_as_delimited_text, DelimitedExporter, MonthlyColumn, ScheduleView, YearlyColumn};
pub use ratio::Ratio;
pub use savings::{GoalProgress, SavingsGoal};
pub use types::{AmortizationMethod, LoanParameters, PaymentRow, YearSummary};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
