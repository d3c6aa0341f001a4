pub mod formula;
pub mod overpayment;
pub mod schedule;
pub mod yearly;

pub use formula::{
    annuity_payment, equal_principal_installment, equal_principal_payment, interest_only_quote,
    monthly_payment, InterestOnlyQuote,
};
pub use overpayment::{
    compare_with_extra_payment, ExtraPaymentComparator, PayoffComparison, PayoffSimulation,
};
pub use schedule::{generate_schedule, Installment, Schedule, ScheduleGenerator};
pub use yearly::aggregate_by_year;
