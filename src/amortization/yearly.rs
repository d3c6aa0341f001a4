use chrono::Datelike;

use crate::types::{PaymentRow, YearSummary};

/// fold chronologically ordered rows into calendar-year buckets
pub fn aggregate_by_year(rows: &[PaymentRow]) -> Vec<YearSummary> {
    let mut summaries: Vec<YearSummary> = Vec::new();

    for row in rows {
        let year = row.payment_date.year();
        match summaries.last_mut() {
            Some(summary) if summary.year == year => {
                summary.total_payments += row.scheduled_payment;
                summary.principal_paid += row.principal_portion;
                summary.interest_paid += row.interest_portion;
                summary.ending_balance = row.ending_balance;
            }
            _ => summaries.push(YearSummary {
                year,
                total_payments: row.scheduled_payment,
                principal_paid: row.principal_portion,
                interest_paid: row.interest_portion,
                ending_balance: row.ending_balance,
            }),
        }
    }

    summaries
}
