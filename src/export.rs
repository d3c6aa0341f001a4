use serde::{Deserialize, Serialize};

use crate::engine::AmortizationResult;
use crate::errors::{AmortizationError, Result};
use crate::types::{PaymentRow, YearSummary};

/// a column that can appear in an export
pub trait ExportColumn: Copy {
    fn header(&self) -> &'static str;
}

/// a record that can render any of its columns as text
pub trait ExportRecord {
    type Column: ExportColumn;

    fn field(&self, column: Self::Column) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthlyColumn {
    PaymentNumber,
    Date,
    Payment,
    Principal,
    Interest,
    Balance,
}

impl MonthlyColumn {
    pub const ALL: [MonthlyColumn; 6] = [
        MonthlyColumn::PaymentNumber,
        MonthlyColumn::Date,
        MonthlyColumn::Payment,
        MonthlyColumn::Principal,
        MonthlyColumn::Interest,
        MonthlyColumn::Balance,
    ];
}

impl ExportColumn for MonthlyColumn {
    fn header(&self) -> &'static str {
        match self {
            MonthlyColumn::PaymentNumber => "Payment Number",
            MonthlyColumn::Date => "Date",
            MonthlyColumn::Payment => "Payment",
            MonthlyColumn::Principal => "Principal",
            MonthlyColumn::Interest => "Interest",
            MonthlyColumn::Balance => "Balance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearlyColumn {
    Year,
    Payments,
    PrincipalPaid,
    InterestPaid,
    EndingBalance,
}

impl YearlyColumn {
    pub const ALL: [YearlyColumn; 5] = [
        YearlyColumn::Year,
        YearlyColumn::Payments,
        YearlyColumn::PrincipalPaid,
        YearlyColumn::InterestPaid,
        YearlyColumn::EndingBalance,
    ];
}

impl ExportColumn for YearlyColumn {
    fn header(&self) -> &'static str {
        match self {
            YearlyColumn::Year => "Year",
            YearlyColumn::Payments => "Payments",
            YearlyColumn::PrincipalPaid => "Principal Paid",
            YearlyColumn::InterestPaid => "Interest Paid",
            YearlyColumn::EndingBalance => "Ending Balance",
        }
    }
}

impl ExportRecord for PaymentRow {
    type Column = MonthlyColumn;

    fn field(&self, column: MonthlyColumn) -> String {
        match column {
            MonthlyColumn::PaymentNumber => self.payment_number.to_string(),
            MonthlyColumn::Date => self.payment_date.format("%Y-%m-%d").to_string(),
            MonthlyColumn::Payment => self.scheduled_payment.to_fixed(2),
            MonthlyColumn::Principal => self.principal_portion.to_fixed(2),
            MonthlyColumn::Interest => self.interest_portion.to_fixed(2),
            MonthlyColumn::Balance => self.ending_balance.to_fixed(2),
        }
    }
}

impl ExportRecord for YearSummary {
    type Column = YearlyColumn;

    fn field(&self, column: YearlyColumn) -> String {
        match column {
            YearlyColumn::Year => self.year.to_string(),
            YearlyColumn::Payments => self.total_payments.to_fixed(2),
            YearlyColumn::PrincipalPaid => self.principal_paid.to_fixed(2),
            YearlyColumn::InterestPaid => self.interest_paid.to_fixed(2),
            YearlyColumn::EndingBalance => self.ending_balance.to_fixed(2),
        }
    }
}

/// which table of a result to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScheduleView {
    #[default]
    Yearly,
    Monthly,
}

/// delimited text writer for schedule rows and yearly summaries
///
/// Numbers are written with two decimals and dates as `YYYY-MM-DD`. Header
/// labels default to English and can be replaced with translated ones.
#[derive(Debug, Clone)]
pub struct DelimitedExporter {
    delimiter: u8,
    headers: Option<Vec<String>>,
}

impl Default for DelimitedExporter {
    fn default() -> Self {
        Self {
            delimiter: b',',
            headers: None,
        }
    }
}

impl DelimitedExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// replace the default header labels, one per column
    pub fn headers<S: Into<String>>(mut self, headers: impl IntoIterator<Item = S>) -> Self {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    pub fn format<R: ExportRecord>(&self, records: &[R], columns: &[R::Column]) -> Result<String> {
        if columns.is_empty() {
            return Err(AmortizationError::EmptyColumnOrder);
        }

        let headers: Vec<String> = match &self.headers {
            Some(custom) if custom.len() != columns.len() => {
                return Err(AmortizationError::HeaderMismatch {
                    expected: columns.len(),
                    provided: custom.len(),
                });
            }
            Some(custom) => custom.clone(),
            None => columns.iter().map(|c| c.header().to_string()).collect(),
        };

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        wtr.write_record(&headers)?;
        for record in records {
            wtr.write_record(columns.iter().map(|c| record.field(*c)))?;
        }

        let bytes = wtr.into_inner().map_err(|e| AmortizationError::Export {
            message: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| AmortizationError::Export {
            message: e.to_string(),
        })
    }

    /// export one view of a computed result with the default column order
    pub fn format_result(&self, result: &AmortizationResult, view: ScheduleView) -> Result<String> {
        match view {
            ScheduleView::Yearly => self.format(&result.yearly, &YearlyColumn::ALL),
            ScheduleView::Monthly => self.format(&result.rows, &MonthlyColumn::ALL),
        }
    }
}

/// comma separated export with default headers
pub fn format_as_delimited_text<R: ExportRecord>(records: &[R], columns: &[R::Column]) -> Result<String> {
    DelimitedExporter::default().format(records, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn rows() -> Vec<PaymentRow> {
        vec![
            PaymentRow {
                payment_number: 1,
                payment_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                scheduled_payment: Money::from_decimal(dec!(1264.136047)),
                principal_portion: Money::from_decimal(dec!(180.802714)),
                interest_portion: Money::from_decimal(dec!(1083.333333)),
                ending_balance: Money::from_decimal(dec!(199819.197286)),
            },
            PaymentRow {
                payment_number: 2,
                payment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                scheduled_payment: Money::from_decimal(dec!(1264.136047)),
                principal_portion: Money::from_decimal(dec!(181.782062)),
                interest_portion: Money::from_decimal(dec!(1082.353985)),
                ending_balance: Money::from_decimal(dec!(199637.415224)),
            },
        ]
    }

    #[test]
    fn test_monthly_export() {
        let text = format_as_delimited_text(&rows(), &MonthlyColumn::ALL).unwrap();

        assert_eq!(
            text,
            "Payment Number,Date,Payment,Principal,Interest,Balance\n\
             1,2024-02-01,1264.14,180.80,1083.33,199819.20\n\
             2,2024-03-01,1264.14,181.78,1082.35,199637.42\n"
        );
    }

    #[test]
    fn test_yearly_export_with_column_subset() {
        let summary = YearSummary {
            year: 2024,
            total_payments: Money::from_major(13_905),
            principal_paid: Money::from_decimal(dec!(2125.5)),
            interest_paid: Money::from_decimal(dec!(11779.5)),
            ending_balance: Money::from_decimal(dec!(197874.5)),
        };

        let text = format_as_delimited_text(
            &[summary],
            &[YearlyColumn::Year, YearlyColumn::EndingBalance],
        )
        .unwrap();

        assert_eq!(text, "Year,Ending Balance\n2024,197874.50\n");
    }

    #[test]
    fn test_empty_records_write_header_only() {
        let text = format_as_delimited_text::<YearSummary>(&[], &YearlyColumn::ALL).unwrap();
        assert_eq!(text, "Year,Payments,Principal Paid,Interest Paid,Ending Balance\n");
    }

    #[test]
    fn test_empty_column_order_rejected() {
        let err = format_as_delimited_text(&rows(), &[]).unwrap_err();
        assert_eq!(err, AmortizationError::EmptyColumnOrder);
    }

    #[test]
    fn test_translated_headers_and_delimiter() {
        let text = DelimitedExporter::new()
            .delimiter(b';')
            .headers(["Zahlungsnummer", "Datum", "Saldo"])
            .format(
                &rows()[..1],
                &[MonthlyColumn::PaymentNumber, MonthlyColumn::Date, MonthlyColumn::Balance],
            )
            .unwrap();

        assert_eq!(text, "Zahlungsnummer;Datum;Saldo\n1;2024-02-01;199819.20\n");
    }

    #[test]
    fn test_header_count_mismatch() {
        let err = DelimitedExporter::new()
            .headers(["Year"])
            .format::<YearSummary>(&[], &YearlyColumn::ALL)
            .unwrap_err();

        assert_eq!(err, AmortizationError::HeaderMismatch { expected: 5, provided: 1 });
    }

    #[test]
    fn test_header_with_delimiter_is_quoted() {
        let text = DelimitedExporter::new()
            .headers(["Año, calendario"])
            .format::<YearSummary>(&[], &[YearlyColumn::Year])
            .unwrap();

        assert_eq!(text, "\"Año, calendario\"\n");
    }

    #[test]
    fn test_format_result_views() {
        use crate::decimal::Rate;
        use crate::engine::compute_schedule;
        use crate::types::LoanParameters;
        use chrono::{TimeZone, Utc};
        use hourglass_rs::{SafeTimeProvider, TimeSource};

        let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let params = LoanParameters::new(Money::from_major(12_000), Rate::ZERO, 1)
            .with_start_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let result = compute_schedule(&params, &time);
        let exporter = DelimitedExporter::new();

        let yearly = exporter.format_result(&result, ScheduleView::Yearly).unwrap();
        assert_eq!(
            yearly,
            "Year,Payments,Principal Paid,Interest Paid,Ending Balance\n\
             2024,6000.00,6000.00,0.00,6000.00\n\
             2025,6000.00,6000.00,0.00,0.00\n"
        );

        let monthly = exporter.format_result(&result, ScheduleView::Monthly).unwrap();
        assert_eq!(monthly.lines().count(), 13);
        assert_eq!(monthly.lines().nth(12), Some("12,2025-06-01,1000.00,1000.00,0.00,0.00"));
    }
}
