//! CSV ingestion of expense rows.
//!
//! Expected header: `date,description,category,amount`, with dates as
//! `YYYY-MM-DD`. Parsing is all-or-nothing: the first bad row aborts the
//! import and reports its line number (the header is line 1).

use crate::core::errors::LedgerError;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct CsvExpenseRow {
    date: String,
    description: String,
    #[serde(default)]
    category: Option<String>,
    amount: String,
}

/// A parsed row, not yet validated against a group.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedExpense {
    pub line: u64,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub category: Option<String>,
    pub amount: f64,
}

pub fn parse_expenses<R: Read>(reader: R) -> Result<Vec<ImportedExpense>, LedgerError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut expenses = Vec::new();

    for (index, row) in csv_reader.deserialize::<CsvExpenseRow>().enumerate() {
        let line = index as u64 + 2;
        let row = row.map_err(|e| LedgerError::InvalidImportRow {
            line,
            reason: e.to_string(),
        })?;
        expenses.push(convert_row(row, line)?);
    }

    Ok(expenses)
}

fn convert_row(row: CsvExpenseRow, line: u64) -> Result<ImportedExpense, LedgerError> {
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| LedgerError::InvalidImportRow {
        line,
        reason: format!("invalid date '{}'", row.date),
    })?;
    let amount: f64 = row.amount.parse().map_err(|_| LedgerError::InvalidImportRow {
        line,
        reason: format!("invalid amount '{}'", row.amount),
    })?;
    let timestamp = date
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| LedgerError::InvalidImportRow {
            line,
            reason: format!("invalid date '{}'", row.date),
        })?;

    Ok(ImportedExpense {
        line,
        timestamp,
        description: row.description,
        category: row.category.filter(|c| !c.is_empty()),
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_order() {
        let data = "date,description,category,amount\n\
                    2024-03-01, Groceries ,food,42.50\n\
                    2024-03-02,Train tickets,,18\n";
        let expenses = parse_expenses(data.as_bytes()).unwrap();

        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].description, "Groceries");
        assert_eq!(expenses[0].category.as_deref(), Some("food"));
        assert_eq!(expenses[0].amount, 42.5);
        assert_eq!(expenses[1].category, None);
        assert_eq!(expenses[1].timestamp.to_rfc3339(), "2024-03-02T00:00:00+00:00");
    }

    #[test]
    fn reports_line_of_bad_amount() {
        let data = "date,description,category,amount\n\
                    2024-03-01,Groceries,food,42.50\n\
                    2024-03-02,Taxi,travel,abc\n";
        let err = parse_expenses(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidImportRow { line: 3, .. }));
    }

    #[test]
    fn reports_line_of_bad_date() {
        let data = "date,description,category,amount\n03/01/2024,Groceries,food,1\n";
        let err = parse_expenses(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidImportRow { line: 2, .. }));
    }
}
