//! Load loans from a CSV export of the loan store

use super::{Loan, LoanType};
use crate::error::{DebtError, Result};
use csv::{Reader, Trim};
use std::path::Path;

/// Raw CSV row; optional columns may be blank
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: String,
    name: String,
    loan_type: String,
    current_balance: f64,
    interest_rate: f64,
    monthly_payment: f64,
    #[serde(default)]
    fees: Option<f64>,
    term_months: u32,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

impl CsvRow {
    fn into_loan(self) -> Result<Loan> {
        let loan_type = LoanType::from_label(&self.loan_type).ok_or_else(|| {
            DebtError::InvalidLoan {
                loan_id: self.id.clone(),
                field: "loan_type".to_string(),
                reason: format!("unknown loan type '{}'", self.loan_type),
            }
        })?;

        let mut loan = Loan::new(
            self.id,
            self.name,
            loan_type,
            self.current_balance,
            self.interest_rate,
            self.monthly_payment,
            self.term_months,
        )
        .with_fees(self.fees.unwrap_or(0.0));

        if let Some(color) = self.color {
            loan.color = color;
        }
        if let Some(currency) = self.currency.filter(|c| !c.is_empty()) {
            loan.currency = currency;
        }

        Ok(loan)
    }
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<Loan>> {
    let file = std::fs::File::open(path)?;
    load_loans_from_reader(file)
}

/// Load loans from any reader (string buffer, request body, ...)
///
/// Every loan is validated and ids must be unique.
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Loan>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let loans = read_rows(&mut csv_reader)?;
    super::validate_loans(&loans)?;
    log::debug!("Loaded {} loans", loans.len());
    Ok(loans)
}

fn read_rows<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Vec<Loan>> {
    let mut loans = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        loans.push(row.into_loan()?);
    }
    Ok(loans)
}
