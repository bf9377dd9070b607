//! Loan data structures

use serde::{Deserialize, Serialize};

use crate::error::{DebtError, Result};

fn default_currency() -> String {
    "USD".to_string()
}

/// Category of a loan (informational only, never used in payoff math)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    Mortgage,
    Personal,
    Auto,
    Student,
    CreditCard,
    Other,
}

impl LoanType {
    /// Parse the storage label (`credit_card`, `Credit Card`, ...)
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "mortgage" => Some(LoanType::Mortgage),
            "personal" => Some(LoanType::Personal),
            "auto" => Some(LoanType::Auto),
            "student" => Some(LoanType::Student),
            "credit_card" => Some(LoanType::CreditCard),
            "other" => Some(LoanType::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Mortgage => "mortgage",
            LoanType::Personal => "personal",
            LoanType::Auto => "auto",
            LoanType::Student => "student",
            LoanType::CreditCard => "credit_card",
            LoanType::Other => "other",
        }
    }
}

/// A single loan as stored by the collaborator layer
///
/// Immutable for the duration of a simulation run; the engine projects it
/// into a mutable `LoanState` per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier within a run
    pub id: String,

    /// Display name
    pub name: String,

    /// Loan category
    pub loan_type: LoanType,

    /// Principal outstanding at simulation start
    pub current_balance: f64,

    /// Annual percentage rate (3.25 means 3.25%)
    pub interest_rate: f64,

    /// Fixed minimum required monthly payment
    pub monthly_payment: f64,

    /// Fixed per-period fee, reported but never applied to the balance
    #[serde(default)]
    pub fees: f64,

    /// Contractual duration in months
    pub term_months: u32,

    /// Display color
    #[serde(default)]
    pub color: String,

    /// Currency code
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Loan {
    /// Create a loan with no fees and default display metadata
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        loan_type: LoanType,
        current_balance: f64,
        interest_rate: f64,
        monthly_payment: f64,
        term_months: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            loan_type,
            current_balance,
            interest_rate,
            monthly_payment,
            fees: 0.0,
            term_months,
            color: String::new(),
            currency: default_currency(),
        }
    }

    /// Set the per-period fee
    pub fn with_fees(mut self, fees: f64) -> Self {
        self.fees = fees;
        self
    }

    /// Monthly periodic rate as a decimal (annual % / 100 / 12)
    pub fn monthly_rate(&self) -> f64 {
        self.interest_rate / 100.0 / 12.0
    }

    /// Interest charged for one month on the given balance
    pub fn monthly_interest(&self, balance: f64) -> f64 {
        balance * self.monthly_rate()
    }

    /// Whether the minimum payment covers the first month's interest
    pub fn is_amortizing(&self) -> bool {
        self.monthly_payment > self.monthly_interest(self.current_balance)
    }

    /// Check field-level sanity before handing the loan to the engine
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(self.invalid("id", "must not be empty"));
        }

        let amounts = [
            ("current_balance", self.current_balance),
            ("interest_rate", self.interest_rate),
            ("monthly_payment", self.monthly_payment),
            ("fees", self.fees),
        ];
        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(self.invalid(field, "must be a finite number"));
            }
            if value < 0.0 {
                return Err(self.invalid(field, "must not be negative"));
            }
        }

        Ok(())
    }

    fn invalid(&self, field: &str, reason: &str) -> DebtError {
        DebtError::InvalidLoan {
            loan_id: self.id.clone(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Validate every loan and reject duplicate ids
pub fn validate_loans(loans: &[Loan]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for loan in loans {
        loan.validate()?;
        if !seen.insert(loan.id.as_str()) {
            return Err(DebtError::DuplicateLoanId(loan.id.clone()));
        }
    }
    Ok(())
}
