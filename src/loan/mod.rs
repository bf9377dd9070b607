//! Loan records supplied by the persistence layer, plus CSV loading

mod data;
pub mod loader;

pub use data::{validate_loans, Loan, LoanType};
pub use loader::{load_loans, load_loans_from_reader};
