//! Per-run mutable projection of a loan

use crate::loan::Loan;

/// State of one loan at a point in a simulation run
///
/// `current_balance` only ever decreases, and lands on exactly 0 when the
/// loan is paid off. `is_paid_off` never reverts.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanState {
    /// Outstanding principal
    pub current_balance: f64,

    /// Minimum payment due each month (starts at the loan's monthly payment)
    pub current_minimum_payment: f64,

    pub is_paid_off: bool,

    /// Month the loan was paid off (0 = before month 1)
    pub paid_off_month: Option<u32>,
}

/// Result of applying principal to a loan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedPayment {
    /// Principal actually taken off the balance
    pub principal: f64,

    /// Whether this payment paid the loan off
    pub paid_off: bool,
}

impl AppliedPayment {
    const NONE: Self = Self {
        principal: 0.0,
        paid_off: false,
    };
}

impl LoanState {
    /// Initialize state at simulation start; a loan starting at or below the
    /// threshold is paid off before month 1
    pub fn from_loan(loan: &Loan, threshold: f64) -> Self {
        let balance = loan.current_balance.max(0.0);
        let paid = balance <= threshold;
        Self {
            current_balance: if paid { 0.0 } else { balance },
            current_minimum_payment: loan.monthly_payment,
            is_paid_off: paid,
            paid_off_month: if paid { Some(0) } else { None },
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_paid_off
    }

    /// Reduce the balance by up to `amount`
    ///
    /// If what is left falls to the threshold or below, the residue is
    /// folded into this payment and the loan is marked paid off in `month`.
    pub fn apply_principal(&mut self, amount: f64, threshold: f64, month: u32) -> AppliedPayment {
        if self.is_paid_off || !(amount > 0.0) {
            return AppliedPayment::NONE;
        }

        let mut principal = amount.min(self.current_balance);
        self.current_balance -= principal;

        if self.current_balance <= threshold {
            principal += self.current_balance;
            self.current_balance = 0.0;
            self.is_paid_off = true;
            self.paid_off_month = Some(month);
            return AppliedPayment {
                principal,
                paid_off: true,
            };
        }

        AppliedPayment {
            principal,
            paid_off: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanType;
    use approx::assert_abs_diff_eq;

    fn loan(balance: f64) -> Loan {
        Loan::new("l", "Loan", LoanType::Other, balance, 5.0, 100.0, 12)
    }

    #[test]
    fn test_from_loan() {
        let state = LoanState::from_loan(&loan(1_000.0), 0.01);
        assert!(state.is_active());
        assert_eq!(state.current_minimum_payment, 100.0);
        assert_eq!(state.paid_off_month, None);

        let settled = LoanState::from_loan(&loan(0.005), 0.01);
        assert!(settled.is_paid_off);
        assert_eq!(settled.current_balance, 0.0);
        assert_eq!(settled.paid_off_month, Some(0));
    }

    #[test]
    fn test_apply_principal_partial() {
        let mut state = LoanState::from_loan(&loan(1_000.0), 0.01);
        let applied = state.apply_principal(250.0, 0.01, 1);
        assert_eq!(applied.principal, 250.0);
        assert!(!applied.paid_off);
        assert_eq!(state.current_balance, 750.0);
    }

    #[test]
    fn test_apply_principal_caps_at_balance() {
        let mut state = LoanState::from_loan(&loan(1_000.0), 0.01);
        let applied = state.apply_principal(5_000.0, 0.01, 3);
        assert_eq!(applied.principal, 1_000.0);
        assert!(applied.paid_off);
        assert_eq!(state.current_balance, 0.0);
        assert_eq!(state.paid_off_month, Some(3));
    }

    #[test]
    fn test_residue_folded_into_payoff() {
        let mut state = LoanState::from_loan(&loan(100.0), 0.01);
        let applied = state.apply_principal(99.995, 0.01, 2);
        assert!(applied.paid_off);
        assert_abs_diff_eq!(applied.principal, 100.0, epsilon = 1e-9);
        assert_eq!(state.current_balance, 0.0);
    }

    #[test]
    fn test_paid_off_is_terminal() {
        let mut state = LoanState::from_loan(&loan(100.0), 0.01);
        state.apply_principal(100.0, 0.01, 1);
        let again = state.apply_principal(50.0, 0.01, 2);
        assert_eq!(again, AppliedPayment::NONE);
        assert_eq!(state.paid_off_month, Some(1));
    }

    #[test]
    fn test_non_positive_amount_is_ignored() {
        let mut state = LoanState::from_loan(&loan(100.0), 0.01);
        assert_eq!(state.apply_principal(-20.0, 0.01, 1), AppliedPayment::NONE);
        assert_eq!(state.apply_principal(f64::NAN, 0.01, 1), AppliedPayment::NONE);
        assert_eq!(state.current_balance, 100.0);
    }
}
