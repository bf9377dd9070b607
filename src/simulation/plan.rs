//! Cross-loan monthly output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::loan::Loan;

/// One loan's payment in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPaymentPlan {
    pub loan_id: String,
    pub loan_name: String,

    /// Balance at the start of the month
    pub starting_balance: f64,

    /// Phase-1 payment (interest plus scheduled principal)
    pub minimum_payment: f64,

    /// Surplus directed at this loan in phase 2
    pub extra_payment: f64,

    pub interest: f64,

    /// Total principal, scheduled plus extra
    pub principal: f64,

    /// Fixed fee, reported only
    pub fees: f64,

    pub remaining_balance: f64,
    pub is_paid_off: bool,

    /// Paid off during this month
    pub paid_off_this_month: bool,

    /// Selected to receive surplus this month
    pub is_target: bool,
}

impl DebtPaymentPlan {
    /// Zero entry for a loan that is already paid off
    pub(crate) fn settled(loan: &Loan) -> Self {
        Self {
            loan_id: loan.id.clone(),
            loan_name: loan.name.clone(),
            starting_balance: 0.0,
            minimum_payment: 0.0,
            extra_payment: 0.0,
            interest: 0.0,
            principal: 0.0,
            fees: 0.0,
            remaining_balance: 0.0,
            is_paid_off: true,
            paid_off_this_month: false,
            is_target: false,
        }
    }

    /// Entry for a loan still owing at the start of the month
    pub(crate) fn open(loan: &Loan, starting_balance: f64) -> Self {
        Self {
            loan_id: loan.id.clone(),
            loan_name: loan.name.clone(),
            starting_balance,
            minimum_payment: 0.0,
            extra_payment: 0.0,
            interest: 0.0,
            principal: 0.0,
            fees: loan.fees,
            remaining_balance: starting_balance,
            is_paid_off: false,
            paid_off_this_month: false,
            is_target: false,
        }
    }

    pub fn total_payment(&self) -> f64 {
        self.minimum_payment + self.extra_payment
    }
}

/// All loans' payments in one month, with aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPaymentPlan {
    /// Sequential month (1-indexed)
    pub month: u32,
    pub date: NaiveDate,

    /// One entry per input loan, in input order
    pub payments: Vec<DebtPaymentPlan>,

    pub total_payment: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_fees: f64,
    pub total_remaining_balance: f64,

    /// Loans still owing at the end of the month
    pub remaining_debts: usize,

    /// Surplus available this month (base extra plus recirculated payments)
    pub extra_payment_pool: f64,

    /// Recirculated minimum payments included in the surplus
    pub freed_payment_pool: f64,

    /// Minimum payments released by loans paid off this month
    pub total_freed_payments: f64,

    /// Surplus that found no loan to pay
    pub unspent_surplus: f64,

    /// Loans owing at the start of the month
    pub active_loan_count: usize,
}

impl MonthlyPaymentPlan {
    pub(crate) fn new(month: u32, date: NaiveDate, loan_count: usize) -> Self {
        Self {
            month,
            date,
            payments: Vec::with_capacity(loan_count),
            total_payment: 0.0,
            total_interest: 0.0,
            total_principal: 0.0,
            total_fees: 0.0,
            total_remaining_balance: 0.0,
            remaining_debts: 0,
            extra_payment_pool: 0.0,
            freed_payment_pool: 0.0,
            total_freed_payments: 0.0,
            unspent_surplus: 0.0,
            active_loan_count: 0,
        }
    }

    /// Recompute the aggregates from the per-loan entries
    pub(crate) fn finalize_totals(&mut self) {
        self.total_payment = self.payments.iter().map(|p| p.total_payment()).sum();
        self.total_interest = self.payments.iter().map(|p| p.interest).sum();
        self.total_principal = self.payments.iter().map(|p| p.principal).sum();
        self.total_fees = self.payments.iter().map(|p| p.fees).sum();
        self.total_remaining_balance = self.payments.iter().map(|p| p.remaining_balance).sum();
        self.remaining_debts = self.payments.iter().filter(|p| !p.is_paid_off).count();
    }

    pub fn payment_for(&self, loan_id: &str) -> Option<&DebtPaymentPlan> {
        self.payments.iter().find(|p| p.loan_id == loan_id)
    }

    /// The loan that received surplus first this month, if any
    pub fn target(&self) -> Option<&DebtPaymentPlan> {
        self.payments.iter().find(|p| p.is_target)
    }
}

/// Month-by-month schedule for a complete run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub monthly_schedule: Vec<MonthlyPaymentPlan>,

    /// Every loan was paid off before the month ceiling
    pub completed: bool,
}

impl SimulationResult {
    pub fn total_months(&self) -> u32 {
        self.monthly_schedule.len() as u32
    }

    pub fn total_interest(&self) -> f64 {
        self.monthly_schedule.iter().map(|m| m.total_interest).sum()
    }

    /// Date of the last simulated month
    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.monthly_schedule.last().map(|m| m.date)
    }

    pub fn summary(&self) -> ScheduleSummary {
        let total_interest = self.total_interest();
        let total_principal: f64 = self.monthly_schedule.iter().map(|m| m.total_principal).sum();
        let total_fees: f64 = self.monthly_schedule.iter().map(|m| m.total_fees).sum();
        let total_extra: f64 = self
            .monthly_schedule
            .iter()
            .flat_map(|m| m.payments.iter())
            .map(|p| p.extra_payment)
            .sum();
        let final_balance = self
            .monthly_schedule
            .last()
            .map(|m| m.total_remaining_balance)
            .unwrap_or(0.0);

        ScheduleSummary {
            total_months: self.total_months(),
            total_interest,
            total_principal,
            total_fees,
            total_extra,
            total_paid: total_interest + total_principal + total_fees,
            final_balance,
            completed: self.completed,
        }
    }
}

/// Summary statistics for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_months: u32,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_fees: f64,
    pub total_extra: f64,
    pub total_paid: f64,
    pub final_balance: f64,
    pub completed: bool,
}
