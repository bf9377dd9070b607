//! Output structures for single-loan schedules

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar date of a 1-indexed simulation month
pub fn month_date(start_date: NaiveDate, month: u32) -> NaiveDate {
    start_date
        .checked_add_months(Months::new(month.saturating_sub(1)))
        .unwrap_or(NaiveDate::MAX)
}

/// One month of a single loan's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleItem {
    /// Sequential month (1-indexed)
    pub month: u32,

    /// Calendar month: start date plus `month - 1` months
    pub date: NaiveDate,

    /// Total paid this month (interest + principal, fees excluded)
    pub monthly_payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub fees: f64,
    pub extra_payment: f64,
    pub remaining_balance: f64,
    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
}

/// Complete schedule for one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub loan_id: String,

    /// Balance after the lump sum, before month 1
    pub opening_balance: f64,

    /// Lump sum actually applied (clamped to the balance)
    pub lump_sum_applied: f64,

    pub items: Vec<PaymentScheduleItem>,

    /// False when the iteration ceiling was reached with balance still owing
    pub fully_amortized: bool,
}

impl AmortizationSchedule {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Month in which the balance reached zero, if it did
    pub fn payoff_month(&self) -> Option<u32> {
        if self.fully_amortized {
            Some(self.items.last().map(|item| item.month).unwrap_or(0))
        } else {
            None
        }
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        if self.fully_amortized {
            self.items.last().map(|item| item.date)
        } else {
            None
        }
    }

    pub fn total_interest(&self) -> f64 {
        self.items.last().map(|item| item.cumulative_interest).unwrap_or(0.0)
    }

    pub fn summary(&self) -> AmortizationSummary {
        let total_principal = self.items.last().map(|r| r.cumulative_principal).unwrap_or(0.0);
        let total_interest = self.total_interest();
        let total_fees: f64 = self.items.iter().map(|r| r.fees).sum();
        let total_extra: f64 = self.items.iter().map(|r| r.extra_payment).sum();
        let final_balance = self
            .items
            .last()
            .map(|r| r.remaining_balance)
            .unwrap_or(self.opening_balance);

        AmortizationSummary {
            total_months: self.items.len() as u32,
            total_interest,
            total_principal,
            total_fees,
            total_extra,
            total_paid: total_interest + total_principal + total_fees,
            final_balance,
            fully_amortized: self.fully_amortized,
        }
    }
}

/// Summary statistics for one loan's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub total_months: u32,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_fees: f64,
    pub total_extra: f64,
    pub total_paid: f64,
    pub final_balance: f64,
    pub fully_amortized: bool,
}
