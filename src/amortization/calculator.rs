//! Month-by-month amortization of a single loan

use chrono::NaiveDate;

use super::schedule::{month_date, AmortizationSchedule, PaymentScheduleItem};
use super::{AMORTIZATION_CEILING_FACTOR, PAID_OFF_THRESHOLD};
use crate::loan::Loan;

/// Iteration ceiling for a loan's schedule (never less than one month)
pub fn schedule_ceiling(loan: &Loan) -> u32 {
    loan.term_months
        .saturating_mul(AMORTIZATION_CEILING_FACTOR)
        .max(1)
}

/// Generate a loan's schedule with a constant monthly extra payment and an
/// optional lump sum applied before month 1
///
/// Principal each month is `payment - interest + extra`, clamped to
/// `[0, balance]`, so the balance never rises. The schedule ends in the
/// first month the balance drops to `PAID_OFF_THRESHOLD` or below, or at
/// `schedule_ceiling`, whichever comes first.
pub fn generate_amortization_schedule(
    loan: &Loan,
    extra_payment: f64,
    lump_sum: f64,
    start_date: NaiveDate,
) -> AmortizationSchedule {
    generate_amortization_schedule_with_threshold(
        loan,
        extra_payment,
        lump_sum,
        start_date,
        PAID_OFF_THRESHOLD,
    )
}

/// Same as `generate_amortization_schedule`, with the paid-off threshold
/// taken from the caller instead of `PAID_OFF_THRESHOLD`
pub fn generate_amortization_schedule_with_threshold(
    loan: &Loan,
    extra_payment: f64,
    lump_sum: f64,
    start_date: NaiveDate,
    paid_off_threshold: f64,
) -> AmortizationSchedule {
    let starting_balance = loan.current_balance.max(0.0);
    let lump_sum_applied = lump_sum.max(0.0).min(starting_balance);
    let opening_balance = starting_balance - lump_sum_applied;
    let extra_payment = extra_payment.max(0.0);

    let mut schedule = AmortizationSchedule {
        loan_id: loan.id.clone(),
        opening_balance,
        lump_sum_applied,
        items: Vec::new(),
        fully_amortized: true,
    };

    if opening_balance <= paid_off_threshold {
        return schedule;
    }

    let ceiling = schedule_ceiling(loan);
    let mut balance = opening_balance;
    let mut cumulative_interest = 0.0;
    let mut cumulative_principal = 0.0;

    for month in 1..=ceiling {
        let interest = loan.monthly_interest(balance);
        let scheduled = (loan.monthly_payment - interest).max(0.0).min(balance);
        let principal = (loan.monthly_payment - interest + extra_payment)
            .max(0.0)
            .min(balance);

        balance -= principal;
        cumulative_interest += interest;
        cumulative_principal += principal;

        schedule.items.push(PaymentScheduleItem {
            month,
            date: month_date(start_date, month),
            monthly_payment: interest + principal,
            principal,
            interest,
            fees: loan.fees,
            extra_payment: (principal - scheduled).max(0.0),
            remaining_balance: balance,
            cumulative_interest,
            cumulative_principal,
        });

        if balance <= paid_off_threshold {
            break;
        }
    }

    schedule.fully_amortized = balance <= paid_off_threshold;
    if !schedule.fully_amortized {
        log::warn!(
            "Loan {} did not fully amortize within {} months (remaining balance {:.2})",
            loan.id,
            ceiling,
            balance
        );
    }

    schedule
}
