//! Single-loan amortization schedules under a fixed extra-payment policy

mod schedule;
mod calculator;

pub use schedule::{month_date, AmortizationSchedule, AmortizationSummary, PaymentScheduleItem};
pub use calculator::{
    generate_amortization_schedule, generate_amortization_schedule_with_threshold, schedule_ceiling,
};

/// Balance at or below which a loan counts as paid off (floating-point residue)
pub const PAID_OFF_THRESHOLD: f64 = 0.01;

/// Single-loan schedules stop after `term_months * AMORTIZATION_CEILING_FACTOR` months
pub const AMORTIZATION_CEILING_FACTOR: u32 = 3;
