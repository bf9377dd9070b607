//! Per-loan breakdown of a completed strategy schedule
//!
//! Each loan is compared against its own stand-alone amortization (minimum
//! payment, no extra, no lump sum), not against the multi-loan baseline.
//! Both sides use the run's paid-off threshold.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{generate_amortization_schedule_with_threshold, month_date};
use crate::loan::Loan;
use crate::simulation::{SimulationConfig, SimulationResult};

/// One loan's outcome under a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerLoanDetail {
    pub loan_id: String,
    pub loan_name: String,

    /// Interest paid on this loan under the strategy
    pub total_interest: f64,

    /// Interest the loan would pay on its own at the minimum payment
    pub baseline_total_interest: f64,

    pub interest_saved: f64,

    /// Length of the stand-alone minimum-payment schedule
    pub baseline_months: u32,

    /// Month the loan was paid off (0 = before month 1); the schedule length
    /// if it never was
    pub payoff_month: u32,

    pub months_saved: u32,
    pub payoff_date: Option<NaiveDate>,
    pub paid_off: bool,
}

/// Compute one `PerLoanDetail` per loan, in input order
///
/// `config` must be the configuration `result` was simulated with.
pub fn calculate_per_debt_details(
    loans: &[Loan],
    result: &SimulationResult,
    config: &SimulationConfig,
) -> Vec<PerLoanDetail> {
    let start_date = config.start_date;
    loans
        .iter()
        .enumerate()
        .map(|(index, loan)| {
            let total_interest: f64 = result
                .monthly_schedule
                .iter()
                .filter_map(|plan| plan.payments.get(index))
                .map(|entry| entry.interest)
                .sum();

            let (payoff_month, paid_off) = payoff_month(result, index);

            let baseline = generate_amortization_schedule_with_threshold(
                loan,
                0.0,
                0.0,
                start_date,
                config.paid_off_threshold,
            );
            let baseline_months = baseline.len() as u32;
            let baseline_total_interest = baseline.total_interest();

            PerLoanDetail {
                loan_id: loan.id.clone(),
                loan_name: loan.name.clone(),
                total_interest,
                baseline_total_interest,
                interest_saved: baseline_total_interest - total_interest,
                baseline_months,
                payoff_month,
                months_saved: baseline_months.saturating_sub(payoff_month),
                payoff_date: paid_off.then(|| month_date(start_date, payoff_month)),
                paid_off,
            }
        })
        .collect()
}

/// First month the loan shows as paid off
///
/// A loan that is already settled in month 1 was paid off before the
/// simulation started (month 0).
fn payoff_month(result: &SimulationResult, index: usize) -> (u32, bool) {
    if result.monthly_schedule.is_empty() {
        return (0, result.completed);
    }

    result
        .monthly_schedule
        .iter()
        .find_map(|plan| {
            let entry = plan.payments.get(index)?;
            if !entry.is_paid_off {
                return None;
            }
            let month = if entry.paid_off_this_month {
                plan.month
            } else {
                plan.month - 1
            };
            Some((month, true))
        })
        .unwrap_or((result.total_months(), false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanType;
    use crate::simulation::{SimulationEngine, StrategyKind};
    use approx::assert_abs_diff_eq;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn example_loans() -> Vec<Loan> {
        vec![
            Loan::new("mortgage", "Home", LoanType::Mortgage, 320_000.0, 3.25, 1_520.0, 360),
            Loan::new("auto", "Car", LoanType::Auto, 22_000.0, 4.5, 520.0, 48),
            Loan::new("personal", "Personal", LoanType::Personal, 12_000.0, 7.2, 450.0, 36),
        ]
    }

    fn config() -> SimulationConfig {
        SimulationConfig::new(start())
    }

    fn run(kind: StrategyKind, loans: &[Loan], extra: f64, lump: f64) -> SimulationResult {
        SimulationEngine::new(config()).run_strategy(kind, loans, extra, lump)
    }

    #[test]
    fn test_avalanche_details() {
        let loans = example_loans();
        let result = run(StrategyKind::AvalancheFixed, &loans, 500.0, 0.0);
        let details = calculate_per_debt_details(&loans, &result, &config());

        let ids: Vec<_> = details.iter().map(|d| d.loan_id.as_str()).collect();
        assert_eq!(ids, vec!["mortgage", "auto", "personal"]);

        let payoffs: Vec<_> = details.iter().map(|d| d.payoff_month).collect();
        assert_eq!(payoffs, vec![220, 30, 14]);

        let baseline_months: Vec<_> = details.iter().map(|d| d.baseline_months).collect();
        assert_eq!(baseline_months, vec![313, 47, 30]);

        let saved: Vec<_> = details.iter().map(|d| d.months_saved).collect();
        assert_eq!(saved, vec![93, 17, 16]);

        assert_abs_diff_eq!(details[0].baseline_total_interest, 154_532.76, epsilon = 0.01);
        assert_abs_diff_eq!(details[1].baseline_total_interest, 1_999.97, epsilon = 0.01);
        assert_abs_diff_eq!(details[2].baseline_total_interest, 1_115.86, epsilon = 0.01);

        for detail in &details {
            assert!(detail.paid_off);
            assert!(detail.interest_saved > 0.0);
        }
        assert_eq!(details[2].payoff_date, NaiveDate::from_ymd_opt(2026, 2, 1));
    }

    #[test]
    fn test_interest_sums_to_schedule_total() {
        let loans = example_loans();
        let result = run(StrategyKind::SnowballScrapes, &loans, 500.0, 0.0);
        let details = calculate_per_debt_details(&loans, &result, &config());

        let total: f64 = details.iter().map(|d| d.total_interest).sum();
        assert_abs_diff_eq!(total, result.total_interest(), epsilon = 1e-6);
    }

    #[test]
    fn test_lump_sum_payoff_is_month_zero() {
        let loans = vec![
            Loan::new("card", "Card", LoanType::CreditCard, 15_000.0, 18.0, 400.0, 60),
            Loan::new("store", "Store", LoanType::Other, 5_000.0, 3.0, 200.0, 30),
        ];
        let result = run(StrategyKind::SnowballScrapes, &loans, 0.0, 5_000.0);
        let details = calculate_per_debt_details(&loans, &result, &config());

        assert_eq!(details[1].payoff_month, 0);
        assert!(details[1].paid_off);
        assert_eq!(details[1].total_interest, 0.0);
        assert_eq!(details[1].months_saved, details[1].baseline_months);
        assert_eq!(details[1].payoff_date, Some(start()));
        assert_eq!(details[0].payoff_month, 32);
    }

    #[test]
    fn test_empty_schedule() {
        let loans = example_loans();
        let result = run(StrategyKind::AvalancheFixed, &loans, 0.0, 1_000_000.0);
        let details = calculate_per_debt_details(&loans, &result, &config());

        assert_eq!(details.len(), 3);
        assert!(details.iter().all(|d| d.paid_off && d.payoff_month == 0));
        assert!(details.iter().all(|d| d.total_interest == 0.0));
    }

    #[test]
    fn test_unpaid_loan_falls_back_to_schedule_length() {
        let loans = vec![Loan::new("stuck", "Stuck", LoanType::Other, 1_000.0, 5.0, 0.0, 12)];
        let config = config().with_max_months(24);
        let result = SimulationEngine::new(config.clone()).calculate_baseline(&loans);
        let details = calculate_per_debt_details(&loans, &result, &config);

        assert_eq!(details[0].payoff_month, 24);
        assert!(!details[0].paid_off);
        assert_eq!(details[0].payoff_date, None);
        // Stand-alone schedule also stalls, at 3x the 12-month term
        assert_eq!(details[0].baseline_months, 36);
        assert_eq!(details[0].months_saved, 12);
    }

    #[test]
    fn test_baseline_uses_configured_threshold() {
        let loans = vec![Loan::new("personal", "Personal", LoanType::Personal, 12_000.0, 7.2, 450.0, 36)];
        let mut config = config();
        config.paid_off_threshold = 1_000.0;

        let result = SimulationEngine::new(config.clone()).calculate_baseline(&loans);
        let details = calculate_per_debt_details(&loans, &result, &config);

        let stand_alone =
            generate_amortization_schedule_with_threshold(&loans[0], 0.0, 0.0, start(), 1_000.0);
        assert_eq!(details[0].baseline_months, stand_alone.len() as u32);
        assert!(details[0].baseline_months < 30);

        // Same payoff rule on both sides: the baseline run saves nothing against itself
        assert_eq!(details[0].payoff_month, details[0].baseline_months);
        assert_eq!(details[0].months_saved, 0);
        assert_abs_diff_eq!(details[0].interest_saved, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_loans() {
        let result = run(StrategyKind::SnowballFixed, &[], 100.0, 0.0);
        assert!(calculate_per_debt_details(&[], &result, &config()).is_empty());
    }
}
