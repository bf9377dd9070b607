//! Strategy comparison and recommendation
//!
//! Runs the minimum-payment baseline once, every payoff strategy against
//! the same loans, and picks the strategy to recommend. Interest saved is
//! the primary key, but only outside an indifference band; inside it the
//! faster payoff wins.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{calculate_per_debt_details, PerLoanDetail};
use crate::error::{DebtError, Result};
use crate::loan::Loan;
use crate::simulation::{
    MonthlyPaymentPlan, SimulationConfig, SimulationEngine, SimulationResult, StrategyKind,
};

/// Interest-saved difference below which two strategies count as tied
pub const DEFAULT_RECOMMENDATION_THRESHOLD: f64 = 1000.0;

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub simulation: SimulationConfig,

    /// Indifference band on interest saved when ranking strategies
    pub recommendation_threshold: f64,

    /// Run strategies on the rayon thread pool
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            recommendation_threshold: DEFAULT_RECOMMENDATION_THRESHOLD,
            parallel: true,
        }
    }
}

impl OptimizerConfig {
    pub fn new(simulation: SimulationConfig) -> Self {
        Self {
            simulation,
            ..Default::default()
        }
    }

    pub fn with_recommendation_threshold(mut self, threshold: f64) -> Self {
        self.recommendation_threshold = threshold;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        if !(self.recommendation_threshold >= 0.0) {
            return Err(DebtError::InvalidConfig(format!(
                "recommendation_threshold must be non-negative, got {}",
                self.recommendation_threshold
            )));
        }
        Ok(())
    }
}

/// One `(extra_payment, lump_sum)` pair to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub extra_payment: f64,
    #[serde(default)]
    pub lump_sum: f64,
}

impl Scenario {
    pub fn new(extra_payment: f64, lump_sum: f64) -> Self {
        Self {
            extra_payment,
            lump_sum,
        }
    }
}

/// A strategy's full outcome, measured against the baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtOptimizationStrategy {
    pub id: String,
    pub name: String,
    pub kind: StrategyKind,
    pub description: String,
    pub total_interest: f64,

    /// Baseline total interest minus this strategy's
    pub interest_saved: f64,

    /// Baseline months minus this strategy's, floored at 0
    pub months_saved: u32,

    pub total_months: u32,

    /// Date of the last simulated month; `None` when nothing was owed
    pub payoff_date: Option<NaiveDate>,

    /// All loans paid off within the month ceiling
    pub completed: bool,

    pub monthly_schedule: Vec<MonthlyPaymentPlan>,
    pub per_debt_details: Vec<PerLoanDetail>,
}

impl DebtOptimizationStrategy {
    fn from_result(
        kind: StrategyKind,
        result: SimulationResult,
        baseline: &SimulationResult,
        per_debt_details: Vec<PerLoanDetail>,
    ) -> Self {
        let total_interest = result.total_interest();
        let total_months = result.total_months();

        Self {
            id: kind.id().to_string(),
            name: kind.name().to_string(),
            kind,
            description: kind.description().to_string(),
            total_interest,
            interest_saved: baseline.total_interest() - total_interest,
            months_saved: baseline.total_months().saturating_sub(total_months),
            total_months,
            payoff_date: result.payoff_date(),
            completed: result.completed,
            monthly_schedule: result.monthly_schedule,
            per_debt_details,
        }
    }
}

/// Flat comparison row for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy_id: String,
    pub name: String,
    pub total_interest: f64,
    pub interest_saved: f64,
    pub total_months: u32,
    pub months_saved: u32,
    pub payoff_date: Option<NaiveDate>,
    pub completed: bool,
    pub recommended: bool,
}

/// Output of one optimizer run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// One entry per strategy, in `StrategyKind::ALL` order
    pub strategies: Vec<DebtOptimizationStrategy>,
    pub recommended_strategy: StrategyKind,
    pub explanation: String,
    pub baseline_schedule: SimulationResult,
}

impl OptimizationResult {
    pub fn recommended(&self) -> Option<&DebtOptimizationStrategy> {
        self.strategies
            .iter()
            .find(|s| s.kind == self.recommended_strategy)
    }

    pub fn strategy(&self, kind: StrategyKind) -> Option<&DebtOptimizationStrategy> {
        self.strategies.iter().find(|s| s.kind == kind)
    }

    pub fn summaries(&self) -> Vec<StrategySummary> {
        self.strategies
            .iter()
            .map(|s| StrategySummary {
                strategy_id: s.id.clone(),
                name: s.name.clone(),
                total_interest: s.total_interest,
                interest_saved: s.interest_saved,
                total_months: s.total_months,
                months_saved: s.months_saved,
                payoff_date: s.payoff_date,
                completed: s.completed,
                recommended: s.kind == self.recommended_strategy,
            })
            .collect()
    }
}

/// Runs every strategy against a loan list and recommends one
///
/// `Optimizer::default()` fixes its start date when constructed, so repeated
/// calls on one optimizer agree; separately built defaults may not.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn optimize_debt_payoff(
        &self,
        loans: &[Loan],
        extra_payment_base: f64,
        lump_sum: f64,
    ) -> OptimizationResult {
        log::info!(
            "Optimizing {} loans: extra payment {:.2}, lump sum {:.2}",
            loans.len(),
            extra_payment_base,
            lump_sum
        );

        let engine = SimulationEngine::new(self.config.simulation.clone());
        let baseline = engine.calculate_baseline(loans);

        let evaluate = |kind: StrategyKind| {
            let result = engine.run_strategy(kind, loans, extra_payment_base, lump_sum);
            let details = calculate_per_debt_details(loans, &result, &self.config.simulation);
            DebtOptimizationStrategy::from_result(kind, result, &baseline, details)
        };

        let strategies: Vec<DebtOptimizationStrategy> = if self.config.parallel {
            StrategyKind::ALL.par_iter().map(|&kind| evaluate(kind)).collect()
        } else {
            StrategyKind::ALL.iter().map(|&kind| evaluate(kind)).collect()
        };

        let best = select_recommended(&strategies, self.config.recommendation_threshold);
        let recommended = &strategies[best];
        let explanation = explain(recommended, shared_currency(loans));

        log::info!(
            "Recommended {}: saves {:.2} interest and {} months",
            recommended.id,
            recommended.interest_saved,
            recommended.months_saved
        );

        OptimizationResult {
            recommended_strategy: recommended.kind,
            explanation,
            strategies,
            baseline_schedule: baseline,
        }
    }

    /// Evaluate several scenarios against the same loans
    pub fn run_scenarios(&self, loans: &[Loan], scenarios: &[Scenario]) -> Vec<OptimizationResult> {
        if self.config.parallel {
            scenarios
                .par_iter()
                .map(|s| self.optimize_debt_payoff(loans, s.extra_payment, s.lump_sum))
                .collect()
        } else {
            scenarios
                .iter()
                .map(|s| self.optimize_debt_payoff(loans, s.extra_payment, s.lump_sum))
                .collect()
        }
    }
}

/// Index of the strategy to recommend
///
/// Walks the list keeping a current best. A challenger whose interest
/// saved differs by more than `threshold` wins only if it saves more;
/// within the band the one with more months saved wins. Ties keep the
/// earlier strategy. Returns 0 for an empty list.
pub fn select_recommended(strategies: &[DebtOptimizationStrategy], threshold: f64) -> usize {
    let mut best = 0;
    for (index, candidate) in strategies.iter().enumerate().skip(1) {
        let current = &strategies[best];
        let difference = candidate.interest_saved - current.interest_saved;
        if difference.abs() > threshold {
            if difference > 0.0 {
                best = index;
            }
        } else if candidate.months_saved > current.months_saved {
            best = index;
        }
    }
    best
}

/// Currency code common to every loan, if there is one
fn shared_currency(loans: &[Loan]) -> Option<&str> {
    let first = loans.first()?.currency.as_str();
    if first.is_empty() || loans.iter().any(|loan| loan.currency != first) {
        return None;
    }
    Some(first)
}

fn explain(strategy: &DebtOptimizationStrategy, currency: Option<&str>) -> String {
    let amount = match currency {
        Some(code) => format!("{:.0} {}", strategy.interest_saved, code),
        None => format!("{:.0}", strategy.interest_saved),
    };
    let mut explanation = format!(
        "{} is recommended: it saves {} in interest and pays off your debts {} months sooner than minimum payments alone.",
        strategy.name, amount, strategy.months_saved
    );
    if strategy.kind.recirculates_freed_payments() {
        explanation.push_str(
            " Each paid-off loan's minimum payment is rolled into the next target, so your extra payment grows as debts disappear.",
        );
    }
    explanation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanType;
    use approx::assert_abs_diff_eq;

    fn optimizer() -> Optimizer {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Optimizer::new(OptimizerConfig::new(SimulationConfig::new(start)))
    }

    fn example_loans() -> Vec<Loan> {
        vec![
            Loan::new("mortgage", "Home", LoanType::Mortgage, 320_000.0, 3.25, 1_520.0, 360),
            Loan::new("auto", "Car", LoanType::Auto, 22_000.0, 4.5, 520.0, 48),
            Loan::new("personal", "Personal", LoanType::Personal, 12_000.0, 7.2, 450.0, 36),
        ]
    }

    fn diverging_loans() -> Vec<Loan> {
        vec![
            Loan::new("card", "Card", LoanType::CreditCard, 15_000.0, 18.0, 400.0, 60),
            Loan::new("store", "Store", LoanType::Other, 5_000.0, 3.0, 200.0, 30),
        ]
    }

    fn candidate(kind: StrategyKind, interest_saved: f64, months_saved: u32) -> DebtOptimizationStrategy {
        DebtOptimizationStrategy {
            id: kind.id().to_string(),
            name: kind.name().to_string(),
            kind,
            description: String::new(),
            total_interest: 0.0,
            interest_saved,
            months_saved,
            total_months: 0,
            payoff_date: None,
            completed: true,
            monthly_schedule: Vec::new(),
            per_debt_details: Vec::new(),
        }
    }

    #[test]
    fn test_example_recommends_scrapes() {
        let result = optimizer().optimize_debt_payoff(&example_loans(), 500.0, 0.0);

        assert_eq!(result.strategies.len(), 3);
        assert_eq!(result.baseline_schedule.total_months(), 313);

        let avalanche = result.strategy(StrategyKind::AvalancheFixed).unwrap();
        assert_abs_diff_eq!(avalanche.interest_saved, 46_752.56, epsilon = 0.01);
        assert_eq!(avalanche.months_saved, 93);
        assert_eq!(avalanche.total_months, 220);
        assert_eq!(avalanche.per_debt_details.len(), 3);

        let scrapes = result.strategy(StrategyKind::SnowballScrapes).unwrap();
        assert_abs_diff_eq!(scrapes.interest_saved, 82_941.59, epsilon = 0.01);
        assert_eq!(scrapes.months_saved, 169);
        assert_eq!(scrapes.payoff_date, NaiveDate::from_ymd_opt(2036, 12, 1));

        let snowball = result.strategy(StrategyKind::SnowballFixed).unwrap();
        assert!(avalanche.interest_saved >= snowball.interest_saved);
        assert!(scrapes.months_saved >= snowball.months_saved);

        assert_eq!(result.recommended_strategy, StrategyKind::SnowballScrapes);
        assert!(result.explanation.starts_with("Snowball with scrapes is recommended"));
        assert!(result.explanation.contains("82942 USD"));
        assert!(result.explanation.contains("169 months"));
        assert!(result.explanation.contains("rolled into the next target"));
    }

    #[test]
    fn test_scenarios_recommend_scrapes() {
        let scenarios = [
            Scenario::new(0.0, 0.0),
            Scenario::new(500.0, 10_000.0),
            Scenario::new(200.0, 5_000.0),
        ];
        let results = optimizer().run_scenarios(&example_loans(), &scenarios);
        assert_eq!(results.len(), 3);

        let saved: Vec<_> = results
            .iter()
            .map(|r| r.strategy(StrategyKind::SnowballScrapes).unwrap().interest_saved)
            .collect();
        assert_abs_diff_eq!(saved[0], 61_847.15, epsilon = 0.01);
        assert_abs_diff_eq!(saved[1], 88_262.56, epsilon = 0.01);
        assert_abs_diff_eq!(saved[2], 74_861.52, epsilon = 0.01);

        for result in &results {
            assert_eq!(result.recommended_strategy, StrategyKind::SnowballScrapes);
        }

        // No extra, no lump sum: the fixed strategies are the baseline
        let fixed = results[0].strategy(StrategyKind::AvalancheFixed).unwrap();
        assert_abs_diff_eq!(fixed.interest_saved, 0.0, epsilon = 1e-6);
        assert_eq!(fixed.months_saved, 0);
    }

    #[test]
    fn test_diverging_loans_recommend_avalanche() {
        let result = optimizer().optimize_debt_payoff(&diverging_loans(), 300.0, 0.0);

        let avalanche = result.strategy(StrategyKind::AvalancheFixed).unwrap();
        let snowball = result.strategy(StrategyKind::SnowballFixed).unwrap();
        let scrapes = result.strategy(StrategyKind::SnowballScrapes).unwrap();

        assert!(avalanche.interest_saved >= snowball.interest_saved);
        assert!(scrapes.months_saved >= snowball.months_saved);
        assert_eq!(avalanche.months_saved, 29);
        assert_eq!(scrapes.months_saved, 29);

        // Scrapes is within the band but not faster, so avalanche holds
        assert_eq!(result.recommended_strategy, StrategyKind::AvalancheFixed);
        assert!(result.explanation.contains("3979 USD"));
        assert!(!result.explanation.contains("rolled"));
    }

    #[test]
    fn test_explanation_uses_loan_currency() {
        let euro: Vec<Loan> = diverging_loans()
            .into_iter()
            .map(|mut loan| {
                loan.currency = "EUR".to_string();
                loan
            })
            .collect();
        let result = optimizer().optimize_debt_payoff(&euro, 300.0, 0.0);
        assert!(result.explanation.contains("3979 EUR"));
        assert!(!result.explanation.contains('$'));

        let mut mixed = diverging_loans();
        mixed[1].currency = "GBP".to_string();
        let result = optimizer().optimize_debt_payoff(&mixed, 300.0, 0.0);
        assert!(result.explanation.contains("saves 3979 in interest"));
        assert!(!result.explanation.contains("USD"));
        assert!(!result.explanation.contains("GBP"));
    }

    #[test]
    fn test_threshold_tie_break() {
        let strategies = vec![
            candidate(StrategyKind::AvalancheFixed, 5_000.0, 10),
            candidate(StrategyKind::SnowballFixed, 4_200.0, 14),
            candidate(StrategyKind::SnowballScrapes, 4_900.0, 12),
        ];
        // Snowball is within the band and faster; scrapes is within the band of snowball but slower
        assert_eq!(select_recommended(&strategies, 1_000.0), 1);
        // With no band, interest decides
        assert_eq!(select_recommended(&strategies, 0.0), 0);
    }

    #[test]
    fn test_threshold_outside_band() {
        let strategies = vec![
            candidate(StrategyKind::AvalancheFixed, 5_000.0, 10),
            candidate(StrategyKind::SnowballFixed, 3_000.0, 40),
            candidate(StrategyKind::SnowballScrapes, 6_500.0, 2),
        ];
        assert_eq!(select_recommended(&strategies, 1_000.0), 2);
    }

    #[test]
    fn test_exact_tie_keeps_first() {
        let strategies = vec![
            candidate(StrategyKind::AvalancheFixed, 100.0, 5),
            candidate(StrategyKind::SnowballFixed, 100.0, 5),
        ];
        assert_eq!(select_recommended(&strategies, 1_000.0), 0);
        assert_eq!(select_recommended(&[], 1_000.0), 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let loans = example_loans();
        let parallel = optimizer().optimize_debt_payoff(&loans, 500.0, 10_000.0);
        let sequential = Optimizer::new(optimizer().config().clone().with_parallel(false))
            .optimize_debt_payoff(&loans, 500.0, 10_000.0);
        assert_eq!(parallel, sequential);

        // Pure: running again gives the same answer
        assert_eq!(parallel, optimizer().optimize_debt_payoff(&loans, 500.0, 10_000.0));
    }

    #[test]
    fn test_default_optimizer_repeats_itself() {
        let optimizer = Optimizer::default();
        let first = optimizer.optimize_debt_payoff(&diverging_loans(), 300.0, 0.0);
        let second = optimizer.optimize_debt_payoff(&diverging_loans(), 300.0, 0.0);

        assert_eq!(first, second);
        assert_eq!(
            first.baseline_schedule.monthly_schedule[0].date,
            optimizer.config().simulation.start_date
        );
    }

    #[test]
    fn test_empty_loans() {
        let result = optimizer().optimize_debt_payoff(&[], 500.0, 1_000.0);

        assert!(result.baseline_schedule.monthly_schedule.is_empty());
        assert_eq!(result.strategies.len(), 3);
        for strategy in &result.strategies {
            assert!(strategy.monthly_schedule.is_empty());
            assert!(strategy.per_debt_details.is_empty());
            assert_eq!(strategy.interest_saved, 0.0);
            assert_eq!(strategy.months_saved, 0);
            assert_eq!(strategy.payoff_date, None);
        }
        assert_eq!(result.recommended_strategy, StrategyKind::AvalancheFixed);
    }

    #[test]
    fn test_summaries_flag_recommendation() {
        let result = optimizer().optimize_debt_payoff(&example_loans(), 500.0, 0.0);
        let summaries = result.summaries();

        assert_eq!(summaries.len(), 3);
        let recommended: Vec<_> = summaries.iter().filter(|s| s.recommended).collect();
        assert_eq!(recommended.len(), 1);
        assert_eq!(recommended[0].strategy_id, "snowball-scrapes");
        assert_eq!(summaries[0].strategy_id, "avalanche-fixed");
        assert_eq!(
            result.recommended().map(|s| s.total_months),
            Some(144)
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(OptimizerConfig::default().validate().is_ok());
        let bad = OptimizerConfig::default().with_recommendation_threshold(-1.0);
        assert!(matches!(bad.validate(), Err(DebtError::InvalidConfig(_))));
    }
}
