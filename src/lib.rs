//! Debt Payoff - Month-by-month simulation engine for multi-loan payoff strategies
//!
//! This library provides:
//! - Single-loan amortization schedules with extra payments and lump sums
//! - A minimum-payments baseline across a set of loans
//! - Avalanche, snowball and snowball-with-scrapes strategy simulations
//! - Per-loan savings analysis against each loan's stand-alone schedule
//! - Strategy comparison with a recommended strategy and explanation

pub mod error;
pub mod loan;
pub mod amortization;
pub mod simulation;
pub mod analysis;
pub mod optimizer;

// Re-export commonly used types
pub use error::{DebtError, Result};
pub use loan::{Loan, LoanType};
pub use amortization::{generate_amortization_schedule, AmortizationSchedule, PaymentScheduleItem};
pub use simulation::{
    MonthlyPaymentPlan, SimulationConfig, SimulationEngine, SimulationResult, StrategyKind,
    SurplusAllocation,
};
pub use analysis::{calculate_per_debt_details, PerLoanDetail};
pub use optimizer::{
    DebtOptimizationStrategy, OptimizationResult, Optimizer, OptimizerConfig, Scenario,
    StrategySummary,
};
