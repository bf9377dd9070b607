//! Multi-loan payoff simulation: the minimum-payments baseline and the
//! three extra-payment strategies

mod config;
mod state;
mod plan;
mod strategy;
mod engine;

pub use config::{SimulationConfig, SurplusAllocation};
pub use state::{AppliedPayment, LoanState};
pub use plan::{DebtPaymentPlan, MonthlyPaymentPlan, ScheduleSummary, SimulationResult};
pub use strategy::{LumpSumAllocation, StrategyKind};
pub use engine::SimulationEngine;

/// Hard ceiling on simulated months for multi-loan runs
pub const DEFAULT_MAX_SIMULATION_MONTHS: u32 = 600;

/// Principal applied in phase 1 when the minimum payment does not cover interest
pub const DEFAULT_NEGATIVE_AMORTIZATION_FLOOR: f64 = 50.0;
