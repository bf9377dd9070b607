//! Configuration for simulation runs

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_MAX_SIMULATION_MONTHS, DEFAULT_NEGATIVE_AMORTIZATION_FLOOR};
use crate::amortization::PAID_OFF_THRESHOLD;
use crate::error::{DebtError, Result};

/// Where surplus goes once the selected target loan is paid off mid-month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurplusAllocation {
    /// Surplus only ever reaches one loan per month; any excess over the
    /// target's balance goes unspent
    #[default]
    SingleTarget,
    /// Excess flows to the next loan in priority order within the same month
    Cascade,
}

/// Configuration for a simulation run
///
/// | Field | Default |
/// |-------|---------|
/// | `start_date` | first day of the current month |
/// | `max_months` | 600 |
/// | `paid_off_threshold` | 0.01 |
/// | `negative_amortization_floor` | 50.0 |
/// | `surplus_allocation` | `SingleTarget` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Calendar date of month 1
    pub start_date: NaiveDate,

    /// Hard ceiling on simulated months
    pub max_months: u32,

    /// Balance at or below which a loan counts as paid off
    pub paid_off_threshold: f64,

    /// Phase-1 principal used when a strategy's minimum payment does not
    /// cover the month's interest
    pub negative_amortization_floor: f64,

    pub surplus_allocation: SurplusAllocation,
}

/// Reads the wall clock: two defaults built either side of a month boundary
/// start on different dates. Use `SimulationConfig::new` for reproducible runs.
impl Default for SimulationConfig {
    fn default() -> Self {
        Self::starting_this_month()
    }
}

impl SimulationConfig {
    /// Default settings starting on the first day of the current local month
    ///
    /// The date is read once here; every run of the returned config uses it.
    pub fn starting_this_month() -> Self {
        let today = Local::now().date_naive();
        Self::new(today.with_day(1).unwrap_or(today))
    }

    /// Default settings starting at the given date
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            max_months: DEFAULT_MAX_SIMULATION_MONTHS,
            paid_off_threshold: PAID_OFF_THRESHOLD,
            negative_amortization_floor: DEFAULT_NEGATIVE_AMORTIZATION_FLOOR,
            surplus_allocation: SurplusAllocation::SingleTarget,
        }
    }

    pub fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = max_months;
        self
    }

    pub fn with_surplus_allocation(mut self, allocation: SurplusAllocation) -> Self {
        self.surplus_allocation = allocation;
        self
    }

    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_months == 0 {
            return Err(DebtError::InvalidConfig(
                "max_months must be at least 1".into(),
            ));
        }
        if !(self.paid_off_threshold >= 0.0) {
            return Err(DebtError::InvalidConfig(format!(
                "paid_off_threshold must be non-negative, got {}",
                self.paid_off_threshold
            )));
        }
        if !(self.negative_amortization_floor >= 0.0) {
            return Err(DebtError::InvalidConfig(format!(
                "negative_amortization_floor must be non-negative, got {}",
                self.negative_amortization_floor
            )));
        }
        Ok(())
    }
}
