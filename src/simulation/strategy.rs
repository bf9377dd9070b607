//! Payoff strategy variants and their allocation rules

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::state::LoanState;
use crate::loan::Loan;

/// How a lump sum is spread across loans before month 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LumpSumAllocation {
    /// Each loan gets a share proportional to its starting balance
    Proportional,
    /// Smallest balance first until the lump sum runs out
    SnowballOrder,
}

/// Extra-payment allocation policy
///
/// | Strategy | Target | Tie-break | Freed payments | Lump sum |
/// |----------|--------|-----------|----------------|----------|
/// | `AvalancheFixed` | highest rate | larger balance | dropped | proportional |
/// | `SnowballFixed` | smallest balance | higher rate | dropped | proportional |
/// | `SnowballScrapes` | smallest balance | higher rate | recirculated | snowball order |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    AvalancheFixed,
    SnowballFixed,
    SnowballScrapes,
}

impl StrategyKind {
    /// All variants, in presentation order
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::AvalancheFixed,
        StrategyKind::SnowballFixed,
        StrategyKind::SnowballScrapes,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            StrategyKind::AvalancheFixed => "avalanche-fixed",
            StrategyKind::SnowballFixed => "snowball-fixed",
            StrategyKind::SnowballScrapes => "snowball-scrapes",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::AvalancheFixed => "Avalanche (fixed payment)",
            StrategyKind::SnowballFixed => "Snowball (fixed payment)",
            StrategyKind::SnowballScrapes => "Snowball with scrapes",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::AvalancheFixed => {
                "Pays every minimum and sends the extra payment to the highest-rate loan first. \
                 Monthly outlay stays constant."
            }
            StrategyKind::SnowballFixed => {
                "Pays every minimum and sends the extra payment to the smallest balance first. \
                 Monthly outlay stays constant."
            }
            StrategyKind::SnowballScrapes => {
                "Smallest balance first, and each paid-off loan's minimum payment is added to \
                 the extra payment for the loans that remain."
            }
        }
    }

    /// Whether paid-off loans' minimum payments join the surplus pool
    pub fn recirculates_freed_payments(&self) -> bool {
        matches!(self, StrategyKind::SnowballScrapes)
    }

    pub fn lump_sum_allocation(&self) -> LumpSumAllocation {
        match self {
            StrategyKind::AvalancheFixed | StrategyKind::SnowballFixed => {
                LumpSumAllocation::Proportional
            }
            StrategyKind::SnowballScrapes => LumpSumAllocation::SnowballOrder,
        }
    }

    /// Ordering of two loans by surplus priority (`Less` = paid first)
    pub fn compare(&self, a: (&Loan, &LoanState), b: (&Loan, &LoanState)) -> Ordering {
        let (loan_a, state_a) = a;
        let (loan_b, state_b) = b;
        match self {
            StrategyKind::AvalancheFixed => loan_b
                .interest_rate
                .total_cmp(&loan_a.interest_rate)
                .then_with(|| state_b.current_balance.total_cmp(&state_a.current_balance)),
            StrategyKind::SnowballFixed | StrategyKind::SnowballScrapes => snowball_order(a, b),
        }
    }

    /// Indices of loans still owing, highest priority first
    ///
    /// The sort is stable, so loans equal on both keys keep input order.
    pub fn priority_order(&self, loans: &[Loan], states: &[LoanState]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..loans.len())
            .filter(|&i| states[i].is_active())
            .collect();
        order.sort_by(|&i, &j| self.compare((&loans[i], &states[i]), (&loans[j], &states[j])));
        order
    }
}

/// Smallest balance first, higher rate breaking ties
pub(crate) fn snowball_order(a: (&Loan, &LoanState), b: (&Loan, &LoanState)) -> Ordering {
    let (loan_a, state_a) = a;
    let (loan_b, state_b) = b;
    state_a
        .current_balance
        .total_cmp(&state_b.current_balance)
        .then_with(|| loan_b.interest_rate.total_cmp(&loan_a.interest_rate))
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
