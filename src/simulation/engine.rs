//! Month-by-month simulation of all loans at once

use super::config::{SimulationConfig, SurplusAllocation};
use super::plan::{DebtPaymentPlan, MonthlyPaymentPlan, SimulationResult};
use super::state::LoanState;
use super::strategy::{snowball_order, LumpSumAllocation, StrategyKind};
use crate::amortization::month_date;
use crate::loan::Loan;

/// Simulation engine; stateless apart from its configuration
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
}

impl SimulationEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Minimum payments only, no interaction between loans
    ///
    /// Principal each month is `minimum - interest` clamped to
    /// `[0, balance]`. Runs until every loan is paid off or `max_months`.
    pub fn calculate_baseline(&self, loans: &[Loan]) -> SimulationResult {
        let threshold = self.config.paid_off_threshold;
        let mut states = initial_states(loans, threshold);
        let mut schedule = Vec::new();

        for month in 1..=self.config.max_months {
            if all_paid_off(&states) {
                break;
            }

            let mut plan = self.new_plan(month, loans, &states);

            for (loan, state) in loans.iter().zip(states.iter_mut()) {
                if state.is_paid_off {
                    plan.payments.push(DebtPaymentPlan::settled(loan));
                    continue;
                }

                let mut entry = DebtPaymentPlan::open(loan, state.current_balance);
                entry.interest = loan.monthly_interest(state.current_balance);

                let scheduled = (state.current_minimum_payment - entry.interest).max(0.0);
                let applied = state.apply_principal(scheduled, threshold, month);

                entry.principal = applied.principal;
                entry.minimum_payment = entry.interest + applied.principal;
                entry.remaining_balance = state.current_balance;
                entry.is_paid_off = state.is_paid_off;
                entry.paid_off_this_month = applied.paid_off;

                if applied.paid_off {
                    log::debug!("Baseline: loan {} paid off in month {}", loan.id, month);
                    plan.total_freed_payments += state.current_minimum_payment;
                }

                plan.payments.push(entry);
            }

            plan.finalize_totals();
            schedule.push(plan);
        }

        self.finish("baseline", schedule, &states)
    }

    /// Simulate one payoff strategy
    ///
    /// Each month runs two phases. Phase 1 pays every active loan's
    /// minimum; a minimum that does not cover interest is replaced by the
    /// configured principal floor. Phase 2 sends the whole surplus pool to
    /// the strategy's top-priority loan (and, with `Cascade`, on down the
    /// priority list). The pool is the base extra payment plus, for
    /// scrapes, the minimum payments of every loan paid off in an earlier
    /// month.
    pub fn run_strategy(
        &self,
        kind: StrategyKind,
        loans: &[Loan],
        extra_payment_base: f64,
        lump_sum: f64,
    ) -> SimulationResult {
        let threshold = self.config.paid_off_threshold;
        let floor = self.config.negative_amortization_floor;
        let extra_payment_base = extra_payment_base.max(0.0);

        let mut states = initial_states(loans, threshold);
        let released = self.apply_lump_sum(kind.lump_sum_allocation(), loans, &mut states, lump_sum);

        let mut freed_payment_pool = 0.0;
        if kind.recirculates_freed_payments() {
            freed_payment_pool = released.iter().map(|&i| states[i].current_minimum_payment).sum();
        }

        let mut schedule = Vec::new();

        for month in 1..=self.config.max_months {
            if all_paid_off(&states) {
                break;
            }

            let mut plan = self.new_plan(month, loans, &states);
            plan.freed_payment_pool = freed_payment_pool;
            plan.extra_payment_pool = extra_payment_base + freed_payment_pool;

            // Phase 1: minimum payments
            for (loan, state) in loans.iter().zip(states.iter_mut()) {
                if state.is_paid_off {
                    plan.payments.push(DebtPaymentPlan::settled(loan));
                    continue;
                }

                let mut entry = DebtPaymentPlan::open(loan, state.current_balance);
                entry.interest = loan.monthly_interest(state.current_balance);

                let mut scheduled = state.current_minimum_payment - entry.interest;
                if scheduled <= 0.0 {
                    scheduled = floor;
                }
                let applied = state.apply_principal(scheduled, threshold, month);

                entry.principal = applied.principal;
                entry.minimum_payment = entry.interest + applied.principal;
                entry.paid_off_this_month = applied.paid_off;

                if applied.paid_off {
                    log::debug!(
                        "{}: loan {} paid off by minimum payment in month {}",
                        kind.id(),
                        loan.id,
                        month
                    );
                }

                plan.payments.push(entry);
            }

            // Phase 2: surplus
            let mut surplus = plan.extra_payment_pool;
            for index in kind.priority_order(loans, &states) {
                if surplus <= 0.0 {
                    break;
                }

                let applied = states[index].apply_principal(surplus, threshold, month);
                surplus = (surplus - applied.principal).max(0.0);

                let entry = &mut plan.payments[index];
                log::trace!(
                    "{}: month {} surplus {:.2} to loan {}",
                    kind.id(),
                    month,
                    applied.principal,
                    entry.loan_id
                );
                entry.is_target = true;
                entry.extra_payment += applied.principal;
                entry.principal += applied.principal;
                if applied.paid_off {
                    entry.paid_off_this_month = true;
                    log::debug!(
                        "{}: loan {} paid off by surplus in month {}",
                        kind.id(),
                        entry.loan_id,
                        month
                    );
                }

                if self.config.surplus_allocation == SurplusAllocation::SingleTarget {
                    break;
                }
            }
            plan.unspent_surplus = surplus;

            for (entry, state) in plan.payments.iter_mut().zip(states.iter()) {
                entry.remaining_balance = state.current_balance;
                entry.is_paid_off = state.is_paid_off;
                if entry.paid_off_this_month {
                    plan.total_freed_payments += state.current_minimum_payment;
                }
            }

            // Released payments become surplus from next month on
            if kind.recirculates_freed_payments() {
                freed_payment_pool += plan.total_freed_payments;
            }

            plan.finalize_totals();
            schedule.push(plan);
        }

        self.finish(kind.id(), schedule, &states)
    }

    /// Apply the lump sum before month 1, returning the loans it paid off
    fn apply_lump_sum(
        &self,
        allocation: LumpSumAllocation,
        loans: &[Loan],
        states: &mut [LoanState],
        lump_sum: f64,
    ) -> Vec<usize> {
        let threshold = self.config.paid_off_threshold;
        let mut released = Vec::new();

        if !(lump_sum > 0.0) {
            return released;
        }

        match allocation {
            LumpSumAllocation::Proportional => {
                let total_balance: f64 = states
                    .iter()
                    .filter(|s| s.is_active())
                    .map(|s| s.current_balance)
                    .sum();
                if total_balance <= 0.0 {
                    return released;
                }

                for (index, state) in states.iter_mut().enumerate() {
                    if state.is_paid_off {
                        continue;
                    }
                    let share = lump_sum * state.current_balance / total_balance;
                    if state.apply_principal(share, threshold, 0).paid_off {
                        released.push(index);
                    }
                }
            }
            LumpSumAllocation::SnowballOrder => {
                let mut order: Vec<usize> = (0..loans.len())
                    .filter(|&i| states[i].is_active())
                    .collect();
                order.sort_by(|&i, &j| snowball_order((&loans[i], &states[i]), (&loans[j], &states[j])));

                let mut remaining = lump_sum;
                for index in order {
                    if remaining <= 0.0 {
                        break;
                    }
                    let applied = states[index].apply_principal(remaining, threshold, 0);
                    remaining -= applied.principal;
                    if applied.paid_off {
                        released.push(index);
                    }
                }
            }
        }

        for &index in &released {
            log::debug!("Loan {} paid off by lump sum", loans[index].id);
        }

        released
    }

    fn new_plan(&self, month: u32, loans: &[Loan], states: &[LoanState]) -> MonthlyPaymentPlan {
        let mut plan = MonthlyPaymentPlan::new(
            month,
            month_date(self.config.start_date, month),
            loans.len(),
        );
        plan.active_loan_count = states.iter().filter(|s| s.is_active()).count();
        plan
    }

    fn finish(
        &self,
        label: &str,
        monthly_schedule: Vec<MonthlyPaymentPlan>,
        states: &[LoanState],
    ) -> SimulationResult {
        let completed = all_paid_off(states);
        if completed {
            log::debug!("{}: all loans paid off after {} months", label, monthly_schedule.len());
        } else {
            log::warn!(
                "{}: {} loans still owing after the {}-month ceiling",
                label,
                states.iter().filter(|s| s.is_active()).count(),
                self.config.max_months
            );
        }

        SimulationResult {
            monthly_schedule,
            completed,
        }
    }
}

fn initial_states(loans: &[Loan], threshold: f64) -> Vec<LoanState> {
    loans.iter().map(|loan| LoanState::from_loan(loan, threshold)).collect()
}

fn all_paid_off(states: &[LoanState]) -> bool {
    states.iter().all(|s| s.is_paid_off)
}
