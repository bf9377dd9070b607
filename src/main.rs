//! Debt Payoff CLI
//!
//! Compares payoff strategies for a loan portfolio and writes the
//! recommended strategy's month-by-month schedule to CSV

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

use debt_payoff::loan::load_loans;
use debt_payoff::{
    Loan, LoanType, OptimizationResult, Optimizer, OptimizerConfig, SimulationConfig,
    SurplusAllocation,
};

#[derive(Parser, Debug)]
#[command(name = "debt_payoff", version, about = "Compare debt payoff strategies")]
struct Args {
    /// Loan CSV file (a demo portfolio is used when omitted)
    loans: Option<PathBuf>,

    /// Extra amount paid each month on top of the minimums
    #[arg(short, long, default_value_t = 0.0)]
    extra: f64,

    /// One-time payment applied before month 1
    #[arg(short, long, default_value_t = 0.0)]
    lump_sum: f64,

    /// Calendar date of month 1 (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Simulation config JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Send surplus left after a payoff to the next loan in the same month
    #[arg(long)]
    cascade: bool,

    /// Where to write the recommended schedule
    #[arg(short, long, default_value = "payoff_schedule.csv")]
    output: PathBuf,
}

/// One loan in one month, flattened for CSV
#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    month: u32,
    date: NaiveDate,
    loan_id: &'a str,
    loan_name: &'a str,
    starting_balance: f64,
    minimum_payment: f64,
    extra_payment: f64,
    interest: f64,
    principal: f64,
    fees: f64,
    remaining_balance: f64,
    is_target: bool,
    paid_off: bool,
}

fn demo_loans() -> Vec<Loan> {
    vec![
        Loan::new("mortgage", "Home mortgage", LoanType::Mortgage, 320_000.0, 3.25, 1_520.0, 360),
        Loan::new("auto", "Car loan", LoanType::Auto, 22_000.0, 4.5, 520.0, 48),
        Loan::new("personal", "Personal loan", LoanType::Personal, 12_000.0, 7.2, 450.0, 36),
    ]
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimulationConfig::from_json(&json)?
        }
        None => SimulationConfig::starting_this_month(),
    };

    if let Some(start_date) = args.start_date {
        config.start_date = start_date;
    }
    if args.cascade {
        config.surplus_allocation = SurplusAllocation::Cascade;
    }
    config.validate()?;
    Ok(config)
}

fn write_schedule(result: &OptimizationResult, path: &Path) -> Result<usize> {
    let Some(strategy) = result.recommended() else {
        return Ok(0);
    };

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut rows = 0;

    for plan in &strategy.monthly_schedule {
        for entry in plan.payments.iter().filter(|p| p.starting_balance > 0.0) {
            writer.serialize(ScheduleRow {
                month: plan.month,
                date: plan.date,
                loan_id: &entry.loan_id,
                loan_name: &entry.loan_name,
                starting_balance: entry.starting_balance,
                minimum_payment: entry.minimum_payment,
                extra_payment: entry.extra_payment,
                interest: entry.interest,
                principal: entry.principal,
                fees: entry.fees,
                remaining_balance: entry.remaining_balance,
                is_target: entry.is_target,
                paid_off: entry.paid_off_this_month,
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Debt Payoff v{}", env!("CARGO_PKG_VERSION"));
    println!("==================\n");

    let config = load_config(&args)?;
    let loans = match &args.loans {
        Some(path) => load_loans(path).with_context(|| format!("loading {}", path.display()))?,
        None => demo_loans(),
    };

    println!("Loans ({}):", loans.len());
    println!("{:<12} {:<20} {:>14} {:>8} {:>10} {:>6}",
        "ID", "Name", "Balance", "Rate", "Payment", "Term");
    println!("{}", "-".repeat(75));
    for loan in &loans {
        println!("{:<12} {:<20} {:>14.2} {:>7.2}% {:>10.2} {:>6}",
            loan.id, loan.name, loan.current_balance, loan.interest_rate,
            loan.monthly_payment, loan.term_months);
    }
    println!();
    println!("Start date:   {}", config.start_date);
    println!("Extra/month:  ${:.2}", args.extra);
    println!("Lump sum:     ${:.2}", args.lump_sum);
    println!();

    let optimizer = Optimizer::new(OptimizerConfig::new(config));
    let result = optimizer.optimize_debt_payoff(&loans, args.extra, args.lump_sum);

    let baseline = result.baseline_schedule.summary();
    println!("Baseline (minimum payments): {} months, ${:.2} interest{}",
        baseline.total_months,
        baseline.total_interest,
        if baseline.completed { "" } else { " (did not pay off)" });
    println!();

    println!("{:<28} {:>14} {:>14} {:>7} {:>7} {:>12}",
        "Strategy", "Interest", "Saved", "Months", "Saved", "Payoff");
    println!("{}", "-".repeat(87));
    for row in result.summaries() {
        let payoff = row.payoff_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        println!("{:<28} {:>14.2} {:>14.2} {:>7} {:>7} {:>12}{}",
            row.name, row.total_interest, row.interest_saved,
            row.total_months, row.months_saved, payoff,
            if row.recommended { "  *" } else { "" });
    }
    println!();
    println!("{}", result.explanation);

    if let Some(strategy) = result.recommended() {
        println!("\nPer-loan detail ({}):", strategy.name);
        println!("{:<12} {:>8} {:>10} {:>14} {:>14}",
            "ID", "Payoff", "Saved", "Interest", "Saved $");
        for detail in &strategy.per_debt_details {
            println!("{:<12} {:>8} {:>10} {:>14.2} {:>14.2}",
                detail.loan_id, detail.payoff_month, detail.months_saved,
                detail.total_interest, detail.interest_saved);
        }
    }

    let rows = write_schedule(&result, &args.output)?;
    println!("\nRecommended schedule ({} rows) written to: {}", rows, args.output.display());

    Ok(())
}
