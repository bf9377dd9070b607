//! Single-loan amortization table
//!
//! Usage:
//!   amortize --balance 12000 --rate 7.2 --payment 450 --term 36 --extra 100
//!   amortize --loans loans.csv --id auto --lump-sum 2000 --output auto.csv

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use debt_payoff::loan::load_loans;
use debt_payoff::{generate_amortization_schedule, Loan, LoanType, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "amortize", version, about = "Print a single loan's amortization schedule")]
struct Args {
    /// Loan CSV file to pick the loan from
    #[arg(long, requires = "id")]
    loans: Option<PathBuf>,

    /// Loan id within the CSV file
    #[arg(long)]
    id: Option<String>,

    #[arg(long, default_value_t = 12_000.0)]
    balance: f64,

    /// Annual rate in percent
    #[arg(long, default_value_t = 7.2)]
    rate: f64,

    #[arg(long, default_value_t = 450.0)]
    payment: f64,

    #[arg(long, default_value_t = 36)]
    term: u32,

    /// Extra principal paid every month
    #[arg(short, long, default_value_t = 0.0)]
    extra: f64,

    #[arg(short, long, default_value_t = 0.0)]
    lump_sum: f64,

    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Write the full schedule to CSV
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn select_loan(args: &Args) -> Result<Loan> {
    match (&args.loans, &args.id) {
        (Some(path), Some(id)) => {
            let loans = load_loans(path).with_context(|| format!("loading {}", path.display()))?;
            match loans.into_iter().find(|loan| &loan.id == id) {
                Some(loan) => Ok(loan),
                None => bail!("no loan with id {} in {}", id, path.display()),
            }
        }
        _ => {
            let loan = Loan::new("loan", "Loan", LoanType::Other, args.balance, args.rate, args.payment, args.term);
            loan.validate()?;
            Ok(loan)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let loan = select_loan(&args)?;
    let start_date = args
        .start_date
        .unwrap_or_else(|| SimulationConfig::starting_this_month().start_date);

    let schedule = generate_amortization_schedule(&loan, args.extra, args.lump_sum, start_date);

    println!("Loan: {} ({})", loan.name, loan.id);
    println!("  Balance: ${:.2}", loan.current_balance);
    println!("  Rate: {:.3}%", loan.interest_rate);
    println!("  Payment: ${:.2}", loan.monthly_payment);
    println!("  Term: {} months", loan.term_months);
    if schedule.lump_sum_applied > 0.0 {
        println!("  Lump sum: ${:.2} (opening balance ${:.2})",
            schedule.lump_sum_applied, schedule.opening_balance);
    }
    println!();

    println!("{:>5} {:>10} {:>12} {:>12} {:>12} {:>10} {:>14}",
        "Month", "Date", "Payment", "Principal", "Interest", "Extra", "Balance");
    println!("{}", "-".repeat(82));
    for item in schedule.items.iter().take(24) {
        println!("{:>5} {:>10} {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>14.2}",
            item.month, item.date, item.monthly_payment, item.principal,
            item.interest, item.extra_payment, item.remaining_balance);
    }
    if schedule.len() > 24 {
        println!("... ({} more months)", schedule.len() - 24);
    }

    if let Some(path) = &args.output {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        for item in &schedule.items {
            writer.serialize(item)?;
        }
        writer.flush()?;
        println!("\nFull schedule written to: {}", path.display());
    }

    let summary = schedule.summary();
    println!("\nSummary:");
    println!("  Months: {}", summary.total_months);
    println!("  Total Interest: ${:.2}", summary.total_interest);
    println!("  Total Paid: ${:.2}", summary.total_paid);
    match schedule.payoff_date() {
        Some(date) => println!("  Payoff: {}", date),
        None => println!("  Did not fully amortize; ${:.2} still owing", summary.final_balance),
    }

    Ok(())
}
