use anyhow::{bail, Result};
use chrono::Datelike;
use clap::{Args, Subcommand};

use cofre_data::Transaction;
use cofre_ledger::{datetime, reports};

use crate::commands::transactions::owner_transactions;
use crate::context::Context;
use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Report {
    /// Totals, category breakdown and monthly evolution for a year
    #[clap(name = "dashboard")]
    Dashboard(DashboardReport),
    /// Totals and categories for one month
    #[clap(name = "monthly")]
    Monthly(MonthlyReport),
}

impl Report {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        match self {
            Report::Dashboard(cmd) => cmd.run(ctx).await,
            Report::Monthly(cmd) => cmd.run(ctx).await,
        }
    }
}

fn paid_only(expenses: &[Transaction]) -> Vec<Transaction> {
    expenses
        .iter()
        .filter(|tx| tx.is_paid == Some(true))
        .cloned()
        .collect()
}

#[derive(Args, Debug)]
pub struct DashboardReport {
    /// Year for the monthly evolution, current year if omitted
    #[clap(short, long)]
    pub year: Option<i32>,
}

impl DashboardReport {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let user = ctx.current_user().await?;
        let year = self.year.unwrap_or(datetime::today().year());
        let (incomes, expenses) = owner_transactions(ctx, &user).await?;

        println!();
        reports::totals(&incomes, &expenses).print_formatted();

        println!();
        println!("Paid expenses by category");
        reports::by_category(&paid_only(&expenses)).print_formatted();

        println!();
        println!("Monthly evolution {}", year);
        reports::monthly_breakdown(&incomes, &expenses, year).print_formatted();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct MonthlyReport {
    #[clap(short, long)]
    pub year: Option<i32>,
    /// 1-12, current month if omitted
    #[clap(short, long)]
    pub month: Option<u32>,
}

impl MonthlyReport {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let today = datetime::today();
        let year = self.year.unwrap_or(today.year());
        let month = self.month.unwrap_or(today.month());
        if !(1..=12).contains(&month) {
            bail!("Month must be between 1 and 12.");
        }

        let user = ctx.current_user().await?;
        let (incomes, expenses) = owner_transactions(ctx, &user).await?;
        let incomes = reports::in_month(&incomes, year, month);
        let expenses = reports::in_month(&expenses, year, month);

        println!();
        println!("Report for {}-{:02}", year, month);
        reports::totals(&incomes, &expenses).print_formatted();

        println!();
        println!("Paid expenses by category");
        reports::by_category(&paid_only(&expenses)).print_formatted();

        Ok(())
    }
}
