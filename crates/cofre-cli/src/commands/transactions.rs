use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use inquire::{Confirm, Select};

use cofre_data::{
    Insert, InsertBatch, Ledger, Query, Retrieve, Transaction, TransactionFilter,
    TransactionPatch, Update, User,
};
use cofre_ledger::datetime;
use cofre_ledger::recurrence;
use cofre_ledger::series::{SeriesDelete, SeriesEdit, SeriesScope};

use crate::context::Context;
use crate::formatting::PrintFormatted;
use crate::forms::TransactionForm;

#[derive(Subcommand, Debug)]
pub enum TransactionCmd {
    /// List records
    #[clap(name = "list")]
    List(ListTransactions),
    /// Add a record, optionally as a recurring series
    #[clap(name = "add")]
    Add(AddTransaction),
    /// Update a record or its whole series
    #[clap(name = "set")]
    Set(UpdateTransaction),
    /// Delete a record or its whole series
    #[clap(name = "delete")]
    Delete(DeleteTransaction),
    /// Mark an expense as paid
    #[clap(name = "pay")]
    Pay(PayTransaction),
}

impl TransactionCmd {
    pub async fn run(self, ctx: &Context, ledger: Ledger) -> Result<()> {
        match self {
            TransactionCmd::List(cmd) => cmd.run(ctx, ledger).await,
            TransactionCmd::Add(cmd) => cmd.run(ctx, ledger).await,
            TransactionCmd::Set(cmd) => cmd.run(ctx, ledger).await,
            TransactionCmd::Delete(cmd) => cmd.run(ctx, ledger).await,
            TransactionCmd::Pay(cmd) => cmd.run(ctx, ledger).await,
        }
    }
}

/// Fetch a record and make sure it belongs to the signed-in user.
async fn retrieve_own(
    ctx: &Context,
    ledger: Ledger,
    id: u32,
    user: &User,
) -> Result<Transaction> {
    let tx: Transaction = ctx.db.retrieve((ledger, id)).await?;
    if tx.user_id != user.id {
        return Err(anyhow!("No {} record with id {}.", ledger, id));
    }
    Ok(tx)
}

/// Ask for the action scope when the record is part of a series and the
/// caller did not pass one.
fn resolve_scope(tx: &Transaction, scope: Option<&str>) -> Result<SeriesScope> {
    match scope {
        Some(scope) => Ok(SeriesScope::parse(scope)?),
        None if tx.is_recurring => {
            let choice = Select::new(
                "This record is part of a recurring series. Apply to:",
                vec!["single", "all"],
            )
            .prompt()?;
            Ok(SeriesScope::parse(choice)?)
        }
        None => Ok(SeriesScope::Single),
    }
}

/// Re-fetch and print the user's collection, so the listing reflects the
/// store after a mutation.
async fn reload(ctx: &Context, ledger: Ledger, user: &User) -> Result<()> {
    let transactions: Vec<Transaction> = ctx
        .db
        .query(&TransactionFilter {
            ledger,
            user_id: Some(user.id),
            ..Default::default()
        })
        .await?;
    println!();
    println!("{} {} records.", transactions.len(), ledger);
    transactions.print_formatted();
    Ok(())
}

#[derive(Args, Debug)]
pub struct ListTransactions {
    /// Match against description and category
    #[clap(short, long)]
    pub search: Option<String>,
    #[clap(short, long)]
    pub after_date: Option<NaiveDate>,
    #[clap(short, long)]
    pub before_date: Option<NaiveDate>,
}

impl ListTransactions {
    pub async fn run(self, ctx: &Context, ledger: Ledger) -> Result<()> {
        let user = ctx.current_user().await?;

        let filter = TransactionFilter {
            ledger,
            user_id: Some(user.id),
            date_after: self.after_date,
            date_before: self.before_date,
            ..Default::default()
        };
        let mut transactions: Vec<Transaction> = ctx.db.query(&filter).await?;

        if let Some(term) = self.search {
            let term = term.to_lowercase();
            transactions.retain(|tx| {
                tx.description.to_lowercase().contains(&term)
                    || tx.category.to_lowercase().contains(&term)
            });
        }

        let total = transactions.iter().map(|tx| tx.amount).sum::<f64>();
        println!("{} {} records, total {:.2}.", transactions.len(), ledger, total);
        transactions.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddTransaction {
    #[clap(short, long)]
    pub description: String,
    #[clap(short, long)]
    pub amount: f64,
    #[clap(short, long)]
    pub category: String,
    /// Date of the record, today if omitted
    #[clap(long)]
    pub date: Option<NaiveDate>,
    /// Expenses only: mark as already paid
    #[clap(long)]
    pub paid: bool,
    /// Repeat monthly: fixed_monthly or custom_repeat
    #[clap(short, long)]
    pub recurrence: Option<String>,
    /// Number of instances for custom_repeat (1-60)
    #[clap(long)]
    pub repeat: Option<u32>,
}

impl AddTransaction {
    pub async fn run(self, ctx: &Context, ledger: Ledger) -> Result<()> {
        let user = ctx.current_user().await?;

        let form = TransactionForm {
            description: self.description,
            amount: self.amount,
            category: self.category,
            date: self.date.unwrap_or(datetime::today()),
            paid: self.paid,
            recurrence: self.recurrence,
            repeat: self.repeat,
        };
        let valid = form.validate(ledger, user.id)?;

        println!();
        valid.template.print_formatted();
        println!();

        match valid.recurrence {
            Some(kind) => {
                let series = recurrence::expand(&valid.template, kind, valid.repeat)?;
                let question =
                    format!("Add {} monthly {} records?", series.len(), ledger);
                if !Confirm::new(&question).with_default(true).prompt()? {
                    return Ok(());
                }

                let created = ctx.db.insert_batch(series).await?;
                tracing::info!(
                    count = created.len(),
                    group = created[0].recurrence_group_id.as_deref(),
                    "created recurring series"
                );
                println!(
                    "Created {} records in series {}.",
                    created.len(),
                    created[0].recurrence_group_id.as_deref().unwrap_or("?")
                );
            }
            None => {
                let question = format!("Add {} record?", ledger);
                if !Confirm::new(&question).with_default(true).prompt()? {
                    return Ok(());
                }
                let created = ctx.db.insert(valid.template).await?;
                println!("Added with id {}.", created.id);
            }
        }

        reload(ctx, ledger, &user).await
    }
}

#[derive(Args, Debug)]
pub struct UpdateTransaction {
    #[clap(short, long)]
    pub id: u32,
    #[clap(short, long)]
    pub description: Option<String>,
    #[clap(short, long)]
    pub amount: Option<f64>,
    #[clap(short, long)]
    pub category: Option<String>,
    /// New date, single-record edits only
    #[clap(long)]
    pub date: Option<NaiveDate>,
    /// Expenses only
    #[clap(long)]
    pub paid: Option<bool>,
    /// single or all, asked interactively for series members if omitted
    #[clap(short, long)]
    pub scope: Option<String>,
}

impl UpdateTransaction {
    pub async fn run(self, ctx: &Context, ledger: Ledger) -> Result<()> {
        let user = ctx.current_user().await?;
        let tx = retrieve_own(ctx, ledger, self.id, &user).await?;

        if let Some(category) = &self.category {
            if !ledger.categories().contains(&category.as_str()) {
                bail!(
                    "Unknown {} category {:?}. Expected one of: {}.",
                    ledger,
                    category,
                    ledger.categories().join(", ")
                );
            }
        }
        if let Some(amount) = self.amount {
            if !(amount > 0.0) {
                bail!("Amount must be positive.");
            }
        }
        if ledger == Ledger::Income && self.paid.is_some() {
            bail!("Only expenses track a paid flag.");
        }

        let patch = TransactionPatch {
            description: self.description,
            amount: self.amount,
            category: self.category,
            is_paid: self.paid,
        };
        if patch.is_empty() && self.date.is_none() {
            bail!("Nothing to change.");
        }

        let scope = resolve_scope(&tx, self.scope.as_deref())?;
        if scope == SeriesScope::All && self.date.is_some() {
            bail!("A date change applies to a single record, not a whole series.");
        }

        match scope {
            SeriesScope::Single => {
                let mut base = tx.clone();
                if let Some(date) = self.date {
                    base.date = date;
                }
                let mut preview = base.clone();
                patch.apply_to(&mut preview);

                println!();
                (tx, preview).print_formatted();
                println!();
                let confirm = Confirm::new("Update record?").with_default(true);
                if !confirm.prompt()? {
                    return Ok(());
                }

                base.apply_edit(&ctx.db, patch, SeriesScope::Single).await?;
            }
            SeriesScope::All => {
                println!();
                tx.print_formatted();
                println!();
                let confirm = Confirm::new("Update every record in this series?")
                    .with_default(true);
                if !confirm.prompt()? {
                    return Ok(());
                }

                let updated = tx.apply_edit(&ctx.db, patch, SeriesScope::All).await?;
                println!("Updated {} records.", updated.len());
            }
        }

        reload(ctx, ledger, &user).await
    }
}

#[derive(Args, Debug)]
pub struct DeleteTransaction {
    #[clap(short, long)]
    pub id: u32,
    /// single or all, asked interactively for series members if omitted
    #[clap(short, long)]
    pub scope: Option<String>,
}

impl DeleteTransaction {
    pub async fn run(self, ctx: &Context, ledger: Ledger) -> Result<()> {
        let user = ctx.current_user().await?;
        let tx = retrieve_own(ctx, ledger, self.id, &user).await?;

        println!();
        tx.print_formatted();
        println!();

        let scope = resolve_scope(&tx, self.scope.as_deref())?;
        let question = match scope {
            SeriesScope::Single => format!("Delete this {} record?", ledger),
            SeriesScope::All => "Delete every record in this series?".to_string(),
        };
        let confirm = Confirm::new(&question).with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        tx.delete_scoped(&ctx.db, scope).await?;
        reload(ctx, ledger, &user).await
    }
}

#[derive(Args, Debug)]
pub struct PayTransaction {
    #[clap(short, long)]
    pub id: u32,
}

impl PayTransaction {
    pub async fn run(self, ctx: &Context, ledger: Ledger) -> Result<()> {
        if ledger != Ledger::Expense {
            bail!("Only expenses can be marked as paid.");
        }
        let user = ctx.current_user().await?;
        let mut tx = retrieve_own(ctx, ledger, self.id, &user).await?;

        if tx.is_paid == Some(true) {
            println!("Already paid.");
            return Ok(());
        }
        tx.is_paid = Some(true);
        let tx = ctx.db.update(tx).await?;
        println!("Marked {:?} as paid.", tx.description);

        reload(ctx, ledger, &user).await
    }
}

/// Load the user's two collections, the way the dashboard does.
pub async fn owner_transactions(
    ctx: &Context,
    user: &User,
) -> Result<(Vec<Transaction>, Vec<Transaction>)> {
    let incomes: Vec<Transaction> = ctx
        .db
        .query(&TransactionFilter {
            ledger: Ledger::Income,
            user_id: Some(user.id),
            ..Default::default()
        })
        .await?;
    let expenses: Vec<Transaction> = ctx
        .db
        .query(&TransactionFilter {
            ledger: Ledger::Expense,
            user_id: Some(user.id),
            ..Default::default()
        })
        .await?;
    Ok((incomes, expenses))
}
