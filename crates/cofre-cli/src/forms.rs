use anyhow::{bail, Result};
use chrono::NaiveDate;

use cofre_data::{Ledger, Transaction};
use cofre_ledger::recurrence::Recurrence;

/// Form state for a new record. Validated as a whole before anything
/// touches the store.
#[derive(Debug, Default, Clone)]
pub struct TransactionForm {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub paid: bool,
    pub recurrence: Option<String>,
    pub repeat: Option<u32>,
}

/// A validated form: the persistable template plus the recurrence policy,
/// if any.
#[derive(Debug, Clone)]
pub struct ValidatedTransaction {
    pub template: Transaction,
    pub recurrence: Option<Recurrence>,
    pub repeat: Option<u32>,
}

impl TransactionForm {
    pub fn validate(self, ledger: Ledger, user_id: u32) -> Result<ValidatedTransaction> {
        if self.description.trim().is_empty() {
            bail!("Description must not be empty.");
        }
        if !(self.amount > 0.0) {
            bail!("Amount must be positive.");
        }
        if !ledger.categories().contains(&self.category.as_str()) {
            bail!(
                "Unknown {} category {:?}. Expected one of: {}.",
                ledger,
                self.category,
                ledger.categories().join(", ")
            );
        }
        if ledger == Ledger::Income && self.paid {
            bail!("Only expenses track a paid flag.");
        }
        let recurrence = self
            .recurrence
            .as_deref()
            .map(Recurrence::parse)
            .transpose()?;
        if recurrence.is_none() && self.repeat.is_some() {
            bail!("--repeat only applies to recurring records.");
        }

        let template = Transaction {
            ledger,
            user_id,
            description: self.description.trim().to_string(),
            amount: self.amount,
            category: self.category,
            date: self.date,
            is_paid: match ledger {
                Ledger::Expense => Some(self.paid),
                Ledger::Income => None,
            },
            ..Default::default()
        };

        Ok(ValidatedTransaction {
            template,
            recurrence,
            repeat: self.repeat,
        })
    }
}
