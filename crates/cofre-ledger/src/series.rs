use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error as ThisError;

use cofre_data::{
    Delete, DeleteGroup, Ledger, Transaction, TransactionPatch, Update, UpdateGroup,
};

#[derive(Debug, Clone, ThisError)]
pub enum Error {
    #[error("Recurring transaction {0} carries no recurrence group")]
    MissingGroup(u32),
    #[error("Unknown scope {0:?}, expected \"single\" or \"all\"")]
    UnknownScope(String),
}

/// Whether an edit or delete applies to one instance or to the whole
/// recurrence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesScope {
    Single,
    All,
}

impl SeriesScope {
    pub fn parse(scope: &str) -> Result<Self, Error> {
        match scope {
            "single" => Ok(SeriesScope::Single),
            "all" => Ok(SeriesScope::All),
            other => Err(Error::UnknownScope(other.to_string())),
        }
    }
}

#[async_trait]
pub trait SeriesDelete {
    /// Delete this record alone, or every member of its recurrence group.
    async fn delete_scoped<DB>(self, db: &DB, scope: SeriesScope) -> Result<()>
    where
        DB: Delete<Transaction>
            + DeleteGroup<Transaction, Group = (Ledger, String)>
            + Send
            + Sync;
}

#[async_trait]
impl SeriesDelete for Transaction {
    async fn delete_scoped<DB>(self, db: &DB, scope: SeriesScope) -> Result<()>
    where
        DB: Delete<Transaction>
            + DeleteGroup<Transaction, Group = (Ledger, String)>
            + Send
            + Sync,
    {
        match scope {
            SeriesScope::Single => db.delete(self).await,
            SeriesScope::All => {
                let group = self
                    .recurrence_group_id
                    .clone()
                    .ok_or(Error::MissingGroup(self.id))?;
                db.delete_group((self.ledger, group)).await
            }
        }
    }
}

#[async_trait]
pub trait SeriesEdit {
    /// Apply content changes to this record alone, or to every member of
    /// its recurrence group. Group-wide edits never touch the members'
    /// dates. Returns the records as persisted.
    async fn apply_edit<DB>(
        self,
        db: &DB,
        patch: TransactionPatch,
        scope: SeriesScope,
    ) -> Result<Vec<Transaction>>
    where
        DB: Update<Transaction>
            + UpdateGroup<Transaction, Group = (Ledger, String), Patch = TransactionPatch>
            + Send
            + Sync;
}

#[async_trait]
impl SeriesEdit for Transaction {
    async fn apply_edit<DB>(
        mut self,
        db: &DB,
        patch: TransactionPatch,
        scope: SeriesScope,
    ) -> Result<Vec<Transaction>>
    where
        DB: Update<Transaction>
            + UpdateGroup<Transaction, Group = (Ledger, String), Patch = TransactionPatch>
            + Send
            + Sync,
    {
        match scope {
            SeriesScope::Single => {
                patch.apply_to(&mut self);
                let updated = db.update(self).await?;
                Ok(vec![updated])
            }
            SeriesScope::All => {
                let group = self
                    .recurrence_group_id
                    .clone()
                    .ok_or(Error::MissingGroup(self.id))?;
                db.update_group((self.ledger, group), &patch).await
            }
        }
    }
}
