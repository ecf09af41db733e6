use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The collection a transaction lives in. Incomes and expenses share one
/// record shape and are told apart by their table.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Ledger {
    #[default]
    Income,
    Expense,
}

pub const INCOME_CATEGORIES: [&str; 5] =
    ["Salário", "Freelance", "Investimentos", "Vendas", "Outros"];

pub const EXPENSE_CATEGORIES: [&str; 8] = [
    "Alimentação",
    "Transporte",
    "Moradia",
    "Saúde",
    "Educação",
    "Lazer",
    "Compras",
    "Outros",
];

impl Ledger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ledger::Income => "income",
            Ledger::Expense => "expense",
        }
    }

    /// The fixed category set for this ledger.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Ledger::Income => &INCOME_CATEGORIES,
            Ledger::Expense => &EXPENSE_CATEGORIES,
        }
    }
}

impl std::fmt::Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Default, Clone, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    pub ledger: Ledger,
    pub user_id: u32,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    /// Expenses only; incomes carry None.
    pub is_paid: Option<bool>,
    pub is_recurring: bool,
    pub recurrence_type: Option<String>,
    pub recurrence_count: Option<u32>,
    pub recurrence_group_id: Option<String>,
    /// Id of the first instance of the series; None for the first
    /// instance itself and for non-recurring records.
    pub parent_transaction_id: Option<u32>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub ledger: Ledger,
    pub id: Option<u32>,
    pub user_id: Option<u32>,
    pub group_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
    pub date_after: Option<NaiveDate>,
}

/// Content-only changes for a group-wide edit. Dates are not part of the
/// patch: every member keeps its own.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub is_paid: Option<bool>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.is_paid.is_none()
    }

    /// Merge the patch into one record. The paid flag only applies to
    /// expenses.
    pub fn apply_to(&self, tx: &mut Transaction) {
        if let Some(description) = &self.description {
            tx.description = description.clone();
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(category) = &self.category {
            tx.category = category.clone();
        }
        if tx.ledger == Ledger::Expense {
            if let Some(is_paid) = self.is_paid {
                tx.is_paid = Some(is_paid);
            }
        }
    }
}
