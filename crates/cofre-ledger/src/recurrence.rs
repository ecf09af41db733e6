use chrono::Months;
use rand::Rng;
use thiserror::Error as ThisError;

use cofre_data::Transaction;

/// Instances a fixed monthly series always produces.
pub const FIXED_MONTHLY_INSTANCES: u32 = 12;

/// Upper bound for custom repeat counts.
pub const MAX_REPEAT_COUNT: u32 = 60;

#[derive(Debug, Clone, ThisError)]
pub enum Error {
    #[error("Unknown recurrence type {0:?}")]
    UnknownKind(String),
    #[error("A repeat count is required for custom repeats")]
    MissingCount,
    #[error("Repeat count {0} is out of range (1-60)")]
    CountOutOfRange(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    FixedMonthly,
    CustomRepeat,
}

impl Recurrence {
    /// Parse the stored recurrence token.
    pub fn parse(kind: &str) -> Result<Self, Error> {
        match kind {
            "fixed_monthly" => Ok(Recurrence::FixedMonthly),
            "custom_repeat" => Ok(Recurrence::CustomRepeat),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::FixedMonthly => "fixed_monthly",
            Recurrence::CustomRepeat => "custom_repeat",
        }
    }
}

/// Fresh identifier shared by all instances of one series.
pub fn group_token() -> String {
    let token: [u8; 12] = rand::thread_rng().gen();
    hex::encode(token)
}

/// Expand a transaction template into its recurrence series: one record
/// per month, anchored at the template date, all sharing a fresh group
/// token.
///
/// Month stepping clamps to the last valid day of shorter target months,
/// so a series anchored on Jan 31 2024 lands on Feb 29 2024.
pub fn expand(
    template: &Transaction,
    kind: Recurrence,
    count: Option<u32>,
) -> Result<Vec<Transaction>, Error> {
    let instances = match kind {
        Recurrence::FixedMonthly => FIXED_MONTHLY_INSTANCES,
        Recurrence::CustomRepeat => {
            let count = count.ok_or(Error::MissingCount)?;
            if count == 0 || count > MAX_REPEAT_COUNT {
                return Err(Error::CountOutOfRange(count));
            }
            count
        }
    };

    let group = group_token();
    let mut series = Vec::with_capacity(instances as usize);
    for i in 0..instances {
        // Stepping a calendar date by at most 60 months stays well
        // inside the supported date range.
        let date = template.date.checked_add_months(Months::new(i)).unwrap();
        series.push(Transaction {
            date,
            is_recurring: true,
            recurrence_type: Some(kind.as_str().to_string()),
            recurrence_count: match kind {
                Recurrence::CustomRepeat => Some(instances),
                Recurrence::FixedMonthly => None,
            },
            recurrence_group_id: Some(group.clone()),
            parent_transaction_id: None,
            ..template.clone()
        });
    }
    Ok(series)
}
