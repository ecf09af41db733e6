use std::collections::BTreeMap;

use cofre_data::{Transaction, UserProfile};
use cofre_ledger::reports::{MonthlyTotals, Totals};

macro_rules! next_attr {
    ($old:ident, $new:ident, $attr:ident) => {
        if $old.$attr != $new.$attr {
            format!(" -> {}", $new.$attr)
        } else {
            "".to_string()
        }
    };
}

pub trait PrintFormatted {
    fn print_formatted(&self);
}

fn paid_label(tx: &Transaction) -> &'static str {
    match tx.is_paid {
        Some(true) => "paid",
        Some(false) => "pending",
        None => "-",
    }
}

impl PrintFormatted for Transaction {
    fn print_formatted(&self) {
        let recurring = match (&self.recurrence_type, &self.recurrence_group_id) {
            (Some(kind), Some(group)) => format!("{} (series {})", kind, group),
            _ => "no".to_string(),
        };

        println!("Description:\t\t{}", self.description);
        println!("Category:\t\t{}", self.category);
        println!("Amount:\t\t\t{:.2}", self.amount);
        println!("Date:\t\t\t{}", self.date);
        println!("Paid:\t\t\t{}", paid_label(self));
        println!("Recurring:\t\t{}", recurring);
    }
}

impl PrintFormatted for Vec<Transaction> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<12}\t{:<30}\t{:<16}\t{:>12}\t{:<8}\t{}",
            "ID", "Date", "Description", "Category", "Amount", "Paid", "Recurring"
        );
        println!("{:-<120}", "-");

        for tx in self {
            let recurring = tx.recurrence_type.as_deref().unwrap_or("");
            println!(
                "{:>4}\t{:<12}\t{:<30}\t{:<16}\t{:>12.2}\t{:<8}\t{}",
                tx.id,
                tx.date.to_string(),
                tx.description,
                tx.category,
                tx.amount,
                paid_label(tx),
                recurring,
            );
        }
    }
}

impl PrintFormatted for (Transaction, Transaction) {
    fn print_formatted(&self) {
        let (old, new) = self;
        let old_paid = paid_label(old);
        let new_paid = paid_label(new);

        let next_description = next_attr!(old, new, description);
        println!("Description:\t\t{}{}", old.description, next_description);
        let next_category = next_attr!(old, new, category);
        println!("Category:\t\t{}{}", old.category, next_category);
        let next_amount = next_attr!(old, new, amount);
        println!("Amount:\t\t\t{}{}", old.amount, next_amount);
        let next_date = next_attr!(old, new, date);
        println!("Date:\t\t\t{}{}", old.date, next_date);
        let next_paid = if old_paid != new_paid {
            format!(" -> {}", new_paid)
        } else {
            "".to_string()
        };
        println!("Paid:\t\t\t{}{}", old_paid, next_paid);
    }
}

impl PrintFormatted for Totals {
    fn print_formatted(&self) {
        println!("Income:\t\t\t{:>12.2}", self.income);
        println!("Paid expenses:\t\t{:>12.2}", self.expenses_paid);
        println!("Pending expenses:\t{:>12.2}", self.expenses_pending);
        println!("Balance:\t\t{:>12.2}", self.balance);
    }
}

impl PrintFormatted for BTreeMap<String, f64> {
    fn print_formatted(&self) {
        println!("{:<24}\t{:>12}", "Category", "Total");
        println!("{:-<40}", "-");
        for (category, total) in self {
            println!("{:<24}\t{:>12.2}", category, total);
        }
    }
}

impl PrintFormatted for Vec<MonthlyTotals> {
    fn print_formatted(&self) {
        println!(
            "{:>5}\t{:>12}\t{:>12}\t{:>12}",
            "Month", "Income", "Expenses", "Balance"
        );
        println!("{:-<60}", "-");
        for month in self {
            println!(
                "{:>5}\t{:>12.2}\t{:>12.2}\t{:>12.2}",
                month.month, month.income, month.expenses, month.balance
            );
        }
    }
}

impl PrintFormatted for UserProfile {
    fn print_formatted(&self) {
        let avatar = match &self.avatar_path {
            Some(path) => path.as_str(),
            None => "None",
        };
        println!("Display name:\t\t{}", self.display_name);
        println!("Theme:\t\t\t{}", self.theme);
        println!("Currency:\t\t{}", self.currency);
        println!("Avatar:\t\t\t{}", avatar);
    }
}
