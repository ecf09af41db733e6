use std::collections::BTreeMap;

use chrono::Datelike;

use cofre_data::Transaction;

/// Headline numbers for the dashboard. The balance only counts expenses
/// that were actually paid.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expenses_paid: f64,
    pub expenses_pending: f64,
    pub balance: f64,
}

fn is_paid(tx: &Transaction) -> bool {
    tx.is_paid == Some(true)
}

pub fn totals(incomes: &[Transaction], expenses: &[Transaction]) -> Totals {
    let income = incomes.iter().map(|tx| tx.amount).sum::<f64>();
    let expenses_paid = expenses
        .iter()
        .filter(|tx| is_paid(tx))
        .map(|tx| tx.amount)
        .sum::<f64>();
    let expenses_pending = expenses
        .iter()
        .filter(|tx| !is_paid(tx))
        .map(|tx| tx.amount)
        .sum::<f64>();

    Totals {
        income,
        expenses_paid,
        expenses_pending,
        balance: income - expenses_paid,
    }
}

/// Sum amounts per category.
pub fn by_category(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut categories = BTreeMap::new();
    for tx in transactions {
        *categories.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
    }
    categories
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MonthlyTotals {
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Totals for each calendar month of a year, paid expenses only.
pub fn monthly_breakdown(
    incomes: &[Transaction],
    expenses: &[Transaction],
    year: i32,
) -> Vec<MonthlyTotals> {
    let mut months: Vec<MonthlyTotals> = (1..=12)
        .map(|month| MonthlyTotals {
            month,
            ..Default::default()
        })
        .collect();

    for tx in incomes.iter().filter(|tx| tx.date.year() == year) {
        months[(tx.date.month() - 1) as usize].income += tx.amount;
    }
    for tx in expenses
        .iter()
        .filter(|tx| tx.date.year() == year && is_paid(tx))
    {
        months[(tx.date.month() - 1) as usize].expenses += tx.amount;
    }
    for month in months.iter_mut() {
        month.balance = month.income - month.expenses;
    }
    months
}

/// Records dated within one calendar month.
pub fn in_month(transactions: &[Transaction], year: i32, month: u32) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.date.year() == year && tx.date.month() == month)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use cofre_data::Ledger;

    use super::*;

    fn income(amount: f64, category: &str, date: (i32, u32, u32)) -> Transaction {
        Transaction {
            ledger: Ledger::Income,
            user_id: 1,
            description: "income".to_string(),
            amount,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            ..Default::default()
        }
    }

    fn expense(amount: f64, category: &str, date: (i32, u32, u32), paid: bool) -> Transaction {
        Transaction {
            ledger: Ledger::Expense,
            user_id: 1,
            description: "expense".to_string(),
            amount,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            is_paid: Some(paid),
            ..Default::default()
        }
    }

    #[test]
    fn test_totals_balance() {
        let incomes = vec![
            income(4200.0, "Salário", (2024, 1, 5)),
            income(800.25, "Freelance", (2024, 1, 20)),
        ];
        let expenses = vec![
            expense(1500.0, "Moradia", (2024, 1, 10), true),
            expense(350.75, "Alimentação", (2024, 1, 12), true),
            expense(120.0, "Lazer", (2024, 1, 15), false),
        ];

        let totals = totals(&incomes, &expenses);
        assert_eq!(totals.income, 5000.25);
        assert_eq!(totals.expenses_paid, 1850.75);
        assert_eq!(totals.expenses_pending, 120.0);
        assert_eq!(totals.balance, totals.income - totals.expenses_paid);
        assert_eq!(totals.balance, 3149.5);
    }

    #[test]
    fn test_totals_empty() {
        let totals = totals(&[], &[]);
        assert_eq!(totals.income, 0.0);
        assert_eq!(totals.balance, 0.0);
    }

    #[test]
    fn test_by_category() {
        let expenses = vec![
            expense(100.0, "Moradia", (2024, 1, 1), true),
            expense(50.0, "Moradia", (2024, 2, 1), true),
            expense(30.0, "Transporte", (2024, 1, 3), true),
        ];

        let categories = by_category(&expenses);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories["Moradia"], 150.0);
        assert_eq!(categories["Transporte"], 30.0);
    }

    #[test]
    fn test_monthly_breakdown() {
        let incomes = vec![
            income(1000.0, "Salário", (2024, 1, 5)),
            income(1000.0, "Salário", (2024, 2, 5)),
            income(999.0, "Salário", (2023, 2, 5)),
        ];
        let expenses = vec![
            expense(400.0, "Moradia", (2024, 2, 10), true),
            expense(100.0, "Lazer", (2024, 2, 11), false),
        ];

        let months = monthly_breakdown(&incomes, &expenses, 2024);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].income, 1000.0);
        assert_eq!(months[0].expenses, 0.0);
        assert_eq!(months[1].income, 1000.0);
        // The pending Lazer expense does not count
        assert_eq!(months[1].expenses, 400.0);
        assert_eq!(months[1].balance, 600.0);
        assert_eq!(months[2].income, 0.0);
    }

    #[test]
    fn test_in_month() {
        let expenses = vec![
            expense(10.0, "Outros", (2024, 3, 1), true),
            expense(20.0, "Outros", (2024, 3, 31), true),
            expense(30.0, "Outros", (2024, 4, 1), true),
            expense(40.0, "Outros", (2023, 3, 10), true),
        ];

        let march = in_month(&expenses, 2024, 3);
        assert_eq!(march.len(), 2);
        assert_eq!(march.iter().map(|tx| tx.amount).sum::<f64>(), 30.0);
    }
}
