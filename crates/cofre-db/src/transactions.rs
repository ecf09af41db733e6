use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteConnection, Connection as SqlConnection, QueryBuilder, Sqlite};

use cofre_data::{
    Delete, DeleteGroup, Insert, InsertBatch, Ledger, Query, Retrieve, Transaction,
    TransactionFilter, TransactionPatch, Update, UpdateGroup,
};

use crate::{
    results::{Id, QueryError},
    Connection,
};

/// SELECT head for a ledger. The ledger tag and the income NULL is_paid
/// are produced as literal columns so both tables decode into the same
/// record shape.
fn select_head(ledger: Ledger) -> &'static str {
    match ledger {
        Ledger::Income => {
            r#"
            SELECT
                'income' AS ledger,
                id,
                user_id,
                description,
                ROUND(amount, 10) AS amount,
                category,
                date,
                NULL AS is_paid,
                is_recurring,
                recurrence_type,
                recurrence_count,
                recurrence_group_id,
                parent_transaction_id
            FROM incomes
            WHERE 1
            "#
        }
        Ledger::Expense => {
            r#"
            SELECT
                'expense' AS ledger,
                id,
                user_id,
                description,
                ROUND(amount, 10) AS amount,
                category,
                date,
                is_paid,
                is_recurring,
                recurrence_type,
                recurrence_count,
                recurrence_group_id,
                parent_transaction_id
            FROM expenses
            WHERE 1
            "#
        }
    }
}

fn table(ledger: Ledger) -> &'static str {
    match ledger {
        Ledger::Income => "incomes",
        Ledger::Expense => "expenses",
    }
}

async fn insert_transaction(conn: &mut SqliteConnection, tx: &Transaction) -> Result<Id> {
    let mut qry = match tx.ledger {
        Ledger::Income => QueryBuilder::<Sqlite>::new(
            r#"INSERT INTO incomes (
                user_id,
                description,
                amount,
                category,
                date,
                is_recurring,
                recurrence_type,
                recurrence_count,
                recurrence_group_id,
                parent_transaction_id
            ) VALUES (
            "#,
        ),
        Ledger::Expense => QueryBuilder::<Sqlite>::new(
            r#"INSERT INTO expenses (
                user_id,
                description,
                amount,
                category,
                date,
                is_paid,
                is_recurring,
                recurrence_type,
                recurrence_count,
                recurrence_group_id,
                parent_transaction_id
            ) VALUES (
            "#,
        ),
    };

    let mut fields = qry.separated(", ");
    fields
        .push_bind(tx.user_id)
        .push_bind(&tx.description)
        .push_bind(tx.amount)
        .push_bind(&tx.category)
        .push_bind(tx.date);
    if tx.ledger == Ledger::Expense {
        fields.push_bind(tx.is_paid.unwrap_or(false));
    }
    fields
        .push_bind(tx.is_recurring)
        .push_bind(&tx.recurrence_type)
        .push_bind(tx.recurrence_count)
        .push_bind(&tx.recurrence_group_id)
        .push_bind(tx.parent_transaction_id);

    let insert: Id = qry
        .push(") RETURNING id ")
        .build_query_as()
        .fetch_one(&mut *conn)
        .await?;
    Ok(insert)
}

#[async_trait]
impl Query<Transaction> for Connection {
    type Filter = TransactionFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Transaction>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(select_head(filter.ledger));

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(user_id) = filter.user_id {
            qry.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(group_id) = filter.group_id.clone() {
            qry.push(" AND recurrence_group_id = ").push_bind(group_id);
        }
        if let Some(date) = filter.date {
            qry.push(" AND date = ").push_bind(date);
        }
        if let Some(date_before) = filter.date_before {
            qry.push(" AND date <= ").push_bind(date_before);
        }
        if let Some(date_after) = filter.date_after {
            qry.push(" AND date >= ").push_bind(date_after);
        }
        qry.push(" ORDER BY date DESC, id DESC ");

        let transactions: Vec<Transaction> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(transactions)
    }
}

#[async_trait]
impl Retrieve<Transaction> for Connection {
    type Key = (Ledger, u32);
    async fn retrieve(&self, key: Self::Key) -> Result<Transaction> {
        let (ledger, id) = key;
        let filter = TransactionFilter {
            ledger,
            id: Some(id),
            ..Default::default()
        };
        let mut transactions = self.query(&filter).await?;
        if transactions.len() > 1 {
            return Err(QueryError::Ambiguous(transactions.len()).into());
        }
        let transaction = transactions.pop().ok_or(QueryError::NotFound)?;
        Ok(transaction)
    }
}

#[async_trait]
impl Insert<Transaction> for Connection {
    async fn insert(&self, tx: Transaction) -> Result<Transaction> {
        let insert = {
            let mut conn = self.lock().await;
            insert_transaction(&mut conn, &tx).await?
        };
        self.retrieve((tx.ledger, insert.id)).await
    }
}

#[async_trait]
impl InsertBatch<Transaction> for Connection {
    /// Insert a whole series in one database transaction. Follower rows
    /// of a recurrence group get parent_transaction_id pointed at the
    /// first row's assigned id.
    async fn insert_batch(&self, items: Vec<Transaction>) -> Result<Vec<Transaction>> {
        if items.is_empty() {
            return Ok(vec![]);
        }
        let ledger = items[0].ledger;
        let mut ids: Vec<u32> = Vec::with_capacity(items.len());
        {
            let mut conn = self.lock().await;
            let mut db_tx = conn.begin().await?;
            let mut first_id: Option<u32> = None;
            for mut item in items {
                if item.recurrence_group_id.is_some() && item.parent_transaction_id.is_none() {
                    item.parent_transaction_id = first_id;
                }
                let insert = insert_transaction(&mut db_tx, &item).await?;
                if first_id.is_none() {
                    first_id = Some(insert.id);
                }
                ids.push(insert.id);
            }
            db_tx.commit().await?;
        }

        let mut created = Vec::with_capacity(ids.len());
        for id in ids {
            created.push(self.retrieve((ledger, id)).await?);
        }
        Ok(created)
    }
}

#[async_trait]
impl Update<Transaction> for Connection {
    async fn update(&self, tx: Transaction) -> Result<Transaction> {
        {
            let mut conn = self.lock().await;
            let mut qry =
                QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET", table(tx.ledger)));
            qry.push(" description = ")
                .push_bind(&tx.description)
                .push(", amount = ")
                .push_bind(tx.amount)
                .push(", category = ")
                .push_bind(&tx.category)
                .push(", date = ")
                .push_bind(tx.date);
            if tx.ledger == Ledger::Expense {
                qry.push(", is_paid = ").push_bind(tx.is_paid.unwrap_or(false));
            }
            qry.push(", is_recurring = ")
                .push_bind(tx.is_recurring)
                .push(", recurrence_type = ")
                .push_bind(&tx.recurrence_type)
                .push(", recurrence_count = ")
                .push_bind(tx.recurrence_count)
                .push(", recurrence_group_id = ")
                .push_bind(&tx.recurrence_group_id)
                .push(", parent_transaction_id = ")
                .push_bind(tx.parent_transaction_id)
                .push(" WHERE id = ")
                .push_bind(tx.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve((tx.ledger, tx.id)).await
    }
}

#[async_trait]
impl Delete<Transaction> for Connection {
    async fn delete(&self, tx: Transaction) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new(format!("DELETE FROM {} WHERE id = ", table(tx.ledger)))
            .push_bind(tx.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DeleteGroup<Transaction> for Connection {
    type Group = (Ledger, String);
    async fn delete_group(&self, group: Self::Group) -> Result<()> {
        let (ledger, group_id) = group;
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new(format!(
            "DELETE FROM {} WHERE recurrence_group_id = ",
            table(ledger)
        ))
        .push_bind(group_id)
        .build()
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UpdateGroup<Transaction> for Connection {
    type Group = (Ledger, String);
    type Patch = TransactionPatch;
    async fn update_group(
        &self,
        group: Self::Group,
        patch: &Self::Patch,
    ) -> Result<Vec<Transaction>> {
        let (ledger, group_id) = group;
        {
            let mut conn = self.lock().await;
            let mut qry =
                QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", table(ledger)));
            let mut any = false;
            {
                let mut sets = qry.separated(", ");
                if let Some(description) = patch.description.clone() {
                    sets.push(" description = ").push_bind_unseparated(description);
                    any = true;
                }
                if let Some(amount) = patch.amount {
                    sets.push(" amount = ").push_bind_unseparated(amount);
                    any = true;
                }
                if let Some(category) = patch.category.clone() {
                    sets.push(" category = ").push_bind_unseparated(category);
                    any = true;
                }
                if ledger == Ledger::Expense {
                    if let Some(is_paid) = patch.is_paid {
                        sets.push(" is_paid = ").push_bind_unseparated(is_paid);
                        any = true;
                    }
                }
            }
            if any {
                qry.push(" WHERE recurrence_group_id = ")
                    .push_bind(group_id.clone())
                    .build()
                    .execute(&mut *conn)
                    .await?;
            }
        }
        let filter = TransactionFilter {
            ledger,
            group_id: Some(group_id),
            ..Default::default()
        };
        self.query(&filter).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use cofre_data::User;

    use super::*;

    async fn test_user(db: &Connection) -> User {
        db.insert(User {
            email: "tester@cofre.app".to_string(),
            password_salt: "00".to_string(),
            password_hash: "00".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_transaction_insert() {
        let db = Connection::open_test().await;
        let user = test_user(&db).await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let tx = Transaction {
            ledger: Ledger::Expense,
            user_id: user.id,
            description: "Supermercado".to_string(),
            amount: 230.5,
            category: "Alimentação".to_string(),
            date,
            is_paid: Some(false),
            ..Default::default()
        };
        let tx = db.insert(tx).await.unwrap();

        assert!(tx.id > 0);
        assert_eq!(tx.ledger, Ledger::Expense);
        assert_eq!(tx.user_id, user.id);
        assert_eq!(tx.description, "Supermercado");
        assert_eq!(tx.amount, 230.5);
        assert_eq!(tx.category, "Alimentação");
        assert_eq!(tx.date, date);
        assert_eq!(tx.is_paid, Some(false));
        assert!(!tx.is_recurring);
        assert_eq!(tx.recurrence_group_id, None);
    }

    #[tokio::test]
    async fn test_income_has_no_paid_flag() {
        let db = Connection::open_test().await;
        let user = test_user(&db).await;

        let tx = db
            .insert(Transaction {
                ledger: Ledger::Income,
                user_id: user.id,
                description: "Salário".to_string(),
                amount: 4200.0,
                category: "Salário".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(tx.ledger, Ledger::Income);
        assert_eq!(tx.is_paid, None);
    }

    #[tokio::test]
    async fn test_transaction_filter_by_owner() {
        let db = Connection::open_test().await;
        let u1 = test_user(&db).await;
        let u2 = db
            .insert(User {
                email: "other@cofre.app".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        for user_id in [u1.id, u1.id, u2.id] {
            db.insert(Transaction {
                ledger: Ledger::Income,
                user_id,
                description: "Freela".to_string(),
                amount: 100.0,
                category: "Freelance".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let txs: Vec<Transaction> = db
            .query(&TransactionFilter {
                ledger: Ledger::Income,
                user_id: Some(u1.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(txs.len(), 2);
    }

    #[tokio::test]
    async fn test_transaction_listing_is_date_descending() {
        let db = Connection::open_test().await;
        let user = test_user(&db).await;

        for (day, desc) in [(3, "first"), (20, "last"), (11, "middle")] {
            db.insert(Transaction {
                ledger: Ledger::Expense,
                user_id: user.id,
                description: desc.to_string(),
                amount: 10.0,
                category: "Outros".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let txs: Vec<Transaction> = db
            .query(&TransactionFilter {
                ledger: Ledger::Expense,
                user_id: Some(user.id),
                ..Default::default()
            })
            .await
            .unwrap();
        let descriptions: Vec<&str> = txs.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["last", "middle", "first"]);
    }

    #[tokio::test]
    async fn test_transaction_update() {
        let db = Connection::open_test().await;
        let user = test_user(&db).await;

        let mut tx = db
            .insert(Transaction {
                ledger: Ledger::Expense,
                user_id: user.id,
                description: "Internet".to_string(),
                amount: 99.9,
                category: "Moradia".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                is_paid: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        tx.description = "Internet fibra".to_string();
        tx.amount = 109.9;
        tx.is_paid = Some(true);
        let tx = db.update(tx).await.unwrap();

        assert_eq!(tx.description, "Internet fibra");
        assert_eq!(tx.amount, 109.9);
        assert_eq!(tx.is_paid, Some(true));
    }

    #[tokio::test]
    async fn test_transaction_delete() {
        let db = Connection::open_test().await;
        let user = test_user(&db).await;

        let tx = db
            .insert(Transaction {
                ledger: Ledger::Income,
                user_id: user.id,
                description: "Venda".to_string(),
                amount: 50.0,
                category: "Vendas".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();
        let key = (tx.ledger, tx.id);

        db.delete(tx).await.unwrap();

        let gone: Result<Transaction> = db.retrieve(key).await;
        assert!(gone.is_err());
    }

    #[tokio::test]
    async fn test_insert_batch_backfills_parent() {
        let db = Connection::open_test().await;
        let user = test_user(&db).await;
        let group = "aabbccddeeff001122334455".to_string();

        let items: Vec<Transaction> = (0..3)
            .map(|i| Transaction {
                ledger: Ledger::Expense,
                user_id: user.id,
                description: "Aluguel".to_string(),
                amount: 1000.0,
                category: "Moradia".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1 + i, 15).unwrap(),
                is_paid: Some(false),
                is_recurring: true,
                recurrence_type: Some("fixed_monthly".to_string()),
                recurrence_group_id: Some(group.clone()),
                ..Default::default()
            })
            .collect();

        let created = db.insert_batch(items).await.unwrap();
        assert_eq!(created.len(), 3);

        let first_id = created[0].id;
        assert_eq!(created[0].parent_transaction_id, None);
        for follower in &created[1..] {
            assert_eq!(follower.parent_transaction_id, Some(first_id));
            assert_eq!(follower.recurrence_group_id, Some(group.clone()));
        }
    }

    #[tokio::test]
    async fn test_delete_group_leaves_others() {
        let db = Connection::open_test().await;
        let user = test_user(&db).await;
        let group = "0011223344556677889900aa".to_string();

        for month in 1..=3u32 {
            db.insert(Transaction {
                ledger: Ledger::Expense,
                user_id: user.id,
                description: "Academia".to_string(),
                amount: 120.0,
                category: "Saúde".to_string(),
                date: NaiveDate::from_ymd_opt(2024, month, 5).unwrap(),
                is_recurring: true,
                recurrence_type: Some("custom_repeat".to_string()),
                recurrence_count: Some(3),
                recurrence_group_id: Some(group.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        let other = db
            .insert(Transaction {
                ledger: Ledger::Expense,
                user_id: user.id,
                description: "Padaria".to_string(),
                amount: 15.0,
                category: "Alimentação".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();

        db.delete_group((Ledger::Expense, group.clone())).await.unwrap();

        let remaining: Vec<Transaction> = db
            .query(&TransactionFilter {
                ledger: Ledger::Expense,
                user_id: Some(user.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, other.id);
    }

    #[tokio::test]
    async fn test_update_group_preserves_dates() {
        let db = Connection::open_test().await;
        let user = test_user(&db).await;
        let group = "ffeeddccbbaa998877665544".to_string();

        let items: Vec<Transaction> = (0..3)
            .map(|i| Transaction {
                ledger: Ledger::Expense,
                user_id: user.id,
                description: "Streaming".to_string(),
                amount: 29.9,
                category: "Lazer".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1 + i, 20).unwrap(),
                is_recurring: true,
                recurrence_type: Some("fixed_monthly".to_string()),
                recurrence_group_id: Some(group.clone()),
                ..Default::default()
            })
            .collect();
        db.insert_batch(items).await.unwrap();

        let patch = TransactionPatch {
            amount: Some(34.9),
            ..Default::default()
        };
        let updated = db
            .update_group((Ledger::Expense, group.clone()), &patch)
            .await
            .unwrap();

        assert_eq!(updated.len(), 3);
        let mut dates: Vec<NaiveDate> = updated.iter().map(|t| t.date).collect();
        dates.sort();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            ]
        );
        for tx in updated {
            assert_eq!(tx.amount, 34.9);
            assert_eq!(tx.description, "Streaming");
        }
    }
}
