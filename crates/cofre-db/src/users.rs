use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use cofre_data::{Insert, Query, Retrieve, User, UserFilter};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<User> for Connection {
    type Filter = UserFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<User>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                id,
                email,
                password_salt,
                password_hash,
                created_at
            FROM users
            WHERE 1
            "#,
        );
        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(email) = filter.email.clone() {
            qry.push(" AND email = ").push_bind(email);
        }

        let users: Vec<User> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(users)
    }
}

#[async_trait]
impl Retrieve<User> for Connection {
    type Key = u32;
    async fn retrieve(&self, user_id: Self::Key) -> Result<User> {
        let filter = UserFilter {
            id: Some(user_id),
            ..Default::default()
        };
        let mut users = self.query(&filter).await?;
        if users.len() > 1 {
            return Err(QueryError::Ambiguous(users.len()).into());
        }
        let user = users.pop().ok_or(QueryError::NotFound)?;
        Ok(user)
    }
}

#[async_trait]
impl Insert<User> for Connection {
    async fn insert(&self, user: User) -> Result<User> {
        let insert: Id = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO users (
                    email,
                    password_salt,
                    password_hash,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&user.email)
                .push_bind(&user.password_salt)
                .push_bind(&user.password_hash)
                .push_bind(user.created_at);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[tokio::test]
    async fn test_user_insert_and_retrieve() {
        let db = Connection::open_test().await;
        let user = db
            .insert(User {
                email: "eu@cofre.app".to_string(),
                password_salt: "deadbeef".to_string(),
                password_hash: "cafebabe".to_string(),
                created_at: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(user.id > 0);
        let again: User = db.retrieve(user.id).await.unwrap();
        assert_eq!(again.email, "eu@cofre.app");
        assert_eq!(again.password_salt, "deadbeef");
        assert_eq!(again.created_at, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let db = Connection::open_test().await;
        let user = User {
            email: "dup@cofre.app".to_string(),
            ..Default::default()
        };
        db.insert(user.clone()).await.unwrap();
        assert!(db.insert(user).await.is_err());
    }

    #[tokio::test]
    async fn test_user_query_by_email() {
        let db = Connection::open_test().await;
        db.insert(User {
            email: "a@cofre.app".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
        db.insert(User {
            email: "b@cofre.app".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        let found: Vec<User> = db
            .query(&UserFilter {
                email: Some("b@cofre.app".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "b@cofre.app");
    }
}
