use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use cofre_data::{Delete, Insert, Retrieve, Session};

use crate::{results::QueryError, Connection};

#[async_trait]
impl Retrieve<Session> for Connection {
    type Key = String;
    async fn retrieve(&self, token: Self::Key) -> Result<Session> {
        let mut conn = self.lock().await;
        let session: Option<Session> = sqlx::query_as(
            "SELECT token, user_id, created_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(session.ok_or(QueryError::NotFound)?)
    }
}

#[async_trait]
impl Insert<Session> for Connection {
    async fn insert(&self, session: Session) -> Result<Session> {
        let token = session.token.clone();
        {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO sessions (
                    token,
                    user_id,
                    created_at
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&session.token)
                .push_bind(session.user_id)
                .push_bind(session.created_at);
            qry.push(") ").build().execute(&mut *conn).await?;
        }
        self.retrieve(token).await
    }
}

#[async_trait]
impl Delete<Session> for Connection {
    async fn delete(&self, session: Session) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM sessions WHERE token = ")
            .push_bind(session.token)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use cofre_data::User;

    use super::*;

    #[tokio::test]
    async fn test_session_roundtrip() {
        let db = Connection::open_test().await;
        let user = db
            .insert(User {
                email: "sess@cofre.app".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let session = db
            .insert(Session {
                token: "aabb0011".to_string(),
                user_id: user.id,
                created_at: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(session.user_id, user.id);

        let found: Session = db.retrieve("aabb0011".to_string()).await.unwrap();
        assert_eq!(found.token, "aabb0011");

        db.delete(found).await.unwrap();
        let gone: Result<Session> = db.retrieve("aabb0011".to_string()).await;
        assert!(gone.is_err());
    }
}
