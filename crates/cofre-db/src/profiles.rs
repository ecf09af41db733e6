use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use cofre_data::{Insert, ProfileFilter, Query, Retrieve, Update, UserProfile};

use crate::{results::QueryError, Connection};

#[async_trait]
impl Query<UserProfile> for Connection {
    type Filter = ProfileFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<UserProfile>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                user_id,
                display_name,
                theme,
                currency,
                avatar_path
            FROM user_profiles
            WHERE 1
            "#,
        );
        if let Some(user_id) = filter.user_id {
            qry.push(" AND user_id = ").push_bind(user_id);
        }

        let profiles: Vec<UserProfile> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(profiles)
    }
}

#[async_trait]
impl Retrieve<UserProfile> for Connection {
    type Key = u32;
    async fn retrieve(&self, user_id: Self::Key) -> Result<UserProfile> {
        let filter = ProfileFilter {
            user_id: Some(user_id),
        };
        let mut profiles = self.query(&filter).await?;
        if profiles.len() > 1 {
            return Err(QueryError::Ambiguous(profiles.len()).into());
        }
        let profile = profiles.pop().ok_or(QueryError::NotFound)?;
        Ok(profile)
    }
}

#[async_trait]
impl Insert<UserProfile> for Connection {
    async fn insert(&self, profile: UserProfile) -> Result<UserProfile> {
        let user_id = profile.user_id;
        {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO user_profiles (
                    user_id,
                    display_name,
                    theme,
                    currency,
                    avatar_path
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(profile.user_id)
                .push_bind(&profile.display_name)
                .push_bind(&profile.theme)
                .push_bind(&profile.currency)
                .push_bind(&profile.avatar_path);
            qry.push(") ").build().execute(&mut *conn).await?;
        }
        self.retrieve(user_id).await
    }
}

#[async_trait]
impl Update<UserProfile> for Connection {
    async fn update(&self, profile: UserProfile) -> Result<UserProfile> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE user_profiles SET")
                .push(" display_name = ")
                .push_bind(&profile.display_name)
                .push(", theme = ")
                .push_bind(&profile.theme)
                .push(", currency = ")
                .push_bind(&profile.currency)
                .push(", avatar_path = ")
                .push_bind(&profile.avatar_path)
                .push(" WHERE user_id = ")
                .push_bind(profile.user_id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(profile.user_id).await
    }
}
