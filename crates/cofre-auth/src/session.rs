use anyhow::Result;

use cofre_data::{Delete, Insert, Query, Retrieve, Session, User, UserFilter};

use crate::{credentials, Error};

/// Create an account. The password is never stored, only its salted
/// pbkdf2 digest.
pub async fn sign_up<DB>(db: &DB, email: &str, password: &str) -> Result<User>
where
    DB: Query<User, Filter = UserFilter> + Insert<User> + Send + Sync,
{
    let existing = db
        .query(&UserFilter {
            email: Some(email.to_string()),
            ..Default::default()
        })
        .await?;
    if !existing.is_empty() {
        return Err(Error::EmailTaken(email.to_string()).into());
    }

    let salt = credentials::new_salt();
    let user = User {
        email: email.to_string(),
        password_hash: credentials::hash_password(password, &salt),
        password_salt: salt,
        created_at: chrono::Local::now().date_naive(),
        ..Default::default()
    };
    let user = db.insert(user).await?;
    Ok(user)
}

/// Verify credentials and open a session. The returned token identifies
/// the user on every following call.
pub async fn sign_in<DB>(db: &DB, email: &str, password: &str) -> Result<Session>
where
    DB: Query<User, Filter = UserFilter> + Insert<Session> + Send + Sync,
{
    let user = db
        .query(&UserFilter {
            email: Some(email.to_string()),
            ..Default::default()
        })
        .await?
        .pop()
        .ok_or(Error::InvalidCredentials)?;

    if !credentials::verify_password(password, &user.password_salt, &user.password_hash) {
        return Err(Error::InvalidCredentials.into());
    }

    let session = Session {
        token: credentials::new_token(),
        user_id: user.id,
        created_at: chrono::Local::now().date_naive(),
    };
    let session = db.insert(session).await?;
    Ok(session)
}

/// Close a session. Signing out an unknown token is a no-op.
pub async fn sign_out<DB>(db: &DB, token: &str) -> Result<()>
where
    DB: Retrieve<Session, Key = String> + Delete<Session> + Send + Sync,
{
    let session: Session = match db.retrieve(token.to_string()).await {
        Ok(session) => session,
        Err(_) => return Ok(()),
    };
    db.delete(session).await?;
    Ok(())
}

/// Resolve a session token back to its user.
pub async fn current_user<DB>(db: &DB, token: &str) -> Result<User>
where
    DB: Retrieve<Session, Key = String> + Retrieve<User, Key = u32> + Send + Sync,
{
    let session: Session = db
        .retrieve(token.to_string())
        .await
        .map_err(|_| Error::NotSignedIn)?;
    let user: User = db.retrieve(session.user_id).await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use cofre_db::Connection;

    use super::*;

    #[tokio::test]
    async fn test_sign_up_and_in() {
        let db = Connection::open_test().await;

        let user = sign_up(&db, "eu@cofre.app", "segredo").await.unwrap();
        assert!(user.id > 0);
        assert_ne!(user.password_hash, "segredo");

        let session = sign_in(&db, "eu@cofre.app", "segredo").await.unwrap();
        assert_eq!(session.user_id, user.id);

        let me = current_user(&db, &session.token).await.unwrap();
        assert_eq!(me.email, "eu@cofre.app");
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let db = Connection::open_test().await;
        sign_up(&db, "dup@cofre.app", "um").await.unwrap();

        let err = sign_up(&db, "dup@cofre.app", "dois").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let db = Connection::open_test().await;
        sign_up(&db, "eu@cofre.app", "segredo").await.unwrap();

        assert!(sign_in(&db, "eu@cofre.app", "errado").await.is_err());
        assert!(sign_in(&db, "outro@cofre.app", "segredo").await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_token() {
        let db = Connection::open_test().await;
        sign_up(&db, "eu@cofre.app", "segredo").await.unwrap();
        let session = sign_in(&db, "eu@cofre.app", "segredo").await.unwrap();

        sign_out(&db, &session.token).await.unwrap();
        assert!(current_user(&db, &session.token).await.is_err());

        // Already gone, still fine
        sign_out(&db, &session.token).await.unwrap();
    }
}
