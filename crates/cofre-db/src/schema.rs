use anyhow::Result;

use crate::Connection;

/// Install the database schema.
pub async fn install(conn: &Connection) -> Result<()> {
    let mut db = conn.lock().await;
    let schema_data = include_str!("../db/schema.sql");
    for stmt in schema_data.split(';') {
        let stmt = stmt.trim();
        if stmt.is_empty() {
            continue;
        }
        sqlx::query(stmt).execute(&mut *db).await?;
    }
    tracing::debug!("schema installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Connection;

    #[tokio::test]
    async fn test_install() {
        // open_test installs the schema; a second install must be a no-op.
        let conn = Connection::open_test().await;
        super::install(&conn).await.unwrap();
    }
}
