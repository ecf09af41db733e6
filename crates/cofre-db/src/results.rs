use sqlx::FromRow;
use thiserror::Error as ThisError;

/// Model errors
#[derive(Debug, Clone, ThisError)]
pub enum QueryError {
    #[error("Not found")]
    NotFound,
    #[error("Ambiguous results ({0:?}) for query")]
    Ambiguous(usize),
}

/// Row id returned by INSERT .. RETURNING.
#[derive(Debug, Clone, FromRow)]
pub struct Id {
    pub id: u32,
}
