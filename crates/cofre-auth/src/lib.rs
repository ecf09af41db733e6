mod credentials;
pub use credentials::*;

mod session;
pub use session::*;

use thiserror::Error as ThisError;

/// Authentication errors
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    #[error("An account with email {0} already exists")]
    EmailTaken(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Not signed in")]
    NotSignedIn,
}
