mod auth;
pub use auth::Auth;

mod profile;
pub use profile::Profile;

mod reports;
pub use reports::Report;

mod transactions;
pub use transactions::TransactionCmd;
