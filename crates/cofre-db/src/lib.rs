pub mod connection;
pub use connection::Connection;

pub mod results;
pub mod schema;

pub mod profiles;
pub mod sessions;
pub mod transactions;
pub mod users;
