use clap::{Parser, Subcommand};

use crate::commands::{Auth, Profile, Report, TransactionCmd};

#[derive(Parser, Debug)]
#[clap(name = "cofre", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Database file
    #[clap(long, env = "COFRE_DB", default_value = "cofre.sqlite3")]
    pub db: String,

    /// File holding the signed-in session token
    #[clap(long, env = "COFRE_SESSION_FILE", default_value = ".cofre-session")]
    pub session_file: String,

    /// Directory where profile avatars are stored
    #[clap(long, env = "COFRE_AVATAR_DIR", default_value = "avatars")]
    pub avatar_dir: String,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the signed-in account
    #[clap(subcommand)]
    Auth(Auth),

    /// Manage income records
    #[clap(subcommand)]
    Income(TransactionCmd),

    /// Manage expense records
    #[clap(subcommand)]
    Expense(TransactionCmd),

    /// Dashboard and monthly reports
    #[clap(subcommand)]
    Report(Report),

    /// Display settings and avatar
    #[clap(subcommand)]
    Profile(Profile),
}
