use anyhow::Result;

use cofre_cli::cli::{Cli, Command};
use cofre_cli::context::Context;
use cofre_data::Ledger;
use cofre_db::Connection;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::init();
    let db = Connection::open(&cli.db).await?;
    let ctx = Context {
        db,
        session_file: cli.session_file,
        avatar_dir: cli.avatar_dir,
    };

    match cli.command {
        Command::Auth(cmd) => cmd.run(&ctx).await,
        Command::Income(cmd) => cmd.run(&ctx, Ledger::Income).await,
        Command::Expense(cmd) => cmd.run(&ctx, Ledger::Expense).await,
        Command::Report(cmd) => cmd.run(&ctx).await,
        Command::Profile(cmd) => cmd.run(&ctx).await,
    }?;

    Ok(())
}
