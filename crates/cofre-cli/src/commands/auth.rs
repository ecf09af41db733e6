use anyhow::Result;
use clap::{Args, Subcommand};
use inquire::Password;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum Auth {
    /// Create an account
    #[clap(name = "register")]
    Register(Register),
    /// Sign in and store the session token
    #[clap(name = "login")]
    Login(Login),
    /// Sign out and forget the session token
    #[clap(name = "logout")]
    Logout(Logout),
    /// Show the signed-in account
    #[clap(name = "whoami")]
    Whoami(Whoami),
}

impl Auth {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        match self {
            Auth::Register(cmd) => cmd.run(ctx).await,
            Auth::Login(cmd) => cmd.run(ctx).await,
            Auth::Logout(cmd) => cmd.run(ctx).await,
            Auth::Whoami(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct Register {
    #[clap(short, long)]
    pub email: String,
}

impl Register {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let password = Password::new("Password:").prompt()?;
        let user = cofre_auth::sign_up(&ctx.db, &self.email, &password).await?;
        println!("Account created for {}.", user.email);

        let session = cofre_auth::sign_in(&ctx.db, &self.email, &password).await?;
        ctx.write_token(&session.token)?;
        println!("Signed in as {}.", user.email);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Login {
    #[clap(short, long)]
    pub email: String,
}

impl Login {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let password = Password::new("Password:").without_confirmation().prompt()?;
        let session = cofre_auth::sign_in(&ctx.db, &self.email, &password).await?;
        ctx.write_token(&session.token)?;
        println!("Signed in as {}.", self.email);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Logout {}

impl Logout {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        if let Ok(token) = ctx.read_token() {
            cofre_auth::sign_out(&ctx.db, &token).await?;
        }
        ctx.clear_token()?;
        println!("Signed out.");
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Whoami {}

impl Whoami {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let user = ctx.current_user().await?;
        println!("{}", user.email);
        Ok(())
    }
}
