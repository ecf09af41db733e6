use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use cofre_data::{Insert, ProfileFilter, Query, Update, User, UserProfile};

use crate::avatars;
use crate::context::Context;
use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Profile {
    /// Show the profile
    #[clap(name = "show")]
    Show(ShowProfile),
    /// Update display settings
    #[clap(name = "set")]
    Set(SetProfile),
    /// Store a profile picture
    #[clap(name = "set-avatar")]
    SetAvatar(SetAvatar),
    /// Remove the profile picture
    #[clap(name = "remove-avatar")]
    RemoveAvatar(RemoveAvatar),
}

impl Profile {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        match self {
            Profile::Show(cmd) => cmd.run(ctx).await,
            Profile::Set(cmd) => cmd.run(ctx).await,
            Profile::SetAvatar(cmd) => cmd.run(ctx).await,
            Profile::RemoveAvatar(cmd) => cmd.run(ctx).await,
        }
    }
}

/// Fetch the user's profile, creating the default one on first access.
async fn load_or_create(ctx: &Context, user: &User) -> Result<UserProfile> {
    let mut profiles = ctx
        .db
        .query(&ProfileFilter {
            user_id: Some(user.id),
        })
        .await?;
    match profiles.pop() {
        Some(profile) => Ok(profile),
        None => ctx.db.insert(UserProfile::new(user.id, &user.email)).await,
    }
}

#[derive(Args, Debug)]
pub struct ShowProfile {}

impl ShowProfile {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let user = ctx.current_user().await?;
        let profile = load_or_create(ctx, &user).await?;
        println!();
        profile.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct SetProfile {
    #[clap(short, long)]
    pub display_name: Option<String>,
    /// light or dark
    #[clap(short, long)]
    pub theme: Option<String>,
    #[clap(short, long)]
    pub currency: Option<String>,
}

impl SetProfile {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        if let Some(theme) = &self.theme {
            if theme != "light" && theme != "dark" {
                bail!("Unknown theme {:?}, expected light or dark.", theme);
            }
        }

        let user = ctx.current_user().await?;
        let mut profile = load_or_create(ctx, &user).await?;

        if let Some(display_name) = self.display_name {
            profile.display_name = display_name;
        }
        if let Some(theme) = self.theme {
            profile.theme = theme;
        }
        if let Some(currency) = self.currency {
            profile.currency = currency;
        }

        let profile = ctx.db.update(profile).await?;
        println!();
        profile.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct SetAvatar {
    /// Picture to copy into the avatar directory
    #[clap(short, long)]
    pub file: String,
}

impl SetAvatar {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let user = ctx.current_user().await?;
        let mut profile = load_or_create(ctx, &user).await?;

        if let Some(old) = profile.avatar_path.take() {
            if let Err(err) = avatars::delete_avatar(&old) {
                tracing::warn!(%err, "could not remove previous avatar");
            }
        }

        let stored = avatars::upload_avatar(&ctx.avatar_dir, user.id, &self.file)?;
        profile.avatar_path = Some(stored.clone());
        ctx.db.update(profile).await?;
        println!("Avatar stored at {}.", stored);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RemoveAvatar {}

impl RemoveAvatar {
    pub async fn run(self, ctx: &Context) -> Result<()> {
        let user = ctx.current_user().await?;
        let mut profile = load_or_create(ctx, &user).await?;

        match profile.avatar_path.take() {
            Some(path) => {
                avatars::delete_avatar(&path)?;
                ctx.db.update(profile).await?;
                println!("Avatar removed.");
            }
            None => println!("No avatar set."),
        }
        Ok(())
    }
}
