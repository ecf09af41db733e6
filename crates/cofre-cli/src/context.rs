use std::fs;
use std::path::Path;

use anyhow::Result;

use cofre_data::User;
use cofre_db::Connection;

/// Everything a command needs: the store connection plus the paths the
/// binary was configured with. Passed by reference into every command.
pub struct Context {
    pub db: Connection,
    pub session_file: String,
    pub avatar_dir: String,
}

impl Context {
    /// Resolve the signed-in user from the stored session token.
    pub async fn current_user(&self) -> Result<User> {
        let token = self.read_token()?;
        cofre_auth::current_user(&self.db, &token).await
    }

    pub fn read_token(&self) -> Result<String> {
        let token = fs::read_to_string(&self.session_file)
            .map_err(|_| cofre_auth::Error::NotSignedIn)?;
        Ok(token.trim().to_string())
    }

    pub fn write_token(&self, token: &str) -> Result<()> {
        fs::write(&self.session_file, token)?;
        Ok(())
    }

    pub fn clear_token(&self) -> Result<()> {
        if Path::new(&self.session_file).exists() {
            fs::remove_file(&self.session_file)?;
        }
        Ok(())
    }
}
