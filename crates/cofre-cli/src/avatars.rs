use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

/// Copy a picture into the avatar directory as the user's avatar and
/// return the stored path.
pub fn upload_avatar(avatar_dir: &str, user_id: u32, file: &str) -> Result<String> {
    let source = Path::new(file);
    if !source.is_file() {
        return Err(anyhow!("Avatar file {:?} not found.", file));
    }
    let ext = source
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png");

    fs::create_dir_all(avatar_dir)?;
    let target: PathBuf = Path::new(avatar_dir).join(format!("user-{}.{}", user_id, ext));
    fs::copy(source, &target)?;
    Ok(target.to_string_lossy().into_owned())
}

/// Remove a stored avatar file. A missing file is fine.
pub fn delete_avatar(path: &str) -> Result<()> {
    let path = Path::new(path);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
