use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the captune config directory
pub fn captune_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("captune");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

/// Default location of `captune.toml`
pub fn config_file() -> Result<PathBuf> {
    Ok(captune_config_dir()?.join("captune.toml"))
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_user_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        let expanded = expand_user_path("~/subs/out.ass");
        assert!(expanded.ends_with("subs/out.ass"));

        assert_eq!(expand_user_path("/tmp/a.ass"), PathBuf::from("/tmp/a.ass"));
    }
}
