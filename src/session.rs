//! Token persistence and session resolution.
//!
//! The stored token is the cookie analog: `login` writes it, every other
//! command re-derives the session from it and hands the resolved client
//! down explicitly.

use std::path::PathBuf;

use color_eyre::Result;
use color_eyre::eyre::{Context, eyre};
use serde::{Deserialize, Serialize};

use crate::api::AdminClient;
use crate::api::types::AdminProfile;
use crate::config::Config;

pub const LOGIN_HINT: &str = "Not logged in. Run `audio-admin login` first.";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// A resolved session: authenticated client plus the admin it belongs to.
pub struct Session {
    pub profile: AdminProfile,
    pub client: AdminClient,
}

fn session_path(config: &Config) -> Result<PathBuf> {
    config
        .session_path()
        .ok_or(eyre!("No config directory found for the session file"))
}

pub fn store_token(config: &Config, token: &str) -> Result<()> {
    let path = session_path(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create session directory: {}", parent.display()))?;
    }
    let contents = toml::to_string(&StoredSession {
        token: token.to_string(),
    })
    .wrap_err("Failed to serialize session")?;
    std::fs::write(&path, contents)
        .wrap_err_with(|| format!("Failed to write session file: {}", path.display()))?;
    Ok(())
}

pub fn load_token(config: &Config) -> Result<Option<String>> {
    let path = session_path(config)?;
    if !path.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read session file: {}", path.display()))?;
    let stored: StoredSession = toml::from_str(&contents)
        .wrap_err_with(|| format!("Failed to parse session file: {}", path.display()))?;
    Ok(Some(stored.token))
}

pub fn clear(config: &Config) -> Result<()> {
    let path = session_path(config)?;
    if path.is_file() {
        std::fs::remove_file(&path)
            .wrap_err_with(|| format!("Failed to remove session file: {}", path.display()))?;
    }
    Ok(())
}

/// Resolve the stored token into an authenticated session by fetching the
/// admin profile. Missing or rejected tokens produce the login hint
/// instead of an error screen.
pub async fn resolve(config: &Config) -> Result<Session> {
    let token = load_token(config)?.ok_or(eyre!(LOGIN_HINT))?;
    let client = AdminClient::with_token(config.api_base_url()?, token);
    let profile = client
        .profile()
        .await
        .map_err(|error| {
            log::error!("Session resolution failed: {}", error);
            eyre!("Session is invalid or expired. Run `audio-admin login` again.")
        })?;
    Ok(Session { profile, client })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_session_file(dir: &tempfile::TempDir) -> Config {
        let session = dir.path().join("session.toml");
        let config_file = dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            format!("session_file = \"{}\"\n", session.display()),
        )
        .unwrap();
        Config::from_file(&config_file).unwrap()
    }

    #[test]
    fn token_round_trips_through_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_session_file(&dir);

        assert!(load_token(&config).unwrap().is_none());
        store_token(&config, "abc123").unwrap();
        assert_eq!(load_token(&config).unwrap().as_deref(), Some("abc123"));

        clear(&config).unwrap();
        assert!(load_token(&config).unwrap().is_none());
    }

    #[test]
    fn clear_without_session_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_session_file(&dir);
        clear(&config).unwrap();
    }
}
