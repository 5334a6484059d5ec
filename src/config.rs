use std::path::PathBuf;

use color_eyre::Result;
use color_eyre::eyre::{Context, eyre};
use serde::{Deserialize, Serialize};
use url::Url;

fn default_api_base() -> String {
    "http://localhost:4000/api/backend".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend REST API.
    #[serde(default = "default_api_base")]
    api_base: String,
    /// Override for the session token file location.
    #[serde(default)]
    session_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            session_file: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("audio-admin").join("config.toml"))
    }

    /// Load config from the default location, falling back to defaults when
    /// no file exists yet
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path().ok_or(eyre!("No config directory found"))?;
        if config_path.is_file() {
            Self::from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Create a default config file, if it doesn't exist
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or(eyre!("No config directory found"))?;
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize default config")?;
        std::fs::write(&path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    /// Expand ~ to home directory
    fn expand_path(path: &str) -> PathBuf {
        if path.starts_with("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(&path[2..]);
            }
        }
        PathBuf::from(path)
    }

    /// Base URL of the backend, normalized to end in a slash so joining
    /// resource paths keeps the full prefix
    pub fn api_base_url(&self) -> Result<Url> {
        let mut base = self.api_base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base).wrap_err_with(|| format!("Invalid api_base in config: {}", self.api_base))
    }

    /// Where the session token lives
    pub fn session_path(&self) -> Option<PathBuf> {
        match &self.session_file {
            Some(path) => Some(Self::expand_path(path)),
            None => dirs::config_dir().map(|path| path.join("audio-admin").join("session.toml")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base = \"http://example.com/api\"\nsession_file = \"/tmp/session.toml\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.api_base_url().unwrap().as_str(),
            "http://example.com/api/"
        );
        assert_eq!(
            config.session_path().unwrap(),
            PathBuf::from("/tmp/session.toml")
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(
            config.api_base_url().unwrap().as_str(),
            "http://localhost:4000/api/backend/"
        );
    }

    #[test]
    fn api_base_keeps_trailing_slash() {
        let config: Config = toml::from_str("api_base = \"http://example.com/api/\"").unwrap();
        assert_eq!(
            config.api_base_url().unwrap().as_str(),
            "http://example.com/api/"
        );
    }
}
