use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use shared::protocol::CALCULATE_PATH;
use thiserror::Error;
use url::Url;

/// Hosted scoring service.
pub const DEFAULT_SCORING_URL: &str = "https://hmpi-cal.onrender.com";
/// Scoring service started locally for development.
pub const LOCAL_SCORING_URL: &str = "http://127.0.0.1:3001";
pub const DEFAULT_CONFIG_FILE: &str = "hmpi.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid scoring url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("scoring url '{0}' must use http or https")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub scoring_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            scoring_url: DEFAULT_SCORING_URL.into(),
        }
    }
}

impl ClientSettings {
    pub fn with_scoring_url(mut self, scoring_url: Option<String>) -> Self {
        if let Some(url) = scoring_url.filter(|url| !url.trim().is_empty()) {
            self.scoring_url = url;
        }
        self
    }

    /// Full URL of the calculate endpoint under the configured base.
    pub fn calculate_endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self.scoring_url.trim();
        let mut base = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(raw.to_string()));
        }
        // Keep any path prefix of the base when joining.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(CALCULATE_PATH)
            .map_err(|source| ConfigError::InvalidUrl {
                url: raw.to_string(),
                source,
            })
    }
}

/// Defaults, then the config file, then environment variables.
///
/// Without an explicit `config_path`, `hmpi.toml` in the working directory is
/// read when present.
pub fn load_settings(config_path: Option<&Path>) -> Result<ClientSettings, ConfigError> {
    load_settings_with(config_path, |name| std::env::var(name).ok())
}

pub fn load_settings_with(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, ConfigError> {
    let mut settings = ClientSettings::default();

    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<HashMap<String, String>>(&raw).map_err(|source| {
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            if let Some(v) = file_cfg.get("scoring_url") {
                settings.scoring_url = v.clone();
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && config_path.is_none() => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let read_non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());
    if let Some(v) = read_non_empty("HMPI_SCORING_URL") {
        settings.scoring_url = v;
    }
    if let Some(v) = read_non_empty("APP__SCORING_URL") {
        settings.scoring_url = v;
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
