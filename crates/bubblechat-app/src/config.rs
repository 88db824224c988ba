use anyhow::{bail, Context, Result};
use bubblechat_api::normalize_base_url;
use bubblechat_types::Credentials;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "bubblechat.toml";

/// Contents of a bubblechat TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub base_url: Option<String>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Values set here replace the ones in `self`
    pub fn merge(self, overrides: FileConfig) -> Self {
        Self {
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
            base_url: overrides.base_url.or(self.base_url),
        }
    }
}

/// Static widget configuration, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub credentials: Credentials,
    pub base_url: String,
}

impl WidgetConfig {
    /// Resolve the config file, then apply environment/CLI values on top
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::from_path(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    FileConfig::from_path(&default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        let overrides = FileConfig {
            username: cli.username.clone(),
            password: cli.password.clone(),
            base_url: cli.base_url.clone(),
        };

        Self::resolve(file.merge(overrides))
    }

    /// Validate merged values.
    ///
    /// Missing credentials are allowed here; they are reported when the
    /// widget tries to log in.
    pub fn resolve(config: FileConfig) -> Result<Self> {
        let Some(base_url) = config.base_url.filter(|url| !url.trim().is_empty()) else {
            bail!("No base URL configured (set base_url in {}, BUBBLECHAT_BASE_URL or --base-url)", DEFAULT_CONFIG_FILE);
        };

        let base_url = normalize_base_url(&base_url);
        let parsed = reqwest::Url::parse(&base_url)
            .with_context(|| format!("Invalid base URL: {}", base_url))?;

        match parsed.scheme() {
            "https" => {}
            "http" => {
                let loopback = matches!(parsed.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
                if !loopback {
                    log::warn!("Base URL {} is not HTTPS; credentials will be sent in clear text", base_url);
                }
            }
            other => bail!("Unsupported URL scheme '{}' in base URL {}", other, base_url),
        }

        Ok(Self {
            credentials: Credentials::new(
                config.username.unwrap_or_default(),
                config.password.unwrap_or_default(),
            ),
            base_url,
        })
    }
}
