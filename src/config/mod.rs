#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{ConsoleError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "gbfs-console.toml";

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub polling: PollingConfig,
    pub map: MapConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub client_name: String,
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            client_name: "lamassu".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Access token issued by the OIDC provider, sent on `/admin` calls.
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub status_interval_seconds: u64,
    pub admin_interval_seconds: u64,
    pub settle_timeout_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval_seconds: 1,
            admin_interval_seconds: 5,
            settle_timeout_seconds: 60,
        }
    }
}

impl PollingConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_seconds)
    }

    pub fn admin_interval(&self) -> Duration {
        Duration::from_secs(self.admin_interval_seconds)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub tile_url: String,
    pub tile_attribution: String,
    pub glyphs_url: String,
    pub default_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "© OpenStreetMap contributors".to_string(),
            glyphs_url: "https://demotiles.maplibre.org/font/{fontstack}/{range}.pbf".to_string(),
            default_zoom: 11.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl ConsoleConfig {
    /// Loads the given file, or `gbfs-console.toml` from the working
    /// directory when present, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        tracing::debug!("Loading configuration from {}", path.as_ref().display());
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| ConsoleError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn apply_overrides(
        &mut self,
        base_url: Option<String>,
        bearer_token: Option<String>,
        format: Option<OutputFormat>,
    ) {
        if let Some(base_url) = base_url {
            self.server.base_url = base_url;
        }
        if let Some(token) = bearer_token {
            self.auth.bearer_token = Some(token);
        }
        if let Some(format) = format {
            self.output.format = format;
        }
    }
}

impl Validate for ConsoleConfig {
    fn validate(&self) -> Result<()> {
        validate_url("server.base_url", &self.server.base_url)?;
        validate_non_empty_string("server.client_name", &self.server.client_name)?;
        validate_range("server.timeout_seconds", self.server.timeout_seconds, 1, 300)?;

        validate_range(
            "polling.status_interval_seconds",
            self.polling.status_interval_seconds,
            1,
            60,
        )?;
        validate_range(
            "polling.admin_interval_seconds",
            self.polling.admin_interval_seconds,
            1,
            60,
        )?;
        validate_range(
            "polling.settle_timeout_seconds",
            self.polling.settle_timeout_seconds,
            1,
            600,
        )?;

        if let Some(token) = &self.auth.bearer_token {
            if token.contains("${") {
                return Err(ConsoleError::InvalidConfigValueError {
                    field: "auth.bearer_token".to_string(),
                    value: token.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.map.tile_url.contains(placeholder) {
                return Err(ConsoleError::InvalidConfigValueError {
                    field: "map.tile_url".to_string(),
                    value: self.map.tile_url.clone(),
                    reason: format!("Tile URL template must contain {}", placeholder),
                });
            }
        }
        validate_range("map.default_zoom", self.map.default_zoom, 0.0, 22.0)?;

        Ok(())
    }
}
