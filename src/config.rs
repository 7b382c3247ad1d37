// File: ./src/config.rs
// Handles configuration loading, validation and defaults.
use crate::context::AppContext;
use crate::model::catalog::LeaveTypeCatalog;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_forecast_url() -> String {
    "https://api.forecastapp.com".to_string()
}
fn default_product_roles() -> Vec<String> {
    vec!["Product".to_string(), "Accounts".to_string()]
}

fn default_region() -> String {
    "us-west-2".to_string()
}
fn default_state_key() -> String {
    "globalState.json".to_string()
}

fn default_smtp_port() -> u16 {
    587
}
fn default_admin() -> String {
    "backend@fueled.com".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ForecastConfig {
    #[serde(default = "default_forecast_url")]
    pub api_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub time_off_project_id: String,
    #[serde(default = "default_product_roles")]
    pub product_roles: Vec<String>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            api_url: default_forecast_url(),
            token: String::new(),
            account_id: String::new(),
            time_off_project_id: String::new(),
            product_roles: default_product_roles(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SlackConfig {
    #[serde(default)]
    pub weekly_webhook_url: String,
    #[serde(default)]
    pub product_accounts_webhook_url: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores.
    pub endpoint: Option<String>,
    #[serde(default = "default_state_key")]
    pub state_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
            state_key: default_state_key(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MailConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub from: String,
    #[serde(default = "default_admin")]
    pub admin: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: String::new(),
            admin: default_admin(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub calendar_url: String,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    #[serde(default)]
    pub catalog: LeaveTypeCatalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar_url: String::new(),
            forecast: ForecastConfig::default(),
            slack: SlackConfig::default(),
            storage: StorageConfig::default(),
            mail: MailConfig::default(),
            http_timeout_secs: default_http_timeout(),
            catalog: LeaveTypeCatalog::default(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        // Explicitly detect missing file so callers can print setup instructions.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Catalog for offline rendering: the built-in one when no config file exists,
    /// otherwise whatever the file declares. Unreadable files are still an error.
    pub fn catalog_or_default(loaded: Result<Self>) -> Result<LeaveTypeCatalog> {
        match loaded {
            Ok(config) => Ok(config.catalog),
            Err(e) if Self::is_missing_config_error(&e) => Ok(LeaveTypeCatalog::default()),
            Err(e) => Err(e),
        }
    }

    /// Replaces secrets with values from the environment when present.
    /// `lookup` is `std::env::var` in the binary; tests pass a closure.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("LEAVEBOT_FORECAST_TOKEN") {
            self.forecast.token = token;
        }
        if let Some(password) = lookup("LEAVEBOT_MAIL_PASSWORD") {
            self.mail.password = password;
        }
        self
    }

    /// Names every required setting that is still empty.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let required = [
            ("calendar_url", &self.calendar_url),
            ("forecast.token", &self.forecast.token),
            ("forecast.account_id", &self.forecast.account_id),
            ("forecast.time_off_project_id", &self.forecast.time_off_project_id),
            ("slack.weekly_webhook_url", &self.slack.weekly_webhook_url),
            (
                "slack.product_accounts_webhook_url",
                &self.slack.product_accounts_webhook_url,
            ),
            ("storage.bucket", &self.storage.bucket),
            ("mail.host", &self.mail.host),
            ("mail.from", &self.mail.from),
        ];
        required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_settings();
        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required settings: {}",
                missing.join(", ")
            ));
        }
        Ok(())
    }
}
