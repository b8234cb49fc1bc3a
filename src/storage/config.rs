//! Application configuration
//!
//! Loaded from `<data dir>/config.toml`; every field has a default, so a
//! missing file is a valid configuration. Environment variables override the
//! file and CLI flags override both.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use super::{load_toml, save_toml};
use crate::address::parse_address;
use crate::error::{Result, TodoError};
use crate::ledger::Account;

pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_ACCOUNT_ENV: &str = "TODO_LEDGER_DEFAULT_ACCOUNT";
pub const WEBHOOK_URL_ENV: &str = "TODO_LEDGER_WEBHOOK_URL";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Caller identities known to this deployment
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AccountsConfig {
    /// Caller used when a request names none
    #[serde(default)]
    pub default: Option<String>,
    /// Accounts offered by `GET /api/accounts`
    #[serde(default)]
    pub known: Vec<String>,
}

/// Event webhook
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: Option<String>,
    /// HMAC-SHA256 signing key
    #[serde(default)]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Write the ledger to disk after every change
    #[serde(default = "default_persist")]
    pub persist: bool,
}

fn default_persist() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist: default_persist(),
        }
    }
}

impl Config {
    /// Apply environment overrides; `get` is the variable lookup.
    pub fn apply_env<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = get(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| TodoError::config(format!("{} is not a valid port: {}", PORT_ENV, port)))?;
        }
        if let Some(account) = get(DEFAULT_ACCOUNT_ENV).filter(|s| !s.trim().is_empty()) {
            self.accounts.default = Some(account);
        }
        if let Some(url) = get(WEBHOOK_URL_ENV).filter(|s| !s.trim().is_empty()) {
            self.webhook.url = Some(url);
        }
        Ok(())
    }

    /// Check addresses and URLs
    pub fn validate(&self) -> Result<()> {
        self.default_account()?;
        self.known_accounts()?;
        self.webhook_url()?;
        Ok(())
    }

    /// Parsed default caller
    pub fn default_account(&self) -> Result<Option<Account>> {
        self.accounts
            .default
            .as_deref()
            .map(|s| parse_address(s).map_err(|e| TodoError::config(format!("accounts.default: {}", e))))
            .transpose()
    }

    /// Parsed known accounts, default first, without duplicates
    pub fn known_accounts(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = Vec::new();
        if let Some(default) = self.default_account()? {
            accounts.push(default);
        }
        for raw in &self.accounts.known {
            let account = parse_address(raw)
                .map_err(|e| TodoError::config(format!("accounts.known: {}", e)))?;
            if !accounts.contains(&account) {
                accounts.push(account);
            }
        }
        Ok(accounts)
    }

    pub fn webhook_url(&self) -> Result<Option<Url>> {
        self.webhook
            .url
            .as_deref()
            .map(|s| Url::parse(s).map_err(|e| TodoError::config(format!("webhook.url: {}", e))))
            .transpose()
    }
}

/// Get the config file path
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load configuration (defaults when the file doesn't exist)
pub fn load_config(data_dir: &Path) -> Result<Config> {
    let path = config_path(data_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_toml(&path)
}

/// Save configuration
pub fn save_config(data_dir: &Path, config: &Config) -> Result<()> {
    save_toml(&config_path(data_dir), config)
}
