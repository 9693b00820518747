//! Store path and acting-account resolution

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Resolved invocation context: who is acting, and where the pool lives.
pub struct PoolConfig {
    pub account: String,
    pub store_path: PathBuf,
}

/// Optional `~/.tidepool/config.toml` contents.
#[derive(Default, Deserialize)]
struct ConfigFile {
    default_account: Option<String>,
    store_path: Option<String>,
}

impl PoolConfig {
    /// Resolution order for the store path: `--store` flag, `TIDEPOOL_STORE`
    /// env, `store_path` in the config file, then
    /// `$HOME/.tidepool/pool.json`. The acting account falls back from the
    /// `--account` flag to `default_account`, then to `"default"`.
    pub fn new(account: Option<String>, store: Option<PathBuf>) -> Result<Self> {
        let file = read_config_file()?;

        let store_path = if let Some(path) = store {
            path
        } else if let Ok(path) = std::env::var("TIDEPOOL_STORE") {
            PathBuf::from(shellexpand::tilde(&path).into_owned())
        } else if let Some(path) = file.store_path {
            PathBuf::from(shellexpand::tilde(&path).into_owned())
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".tidepool/pool.json")
        };

        let account = account
            .or(file.default_account)
            .unwrap_or_else(|| "default".to_string());
        if account.is_empty() || account.len() > 32 {
            anyhow::bail!("Account name must be 1-32 bytes, got {:?}", account);
        }

        Ok(Self { account, store_path })
    }
}

fn read_config_file() -> Result<ConfigFile> {
    let Ok(home) = std::env::var("HOME") else {
        return Ok(ConfigFile::default());
    };
    let path = PathBuf::from(home).join(".tidepool/config.toml");
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let data = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&data)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
