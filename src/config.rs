use crate::types::ChannelTarget;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_COINBASE_URL: &str = "https://api.coinbase.com/v2/prices";
pub const DEFAULT_COINCAP_URL: &str = "https://coincap.io/page";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub slack: SlackConfig,
    #[serde(default)]
    pub coins: CoinsConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub webhook_url: String,
    /// Comma-separated channel list; `DEFAULT` means the webhook's own channel.
    #[serde(default)]
    pub channels: String,
}

/// Comma-separated ticker lists, one per price source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoinsConfig {
    #[serde(default)]
    pub coinbase: String,
    #[serde(default)]
    pub coincap: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_coinbase_url")]
    pub coinbase_url: String,
    #[serde(default = "default_coincap_url")]
    pub coincap_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            coinbase_url: default_coinbase_url(),
            coincap_url: default_coincap_url(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_coinbase_url() -> String {
    DEFAULT_COINBASE_URL.to_string()
}

fn default_coincap_url() -> String {
    DEFAULT_COINCAP_URL.to_string()
}

/// Symbols to fetch from one source, in configured order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCoins {
    pub source: String,
    pub symbols: Vec<String>,
}

impl Config {
    /// Read and validate the config file. A non-empty `webhook_override`
    /// (normally `SLACK_WEBHOOK_URL`) replaces `slack.webhook_url`.
    pub fn load(path: &Path, webhook_override: Option<String>) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_yaml(&contents, webhook_override)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn from_yaml(contents: &str, webhook_override: Option<String>) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(contents)?;
        if let Some(url) = webhook_override.filter(|u| !u.trim().is_empty()) {
            config.slack.webhook_url = url;
        }
        config.slack.webhook_url = config.slack.webhook_url.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let url = &self.slack.webhook_url;
        if url.is_empty() {
            anyhow::bail!("slack.webhook_url is required (or set SLACK_WEBHOOK_URL)");
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            anyhow::bail!("slack.webhook_url must be an http(s) URL, got '{}'", url);
        }
        if self.http.timeout_secs == 0 {
            anyhow::bail!("http.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn channels(&self) -> Vec<ChannelTarget> {
        split_list(&self.slack.channels)
            .iter()
            .map(|c| ChannelTarget::parse(c))
            .collect()
    }

    /// Fetch plan in fixed source order: coinbase, then coincap.
    pub fn source_plan(&self) -> Vec<SourceCoins> {
        vec![
            SourceCoins {
                source: "coinbase".to_string(),
                symbols: split_list(&self.coins.coinbase),
            },
            SourceCoins {
                source: "coincap".to_string(),
                symbols: split_list(&self.coins.coincap),
            },
        ]
    }
}

/// Split a comma-separated value, trimming items and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
