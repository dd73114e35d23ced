pub mod coinbase;
pub mod coincap;

use crate::config::HttpConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Symbol fetched when none is given.
pub const DEFAULT_SYMBOL: &str = "BTC";

pub const USER_AGENT: &str = concat!(
    "cryptocoin-notifier/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/vrillusions/cryptocoin2slack)"
);

/// Shared client for every price and webhook request: identifies itself
/// with `USER_AGENT` and gives up after `http.timeout_secs`.
pub fn build_client(http: &HttpConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()
        .context("building HTTP client")
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;
    /// Current USD spot price for `symbol`, unrounded.
    async fn fetch_usd(&self, symbol: &str) -> Result<f64>;
}

pub struct SourceRegistry {
    sources: Vec<Box<dyn PriceSource>>,
}

impl SourceRegistry {
    pub fn new(client: reqwest::Client, http: &HttpConfig) -> Self {
        Self::from_sources(vec![
            Box::new(coinbase::Coinbase::new(
                client.clone(),
                http.coinbase_url.clone(),
            )),
            Box::new(coincap::Coincap::new(client, http.coincap_url.clone())),
        ])
    }

    pub fn from_sources(sources: Vec<Box<dyn PriceSource>>) -> Self {
        Self { sources }
    }

    pub fn get(&self, name: &str) -> Option<&dyn PriceSource> {
        self.sources
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

fn symbol_or_default(symbol: &str) -> &str {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        DEFAULT_SYMBOL
    } else {
        symbol
    }
}

async fn get_json(req: reqwest::RequestBuilder, source: &str) -> Result<serde_json::Value> {
    let resp = req
        .send()
        .await
        .with_context(|| format!("{} request failed", source))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("{} HTTP {}: {}", source, status, body);
    }

    let body: serde_json::Value = resp
        .json()
        .await
        .with_context(|| format!("{} parse failed", source))?;
    tracing::debug!("{} response: {}", source, body);
    Ok(body)
}

/// Accept either a JSON number or a numeric string.
fn parse_number(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|p| p.is_finite())
}
