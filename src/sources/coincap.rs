use super::{get_json, parse_number, symbol_or_default, PriceSource};
use anyhow::{Context, Result};
use async_trait::async_trait;

pub struct Coincap {
    client: reqwest::Client,
    base_url: String,
}

impl Coincap {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PriceSource for Coincap {
    fn name(&self) -> &str {
        "coincap"
    }

    async fn fetch_usd(&self, symbol: &str) -> Result<f64> {
        let symbol = symbol_or_default(symbol);
        let url = format!("{}/{}", self.base_url, symbol);
        let req = self
            .client
            .get(&url)
            .header("Accept", "application/json");

        let body = get_json(req, "Coincap").await?;
        parse_number(&body["price_usd"])
            .with_context(|| format!("Coincap: missing price_usd for {}", symbol))
    }
}
