use super::{get_json, parse_number, symbol_or_default, PriceSource};
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Date-pinned API version sent in the `CB-VERSION` header.
pub const API_VERSION: &str = "2017-08-01";

pub struct Coinbase {
    client: reqwest::Client,
    base_url: String,
}

impl Coinbase {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn spot_url(&self, symbol: &str) -> String {
        format!("{}/{}-USD/spot", self.base_url, symbol)
    }
}

#[async_trait]
impl PriceSource for Coinbase {
    fn name(&self) -> &str {
        "coinbase"
    }

    async fn fetch_usd(&self, symbol: &str) -> Result<f64> {
        let symbol = symbol_or_default(symbol);
        let req = self
            .client
            .get(self.spot_url(symbol))
            .header("CB-VERSION", API_VERSION)
            .header("Accept", "application/json");

        let body = get_json(req, "Coinbase").await?;
        parse_number(&body["data"]["amount"])
            .with_context(|| format!("Coinbase: missing data.amount for {}", symbol))
    }
}
