use crate::config::SourceCoins;
use crate::sources::SourceRegistry;
use crate::types::{PriceLine, PriceQuote};
use tracing::{debug, error};

/// One sequential pass over the plan: sources in plan order, symbols in
/// configured order. A failed fetch becomes `PriceQuote::Failed` for that
/// symbol only; nothing is retried.
pub async fn collect_prices(registry: &SourceRegistry, plan: &[SourceCoins]) -> Vec<PriceLine> {
    let mut lines = Vec::new();

    for entry in plan {
        if entry.symbols.is_empty() {
            debug!("[{}] no coins configured; skipping", entry.source);
            continue;
        }

        let source = registry.get(&entry.source);
        for symbol in &entry.symbols {
            let quote = match source {
                Some(source) => match source.fetch_usd(symbol).await {
                    Ok(price) => {
                        debug!("[{}] {} price={:.8} USD", entry.source, symbol, price);
                        PriceQuote::Price(price)
                    }
                    Err(e) => {
                        error!("[{}] {} failed: {:#}", entry.source, symbol, e);
                        PriceQuote::Failed(format!("{:#}", e))
                    }
                },
                None => {
                    error!("[{}] {} failed: unknown price source", entry.source, symbol);
                    PriceQuote::Failed(format!("unknown price source '{}'", entry.source))
                }
            };

            lines.push(PriceLine {
                symbol: symbol.clone(),
                source: entry.source.clone(),
                quote,
            });
        }
    }

    lines
}
