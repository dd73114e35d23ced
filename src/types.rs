use std::fmt;

/// Placeholder printed in place of a price when the fetch failed.
pub const ERR_SENTINEL: &str = "err";

/// Delimiter between price lines in the posted summary.
pub const SUMMARY_DELIMITER: &str = " - ";

/// Outcome of a single price fetch. The failure reason is kept for logging;
/// only the `Display` impl collapses it to the `err` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceQuote {
    Price(f64),
    Failed(String),
}

impl PriceQuote {
    pub fn is_failed(&self) -> bool {
        matches!(self, PriceQuote::Failed(_))
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceQuote::Price(p) => f.write_str(&format_usd(*p)),
            PriceQuote::Failed(_) => f.write_str(ERR_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceLine {
    pub symbol: String,
    pub source: String,
    pub quote: PriceQuote,
}

impl fmt::Display for PriceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.symbol, self.quote)
    }
}

/// Where a message goes. `Default` leaves the `channel` field out of the
/// payload so the webhook's own default destination applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelTarget {
    Default,
    Named(String),
}

impl ChannelTarget {
    pub const DEFAULT_MARKER: &'static str = "DEFAULT";

    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(Self::DEFAULT_MARKER) {
            ChannelTarget::Default
        } else {
            ChannelTarget::Named(raw.to_string())
        }
    }

    pub fn channel(&self) -> Option<&str> {
        match self {
            ChannelTarget::Default => None,
            ChannelTarget::Named(name) => Some(name.as_str()),
        }
    }
}

impl fmt::Display for ChannelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelTarget::Default => f.write_str("<webhook default>"),
            ChannelTarget::Named(name) => f.write_str(name),
        }
    }
}

/// Round to cents and render with exactly two decimal digits.
pub fn format_usd(price: f64) -> String {
    format!("{:.2}", price)
}

pub fn summarize(lines: &[PriceLine]) -> String {
    lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(SUMMARY_DELIMITER)
}
