pub mod yahoo;

pub use yahoo::YahooFinance;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Latest 1-minute close for `symbol` in the current session.
    async fn latest_price(&mut self, symbol: &str) -> Result<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    Live,
    /// The feed failed and the configured constant stands in.
    Fallback,
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteSource::Live => write!(f, "live"),
            QuoteSource::Fallback => write!(f, "stale"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub source: QuoteSource,
}

impl Quote {
    pub fn is_stale(&self) -> bool {
        self.source == QuoteSource::Fallback
    }
}

/// One attempt at a live quote; any failure degrades to `fallback`.
pub async fn fetch_quote(feed: &mut dyn PriceFeed, symbol: &str, fallback: f64) -> Quote {
    match feed.latest_price(symbol).await {
        Ok(price) if price.is_finite() && price > 0.0 => Quote {
            price,
            source: QuoteSource::Live,
        },
        Ok(price) => {
            warn!("Quote for {} came back as {}, using fallback {}", symbol, price, fallback);
            Quote {
                price: fallback,
                source: QuoteSource::Fallback,
            }
        }
        Err(e) => {
            warn!("Quote for {} unavailable ({:#}), using fallback {}", symbol, e, fallback);
            Quote {
                price: fallback,
                source: QuoteSource::Fallback,
            }
        }
    }
}
