use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::exchange::PriceFeed;

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) nifty-journal";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance chart endpoint, 1-minute bars for the current day.
pub struct YahooFinance {
    client: Client,
    base_url: String,
}

impl YahooFinance {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.price_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    async fn fetch_last_close(&self, symbol: &str) -> Result<f64> {
        // Index symbols start with '^', which has to be escaped in the path
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            symbol.replace('^', "%5E")
        );

        let resp = self
            .client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1m")])
            .send()
            .await
            .context("Failed to fetch chart")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Yahoo chart error {}: {}", status, body);
        }

        let data: ChartResponse = resp.json().await.context("Failed to parse chart response")?;
        let close = last_close(data)?;
        debug!("{} last close {}", symbol, close);
        Ok(close)
    }
}

/// Last non-empty close of the day, rounded to paise.
fn last_close(data: ChartResponse) -> Result<f64> {
    if let Some(err) = data.chart.error {
        anyhow::bail!("Yahoo chart error {}: {}", err.code, err.description);
    }

    data.chart
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|r| r.indicators.quote.into_iter().next())
        .and_then(|q| q.close.into_iter().rev().flatten().next())
        .map(|c| (c * 100.0).round() / 100.0)
        .context("No closes in chart response")
}

#[async_trait]
impl PriceFeed for YahooFinance {
    async fn latest_price(&mut self, symbol: &str) -> Result<f64> {
        self.fetch_last_close(symbol).await
    }
}
