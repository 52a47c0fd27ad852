use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue},
};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::source::endpoint;
use crate::{DateWindow, PricePoint, PriceSeries, PriceSource};

const PAGE_LIMIT: usize = 10_000;

#[derive(Clone)]
pub struct AlpacaClient {
    client: Client,
    base_api: String,
}

impl AlpacaClient {
    pub fn new(base_api: String, key_id: &str, secret: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("APCA-API-KEY-ID", HeaderValue::from_str(key_id)?);
        headers.insert("APCA-API-SECRET-KEY", HeaderValue::from_str(secret)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_api })
    }

    /// Daily bars for `symbol` over `window`, following pagination to the end.
    #[instrument(name = "alpaca_bars", skip(self, window))]
    pub async fn fetch_bars(&self, symbol: &str, window: &DateWindow) -> Result<Vec<Bar>> {
        let url = endpoint(&self.base_api, &["v2", "stocks", symbol, "bars"])?;
        let start = window.start.to_rfc3339();
        let end = window.end.to_rfc3339();
        let limit = PAGE_LIMIT.to_string();

        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self.client.get(url.clone()).query(&[
                ("feed", "iex"),
                ("timeframe", "1Day"),
                ("adjustment", "all"),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("limit", limit.as_str()),
            ]);
            if let Some(token) = &page_token {
                req = req.query(&[("page_token", token.as_str())]);
            }

            let res: BarsResponse = req.send().await?.error_for_status()?.json().await?;

            let page = res.bars.unwrap_or_default();
            debug!(page_bars = page.len(), "fetched bars page");
            bars.extend(page);

            match res.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(bars)
    }
}

#[async_trait]
impl PriceSource for AlpacaClient {
    async fn daily_closes(&self, symbol: &str, window: &DateWindow) -> Result<PriceSeries> {
        let points = self
            .fetch_bars(symbol, window)
            .await?
            .into_iter()
            .map(|bar| PricePoint {
                date: bar.timestamp.date_naive(),
                close: bar.close,
            })
            .collect();

        Ok(PriceSeries::new(symbol, points))
    }
}

//
// Match Alpaca API JSON
// https://docs.alpaca.markets/reference/stockbars
//
#[derive(Debug, Deserialize, Clone)]
pub struct BarsResponse {
    #[serde(default)]
    pub bars: Option<Vec<Bar>>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Bar {
    #[serde(rename = "t")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "o")]
    pub open: f64,

    #[serde(rename = "h")]
    pub high: f64,

    #[serde(rename = "l")]
    pub low: f64,

    #[serde(rename = "c")]
    pub close: f64,

    #[serde(rename = "v")]
    pub volume: i64,
}
