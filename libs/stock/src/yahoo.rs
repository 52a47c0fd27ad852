use std::time::Duration;

use anyhow::{Result, bail, ensure};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::source::endpoint;
use crate::{DateWindow, PricePoint, PriceSeries, PriceSource};

pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_api: String,
}

impl YahooClient {
    pub fn new(base_api: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_api: base_api.into(),
        })
    }
}

#[async_trait]
impl PriceSource for YahooClient {
    #[instrument(name = "yahoo_chart", skip(self, window))]
    async fn daily_closes(&self, symbol: &str, window: &DateWindow) -> Result<PriceSeries> {
        let url = endpoint(&self.base_api, &["v8", "finance", "chart", symbol])?;

        let res = self
            .client
            .get(url)
            .query(&[
                ("period1", window.start.timestamp().to_string()),
                ("period2", window.end.timestamp().to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            warn!("symbol not found");
            return Ok(PriceSeries::empty(symbol));
        }

        let body: ChartResponse = res.error_for_status()?.json().await?;
        let series = parse_chart(symbol, body)?;
        debug!(points = series.len(), "parsed chart");

        Ok(series)
    }
}

fn parse_chart(symbol: &str, body: ChartResponse) -> Result<PriceSeries> {
    if let Some(err) = body.chart.error {
        if err.code == "Not Found" {
            return Ok(PriceSeries::empty(symbol));
        }
        bail!("yahoo chart error {}: {}", err.code, err.description);
    }

    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(symbol));
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    ensure!(
        closes.len() == timestamps.len(),
        "length mismatch: timestamps={}, closes={}",
        timestamps.len(),
        closes.len()
    );

    // Timestamps mark the session open in UTC; the trading date is the exchange-local one.
    let offset = result.meta.gmtoffset;
    let points = timestamps
        .into_iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = close.filter(|c| c.is_finite())?;
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(PricePoint { date, close })
        })
        .collect();

    Ok(PriceSeries::new(symbol, points))
}

//
// Match Yahoo chart API JSON
// https://query1.finance.yahoo.com/v8/finance/chart/{symbol}
//
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(json: &str) -> Result<PriceSeries> {
        parse_chart("ACME", serde_json::from_str(json).unwrap())
    }

    #[test]
    fn uses_exchange_local_date() {
        // 2023-01-03T04:00:00Z is still Jan 2 in New York
        let series = parse(
            r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},
                "timestamp":[1672718400],
                "indicators":{"quote":[{"close":[101.5]}]}}],"error":null}}"#,
        )
        .unwrap();

        assert_eq!(
            series.points()[0].date,
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
        );
    }

    #[test]
    fn missing_timestamps_is_empty() {
        let series = parse(
            r#"{"chart":{"result":[{"meta":{"gmtoffset":0},
                "indicators":{"quote":[{}]}}],"error":null}}"#,
        )
        .unwrap();

        assert!(series.is_empty());
    }

    #[test]
    fn not_found_error_is_empty() {
        let series = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap();

        assert!(series.is_empty());
    }

    #[test]
    fn other_error_fails() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn mismatched_lengths_fail() {
        assert!(
            parse(
                r#"{"chart":{"result":[{"meta":{},"timestamp":[1,2],
                    "indicators":{"quote":[{"close":[1.0]}]}}],"error":null}}"#,
            )
            .is_err()
        );
    }
}
