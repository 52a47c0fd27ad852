use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;

use crate::{DateWindow, PriceSeries};

/// A provider of historical daily closing prices.
///
/// An unknown symbol, or one without trading data in the window, yields an
/// empty series. Transport and decoding failures are errors.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn daily_closes(&self, symbol: &str, window: &DateWindow) -> Result<PriceSeries>;
}

/// Joins `segments` onto `base`, escaping each one.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("{} cannot be used as a base url", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
