use std::{env::var, fmt, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Error, Result, bail};
use stock::YAHOO_BASE_URL;

pub const DEFAULT_DATA_SOURCE: &str = "the universe";
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Yahoo,
    Alpaca,
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Provider::Yahoo),
            "alpaca" => Ok(Provider::Alpaca),
            other => bail!("unknown PRICE_SOURCE {:?}, expected yahoo or alpaca", other),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AlpacaConfig {
    pub base_api: String,
    pub key_id: String,
    pub secret: String,
}

impl fmt::Debug for AlpacaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlpacaConfig")
            .field("base_api", &self.base_api)
            .field("key_id", &self.key_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Label shown to users as the origin of the prices.
    pub data_source: String,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub provider: Provider,
    pub yahoo_base_url: String,
    /// Present whenever `provider` is [`Provider::Alpaca`].
    pub alpaca: Option<AlpacaConfig>,
    pub provider_timeout: Duration,
    /// Newest chart images kept on disk, 0 keeps all of them.
    pub chart_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            provider: Provider::Yahoo,
            yahoo_base_url: YAHOO_BASE_URL.to_string(),
            alpaca: None,
            provider_timeout: Duration::from_secs(30),
            chart_retention: 50,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Builds the config from `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let parsed = |key: &str| -> Result<Option<u64>> {
            lookup(key)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, v))
                })
                .transpose()
        };

        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", v))?,
            None => defaults.port,
        };

        let provider = match lookup("PRICE_SOURCE") {
            Some(v) => v.parse()?,
            None => defaults.provider,
        };

        let alpaca = match provider {
            Provider::Alpaca => {
                let required = |key: &str| {
                    lookup(key).with_context(|| format!("{} must be set when PRICE_SOURCE=alpaca", key))
                };
                Some(AlpacaConfig {
                    base_api: required("APCA_API_BASE_URL")?,
                    key_id: required("APCA_API_KEY_ID")?,
                    secret: required("APCA_API_SECRET_KEY")?,
                })
            }
            Provider::Yahoo => None,
        };

        Ok(Self {
            data_source: lookup("DATAPROVIDER").unwrap_or(defaults.data_source),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            provider,
            yahoo_base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            alpaca,
            provider_timeout: parsed("PROVIDER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider_timeout),
            chart_retention: parsed("CHART_RETENTION")?
                .map(|n| n as usize)
                .unwrap_or(defaults.chart_retention),
        })
    }
}
