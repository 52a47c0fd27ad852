use std::{path::Path, sync::Arc};

use actix_files::Files;
use stock::{ChartRenderer, PriceSource};

use artifact::{ArtifactStore, URL_PREFIX};
use config::Config;

pub mod artifact;
pub mod config;
pub mod error;
pub mod handler;
mod page;

pub use handler::configure;

/// Everything a request handler needs, built once at startup.
pub struct AppState {
    pub config: Config,
    pub price_source: Arc<dyn PriceSource>,
    pub renderer: Arc<dyn ChartRenderer>,
    pub artifacts: ArtifactStore,
}

impl AppState {
    pub fn new(
        config: Config,
        price_source: Arc<dyn PriceSource>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        let artifacts = ArtifactStore::new(config.static_dir.clone(), config.chart_retention);
        Self {
            config,
            price_source,
            renderer,
            artifacts,
        }
    }
}

/// Serves the static directory, chart images included.
pub fn static_files(dir: &Path) -> Files {
    Files::new(URL_PREFIX, dir)
}

pub type Error = anyhow::Error;
