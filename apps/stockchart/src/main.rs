use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use log::info;
use stock::{AlpacaClient, CharmingRenderer, PriceSource, YahooClient};
use stockchart::{
    AppState, Error,
    config::{Config, Provider},
};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!("financial data source: {}", config.data_source);

    let price_source: Arc<dyn PriceSource> = match config.provider {
        Provider::Yahoo => Arc::new(YahooClient::new(
            config.yahoo_base_url.clone(),
            config.provider_timeout,
        )?),
        Provider::Alpaca => {
            let alpaca = config
                .alpaca
                .as_ref()
                .context("alpaca credentials missing from config")?;
            Arc::new(AlpacaClient::new(
                alpaca.base_api.clone(),
                &alpaca.key_id,
                &alpaca.secret,
                config.provider_timeout,
            )?)
        }
    };
    info!("price source: {:?}", config.provider);

    let bind = (config.host.clone(), config.port);
    let static_dir = config.static_dir.clone();
    let state = web::Data::new(AppState::new(
        config,
        price_source,
        Arc::new(CharmingRenderer::default()),
    ));

    info!("listening on http://{}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(stockchart::configure)
            .service(stockchart::static_files(&static_dir))
    })
    .bind(bind)?
    .run()
    .await?;

    info!("Shutdown complete.");
    Ok(())
}
