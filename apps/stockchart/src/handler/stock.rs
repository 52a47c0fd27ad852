use actix_web::{HttpResponse, web};
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::Deserialize;
use ::stock::DateWindow;

use crate::{
    AppState,
    error::AppError,
    page::{self, StockPage},
};

#[derive(Debug, Deserialize)]
pub struct StockForm {
    pub ticker: String,
}

pub async fn stock(
    state: web::Data<AppState>,
    form: web::Form<StockForm>,
) -> Result<HttpResponse, AppError> {
    let StockForm { ticker } = form.into_inner();
    let symbol = ticker.trim();
    debug!("stock: data_source={}", state.config.data_source);

    if symbol.is_empty() {
        warn!("stock: rejected empty ticker raw_input={:?}", ticker);
        return Err(AppError::EmptyTicker);
    }

    info!("stock: received request ticker={}", symbol);

    let window = DateWindow::trailing_year(Utc::now()).map_err(AppError::Window)?;

    let series = match state.price_source.daily_closes(symbol, &window).await {
        Ok(s) => {
            info!("stock: fetched {} closes for {}", s.len(), symbol);
            s
        }
        Err(e) => {
            error!("stock: failed to fetch prices for {}: {:?}", symbol, e);
            return Err(AppError::Upstream {
                symbol: symbol.to_string(),
                source: e,
            });
        }
    };

    if series.is_empty() {
        warn!("stock: no price data for {}", symbol);
        return Err(AppError::NoData(symbol.to_string()));
    }

    debug!("stock: rendering chart for {}", symbol);
    let png = state.renderer.render(&series).await.map_err(|e| {
        error!("stock: failed to render chart for {}: {:?}", symbol, e);
        AppError::Render {
            symbol: symbol.to_string(),
            source: e,
        }
    })?;

    let artifact = state.artifacts.save(&png).await.map_err(|e| {
        error!("stock: failed to store chart for {}: {:?}", symbol, e);
        AppError::Artifact(e)
    })?;
    info!("stock: chart for {} stored at {}", symbol, artifact.url);

    page::render(&StockPage {
        financial_data_source: &state.config.data_source,
        ticker: symbol,
        chart_url: &artifact.url,
        points: series.len(),
        last_close: series
            .last_close()
            .map(|c| format!("{:.2}", c))
            .unwrap_or_default(),
    })
}
