use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header::ContentType};
use log::error;
use thiserror::Error;

use crate::page::{self, ErrorPage};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("ticker symbol must not be empty")]
    EmptyTicker,

    #[error("no price data found for {0}")]
    NoData(String),

    #[error("could not fetch prices for {symbol}")]
    Upstream {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not compute the price window")]
    Window(#[source] anyhow::Error),

    #[error("could not draw the chart for {symbol}")]
    Render {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not store the chart image")]
    Artifact(#[source] anyhow::Error),

    #[error("could not render the page")]
    Template(#[from] askama::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyTicker => StatusCode::BAD_REQUEST,
            AppError::NoData(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Window(_)
            | AppError::Render { .. }
            | AppError::Artifact(_)
            | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();
        let page = ErrorPage {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message: &message,
        };

        match page::render_with_status(&page, status) {
            Ok(res) => res,
            Err(e) => {
                error!("error page failed to render: {:?}", e);
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body(message)
            }
        }
    }
}
