use actix_web::{HttpResponse, web};
use log::debug;

use crate::{
    AppState,
    error::AppError,
    page::{self, IndexPage},
};

pub async fn home(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    debug!("home: data_source={}", state.config.data_source);

    page::render(&IndexPage {
        financial_data_source: &state.config.data_source,
    })
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}
