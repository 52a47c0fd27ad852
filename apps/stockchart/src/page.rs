use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType};
use askama::Template;

use crate::error::AppError;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage<'a> {
    pub financial_data_source: &'a str,
}

#[derive(Template)]
#[template(path = "stock.html")]
pub struct StockPage<'a> {
    pub financial_data_source: &'a str,
    pub ticker: &'a str,
    pub chart_url: &'a str,
    pub points: usize,
    pub last_close: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub status: u16,
    pub reason: &'a str,
    pub message: &'a str,
}

pub fn render(page: &impl Template) -> Result<HttpResponse, AppError> {
    render_with_status(page, StatusCode::OK)
}

pub fn render_with_status(
    page: &impl Template,
    status: StatusCode,
) -> Result<HttpResponse, AppError> {
    let body = page.render()?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}
