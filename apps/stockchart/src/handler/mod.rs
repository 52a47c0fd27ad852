mod home;
mod stock;

use actix_web::web;

pub use home::{health, home};
pub use stock::{StockForm, stock};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/stock", web::post().to(stock))
        .route("/health", web::get().to(health));
}
