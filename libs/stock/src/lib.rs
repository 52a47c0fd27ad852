mod alpaca;
mod series;
mod source;
mod window;
mod yahoo;

pub mod chart;

pub use alpaca::{AlpacaClient, Bar};
pub use chart::{CharmingRenderer, ChartRenderer};
pub use series::{PricePoint, PriceSeries};
pub use source::PriceSource;
pub use window::DateWindow;
pub use yahoo::{YAHOO_BASE_URL, YahooClient};
