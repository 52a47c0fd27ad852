use anyhow::{Error, Result, ensure};
use async_trait::async_trait;
use charming::{
    Chart, ImageFormat, ImageRenderer,
    component::{Axis, Legend, Title},
    element::{
        AxisLabel, AxisType, ItemStyle, LineStyle, NameLocation, SplitLine, Symbol, TextStyle,
        Tooltip, Trigger,
    },
    series::Line,
};

use crate::PriceSeries;

pub const WIDTH: u32 = 1400;
pub const HEIGHT: u32 = 700;

const LINE_COLOR: &str = "#ff0000";
const GRID_COLOR: &str = "#d9d9d9";

/// Turns a price series into an encoded image.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, series: &PriceSeries) -> Result<Vec<u8>, Error>;
}

/// Renders PNG line charts with charming on the blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct CharmingRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for CharmingRenderer {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
        }
    }
}

#[async_trait]
impl ChartRenderer for CharmingRenderer {
    async fn render(&self, series: &PriceSeries) -> Result<Vec<u8>, Error> {
        let series = series.clone();
        let (width, height) = (self.width, self.height);

        tokio::task::spawn_blocking(move || render_png(&series, width, height)).await?
    }
}

pub fn title_for(symbol: &str) -> String {
    format!("Stock Price Movement During the Last Year for Ticker Symbol {}", symbol)
}

/// Closing-price line chart: dates on x, price on y, one red series named after the symbol.
pub fn build_chart(series: &PriceSeries) -> Result<Chart, Error> {
    ensure!(!series.is_empty(), "no prices to chart for {}", series.symbol);

    let grid_line = || SplitLine::new().show(true).line_style(LineStyle::new().color(GRID_COLOR));

    let chart = Chart::new()
        .background_color("#ffffff")
        .title(
            Title::new()
                .text(title_for(&series.symbol))
                .left("center")
                .top("2%")
                .text_style(TextStyle::new().color("#000000").font_size(16)),
        )
        .legend(Legend::new().top("8%").right("5%"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Date")
                .name_location(NameLocation::Middle)
                .name_gap(30)
                .data(series.dates())
                .axis_label(AxisLabel::new().color("#404040"))
                .split_line(grid_line()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Stock Price")
                .name_location(NameLocation::Middle)
                .name_gap(50)
                .scale(true)
                .axis_label(AxisLabel::new().color("#404040"))
                .split_line(grid_line()),
        )
        .series(
            Line::new()
                .name(series.symbol.as_str())
                .data(series.closes())
                .symbol(Symbol::None)
                .item_style(ItemStyle::new().color(LINE_COLOR))
                .line_style(LineStyle::new().width(2).color(LINE_COLOR)),
        );

    Ok(chart)
}

pub fn render_png(series: &PriceSeries, width: u32, height: u32) -> Result<Vec<u8>, Error> {
    let chart = build_chart(series)?;

    let mut renderer = ImageRenderer::new(width, height);
    let png_bytes = renderer.render_format(ImageFormat::Png, &chart)?;
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PricePoint;
    use chrono::NaiveDate;

    fn acme() -> PriceSeries {
        PriceSeries::new(
            "ACME",
            vec![
                PricePoint {
                    date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
                    close: 100.0,
                },
                PricePoint {
                    date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
                    close: 120.0,
                },
            ],
        )
    }

    #[test]
    fn chart_carries_title_axes_and_series() {
        let option = build_chart(&acme()).unwrap().to_string();

        assert!(option.contains(&title_for("ACME")));
        assert!(option.contains("\"Date\""));
        assert!(option.contains("\"Stock Price\""));
        assert!(option.contains("2023-01-02"));
        assert!(option.contains("2023-06-01"));
        assert!(option.contains(LINE_COLOR));
        assert!(option.contains("legend"));
    }

    #[tokio::test]
    async fn renders_png() {
        let png = CharmingRenderer::default().render(&acme()).await.unwrap();

        assert!(png.starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn render_rejects_empty_series() {
        let result = CharmingRenderer::default()
            .render(&PriceSeries::empty("NOPE"))
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn empty_series_is_rejected() {
        let err = build_chart(&PriceSeries::empty("NOPE")).unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }
}
