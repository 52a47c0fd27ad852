use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closing prices of one symbol, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::new(symbol, Vec::new())
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Dates formatted as `YYYY-MM-DD`, aligned with [`closes`](Self::closes).
    pub fn dates(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(y: i32, m: u32, d: u32, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            close,
        }
    }

    #[test]
    fn points_are_sorted_by_date() {
        let series = PriceSeries::new(
            "ACME",
            vec![point(2023, 6, 1, 120.0), point(2023, 1, 2, 100.0)],
        );

        assert_eq!(series.dates(), vec!["2023-01-02", "2023-06-01"]);
        assert_eq!(series.closes(), vec![100.0, 120.0]);
        assert_eq!(series.last_close(), Some(120.0));
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::empty("NOPE");

        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert_eq!(series.last_close(), None);
    }
}
