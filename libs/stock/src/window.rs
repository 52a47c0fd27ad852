use anyhow::{Result, anyhow};
use chrono::{DateTime, Months, Utc};

/// Inclusive range of instants a price history is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// One calendar year ending at `end`.
    ///
    /// The start keeps the month, day and time of `end`. When that day does not
    /// exist a year earlier (February 29) it is clamped to the last day of the month.
    pub fn trailing_year(end: DateTime<Utc>) -> Result<Self> {
        let start = end
            .checked_sub_months(Months::new(12))
            .ok_or_else(|| anyhow!("cannot go back one year from {}", end.to_rfc3339()))?;

        Ok(Self { start, end })
    }
}
