//! Price data access port.

use crate::domain::error::AnalyticsError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Load the bars for `symbol`, optionally restricted to an inclusive
    /// date range. A symbol with no source is a `Data` error; a source with
    /// no bars in range is an empty series.
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, AnalyticsError>;

    fn list_symbols(&self) -> Result<Vec<String>, AnalyticsError>;
}
