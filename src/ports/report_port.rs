//! Report rendering port.

use serde::Serialize;

use crate::domain::allocation::{Allocation, RebalanceSuggestion};
use crate::domain::error::AnalyticsError;
use crate::domain::forecast::Forecast;
use crate::domain::indicator::IndicatorResult;
use crate::domain::risk::{PortfolioRisk, ReturnRisk, TradeRisk};
use crate::domain::signal::Signal;

/// One command's output, borrowed from the records the engines produced.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report<'a> {
    Indicators {
        symbol: &'a str,
        indicators: &'a IndicatorResult,
    },
    Forecast(&'a Forecast),
    Signal(&'a Signal),
    ReturnRisk {
        source: &'a str,
        risk: &'a ReturnRisk,
    },
    TradeRisk(&'a TradeRisk),
    PortfolioRisk(&'a PortfolioRisk),
    Allocation(&'a Allocation),
    Rebalance(&'a [RebalanceSuggestion]),
}

/// Port for turning a report into printable output.
pub trait ReportPort {
    fn render(&self, report: &Report<'_>) -> Result<String, AnalyticsError>;
}
