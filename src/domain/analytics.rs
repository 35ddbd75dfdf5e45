//! Entry points consumed by callers of the engine.
//!
//! Thin composition over the indicator, forecast, signal, risk and allocation
//! modules. Every randomized operation takes its generator explicitly.

use rand::Rng;

use super::allocation::{
    self, Allocation, AllocationWeights, AssetInput, RebalanceSuggestion, RiskTolerance,
};
use super::error::AnalyticsError;
use super::forecast::{Forecast, Forecaster};
use super::indicator::IndicatorResult;
use super::ohlcv::PriceSeries;
use super::risk::{self, PortfolioRisk, Position, ReturnRisk, TradeRisk};
use super::signal::{self, Signal};

pub fn compute_indicators(series: &PriceSeries) -> IndicatorResult {
    IndicatorResult::compute(series)
}

pub fn forecast<R: Rng>(
    series: &PriceSeries,
    periods_ahead: usize,
    rng: R,
) -> Result<Forecast, AnalyticsError> {
    Forecaster::new(series.symbol(), rng).predict(&series.closes(), periods_ahead)
}

pub fn generate_signal<R: Rng>(
    symbol: &str,
    series: &PriceSeries,
    rng: R,
) -> Result<Signal, AnalyticsError> {
    signal::aggregate(symbol, series, rng)
}

pub fn assess_trade_risk(
    entry_price: f64,
    position_size: f64,
    portfolio_value: f64,
    volatility: f64,
) -> TradeRisk {
    risk::trade_risk(entry_price, position_size, portfolio_value, volatility)
}

pub fn portfolio_risk(positions: &[Position]) -> PortfolioRisk {
    risk::portfolio_risk(positions)
}

pub fn equity_risk(equity_curve: &[f64], risk_free_rate: f64, confidence: f64) -> ReturnRisk {
    ReturnRisk::from_equity_curve(equity_curve, risk_free_rate, confidence)
}

pub fn optimize_allocation(
    assets: &[AssetInput],
    risk_tolerance: RiskTolerance,
) -> Result<Allocation, AnalyticsError> {
    allocation::optimize(assets, risk_tolerance)
}

pub fn rebalance(current: &AllocationWeights, target: &AllocationWeights) -> Vec<RebalanceSuggestion> {
    allocation::rebalance_diff(current, target)
}
