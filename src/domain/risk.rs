//! Risk statistics for return series, single trades and portfolios.
//!
//! Everything here is a pure function that tolerates empty or degenerate
//! input by returning a documented default instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::stats::{mean, population_stddev, round_to};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

pub const MIN_VAR_RETURNS: usize = 10;
/// Reported (in percent) when there are too few returns for a historical VaR.
pub const DEFAULT_VAR_PCT: f64 = 5.0;
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// low < 4 ≤ medium < 7 ≤ high
    pub fn from_score(score: f64) -> Self {
        if score < 4.0 {
            RiskLevel::Low
        } else if score < 7.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("low"),
            RiskLevel::Medium => f.write_str("medium"),
            RiskLevel::High => f.write_str("high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Concentration {
    #[serde(rename = "N/A")]
    NotApplicable,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
}

impl Concentration {
    /// Thresholds on the largest position's share of portfolio value, in percent.
    pub fn from_max_share(pct: f64) -> Self {
        if pct > 50.0 {
            Concentration::High
        } else if pct > 25.0 {
            Concentration::Medium
        } else {
            Concentration::Low
        }
    }
}

impl fmt::Display for Concentration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concentration::NotApplicable => f.write_str("N/A"),
            Concentration::Low => f.write_str("low"),
            Concentration::Medium => f.write_str("medium"),
            Concentration::High => f.write_str("high"),
        }
    }
}

/// Historical-simulation VaR in percent.
///
/// Sorts ascending and takes the return at floor((1 - confidence) × N).
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.len() < MIN_VAR_RETURNS {
        return DEFAULT_VAR_PCT;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let raw_index = ((1.0 - confidence) * sorted.len() as f64).floor().max(0.0) as usize;
    let index = raw_index.min(sorted.len() - 1);
    round_to(sorted[index].abs() * 100.0, 2)
}

/// Annualized Sharpe ratio from daily returns.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let stddev = population_stddev(returns);
    if stddev == 0.0 {
        return 0.0;
    }

    let excess = mean(returns) - risk_free_rate / TRADING_DAYS_PER_YEAR;
    round_to(excess / stddev * TRADING_DAYS_PER_YEAR.sqrt(), 2)
}

/// Largest peak-to-trough decline, in percent.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }

    let mut peak = equity_curve[0];
    let mut max_dd = 0.0_f64;

    for &value in equity_curve {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    round_to(max_dd * 100.0, 2)
}

/// Simple period-over-period returns; a zero previous value yields 0.
pub fn returns_from_equity(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0];
            if prev != 0.0 { (w[1] - prev) / prev } else { 0.0 }
        })
        .collect()
}

/// Return-series risk bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnRisk {
    pub value_at_risk: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub observations: usize,
}

impl ReturnRisk {
    pub fn from_equity_curve(equity_curve: &[f64], risk_free_rate: f64, confidence: f64) -> Self {
        let returns = returns_from_equity(equity_curve);
        ReturnRisk {
            value_at_risk: value_at_risk(&returns, confidence),
            sharpe_ratio: sharpe_ratio(&returns, risk_free_rate),
            max_drawdown: max_drawdown(equity_curve),
            observations: returns.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRisk {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub position_value: f64,
    pub position_percentage: f64,
    pub max_loss_1std: f64,
    pub max_loss_2std: f64,
    pub recommended_stop_loss: f64,
    pub recommended_take_profit: f64,
    pub recommendation: String,
}

pub fn trade_risk(
    entry_price: f64,
    position_size: f64,
    portfolio_value: f64,
    volatility: f64,
) -> TradeRisk {
    let position_value = entry_price * position_size;
    let position_pct = if portfolio_value != 0.0 {
        position_value / portfolio_value * 100.0
    } else {
        0.0
    };

    let risk_score = f64::clamp(position_pct / 5.0 + volatility * 20.0, 1.0, 10.0);
    let recommendation = if risk_score > 6.0 {
        "Proceed with caution"
    } else {
        "Trade appears reasonable"
    };

    TradeRisk {
        risk_score: round_to(risk_score, 1),
        risk_level: RiskLevel::from_score(risk_score),
        position_value: round_to(position_value, 2),
        position_percentage: round_to(position_pct, 2),
        max_loss_1std: round_to(position_value * volatility, 2),
        max_loss_2std: round_to(position_value * volatility * 2.0, 2),
        recommended_stop_loss: round_to(entry_price * (1.0 - volatility * 1.5), 2),
        recommended_take_profit: round_to(entry_price * (1.0 + volatility * 2.0), 2),
        recommendation: recommendation.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRisk {
    pub position_count: usize,
    pub total_value: f64,
    pub max_position_percentage: f64,
    pub concentration_risk: Concentration,
    /// 1-10, two points per position.
    pub diversification_score: u32,
}

pub fn portfolio_risk(positions: &[Position]) -> PortfolioRisk {
    if positions.is_empty() {
        return PortfolioRisk {
            position_count: 0,
            total_value: 0.0,
            max_position_percentage: 0.0,
            concentration_risk: Concentration::NotApplicable,
            diversification_score: 0,
        };
    }

    let total_value: f64 = positions.iter().map(|p| p.value).sum();
    let max_position_pct = if total_value > 0.0 {
        positions
            .iter()
            .map(|p| p.value / total_value * 100.0)
            .fold(f64::NEG_INFINITY, f64::max)
    } else {
        0.0
    };
    let diversification = (positions.len() * 2).min(10) as u32;

    PortfolioRisk {
        position_count: positions.len(),
        total_value: round_to(total_value, 2),
        max_position_percentage: round_to(max_position_pct, 2),
        concentration_risk: Concentration::from_max_share(max_position_pct),
        diversification_score: diversification,
    }
}
