//! Portfolio allocation and rebalancing.
//!
//! A simplified mean-variance scheme: each asset gets a Sharpe-like score,
//! risk tolerance scales it asymmetrically (upside by the multiplier, downside
//! by its complement), and the clamped raw weights are normalized to sum to 1.
//! Normalization can push a weight outside the [0.05, 0.40] raw bounds; it is
//! not re-clamped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::AnalyticsError;
use super::stats::round_to;

pub const MIN_WEIGHT: f64 = 0.05;
pub const MAX_WEIGHT: f64 = 0.40;
/// Portfolio volatility discount for diversification.
pub const DIVERSIFICATION_FACTOR: f64 = 0.7;
/// Weight changes at or below this fraction are not worth a trade.
pub const REBALANCE_THRESHOLD: f64 = 0.01;

/// Symbol → portfolio weight (fraction of value).
pub type AllocationWeights = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Medium,
    Aggressive,
}

impl RiskTolerance {
    /// Case-insensitive; anything unrecognized is treated as medium.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "conservative" => RiskTolerance::Conservative,
            "aggressive" => RiskTolerance::Aggressive,
            _ => RiskTolerance::Medium,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            RiskTolerance::Conservative => 0.3,
            RiskTolerance::Medium => 0.6,
            RiskTolerance::Aggressive => 0.9,
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTolerance::Conservative => f.write_str("conservative"),
            RiskTolerance::Medium => f.write_str("medium"),
            RiskTolerance::Aggressive => f.write_str("aggressive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInput {
    pub symbol: String,
    /// Expected annual return as a fraction (0.15 = 15%).
    pub expected_return: f64,
    /// Annual volatility as a fraction.
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationEntry {
    pub symbol: String,
    pub weight: f64,
    /// Percent, 2 places.
    pub expected_return: f64,
    /// Percent, 2 places.
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub entries: Vec<AllocationEntry>,
    pub expected_portfolio_return: f64,
    pub expected_portfolio_volatility: f64,
    pub sharpe_ratio: f64,
    pub risk_tolerance: RiskTolerance,
    pub recommendation: String,
}

impl Allocation {
    pub fn weights(&self) -> AllocationWeights {
        let mut weights = AllocationWeights::new();
        for entry in &self.entries {
            *weights.entry(entry.symbol.clone()).or_insert(0.0) += entry.weight;
        }
        weights
    }
}

/// Pre-normalization weight for one asset, always within [0.05, 0.40].
pub fn raw_weight(asset: &AssetInput, tolerance: RiskTolerance) -> f64 {
    let multiplier = tolerance.multiplier();
    let score = asset.expected_return / (asset.volatility + 0.01);
    let adjusted = if score > 0.0 {
        score * multiplier
    } else {
        score * (1.0 - multiplier)
    };
    // NaN (from a -0.01 volatility) falls to the floor rather than poisoning the sum.
    let weight = (adjusted + 1.0) / 4.0;
    if weight.is_nan() {
        MIN_WEIGHT
    } else {
        weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
    }
}

pub fn optimize(assets: &[AssetInput], tolerance: RiskTolerance) -> Result<Allocation, AnalyticsError> {
    if assets.is_empty() {
        return Err(AnalyticsError::NoAssets);
    }

    let raw: Vec<f64> = assets.iter().map(|a| raw_weight(a, tolerance)).collect();
    let total: f64 = raw.iter().sum();

    let entries: Vec<AllocationEntry> = assets
        .iter()
        .zip(&raw)
        .map(|(asset, w)| AllocationEntry {
            symbol: asset.symbol.clone(),
            weight: w / total,
            expected_return: round_to(asset.expected_return * 100.0, 2),
            volatility: round_to(asset.volatility * 100.0, 2),
        })
        .collect();

    let portfolio_return: f64 = entries.iter().map(|e| e.weight * e.expected_return).sum();
    let portfolio_volatility: f64 =
        entries.iter().map(|e| e.weight * e.volatility).sum::<f64>() * DIVERSIFICATION_FACTOR;

    Ok(Allocation {
        entries,
        expected_portfolio_return: round_to(portfolio_return, 2),
        expected_portfolio_volatility: round_to(portfolio_volatility, 2),
        sharpe_ratio: round_to(portfolio_return / (portfolio_volatility + 0.01), 2),
        risk_tolerance: tolerance,
        recommendation: format!("Portfolio optimized for {} risk tolerance", tolerance),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => f.write_str("buy"),
            TradeAction::Sell => f.write_str("sell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RebalanceSuggestion {
    pub symbol: String,
    pub action: TradeAction,
    /// Percent, 2 places.
    pub current_weight: f64,
    /// Percent, 2 places.
    pub target_weight: f64,
    /// target - current, percent, 2 places.
    pub change_percentage: f64,
}

/// Trades needed to move `current` to `target`, ordered by symbol. Symbols
/// missing from either side count as weight 0.
pub fn rebalance_diff(
    current: &AllocationWeights,
    target: &AllocationWeights,
) -> Vec<RebalanceSuggestion> {
    let mut symbols: Vec<&String> = current.keys().chain(target.keys()).collect();
    symbols.sort();
    symbols.dedup();

    symbols
        .into_iter()
        .filter_map(|symbol| {
            let current_weight = current.get(symbol).copied().unwrap_or(0.0);
            let target_weight = target.get(symbol).copied().unwrap_or(0.0);
            let diff = target_weight - current_weight;
            if diff.abs() <= REBALANCE_THRESHOLD {
                return None;
            }
            Some(RebalanceSuggestion {
                symbol: symbol.clone(),
                action: if diff > 0.0 {
                    TradeAction::Buy
                } else {
                    TradeAction::Sell
                },
                current_weight: round_to(current_weight * 100.0, 2),
                target_weight: round_to(target_weight * 100.0, 2),
                change_percentage: round_to(diff * 100.0, 2),
            })
        })
        .collect()
}
