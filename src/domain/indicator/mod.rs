//! Technical indicator implementations.
//!
//! Every calculator is a pure function over price slices. None of them fail on
//! short input; each degrades to a neutral or default value instead.
//!
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorResult`: The full snapshot computed for one price series

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use atr::calculate_atr;
pub use bollinger::{BollingerBands, calculate_bollinger};
pub use ema::calculate_ema;
pub use macd::{MacdValue, calculate_macd};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::{StochasticValue, calculate_stochastic};

use serde::Serialize;
use std::fmt;

use crate::domain::ohlcv::PriceSeries;

pub const DEFAULT_PERIOD: usize = 14;
pub const SHORT_SMA_PERIOD: usize = 20;
pub const LONG_SMA_PERIOD: usize = 50;
pub const EMA_PERIOD: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Simple(f64),
    Macd(MacdValue),
    Bollinger(BollingerBands),
    Stochastic(StochasticValue),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Stochastic(usize),
    Bollinger(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Stochastic(period) => write!(f, "STOCHASTIC({})", period),
            IndicatorType::Bollinger(period) => write!(f, "BOLLINGER({})", period),
        }
    }
}

/// Latest value of every indicator for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorResult {
    pub rsi: f64,
    pub macd: MacdValue,
    pub bollinger: BollingerBands,
    pub stochastic: StochasticValue,
    pub atr: f64,
    pub sma_20: f64,
    /// Falls back to `sma_20` when the series is shorter than 50 bars.
    pub sma_50: f64,
    pub ema_12: f64,
}

impl IndicatorResult {
    pub fn compute(series: &PriceSeries) -> Self {
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();

        let sma_20 = calculate_sma(&closes, SHORT_SMA_PERIOD)
            .last()
            .copied()
            .unwrap_or(0.0);
        let sma_50 = if closes.len() >= LONG_SMA_PERIOD {
            calculate_sma(&closes, LONG_SMA_PERIOD)
                .last()
                .copied()
                .unwrap_or(sma_20)
        } else {
            sma_20
        };
        let ema_12 = calculate_ema(&closes, EMA_PERIOD)
            .last()
            .copied()
            .unwrap_or(0.0);

        IndicatorResult {
            rsi: calculate_rsi(&closes, DEFAULT_PERIOD),
            macd: calculate_macd(&closes),
            bollinger: calculate_bollinger(&closes, bollinger::DEFAULT_PERIOD),
            stochastic: calculate_stochastic(&highs, &lows, &closes, DEFAULT_PERIOD),
            atr: calculate_atr(&highs, &lows, &closes, DEFAULT_PERIOD),
            sma_20,
            sma_50,
            ema_12,
        }
    }

    /// Name → value view, in a stable order.
    pub fn entries(&self) -> Vec<(IndicatorType, IndicatorValue)> {
        vec![
            (IndicatorType::Rsi(DEFAULT_PERIOD), IndicatorValue::Simple(self.rsi)),
            (
                IndicatorType::Macd {
                    fast: macd::DEFAULT_FAST,
                    slow: macd::DEFAULT_SLOW,
                    signal: macd::DEFAULT_SIGNAL,
                },
                IndicatorValue::Macd(self.macd),
            ),
            (
                IndicatorType::Bollinger(bollinger::DEFAULT_PERIOD),
                IndicatorValue::Bollinger(self.bollinger),
            ),
            (
                IndicatorType::Stochastic(DEFAULT_PERIOD),
                IndicatorValue::Stochastic(self.stochastic),
            ),
            (IndicatorType::Atr(DEFAULT_PERIOD), IndicatorValue::Simple(self.atr)),
            (IndicatorType::Sma(SHORT_SMA_PERIOD), IndicatorValue::Simple(self.sma_20)),
            (IndicatorType::Sma(LONG_SMA_PERIOD), IndicatorValue::Simple(self.sma_50)),
            (IndicatorType::Ema(EMA_PERIOD), IndicatorValue::Simple(self.ema_12)),
        ]
    }

    pub fn get(&self, indicator: &IndicatorType) -> Option<IndicatorValue> {
        self.entries()
            .into_iter()
            .find(|(t, _)| t == indicator)
            .map(|(_, v)| v)
    }
}
