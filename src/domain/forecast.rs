//! Trend-extrapolation price forecaster.
//!
//! Not a trained model: each step projects the blended short/medium trend
//! forward and adds Gaussian noise scaled by recent volatility. Confidence
//! bounds widen with √i, so uncertainty grows sublinearly with the horizon.
//!
//! The random source is owned by the forecaster and injected at construction,
//! so a seeded generator reproduces a forecast exactly.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::error::AnalyticsError;
use super::signal::SignalClass;
use super::stats::{mean, population_stddev, round_to, tail};

pub const MIN_FORECAST_POINTS: usize = 10;
pub const VOLATILITY_WINDOW: usize = 20;
pub const DEFAULT_VOLATILITY: f64 = 0.02;
/// Longest horizon `predict` accepts.
pub const MAX_FORECAST_PERIODS: usize = 1000;
/// Horizon used when deriving a trading signal from a forecast.
pub const SIGNAL_HORIZON: usize = 6;

const SHORT_TREND_WEIGHT: f64 = 0.6;
const MEDIUM_TREND_WEIGHT: f64 = 0.4;
const NOISE_SCALE: f64 = 0.3;
const STEP_SCALE: f64 = 0.1;
const STRONG_MOVE_PCT: f64 = 2.0;
const MODERATE_MOVE_PCT: f64 = 0.5;
const STRONG_CONFIDENCE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => f.write_str("bullish"),
            Direction::Bearish => f.write_str("bearish"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub period: usize,
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub symbol: String,
    pub current_price: f64,
    pub points: Vec<ForecastPoint>,
    pub direction: Direction,
    pub predicted_change_percent: f64,
    /// Model confidence in percent, fixed for the forecaster instance.
    pub confidence: f64,
    pub periods_ahead: usize,
}

/// A discrete signal derived from a short forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSignal {
    pub signal: SignalClass,
    pub reason: String,
    pub confidence: f64,
    pub predicted_change: Option<f64>,
    pub forecast: Option<Forecast>,
}

pub struct Forecaster<R> {
    symbol: String,
    model_confidence: f64,
    rng: R,
}

impl Forecaster<StdRng> {
    pub fn seeded(symbol: impl Into<String>, seed: u64) -> Self {
        Self::new(symbol, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Forecaster<R> {
    /// Draws the instance's model confidence (65-85%) from `rng` once; it is
    /// reused for every forecast made by this instance.
    pub fn new(symbol: impl Into<String>, mut rng: R) -> Self {
        let model_confidence = rng.gen_range(0.65..0.85);
        Self {
            symbol: symbol.into(),
            model_confidence,
            rng,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Model confidence in percent, rounded to one place.
    pub fn confidence(&self) -> f64 {
        round_to(self.model_confidence * 100.0, 1)
    }

    pub fn predict(
        &mut self,
        prices: &[f64],
        periods_ahead: usize,
    ) -> Result<Forecast, AnalyticsError> {
        if prices.len() < MIN_FORECAST_POINTS {
            return Err(AnalyticsError::InsufficientData {
                operation: "forecast",
                have: prices.len(),
                need: MIN_FORECAST_POINTS,
            });
        }
        if periods_ahead == 0 {
            return Err(AnalyticsError::InvalidInput {
                reason: "periods_ahead must be at least 1".to_string(),
            });
        }
        if periods_ahead > MAX_FORECAST_PERIODS {
            return Err(AnalyticsError::InvalidInput {
                reason: format!("periods_ahead must be at most {MAX_FORECAST_PERIODS}"),
            });
        }

        let n = prices.len();
        let current_price = prices[n - 1];
        let short_trend = relative_change(prices[n - 5], current_price);
        let medium_trend = relative_change(prices[n - 10], current_price);
        let volatility = if n >= VOLATILITY_WINDOW {
            let window = tail(prices, VOLATILITY_WINDOW);
            population_stddev(window) / mean(window)
        } else {
            DEFAULT_VOLATILITY
        };
        debug!(
            symbol = %self.symbol,
            short_trend,
            medium_trend,
            volatility,
            "forecast inputs"
        );

        let trend_factor =
            (short_trend * SHORT_TREND_WEIGHT + medium_trend * MEDIUM_TREND_WEIGHT) / periods_ahead as f64;
        let noise_sigma = volatility * NOISE_SCALE;

        let points: Vec<ForecastPoint> = (1..=periods_ahead)
            .map(|i| {
                let z: f64 = self.rng.sample(StandardNormal);
                let predicted_change = trend_factor + z * noise_sigma;
                let predicted_price = current_price * (1.0 + predicted_change * i as f64 * STEP_SCALE);
                let half_width = volatility * (i as f64).sqrt() * current_price;
                ForecastPoint {
                    period: i,
                    predicted_price: round_to(predicted_price, 2),
                    lower_bound: round_to(predicted_price - half_width, 2),
                    upper_bound: round_to(predicted_price + half_width, 2),
                }
            })
            .collect();

        let final_price = points
            .last()
            .map(|p| p.predicted_price)
            .unwrap_or(current_price);
        let direction = if final_price > current_price {
            Direction::Bullish
        } else {
            Direction::Bearish
        };
        let change_pct = (final_price - current_price) / current_price * 100.0;

        Ok(Forecast {
            symbol: self.symbol.clone(),
            current_price,
            points,
            direction,
            predicted_change_percent: round_to(change_pct, 2),
            confidence: self.confidence(),
            periods_ahead,
        })
    }

    /// Buy/sell/hold derived from a [`SIGNAL_HORIZON`]-period forecast. Too
    /// little data degrades to hold with zero confidence.
    pub fn trading_signal(&mut self, prices: &[f64]) -> ForecastSignal {
        let forecast = match self.predict(prices, SIGNAL_HORIZON) {
            Ok(f) => f,
            Err(e) => {
                debug!(symbol = %self.symbol, error = %e, "forecast signal falls back to hold");
                return ForecastSignal {
                    signal: SignalClass::Hold,
                    reason: e.to_string(),
                    confidence: 0.0,
                    predicted_change: None,
                    forecast: None,
                };
            }
        };

        let change = forecast.predicted_change_percent;
        let signal = signal_from_forecast(change, forecast.confidence);

        ForecastSignal {
            signal,
            reason: signal_reason(signal, change),
            confidence: forecast.confidence,
            predicted_change: Some(change),
            forecast: Some(forecast),
        }
    }
}

/// Maps a forecast's percent change and model confidence to a signal class.
///
/// Strong classes need both a move beyond ±2% and confidence above 70.
pub fn signal_from_forecast(change_pct: f64, confidence: f64) -> SignalClass {
    if change_pct > STRONG_MOVE_PCT && confidence > STRONG_CONFIDENCE {
        SignalClass::StrongBuy
    } else if change_pct > MODERATE_MOVE_PCT {
        SignalClass::Buy
    } else if change_pct < -STRONG_MOVE_PCT && confidence > STRONG_CONFIDENCE {
        SignalClass::StrongSell
    } else if change_pct < -MODERATE_MOVE_PCT {
        SignalClass::Sell
    } else {
        SignalClass::Hold
    }
}

/// Human-readable explanation of a forecast-derived signal.
pub fn signal_reason(signal: SignalClass, change_pct: f64) -> String {
    match signal {
        SignalClass::StrongBuy => format!("Strong bullish prediction: {change_pct:+.2}% expected"),
        SignalClass::Buy => format!("Moderate bullish prediction: {change_pct:+.2}% expected"),
        SignalClass::StrongSell => format!("Strong bearish prediction: {change_pct:.2}% expected"),
        SignalClass::Sell => format!("Moderate bearish prediction: {change_pct:.2}% expected"),
        SignalClass::Hold => "Price expected to remain stable".to_string(),
    }
}

fn relative_change(from: f64, to: f64) -> f64 {
    (to - from) / from
}
