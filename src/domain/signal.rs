//! Signal aggregation.
//!
//! Each indicator and the forecast signal is scored on [-1, 1], the scores are
//! blended with fixed weights, and the weighted score is bucketed into a
//! signal class with a confidence percentage.

use rand::Rng;
use serde::Serialize;
use std::fmt;

use super::error::AnalyticsError;
use super::forecast::{ForecastSignal, Forecaster};
use super::indicator::{BollingerBands, IndicatorResult, MacdValue, StochasticValue};
use super::ohlcv::PriceSeries;
use super::stats::round_to;

pub const MIN_SIGNAL_POINTS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalClass {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl SignalClass {
    /// Score of a forecast-derived signal on the common [-1, 1] scale.
    pub fn score(self) -> f64 {
        match self {
            SignalClass::StrongBuy => 1.0,
            SignalClass::Buy => 0.5,
            SignalClass::Hold => 0.0,
            SignalClass::Sell => -0.5,
            SignalClass::StrongSell => -1.0,
        }
    }
}

impl fmt::Display for SignalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalClass::StrongBuy => "strong_buy",
            SignalClass::Buy => "buy",
            SignalClass::Hold => "hold",
            SignalClass::Sell => "sell",
            SignalClass::StrongSell => "strong_sell",
        };
        f.write_str(s)
    }
}

/// One value per scored component. Used both for the scores themselves and
/// for the blend weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScores {
    pub rsi: f64,
    pub macd: f64,
    pub bollinger: f64,
    pub stochastic: f64,
    pub moving_averages: f64,
    pub forecast: f64,
}

pub const SCORE_WEIGHTS: ComponentScores = ComponentScores {
    rsi: 0.15,
    macd: 0.20,
    bollinger: 0.10,
    stochastic: 0.10,
    moving_averages: 0.20,
    forecast: 0.25,
};

impl ComponentScores {
    pub fn sum(&self) -> f64 {
        self.rsi + self.macd + self.bollinger + self.stochastic + self.moving_averages + self.forecast
    }

    pub fn weighted_total(&self, weights: &ComponentScores) -> f64 {
        self.rsi * weights.rsi
            + self.macd * weights.macd
            + self.bollinger * weights.bollinger
            + self.stochastic * weights.stochastic
            + self.moving_averages * weights.moving_averages
            + self.forecast * weights.forecast
    }

    fn rounded(&self, decimals: i32) -> Self {
        ComponentScores {
            rsi: round_to(self.rsi, decimals),
            macd: round_to(self.macd, decimals),
            bollinger: round_to(self.bollinger, decimals),
            stochastic: round_to(self.stochastic, decimals),
            moving_averages: round_to(self.moving_averages, decimals),
            forecast: round_to(self.forecast, decimals),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi < 30.0 {
            RsiZone::Oversold
        } else if rsi > 70.0 {
            RsiZone::Overbought
        } else {
            RsiZone::Neutral
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiZone::Oversold => f.write_str("oversold"),
            RsiZone::Neutral => f.write_str("neutral"),
            RsiZone::Overbought => f.write_str("overbought"),
        }
    }
}

/// Indicator values as reported alongside a signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub rsi_zone: RsiZone,
    pub macd: MacdValue,
    pub bollinger_bands: BollingerBands,
    pub stochastic: StochasticValue,
    pub sma_20: f64,
    pub sma_50: f64,
    pub ema_12: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub symbol: String,
    pub signal: SignalClass,
    pub confidence: f64,
    pub overall_score: f64,
    pub current_price: f64,
    pub indicators: IndicatorSnapshot,
    pub indicator_scores: ComponentScores,
    pub forecast: ForecastSignal,
}

pub fn score_rsi(rsi: f64) -> f64 {
    if rsi < 30.0 {
        0.8
    } else if rsi < 40.0 {
        0.4
    } else if rsi > 70.0 {
        -0.8
    } else if rsi > 60.0 {
        -0.4
    } else {
        0.0
    }
}

pub fn score_macd(macd: &MacdValue) -> f64 {
    let histogram = macd.histogram;
    if histogram > 0.5 {
        0.8
    } else if histogram > 0.0 {
        0.3
    } else if histogram < -0.5 {
        -0.8
    } else if histogram < 0.0 {
        -0.3
    } else {
        0.0
    }
}

pub fn score_bollinger(price: f64, bands: &BollingerBands) -> f64 {
    let position = bands.position(price);
    if position < 0.2 {
        0.7
    } else if position > 0.8 {
        -0.7
    } else {
        0.0
    }
}

pub fn score_stochastic(stochastic: &StochasticValue) -> f64 {
    if stochastic.k < 20.0 {
        0.7
    } else if stochastic.k > 80.0 {
        -0.7
    } else {
        0.0
    }
}

/// Price against both SMAs plus the SMA20/SMA50 cross, clamped to [-1, 1].
pub fn score_moving_averages(price: f64, sma_20: f64, sma_50: f64) -> f64 {
    let mut score = 0.0;
    score += if price > sma_20 { 0.3 } else { -0.3 };
    score += if price > sma_50 { 0.3 } else { -0.3 };
    score += if sma_20 > sma_50 { 0.4 } else { -0.4 };
    f64::clamp(score, -1.0, 1.0)
}

/// Buckets a weighted score into a signal class and its confidence percent.
pub fn classify(score: f64) -> (SignalClass, f64) {
    if score > 0.5 {
        (SignalClass::StrongBuy, f64::min(95.0, 70.0 + score * 25.0))
    } else if score > 0.2 {
        (SignalClass::Buy, f64::min(85.0, 60.0 + score * 30.0))
    } else if score < -0.5 {
        (SignalClass::StrongSell, f64::min(95.0, 70.0 + score.abs() * 25.0))
    } else if score < -0.2 {
        (SignalClass::Sell, f64::min(85.0, 60.0 + score.abs() * 30.0))
    } else {
        (SignalClass::Hold, 50.0 + score.abs() * 20.0)
    }
}

/// Scores every indicator plus a fresh forecast and blends them into one
/// signal. Needs at least [`MIN_SIGNAL_POINTS`] bars.
pub fn aggregate<R: Rng>(
    symbol: &str,
    series: &PriceSeries,
    rng: R,
) -> Result<Signal, AnalyticsError> {
    let closes = series.closes();
    let Some(&current_price) = closes.last().filter(|_| closes.len() >= MIN_SIGNAL_POINTS) else {
        return Err(AnalyticsError::InsufficientData {
            operation: "signal",
            have: closes.len(),
            need: MIN_SIGNAL_POINTS,
        });
    };

    let indicators = IndicatorResult::compute(series);
    let forecast = Forecaster::new(symbol, rng).trading_signal(&closes);

    let scores = ComponentScores {
        rsi: score_rsi(indicators.rsi),
        macd: score_macd(&indicators.macd),
        bollinger: score_bollinger(current_price, &indicators.bollinger),
        stochastic: score_stochastic(&indicators.stochastic),
        moving_averages: score_moving_averages(current_price, indicators.sma_20, indicators.sma_50),
        forecast: forecast.signal.score(),
    };
    let total = scores.weighted_total(&SCORE_WEIGHTS);
    let (signal, confidence) = classify(total);

    Ok(Signal {
        symbol: symbol.to_string(),
        signal,
        confidence: round_to(confidence, 1),
        overall_score: round_to(total, 3),
        current_price,
        indicators: IndicatorSnapshot {
            rsi: indicators.rsi,
            rsi_zone: RsiZone::classify(indicators.rsi),
            macd: indicators.macd,
            bollinger_bands: indicators.bollinger,
            stochastic: indicators.stochastic,
            sma_20: round_to(indicators.sma_20, 2),
            sma_50: round_to(indicators.sma_50, 2),
            ema_12: round_to(indicators.ema_12, 2),
        },
        indicator_scores: scores.rounded(2),
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes("TEST", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), closes)
    }

    #[test]
    fn weights_sum_to_one() {
        assert!((SCORE_WEIGHTS.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rsi_scores() {
        assert_eq!(score_rsi(25.0), 0.8);
        assert_eq!(score_rsi(35.0), 0.4);
        assert_eq!(score_rsi(50.0), 0.0);
        assert_eq!(score_rsi(65.0), -0.4);
        assert_eq!(score_rsi(75.0), -0.8);
        assert_eq!(score_rsi(30.0), 0.4);
        assert_eq!(score_rsi(70.0), -0.4);
    }

    #[test]
    fn macd_scores() {
        let with = |histogram| MacdValue {
            macd: 0.0,
            signal: 0.0,
            histogram,
        };
        assert_eq!(score_macd(&with(0.6)), 0.8);
        assert_eq!(score_macd(&with(0.5)), 0.3);
        assert_eq!(score_macd(&with(0.0)), 0.0);
        assert_eq!(score_macd(&with(-0.1)), -0.3);
        assert_eq!(score_macd(&with(-0.6)), -0.8);
    }

    #[test]
    fn bollinger_scores() {
        let bands = BollingerBands {
            upper: 110.0,
            middle: 100.0,
            lower: 90.0,
        };
        assert_eq!(score_bollinger(91.0, &bands), 0.7);
        assert_eq!(score_bollinger(100.0, &bands), 0.0);
        assert_eq!(score_bollinger(109.0, &bands), -0.7);
    }

    #[test]
    fn stochastic_scores() {
        let with = |k| StochasticValue { k, d: k };
        assert_eq!(score_stochastic(&with(10.0)), 0.7);
        assert_eq!(score_stochastic(&with(50.0)), 0.0);
        assert_eq!(score_stochastic(&with(90.0)), -0.7);
    }

    #[test]
    fn moving_average_scores() {
        assert!((score_moving_averages(110.0, 105.0, 100.0) - 1.0).abs() < 1e-12);
        assert!((score_moving_averages(90.0, 95.0, 100.0) + 1.0).abs() < 1e-12);
        // above SMA20, below SMA50, death cross: 0.3 - 0.3 - 0.4
        assert!((score_moving_averages(97.0, 95.0, 100.0) + 0.4).abs() < 1e-12);
    }

    #[test]
    fn forecast_class_scores() {
        assert_eq!(SignalClass::StrongBuy.score(), 1.0);
        assert_eq!(SignalClass::Buy.score(), 0.5);
        assert_eq!(SignalClass::Hold.score(), 0.0);
        assert_eq!(SignalClass::Sell.score(), -0.5);
        assert_eq!(SignalClass::StrongSell.score(), -1.0);
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(0.6).0, SignalClass::StrongBuy);
        assert_eq!(classify(0.5).0, SignalClass::Buy);
        assert_eq!(classify(0.3).0, SignalClass::Buy);
        assert_eq!(classify(0.2).0, SignalClass::Hold);
        assert_eq!(classify(-0.2).0, SignalClass::Hold);
        assert_eq!(classify(-0.3).0, SignalClass::Sell);
        assert_eq!(classify(-0.5).0, SignalClass::Sell);
        assert_eq!(classify(-0.6).0, SignalClass::StrongSell);
    }

    #[test]
    fn classify_confidence_formulas() {
        assert!((classify(0.6).1 - 85.0).abs() < 1e-9);
        assert!((classify(0.3).1 - 69.0).abs() < 1e-9);
        assert!((classify(0.1).1 - 52.0).abs() < 1e-9);
        assert!((classify(-0.3).1 - 69.0).abs() < 1e-9);
        assert!((classify(-0.8).1 - 90.0).abs() < 1e-9);
        // caps
        assert_eq!(classify(1.5).1, 95.0);
        assert_eq!(classify(-1.5).1, 95.0);
    }

    #[test]
    fn classify_confidence_grows_with_magnitude() {
        let scores = [0.0, 0.1, 0.19, 0.21, 0.4, 0.49, 0.51, 0.8, 1.0];
        for pair in scores.windows(2) {
            assert!(classify(pair[1]).1 >= classify(pair[0]).1, "{:?}", pair);
            assert!(classify(-pair[1]).1 >= classify(-pair[0]).1, "{:?}", pair);
        }
    }

    #[test]
    fn rsi_zones() {
        assert_eq!(RsiZone::classify(20.0), RsiZone::Oversold);
        assert_eq!(RsiZone::classify(50.0), RsiZone::Neutral);
        assert_eq!(RsiZone::classify(80.0), RsiZone::Overbought);
    }

    #[test]
    fn aggregate_requires_twenty_points() {
        let closes: Vec<f64> = (0..19).map(|i| 100.0 + i as f64).collect();
        let err = aggregate("BTC", &series(&closes), StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InsufficientData { have: 19, need: 20, .. }
        ));
    }

    #[test]
    fn aggregate_flat_market_holds() {
        // Flat: RSI 50, MACD 0, band position 0.5, %K 50, MAs all -0.3/-0.3/-0.4,
        // forecast hold → total = 0.20 × -1.0 = -0.2 → hold.
        let signal = aggregate("FLAT", &series(&[100.0; 30]), StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(signal.signal, SignalClass::Hold);
        assert_eq!(signal.indicator_scores.moving_averages, -1.0);
        assert_eq!(signal.indicator_scores.forecast, 0.0);
        assert!((signal.overall_score + 0.2).abs() < 1e-9);
        assert!((signal.confidence - 54.0).abs() < 1e-9);
        assert_eq!(signal.indicators.rsi_zone, RsiZone::Neutral);
    }

    #[test]
    fn aggregate_overall_score_matches_components() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.4).sin() * 8.0 + i as f64 * 0.3)
            .collect();
        let signal = aggregate("MIX", &series(&closes), StdRng::seed_from_u64(17)).unwrap();
        let recomputed = signal.indicator_scores.weighted_total(&SCORE_WEIGHTS);
        assert!((signal.overall_score - recomputed).abs() < 0.01);
        assert_eq!(signal.current_price, *closes.last().unwrap());
        assert_eq!(signal.forecast.signal.score(), signal.indicator_scores.forecast);
    }

    #[test]
    fn aggregate_seeded_is_reproducible() {
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i % 6) as f64).collect();
        let s = series(&closes);
        let a = aggregate("X", &s, StdRng::seed_from_u64(99)).unwrap();
        let b = aggregate("X", &s, StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
