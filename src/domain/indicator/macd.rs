//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(12) - EMA(26)
//! Signal Line = EMA(9) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Only the latest point of each line is reported, rounded to 4 places.
//! Fewer than 26 prices yields all zeros.

use serde::Serialize;

use crate::domain::indicator::calculate_ema;
use crate::domain::stats::round_to;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn calculate_macd(prices: &[f64]) -> MacdValue {
    if prices.len() < DEFAULT_SLOW {
        return MacdValue::default();
    }

    let ema_fast = calculate_ema(prices, DEFAULT_FAST);
    let ema_slow = calculate_ema(prices, DEFAULT_SLOW);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal_line = calculate_ema(&macd_line, DEFAULT_SIGNAL);

    let (Some(&macd), Some(&signal)) = (macd_line.last(), signal_line.last()) else {
        return MacdValue::default();
    };

    MacdValue {
        macd: round_to(macd, 4),
        signal: round_to(signal, 4),
        histogram: round_to(macd - signal, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_short_input_is_zero() {
        let prices: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_macd(&prices), MacdValue::default());
    }

    #[test]
    fn macd_constant_prices_zero() {
        let value = calculate_macd(&[100.0; 40]);
        assert!(value.macd.abs() < 1e-10);
        assert!(value.signal.abs() < 1e-10);
        assert!(value.histogram.abs() < 1e-10);
    }

    #[test]
    fn macd_uptrend_positive_line() {
        let prices: Vec<f64> = (0..50).map(|i| 100.0 + i as f64 * 2.0).collect();
        let value = calculate_macd(&prices);
        assert!(value.macd > 0.0, "fast EMA should lead slow EMA in an uptrend");
    }

    #[test]
    fn macd_downtrend_negative_line() {
        let prices: Vec<f64> = (0..50).map(|i| 200.0 - i as f64 * 2.0).collect();
        assert!(calculate_macd(&prices).macd < 0.0);
    }

    #[test]
    fn macd_matches_manual_composition() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
        let fast = calculate_ema(&prices, 12);
        let slow = calculate_ema(&prices, 26);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = calculate_ema(&line, 9);

        let value = calculate_macd(&prices);
        let expected_macd = round_to(*line.last().unwrap(), 4);
        let expected_signal = round_to(*signal.last().unwrap(), 4);
        assert_eq!(value.macd, expected_macd);
        assert_eq!(value.signal, expected_signal);
        assert!((value.histogram - (value.macd - value.signal)).abs() < 2e-4);
    }
}
