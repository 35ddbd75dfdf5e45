//! Stochastic Oscillator.
//!
//! %K = (C - lowest low) / (highest high - lowest low) × 100 over the trailing
//! `period` bars; a zero range reports 50. Fewer than `period` closes reports
//! 50/50.
//!
//! %D is reported equal to %K rather than a 3-period SMA of %K. This is a
//! known deviation from the textbook oscillator and is kept as-is so scores
//! stay comparable with previously emitted values.

use serde::Serialize;

use crate::domain::stats::{round_to, tail};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

impl StochasticValue {
    const NEUTRAL: StochasticValue = StochasticValue { k: 50.0, d: 50.0 };
}

pub fn calculate_stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> StochasticValue {
    let Some(&last_close) = close.last() else {
        return StochasticValue::NEUTRAL;
    };
    if close.len() < period || high.is_empty() || low.is_empty() {
        return StochasticValue::NEUTRAL;
    }

    let (high_window, low_window) = if period == 0 {
        (high, low)
    } else {
        (tail(high, period), tail(low, period))
    };
    let highest_high = high_window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest_low = low_window.iter().copied().fold(f64::INFINITY, f64::min);

    let k = if highest_high == lowest_low {
        50.0
    } else {
        (last_close - lowest_low) / (highest_high - lowest_low) * 100.0
    };

    let k = round_to(k, 2);
    StochasticValue { k, d: k }
}
