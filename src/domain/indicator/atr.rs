//! Average True Range.
//!
//! TR[i] = max(H[i] - L[i], |H[i] - C[i-1]|, |L[i] - C[i-1]|) for i >= 1.
//! ATR is the plain mean of the trailing `period` true ranges (all of them when
//! fewer exist), rounded to 4 places. Fewer than 2 bars yields 0.

use crate::domain::stats::{mean, round_to, tail};

pub fn calculate_atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> f64 {
    let len = high.len().min(low.len()).min(close.len());
    if len < 2 {
        return 0.0;
    }

    let true_ranges: Vec<f64> = (1..len)
        .map(|i| {
            let prev_close = close[i - 1];
            let hl = high[i] - low[i];
            let hc = (high[i] - prev_close).abs();
            let lc = (low[i] - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect();

    let window = if period == 0 {
        &true_ranges[..]
    } else {
        tail(&true_ranges, period)
    };
    round_to(mean(window), 4)
}
