//! RSI (Relative Strength Index).
//!
//! Simple averages over the trailing `period` price changes (no Wilder
//! smoothing):
//! - fewer than period+1 prices: 50 (neutral)
//! - no gains and no losses in the window: 50 (flat market)
//! - no losses: 100
//! - otherwise RSI = 100 - (100 / (1 + avg_gain / avg_loss)), rounded to 2 places

use crate::domain::stats::round_to;

pub const NEUTRAL_RSI: f64 = 50.0;

pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let window = &prices[prices.len() - period - 1..];
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for w in window.windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gain_sum += change;
        } else if change < 0.0 {
            loss_sum -= change;
        }
    }

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return NEUTRAL_RSI;
        }
        return 100.0;
    }

    round_to(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)), 2)
}
