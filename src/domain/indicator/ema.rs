//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first price, then EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! Every point is populated; there is no warmup gap.

pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<f64> {
    let Some(&seed) = prices.first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(prices.len());
    let mut ema = seed;
    values.push(ema);

    for &price in &prices[1..] {
        ema = price * k + ema * (1.0 - k);
        values.push(ema);
    }

    values
}
