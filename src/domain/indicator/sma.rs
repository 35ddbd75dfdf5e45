//! Simple Moving Average.
//!
//! SMA(n)[i] = mean of the trailing n prices. While fewer than n prices exist,
//! the average covers everything from the start, so the output always has the
//! input's length and short input never fails.

pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    let mut values = Vec::with_capacity(prices.len());
    let mut sum = 0.0;

    for (i, &price) in prices.iter().enumerate() {
        sum += price;
        if i >= period {
            sum -= prices[i - period];
        }
        let count = (i + 1).min(period);
        values.push(sum / count as f64);
    }

    values
}
