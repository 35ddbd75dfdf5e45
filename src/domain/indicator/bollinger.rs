//! Bollinger Bands.
//!
//! - Middle: mean of the trailing n prices
//! - Upper: Middle + 2 × StdDev
//! - Lower: Middle - 2 × StdDev
//!
//! StdDev is population standard deviation. Values are rounded to 2 places.
//! Below n prices the band degenerates to last price ×1.02 / ×1.00 / ×0.98.

use serde::Serialize;

use crate::domain::stats::{mean, population_stddev, round_to, tail};

pub const DEFAULT_PERIOD: usize = 20;
pub const STDDEV_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    /// Position of `price` inside the band, 0.0 at the lower band and 1.0 at
    /// the upper. A zero-width band reports the midpoint.
    pub fn position(&self, price: f64) -> f64 {
        if self.upper == self.lower {
            return 0.5;
        }
        (price - self.lower) / (self.upper - self.lower)
    }
}

pub fn calculate_bollinger(prices: &[f64], period: usize) -> BollingerBands {
    if period == 0 || prices.len() < period {
        let last = prices.last().copied().unwrap_or(0.0);
        return BollingerBands {
            upper: last * 1.02,
            middle: last,
            lower: last * 0.98,
        };
    }

    let window = tail(prices, period);
    let middle = mean(window);
    let stddev = population_stddev(window);

    BollingerBands {
        upper: round_to(middle + STDDEV_MULTIPLIER * stddev, 2),
        middle: round_to(middle, 2),
        lower: round_to(middle - STDDEV_MULTIPLIER * stddev, 2),
    }
}
