#![allow(dead_code)]

use chrono::NaiveDate;
use marketlens::domain::error::AnalyticsError;
pub use marketlens::domain::ohlcv::{OhlcvBar, PriceSeries};
use marketlens::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, AnalyticsError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(AnalyticsError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| start_date.is_none_or(|d| b.date >= d))
            .filter(|b| end_date.is_none_or(|d| b.date <= d))
            .collect();
        PriceSeries::new(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyticsError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(offset)
}

pub fn make_bar(offset: u64, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: day(offset),
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1000.0,
    }
}

pub fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i as u64, c))
        .collect()
}

pub fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(symbol, make_bars(closes)).unwrap()
}

/// Linear ramp from `start` by `step` per bar.
pub fn ramp(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Deterministic zig-zag around a drifting mean, for series that need both
/// gains and losses.
pub fn zigzag(n: usize, start: f64, drift: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let swing = if i % 2 == 0 { 1.5 } else { -1.0 };
            start + drift * i as f64 + swing
        })
        .collect()
}

pub fn write_price_csv(dir: &Path, symbol: &str, closes: &[f64]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in make_bars(closes) {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}

pub fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
