//! CSV file data adapter.
//!
//! Price files live in one directory as `<SYMBOL>.csv` with a
//! `date,open,high,low,close,volume` header. Asset, position, weight and
//! equity-curve files are read with the free functions below.

use crate::domain::allocation::{AllocationWeights, AssetInput};
use crate::domain::error::AnalyticsError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::risk::Position;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PRICE_EXTENSION: &str = "csv";
const EQUITY_COLUMNS: [&str; 3] = ["equity", "value", "close"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct BarRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct WeightRow {
    symbol: String,
    weight: f64,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", symbol, PRICE_EXTENSION))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, AnalyticsError> {
        let path = self.csv_path(symbol);
        let rows: Vec<BarRow> = read_rows(&path)?;

        let mut bars: Vec<OhlcvBar> = rows
            .into_iter()
            .filter(|r| start_date.is_none_or(|start| r.date >= start))
            .filter(|r| end_date.is_none_or(|end| r.date <= end))
            .map(|r| OhlcvBar {
                date: r.date,
                open: r.open,
                high: r.high,
                low: r.low,
                close: r.close,
                volume: r.volume,
            })
            .collect();
        bars.sort_by_key(|b| b.date);
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded price file");

        PriceSeries::new(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyticsError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| AnalyticsError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AnalyticsError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PRICE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// `symbol,expected_return,volatility` rows, returns and volatility as fractions.
pub fn read_assets(path: &Path) -> Result<Vec<AssetInput>, AnalyticsError> {
    read_rows(path)
}

/// `symbol,value` rows.
pub fn read_positions(path: &Path) -> Result<Vec<Position>, AnalyticsError> {
    read_rows(path)
}

/// `symbol,weight` rows. Repeated symbols accumulate.
pub fn read_weights(path: &Path) -> Result<AllocationWeights, AnalyticsError> {
    let rows: Vec<WeightRow> = read_rows(path)?;
    let mut weights = AllocationWeights::new();
    for row in rows {
        *weights.entry(row.symbol).or_insert(0.0) += row.weight;
    }
    Ok(weights)
}

/// The first of an `equity`, `value` or `close` column, in file order.
pub fn read_equity_curve(path: &Path) -> Result<Vec<f64>, AnalyticsError> {
    let mut rdr = open_reader(path)?;
    let headers = rdr.headers().map_err(|e| csv_error(path, e))?.clone();

    let column = EQUITY_COLUMNS
        .iter()
        .find_map(|name| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        })
        .ok_or_else(|| AnalyticsError::Data {
            reason: format!(
                "{}: no equity, value or close column",
                path.display()
            ),
        })?;

    let mut curve = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let raw = record.get(column).ok_or_else(|| AnalyticsError::Data {
            reason: format!("{}: short row", path.display()),
        })?;
        let value: f64 = raw.trim().parse().map_err(|e| AnalyticsError::Data {
            reason: format!("{}: invalid value {:?}: {}", path.display(), raw, e),
        })?;
        curve.push(value);
    }
    Ok(curve)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AnalyticsError> {
    let mut rdr = open_reader(path)?;
    rdr.deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| csv_error(path, e))
}

fn open_reader(path: &Path) -> Result<csv::Reader<fs::File>, AnalyticsError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AnalyticsError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
}

fn csv_error(path: &Path, e: csv::Error) -> AnalyticsError {
    AnalyticsError::Data {
        reason: format!("CSV parse error in {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000.5\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("BHP.csv"), csv_content).unwrap();
        fs::write(path.join("CBA.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "not a price file").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_series_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_series("BHP", None, None).unwrap();

        assert_eq!(series.len(), 3);
        let first = &series.bars()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(first.open, 100.0);
        assert_eq!(first.high, 110.0);
        assert_eq!(first.low, 90.0);
        assert_eq!(first.close, 105.0);
        assert_eq!(first.volume, 50000.5);
        assert_eq!(series.closes(), vec![105.0, 110.0, 115.0]);
    }

    #[test]
    fn fetch_series_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let day = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let series = adapter.fetch_series("BHP", Some(day), Some(day)).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].date, day);
    }

    #[test]
    fn fetch_series_header_only_is_empty() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_series("CBA", None, None).unwrap().is_empty());
    }

    #[test]
    fn fetch_series_errors_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_series("XYZ", None, None).unwrap_err();
        assert!(matches!(err, AnalyticsError::Data { .. }));
    }

    #[test]
    fn fetch_series_rejects_bad_number() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,1,2,0.5,abc,10\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(path);
        assert!(matches!(
            adapter.fetch_series("BAD", None, None),
            Err(AnalyticsError::Data { .. })
        ));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.list_symbols().unwrap(), vec!["BHP", "CBA"]);
    }

    #[test]
    fn read_assets_parses_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.csv");
        fs::write(
            &path,
            "symbol,expected_return,volatility\nAAA, 0.12, 0.2\nBBB,0.05,0.1\n",
        )
        .unwrap();

        let assets = read_assets(&path).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].symbol, "AAA");
        assert_eq!(assets[0].expected_return, 0.12);
        assert_eq!(assets[1].volatility, 0.1);
    }

    #[test]
    fn read_weights_accumulates_repeats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weights.csv");
        fs::write(&path, "symbol,weight\nAAA,0.25\nBBB,0.5\nAAA,0.25\n").unwrap();

        let weights = read_weights(&path).unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights["AAA"], 0.5);
    }

    #[test]
    fn read_positions_parses_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("positions.csv");
        fs::write(&path, "symbol,value\nAAA,1000\nBBB,250.5\n").unwrap();

        let positions = read_positions(&path).unwrap();
        assert_eq!(positions[1].symbol, "BBB");
        assert_eq!(positions[1].value, 250.5);
    }

    #[test]
    fn read_equity_curve_prefers_equity_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equity.csv");
        fs::write(&path, "date,close,Equity\n2024-01-01,5,100\n2024-01-02,6,110\n").unwrap();

        assert_eq!(read_equity_curve(&path).unwrap(), vec![100.0, 110.0]);
    }

    #[test]
    fn read_equity_curve_falls_back_to_close() {
        let (_dir, path) = setup_test_data();
        let curve = read_equity_curve(&path.join("BHP.csv")).unwrap();
        assert_eq!(curve, vec![110.0, 105.0, 115.0]);
    }

    #[test]
    fn read_equity_curve_without_known_column_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        assert!(matches!(
            read_equity_curve(&path),
            Err(AnalyticsError::Data { .. })
        ));
    }
}
