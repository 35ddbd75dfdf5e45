//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::allocation::RiskTolerance;
use crate::domain::analytics;
use crate::domain::config::AnalyticsConfig;
use crate::domain::error::AnalyticsError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::risk::MIN_VAR_RETURNS;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{Report, ReportPort};

#[derive(Parser, Debug)]
#[command(
    name = "marketlens",
    about = "Technical indicators, forecasts, trading signals, risk and allocation"
)]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    /// Seed for the forecaster's random source (overrides the config)
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

/// Where a symbol's price bars come from.
#[derive(Args, Debug, Clone)]
pub struct SeriesArgs {
    pub symbol: String,
    /// Directory of `<SYMBOL>.csv` price files (overrides `[data] directory`)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Latest value of every indicator for a symbol
    Indicators(SeriesArgs),
    /// Project prices forward with confidence bands
    Forecast {
        #[command(flatten)]
        series: SeriesArgs,
        /// Periods to forecast (overrides `[analytics] forecast_periods`)
        #[arg(short, long)]
        periods: Option<usize>,
    },
    /// Blend indicators and a short forecast into one trading signal
    Signal(SeriesArgs),
    /// VaR, Sharpe ratio and max drawdown of an equity curve or price history
    #[command(group(ArgGroup::new("source").required(true).args(["equity", "symbol"])))]
    Risk {
        /// CSV with an equity, value or close column
        #[arg(long)]
        equity: Option<PathBuf>,
        /// Use this symbol's closes as the curve
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Risk score, loss bands and stop levels for a prospective trade
    TradeRisk {
        #[arg(long)]
        entry: f64,
        #[arg(long)]
        size: f64,
        #[arg(long)]
        portfolio_value: f64,
        /// Volatility as a fraction (0.02 = 2%)
        #[arg(long)]
        volatility: f64,
    },
    /// Concentration and diversification of current holdings
    PortfolioRisk {
        /// CSV with symbol,value rows
        positions: PathBuf,
    },
    /// Risk-tolerance-adjusted weights for a set of assets
    Optimize {
        /// CSV with symbol,expected_return,volatility rows
        assets: PathBuf,
        /// conservative, medium or aggressive (overrides the config)
        #[arg(short, long)]
        risk_tolerance: Option<String>,
    },
    /// Trades needed to move from current to target weights
    Rebalance {
        /// CSV with symbol,weight rows
        current: PathBuf,
        /// CSV with symbol,weight rows
        target: PathBuf,
    },
    /// List the symbols with price files in the data directory
    ListSymbols {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(&cli) {
        Ok(output) => {
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Runs the selected command and returns its rendered report.
pub fn execute(cli: &Cli) -> Result<String, AnalyticsError> {
    let config = load_config(cli.config.as_deref())?;
    let seed = cli.seed.or(config.seed);
    let reporter = reporter(cli.json, config.pretty_json);

    match &cli.command {
        Command::Indicators(args) => {
            let series = load_series(args, &config)?;
            if series.is_empty() {
                warn!(symbol = %args.symbol, "no bars in range; indicators use neutral defaults");
            }
            let indicators = analytics::compute_indicators(&series);
            reporter.render(&Report::Indicators {
                symbol: series.symbol(),
                indicators: &indicators,
            })
        }
        Command::Forecast { series, periods } => {
            let series = load_series(series, &config)?;
            let periods = periods.unwrap_or(config.forecast_periods);
            let forecast = analytics::forecast(&series, periods, make_rng(seed))
                .inspect_err(|e| warn_insufficient(series.symbol(), e))?;
            info!(
                symbol = %forecast.symbol,
                direction = %forecast.direction,
                change_pct = forecast.predicted_change_percent,
                "forecast complete"
            );
            reporter.render(&Report::Forecast(&forecast))
        }
        Command::Signal(args) => {
            let series = load_series(args, &config)?;
            let signal = analytics::generate_signal(&args.symbol, &series, make_rng(seed))
                .inspect_err(|e| warn_insufficient(&args.symbol, e))?;
            info!(symbol = %signal.symbol, signal = %signal.signal, "signal generated");
            reporter.render(&Report::Signal(&signal))
        }
        Command::Risk {
            equity,
            symbol,
            data_dir,
        } => {
            let (source, curve) = match (equity, symbol) {
                (Some(path), _) => (
                    path.display().to_string(),
                    csv_adapter::read_equity_curve(path)?,
                ),
                (None, Some(symbol)) => {
                    let args = SeriesArgs {
                        symbol: symbol.clone(),
                        data_dir: data_dir.clone(),
                        start: None,
                        end: None,
                    };
                    (symbol.clone(), load_series(&args, &config)?.closes())
                }
                (None, None) => {
                    return Err(AnalyticsError::InvalidInput {
                        reason: "either --equity or --symbol is required".to_string(),
                    });
                }
            };
            let risk = analytics::equity_risk(&curve, config.risk_free_rate, config.var_confidence);
            if risk.observations < MIN_VAR_RETURNS {
                warn!(
                    %source,
                    observations = risk.observations,
                    "too few returns for historical VaR; reporting the default"
                );
            }
            reporter.render(&Report::ReturnRisk {
                source: &source,
                risk: &risk,
            })
        }
        Command::TradeRisk {
            entry,
            size,
            portfolio_value,
            volatility,
        } => {
            validate_trade_inputs(*entry, *size, *portfolio_value, *volatility)?;
            let risk = analytics::assess_trade_risk(*entry, *size, *portfolio_value, *volatility);
            reporter.render(&Report::TradeRisk(&risk))
        }
        Command::PortfolioRisk { positions } => {
            let positions = csv_adapter::read_positions(positions)?;
            info!(count = positions.len(), "loaded positions");
            let risk = analytics::portfolio_risk(&positions);
            reporter.render(&Report::PortfolioRisk(&risk))
        }
        Command::Optimize {
            assets,
            risk_tolerance,
        } => {
            let assets = csv_adapter::read_assets(assets)?;
            let tolerance = risk_tolerance
                .as_deref()
                .map(RiskTolerance::parse)
                .unwrap_or(config.risk_tolerance);
            info!(count = assets.len(), %tolerance, "optimizing allocation");
            let allocation = analytics::optimize_allocation(&assets, tolerance)?;
            reporter.render(&Report::Allocation(&allocation))
        }
        Command::Rebalance { current, target } => {
            let current = csv_adapter::read_weights(current)?;
            let target = csv_adapter::read_weights(target)?;
            let suggestions = analytics::rebalance(&current, &target);
            info!(trades = suggestions.len(), "rebalance computed");
            reporter.render(&Report::Rebalance(&suggestions))
        }
        Command::ListSymbols { data_dir } => {
            let adapter = CsvAdapter::new(resolve_data_dir(data_dir.as_deref(), &config));
            let symbols = adapter.list_symbols()?;
            if symbols.is_empty() {
                warn!("no price files found");
            }
            Ok(symbols.join("\n"))
        }
    }
}

/// Loads and validates the configuration file, or returns defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig, AnalyticsError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            let adapter = FileConfigAdapter::from_file(path)?;
            AnalyticsConfig::from_port(&adapter)
        }
        None => Ok(AnalyticsConfig::default()),
    }
}

fn resolve_data_dir(arg: Option<&Path>, config: &AnalyticsConfig) -> PathBuf {
    arg.map(Path::to_path_buf)
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn load_series(args: &SeriesArgs, config: &AnalyticsConfig) -> Result<PriceSeries, AnalyticsError> {
    let adapter = CsvAdapter::new(resolve_data_dir(args.data_dir.as_deref(), config));
    let series = adapter.fetch_series(&args.symbol, args.start, args.end)?;
    info!(symbol = %args.symbol, bars = series.len(), "loaded series");
    Ok(series)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn reporter(json: bool, pretty: bool) -> Box<dyn ReportPort> {
    if json {
        Box::new(JsonReportAdapter { pretty })
    } else {
        Box::new(TextReportAdapter)
    }
}

fn warn_insufficient(symbol: &str, err: &AnalyticsError) {
    if err.is_insufficient_data() {
        warn!(symbol, error = %err, "not enough history");
    }
}

fn validate_trade_inputs(
    entry: f64,
    size: f64,
    portfolio_value: f64,
    volatility: f64,
) -> Result<(), AnalyticsError> {
    let checks = [
        (entry > 0.0, "entry price must be positive"),
        (size > 0.0, "position size must be positive"),
        (portfolio_value >= 0.0, "portfolio value must be non-negative"),
        (volatility >= 0.0, "volatility must be non-negative"),
    ];
    match checks.iter().find(|(ok, _)| !ok) {
        Some((_, reason)) => Err(AnalyticsError::InvalidInput {
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
