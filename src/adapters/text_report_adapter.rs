//! Plain-text report rendering for terminal output.

use std::fmt::Write;

use crate::domain::allocation::{Allocation, RebalanceSuggestion};
use crate::domain::error::AnalyticsError;
use crate::domain::forecast::Forecast;
use crate::domain::indicator::{IndicatorResult, IndicatorValue};
use crate::domain::risk::{PortfolioRisk, ReturnRisk, TradeRisk};
use crate::domain::signal::Signal;
use crate::ports::report_port::{Report, ReportPort};

pub struct TextReportAdapter;

impl ReportPort for TextReportAdapter {
    fn render(&self, report: &Report<'_>) -> Result<String, AnalyticsError> {
        let mut out = String::new();
        let written = match report {
            Report::Indicators { symbol, indicators } => {
                write_indicators(&mut out, symbol, indicators)
            }
            Report::Forecast(forecast) => write_forecast(&mut out, forecast),
            Report::Signal(signal) => write_signal(&mut out, signal),
            Report::ReturnRisk { source, risk } => write_return_risk(&mut out, source, risk),
            Report::TradeRisk(risk) => write_trade_risk(&mut out, risk),
            Report::PortfolioRisk(risk) => write_portfolio_risk(&mut out, risk),
            Report::Allocation(allocation) => write_allocation(&mut out, allocation),
            Report::Rebalance(suggestions) => write_rebalance(&mut out, suggestions),
        };
        written.map_err(|e| AnalyticsError::Report {
            reason: e.to_string(),
        })?;
        Ok(out)
    }
}

fn write_indicators(out: &mut String, symbol: &str, ind: &IndicatorResult) -> std::fmt::Result {
    writeln!(out, "Indicators for {symbol}")?;
    for (kind, value) in ind.entries() {
        writeln!(out, "  {:<16} {}", kind.to_string(), format_value(&value))?;
    }
    Ok(())
}

fn format_value(value: &IndicatorValue) -> String {
    match value {
        IndicatorValue::Simple(v) => format!("{v:.4}"),
        IndicatorValue::Macd(m) => format!(
            "macd={:.4} signal={:.4} histogram={:.4}",
            m.macd, m.signal, m.histogram
        ),
        IndicatorValue::Bollinger(b) => format!(
            "upper={:.2} middle={:.2} lower={:.2}",
            b.upper, b.middle, b.lower
        ),
        IndicatorValue::Stochastic(s) => format!("k={:.2} d={:.2}", s.k, s.d),
    }
}

fn write_forecast(out: &mut String, forecast: &Forecast) -> std::fmt::Result {
    writeln!(
        out,
        "Forecast for {} ({} periods, confidence {:.1}%)",
        forecast.symbol, forecast.periods_ahead, forecast.confidence
    )?;
    writeln!(out, "  current price:    {:.2}", forecast.current_price)?;
    writeln!(
        out,
        "  direction:        {} ({:+.2}%)",
        forecast.direction, forecast.predicted_change_percent
    )?;
    writeln!(out, "  {:>6} {:>12} {:>12} {:>12}", "period", "predicted", "lower", "upper")?;
    for point in &forecast.points {
        writeln!(
            out,
            "  {:>6} {:>12.2} {:>12.2} {:>12.2}",
            point.period, point.predicted_price, point.lower_bound, point.upper_bound
        )?;
    }
    Ok(())
}

fn write_signal(out: &mut String, signal: &Signal) -> std::fmt::Result {
    writeln!(
        out,
        "Signal for {}: {} (confidence {:.1}%, score {:.3})",
        signal.symbol, signal.signal, signal.confidence, signal.overall_score
    )?;
    writeln!(out, "  current price:    {:.2}", signal.current_price)?;

    let ind = &signal.indicators;
    writeln!(out, "  rsi:              {:.2} ({})", ind.rsi, ind.rsi_zone)?;
    writeln!(
        out,
        "  macd:             {:.4} / {:.4} / {:.4}",
        ind.macd.macd, ind.macd.signal, ind.macd.histogram
    )?;
    writeln!(
        out,
        "  bollinger:        {:.2} / {:.2} / {:.2}",
        ind.bollinger_bands.upper, ind.bollinger_bands.middle, ind.bollinger_bands.lower
    )?;
    writeln!(out, "  stochastic:       k={:.2} d={:.2}", ind.stochastic.k, ind.stochastic.d)?;
    writeln!(
        out,
        "  sma20/sma50/ema12: {:.2} / {:.2} / {:.2}",
        ind.sma_20, ind.sma_50, ind.ema_12
    )?;

    let s = &signal.indicator_scores;
    writeln!(out, "  scores:")?;
    writeln!(out, "    rsi             {:+.2}", s.rsi)?;
    writeln!(out, "    macd            {:+.2}", s.macd)?;
    writeln!(out, "    bollinger       {:+.2}", s.bollinger)?;
    writeln!(out, "    stochastic      {:+.2}", s.stochastic)?;
    writeln!(out, "    moving averages {:+.2}", s.moving_averages)?;
    writeln!(out, "    forecast        {:+.2}", s.forecast)?;

    let f = &signal.forecast;
    writeln!(
        out,
        "  forecast signal:  {} ({:.1}%) {}",
        f.signal, f.confidence, f.reason
    )?;
    Ok(())
}

fn write_return_risk(out: &mut String, source: &str, risk: &ReturnRisk) -> std::fmt::Result {
    writeln!(out, "Return risk for {source} ({} returns)", risk.observations)?;
    writeln!(out, "  value at risk:    {:.2}%", risk.value_at_risk)?;
    writeln!(out, "  sharpe ratio:     {:.2}", risk.sharpe_ratio)?;
    writeln!(out, "  max drawdown:     {:.2}%", risk.max_drawdown)
}

fn write_trade_risk(out: &mut String, risk: &TradeRisk) -> std::fmt::Result {
    writeln!(out, "Trade risk: {:.1} ({})", risk.risk_score, risk.risk_level)?;
    writeln!(
        out,
        "  position:         {:.2} ({:.2}% of portfolio)",
        risk.position_value, risk.position_percentage
    )?;
    writeln!(out, "  max loss 1σ/2σ:   {:.2} / {:.2}", risk.max_loss_1std, risk.max_loss_2std)?;
    writeln!(out, "  stop loss:        {:.2}", risk.recommended_stop_loss)?;
    writeln!(out, "  take profit:      {:.2}", risk.recommended_take_profit)?;
    writeln!(out, "  {}", risk.recommendation)
}

fn write_portfolio_risk(out: &mut String, risk: &PortfolioRisk) -> std::fmt::Result {
    writeln!(out, "Portfolio risk ({} positions)", risk.position_count)?;
    writeln!(out, "  total value:      {:.2}", risk.total_value)?;
    writeln!(out, "  largest position: {:.2}%", risk.max_position_percentage)?;
    writeln!(out, "  concentration:    {}", risk.concentration_risk)?;
    writeln!(out, "  diversification:  {}/10", risk.diversification_score)
}

fn write_allocation(out: &mut String, allocation: &Allocation) -> std::fmt::Result {
    writeln!(out, "Allocation ({} risk tolerance)", allocation.risk_tolerance)?;
    writeln!(out, "  {:<10} {:>8} {:>10} {:>10}", "symbol", "weight", "return%", "vol%")?;
    for entry in &allocation.entries {
        writeln!(
            out,
            "  {:<10} {:>7.2}% {:>10.2} {:>10.2}",
            entry.symbol,
            entry.weight * 100.0,
            entry.expected_return,
            entry.volatility
        )?;
    }
    writeln!(out, "  expected return:  {:.2}%", allocation.expected_portfolio_return)?;
    writeln!(out, "  volatility:       {:.2}%", allocation.expected_portfolio_volatility)?;
    writeln!(out, "  sharpe ratio:     {:.2}", allocation.sharpe_ratio)?;
    writeln!(out, "  {}", allocation.recommendation)
}

fn write_rebalance(out: &mut String, suggestions: &[RebalanceSuggestion]) -> std::fmt::Result {
    if suggestions.is_empty() {
        return writeln!(out, "Portfolio is balanced; no trades needed");
    }
    writeln!(
        out,
        "{:<10} {:<5} {:>9} {:>9} {:>9}",
        "symbol", "side", "current%", "target%", "change%"
    )?;
    for s in suggestions {
        writeln!(
            out,
            "{:<10} {:<5} {:>9.2} {:>9.2} {:>+9.2}",
            s.symbol,
            s.action.to_string(),
            s.current_weight,
            s.target_weight,
            s.change_percentage
        )?;
    }
    Ok(())
}
