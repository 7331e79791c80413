use std::fmt::Write as _;

use gpw_analyst_core::metrics::{
    format_decimal, format_fraction_pct, format_leverage, format_market_cap, format_pe,
    format_signed_pct, net_debt_to_ebitda, recommendation_label, roe_is_healthy,
    sector_margin_comparison, sector_pe_comparison, DebtRisk, Relative, Signal, UNKNOWN,
};
use gpw_analyst_core::{
    quality_score, QualityBreakdown, QualityTier, RefreshSummary, StockRecord, StockStore,
};
use serde::Serialize;

const NAME_WIDTH: usize = 18;

/// One row of `--json` output: the record plus the values derived from it.
#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    record: &'a StockRecord,
    quality_score: u8,
    net_debt_to_ebitda: Option<f64>,
    debt_risk: Option<&'static str>,
    signal: Option<&'static str>,
}

impl<'a> From<&'a StockRecord> for JsonRow<'a> {
    fn from(record: &'a StockRecord) -> Self {
        let leverage = net_debt_to_ebitda(record);
        Self {
            record,
            quality_score: quality_score(record),
            net_debt_to_ebitda: leverage,
            debt_risk: leverage.map(|ratio| DebtRisk::from_ratio(ratio).as_str()),
            signal: Signal::classify(record.recommendation.as_deref()).map(Signal::as_str),
        }
    }
}

pub fn render_json(rows: &[StockRecord]) -> serde_json::Result<String> {
    let rows: Vec<JsonRow<'_>> = rows.iter().map(JsonRow::from).collect();
    serde_json::to_string_pretty(&rows)
}

pub fn render_table(rows: &[StockRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<NAME_WIDTH$} {:>9} {:>9} {:>8} {:>6} {:>8} {:>9} {:>13} {:<11} {:>17} {:>11}",
        "TICKER",
        "NAME",
        "PRICE",
        "MKT CAP",
        "P/E",
        "P/BV",
        "ROE",
        "OP MARGIN",
        "ND/EBITDA",
        "SIGNAL",
        "FORECAST",
        "QUALITY",
    );

    for record in rows {
        let score = quality_score(record);
        let _ = writeln!(
            out,
            "{:<10} {:<NAME_WIDTH$} {:>9} {:>9} {:>8} {:>6} {:>8} {:>9} {:>13} {:<11} {:>17} {:>11}",
            record.ticker,
            truncate(&record.name, NAME_WIDTH),
            format_decimal(record.price, 2),
            format_market_cap(record.market_cap),
            pe_cell(record),
            format_decimal(record.pbv, 2),
            roe_cell(record),
            margin_cell(record),
            leverage_cell(record),
            signal_cell(record),
            forecast_cell(record),
            format!("{score}/100 {}", tier_mark(score)),
        );
    }

    if rows.is_empty() {
        out.push_str("no stocks match the current filter\n");
    }
    out
}

/// Counts shown under the table.
pub fn render_footer(store: &StockStore, shown: usize, summary: Option<&RefreshSummary>) -> String {
    let mut out = format!(
        "found: {shown} of {} | forecasts: {}/{}",
        store.len(),
        store.predicted_count(),
        store.len()
    );
    if let Some(summary) = summary.filter(|summary| !summary.failed.is_empty()) {
        let tickers: Vec<&str> = summary
            .failed
            .iter()
            .map(|failure| failure.ticker.as_str())
            .collect();
        let _ = write!(out, " | unavailable: {}", tickers.join(", "));
    }
    out.push('\n');
    out
}

/// Full metric card for `inspect`.
pub fn render_detail(record: &StockRecord) -> String {
    let mut out = String::new();
    let breakdown = QualityBreakdown::of(record);
    let score = breakdown.score();

    let _ = writeln!(out, "{} ({})", record.name, record.ticker);
    let _ = writeln!(out, "  sector          {}", record.sector.as_deref().unwrap_or(UNKNOWN));
    let _ = writeln!(out, "  price           {}", format_decimal(record.price, 2));
    let _ = writeln!(out, "  market cap      {}", format_market_cap(record.market_cap));
    let _ = writeln!(out, "  P/E             {}", pe_cell(record));
    let _ = writeln!(out, "  sector P/E      {}", format_decimal(record.sector_pe_avg, 1));
    let _ = writeln!(out, "  P/BV            {}", format_decimal(record.pbv, 2));
    let _ = writeln!(out, "  ROE             {}", roe_cell(record));
    let _ = writeln!(out, "  dividend yield  {}", format_fraction_pct(record.div_yield));
    let _ = writeln!(out, "  op. margin      {}", margin_cell(record));
    let _ = writeln!(out, "  sector margin   {}", format_fraction_pct(record.sector_margin_avg));
    let _ = writeln!(out, "  ND/EBITDA       {}", leverage_cell(record));
    let _ = writeln!(out, "  beta            {}", format_decimal(record.beta, 2));
    let _ = writeln!(out, "  signal          {}", signal_cell(record));
    let _ = writeln!(out, "  forecast        {}", forecast_cell(record));
    let _ = writeln!(
        out,
        "  updated         {}",
        record.last_updated.as_deref().unwrap_or(UNKNOWN)
    );
    let _ = writeln!(out, "  quality         {score}/100 ({})", QualityTier::from_score(score).as_str());
    for (passed, label) in [
        (breakdown.cheap_pe, "P/E between 0 and 15"),
        (breakdown.cheap_pbv, "P/BV between 0 and 2"),
        (breakdown.high_roe, "ROE above 15%"),
        (breakdown.high_yield, "dividend yield above 4%"),
        (breakdown.low_beta, "beta below 1.0 (+5)"),
    ] {
        let _ = writeln!(out, "    [{}] {label}", if passed { 'x' } else { ' ' });
    }
    out
}

fn pe_cell(record: &StockRecord) -> String {
    let pe = format_pe(record.pe);
    match sector_pe_comparison(record) {
        Some((relative, _)) => format!("{pe} {}", relative_mark(relative)),
        None => pe,
    }
}

fn margin_cell(record: &StockRecord) -> String {
    let margin = format_fraction_pct(record.operating_margin);
    match sector_margin_comparison(record) {
        Some((relative, _)) => format!("{margin} {}", relative_mark(relative)),
        None => margin,
    }
}

fn roe_cell(record: &StockRecord) -> String {
    let roe = format_fraction_pct(record.roe);
    if record.roe.is_none() {
        roe
    } else if roe_is_healthy(record) {
        format!("{roe} ↑")
    } else {
        format!("{roe} ↓")
    }
}

fn leverage_cell(record: &StockRecord) -> String {
    let ratio = net_debt_to_ebitda(record);
    match ratio {
        Some(value) => format!(
            "{} {}",
            format_leverage(ratio),
            DebtRisk::from_ratio(value).as_str()
        ),
        None => format_leverage(None),
    }
}

fn signal_cell(record: &StockRecord) -> String {
    match (
        record.recommendation.as_deref(),
        Signal::classify(record.recommendation.as_deref()),
    ) {
        (Some(raw), Some(_)) => recommendation_label(raw),
        _ => UNKNOWN.to_string(),
    }
}

fn forecast_cell(record: &StockRecord) -> String {
    match &record.prediction {
        Some(prediction) => format!(
            "{:.2} {}",
            prediction.predicted_price,
            format_signed_pct(prediction.trend_pct)
        ),
        None => UNKNOWN.to_string(),
    }
}

fn relative_mark(relative: Relative) -> &'static str {
    match relative {
        Relative::Above => "▲",
        Relative::Below => "▼",
    }
}

fn tier_mark(score: u8) -> &'static str {
    match QualityTier::from_score(score) {
        QualityTier::Strong => "●",
        QualityTier::Fair => "◐",
        QualityTier::Weak => "○",
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
