//! Presentation helpers shared by the dashboard components.

use std::hash::{DefaultHasher, Hash, Hasher};

use gpw_analyst_core::metrics::{DebtRisk, Relative, Signal};
use gpw_analyst_core::{
    QualityTier, SortDirection, SortKey, SortState, StockRecord, StockStore, Trend,
};

/// Sortable columns in display order with their header labels.
pub const COLUMNS: [(SortKey, &str); 11] = [
    (SortKey::Ticker, "Ticker"),
    (SortKey::Name, "Company"),
    (SortKey::Price, "Price"),
    (SortKey::MarketCap, "Market cap"),
    (SortKey::Pe, "P/E"),
    (SortKey::Pbv, "P/BV"),
    (SortKey::Roe, "ROE"),
    (SortKey::OperatingMargin, "Op. margin"),
    (SortKey::Recommendation, "Signal"),
    (SortKey::TrendPct, "AI forecast"),
    (SortKey::QualityScore, "Quality"),
];

/// Arrow shown next to the active sort column.
pub fn sort_indicator(state: &SortState, key: SortKey) -> &'static str {
    match state.active() {
        Some((active, direction)) if active == key => match direction {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        },
        _ => "",
    }
}

/// Identity of a rendered row: the ticker plus a fingerprint of every field,
/// so any upstream change rebuilds the row.
pub type RowKey = (String, u64);

pub fn row_key(record: &StockRecord) -> RowKey {
    let mut hasher = DefaultHasher::new();
    format!("{record:?}").hash(&mut hasher);
    (record.ticker.clone(), hasher.finish())
}

pub fn found_label(count: usize) -> String {
    format!("Found: {count}")
}

/// Status badges for the header: `(css modifier, label)`.
pub fn status_badges(store: &StockStore) -> Vec<(&'static str, String)> {
    let mut badges = Vec::new();
    if store.is_baseline_loading() {
        badges.push(("status--syncing", "Syncing market data".to_string()));
    }
    if store.is_predicting() {
        badges.push((
            "status--forecasting",
            format!(
                "AI forecasting {}/{}",
                store.predicted_count(),
                store.len()
            ),
        ));
    }
    badges
}

pub fn trend_class(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "trend--up",
        Trend::Down => "trend--down",
        Trend::Neutral => "trend--neutral",
    }
}

pub fn tier_class(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Strong => "quality--strong",
        QualityTier::Fair => "quality--fair",
        QualityTier::Weak => "quality--weak",
    }
}

pub fn signal_class(signal: Option<Signal>) -> &'static str {
    match signal {
        Some(Signal::Buy) => "signal--buy",
        Some(Signal::Hold) => "signal--hold",
        Some(Signal::Sell) => "signal--sell",
        None => "signal--unknown",
    }
}

pub fn risk_class(risk: DebtRisk) -> &'static str {
    match risk {
        DebtRisk::Low => "risk--low",
        DebtRisk::Medium => "risk--medium",
        DebtRisk::High => "risk--high",
    }
}

pub fn relative_class(relative: Relative) -> &'static str {
    match relative {
        Relative::Above => "relative--above",
        Relative::Below => "relative--below",
    }
}
