//! Per-row display computations. Everything here is a pure function of a
//! single record and is recomputed on every render.

use crate::stock::StockRecord;

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN: &str = "—";

const BILLION: f64 = 1e9;
const MILLION: f64 = 1e6;
const HEALTHY_ROE: f64 = 0.10;

/// `2.50B`, `740.00M`, the rounded raw value below a million, or `N/A`.
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    match market_cap {
        Some(cap) if cap.is_finite() && cap != 0.0 => {
            if cap >= BILLION {
                format!("{:.2}B", cap / BILLION)
            } else if cap >= MILLION {
                format!("{:.2}M", cap / MILLION)
            } else {
                format!("{cap:.0}")
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Net debt over EBITDA. Undefined without a positive EBITDA; unknown debt or
/// cash counts as zero.
pub fn net_debt_to_ebitda(record: &StockRecord) -> Option<f64> {
    let ebitda = record.ebitda.filter(|ebitda| *ebitda > 0.0)?;
    let net_debt = record.total_debt.unwrap_or_default() - record.total_cash.unwrap_or_default();
    Some(net_debt / ebitda)
}

pub fn format_leverage(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| NOT_AVAILABLE.to_string(), |ratio| format!("{ratio:.2}x"))
}

/// Display band of the net-debt/EBITDA ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtRisk {
    Low,
    Medium,
    High,
}

impl DebtRisk {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 4.0 {
            DebtRisk::High
        } else if ratio > 2.5 {
            DebtRisk::Medium
        } else {
            DebtRisk::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DebtRisk::Low => "low",
            DebtRisk::Medium => "medium",
            DebtRisk::High => "high",
        }
    }
}

/// Position of a metric against its sector average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relative {
    Above,
    Below,
}

impl Relative {
    pub fn as_str(self) -> &'static str {
        match self {
            Relative::Above => "above",
            Relative::Below => "below",
        }
    }
}

/// P/E against the sector average. `Below` means cheaper than the sector.
pub fn sector_pe_comparison(record: &StockRecord) -> Option<(Relative, f64)> {
    let pe = record.pe.filter(|pe| *pe > 0.0)?;
    let average = record.sector_pe_avg.filter(|avg| *avg != 0.0)?;
    let relative = if pe < average {
        Relative::Below
    } else {
        Relative::Above
    };
    Some((relative, average))
}

/// Operating margin against the sector average.
pub fn sector_margin_comparison(record: &StockRecord) -> Option<(Relative, f64)> {
    let margin = record.operating_margin.filter(|margin| *margin > 0.0)?;
    let average = record.sector_margin_avg.filter(|avg| *avg != 0.0)?;
    let relative = if margin > average {
        Relative::Above
    } else {
        Relative::Below
    };
    Some((relative, average))
}

pub fn roe_is_healthy(record: &StockRecord) -> bool {
    record.roe.is_some_and(|roe| roe > HEALTHY_ROE)
}

/// Analyst consensus bucket derived from the free-form recommendation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl Signal {
    /// `None` when there is no usable recommendation.
    pub fn classify(recommendation: Option<&str>) -> Option<Self> {
        let key = recommendation?.trim().to_lowercase();
        if key.is_empty() || key == "none" {
            return None;
        }
        if key.contains("buy") {
            Some(Signal::Buy)
        } else if key.contains("sell") || key.contains("underperform") {
            Some(Signal::Sell)
        } else {
            Some(Signal::Hold)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Buy => "buy",
            Signal::Hold => "hold",
            Signal::Sell => "sell",
        }
    }
}

/// Leading word of the recommendation key (`strong_buy` -> `strong`).
pub fn recommendation_label(recommendation: &str) -> String {
    recommendation
        .trim()
        .split('_')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Fraction rendered as a percentage with one decimal (`0.153` -> `15.3%`).
pub fn format_fraction_pct(value: Option<f64>) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), |value| format!("{:.1}%", value * 100.0))
}

/// Signed percentage (`1.25` -> `+1.25%`).
pub fn format_signed_pct(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

pub fn format_decimal(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), |value| format!("{value:.precision$}"))
}

/// P/E is only meaningful when positive.
pub fn format_pe(pe: Option<f64>) -> String {
    format_decimal(pe.filter(|pe| *pe > 0.0), 1)
}
