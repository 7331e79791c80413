use serde::{Deserialize, Serialize};

/// Direction of the forecast relative to the current price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Neutral => "neutral",
        }
    }
}

/// Price forecast returned by the prediction endpoint for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub ticker: String,
    pub current_price: f64,
    pub predicted_price: f64,
    /// Signed percentage change between `current_price` and `predicted_price`.
    pub trend_pct: f64,
    pub trend: Trend,
    pub forecast_days: u32,
}

/// One row of market data as served by the baseline endpoint.
///
/// Everything except `ticker` and `name` may be missing upstream; a missing
/// value is `None` and must be shown as unknown rather than zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StockRecord {
    pub ticker: String,
    pub name: String,
    pub price: Option<f64>,
    pub pe: Option<f64>,
    pub pbv: Option<f64>,
    pub roe: Option<f64>,
    pub div_yield: Option<f64>,
    pub operating_margin: Option<f64>,
    pub ebitda: Option<f64>,
    pub total_debt: Option<f64>,
    pub total_cash: Option<f64>,
    pub beta: Option<f64>,
    pub market_cap: Option<f64>,
    pub sector: Option<String>,
    pub recommendation: Option<String>,
    pub sector_pe_avg: Option<f64>,
    pub sector_margin_avg: Option<f64>,
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

impl StockRecord {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Forecast trend percentage, if a prediction has been attached.
    pub fn trend_pct(&self) -> Option<f64> {
        self.prediction.as_ref().map(|prediction| prediction.trend_pct)
    }

    /// Case-insensitive substring match on name, ticker and sector.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.ticker.to_lowercase().contains(needle)
            || self
                .sector
                .as_deref()
                .is_some_and(|sector| sector.to_lowercase().contains(needle))
    }
}
