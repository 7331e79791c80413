use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::score::quality_score;
use crate::stock::StockRecord;

/// Column the table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Ticker,
    Name,
    Price,
    Pe,
    Pbv,
    Roe,
    DivYield,
    OperatingMargin,
    Ebitda,
    TotalDebt,
    TotalCash,
    Beta,
    MarketCap,
    Sector,
    Recommendation,
    SectorPeAvg,
    SectorMarginAvg,
    LastUpdated,
    QualityScore,
    TrendPct,
}

impl SortKey {
    pub const ALL: [SortKey; 20] = [
        SortKey::Ticker,
        SortKey::Name,
        SortKey::Price,
        SortKey::Pe,
        SortKey::Pbv,
        SortKey::Roe,
        SortKey::DivYield,
        SortKey::OperatingMargin,
        SortKey::Ebitda,
        SortKey::TotalDebt,
        SortKey::TotalCash,
        SortKey::Beta,
        SortKey::MarketCap,
        SortKey::Sector,
        SortKey::Recommendation,
        SortKey::SectorPeAvg,
        SortKey::SectorMarginAvg,
        SortKey::LastUpdated,
        SortKey::QualityScore,
        SortKey::TrendPct,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Ticker => "ticker",
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Pe => "pe",
            SortKey::Pbv => "pbv",
            SortKey::Roe => "roe",
            SortKey::DivYield => "div_yield",
            SortKey::OperatingMargin => "operating_margin",
            SortKey::Ebitda => "ebitda",
            SortKey::TotalDebt => "total_debt",
            SortKey::TotalCash => "total_cash",
            SortKey::Beta => "beta",
            SortKey::MarketCap => "market_cap",
            SortKey::Sector => "sector",
            SortKey::Recommendation => "recommendation",
            SortKey::SectorPeAvg => "sector_pe_avg",
            SortKey::SectorMarginAvg => "sector_margin_avg",
            SortKey::LastUpdated => "last_updated",
            SortKey::QualityScore => "quality_score",
            SortKey::TrendPct => "trend_pct",
        }
    }

    fn value_of<'a>(self, record: &'a StockRecord) -> SortValue<'a> {
        use SortValue::{Number, Text};

        match self {
            SortKey::Ticker => Text(Some(&record.ticker)),
            SortKey::Name => Text(Some(&record.name)),
            SortKey::Price => Number(record.price),
            SortKey::Pe => Number(record.pe),
            SortKey::Pbv => Number(record.pbv),
            SortKey::Roe => Number(record.roe),
            SortKey::DivYield => Number(record.div_yield),
            SortKey::OperatingMargin => Number(record.operating_margin),
            SortKey::Ebitda => Number(record.ebitda),
            SortKey::TotalDebt => Number(record.total_debt),
            SortKey::TotalCash => Number(record.total_cash),
            SortKey::Beta => Number(record.beta),
            SortKey::MarketCap => Number(record.market_cap),
            SortKey::Sector => Text(record.sector.as_deref()),
            SortKey::Recommendation => Text(record.recommendation.as_deref()),
            SortKey::SectorPeAvg => Number(record.sector_pe_avg),
            SortKey::SectorMarginAvg => Number(record.sector_margin_avg),
            SortKey::LastUpdated => Text(record.last_updated.as_deref()),
            SortKey::QualityScore => Number(Some(f64::from(quality_score(record)))),
            SortKey::TrendPct => Number(record.trend_pct()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key `{0}`")]
pub struct ParseSortKeyError(String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ParseSortKeyError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort direction `{0}`, expected `asc` or `desc`")]
pub struct ParseDirectionError(String);

impl FromStr for SortDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Column selection driven by header clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Clicking the active column flips its direction; a new column starts descending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.reversed();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Desc;
        }
    }

    pub fn active(&self) -> Option<(SortKey, SortDirection)> {
        self.key.map(|key| (key, self.direction))
    }
}

/// Comparable projection of one column. Within a column every present value
/// uses the same variant.
enum SortValue<'a> {
    Number(Option<f64>),
    Text(Option<&'a str>),
}

impl SortValue<'_> {
    /// Absent values order below every present value.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                compare_present(*a, *b, |a, b| a.total_cmp(&b))
            }
            (SortValue::Text(a), SortValue::Text(b)) => compare_present(*a, *b, |a, b| a.cmp(b)),
            _ => Ordering::Equal,
        }
    }
}

fn compare_present<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Keep the records whose name, ticker or sector contains the trimmed search term.
pub fn filter_rows<'a>(stocks: &'a [StockRecord], search_term: &str) -> Vec<&'a StockRecord> {
    let needle = search_term.trim().to_lowercase();
    stocks
        .iter()
        .filter(|record| needle.is_empty() || record.matches_lowercase(&needle))
        .collect()
}

/// Stable sort by `key`; ties keep their incoming order in both directions.
pub fn sort_rows(rows: &mut [&StockRecord], key: SortKey, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = key.value_of(a).compare(&key.value_of(b));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Rows to display for the current search text and sort selection.
///
/// The input is never mutated; with an empty search and no sort the output
/// equals the input.
pub fn derive_rows(
    stocks: &[StockRecord],
    search_term: &str,
    sort: Option<(SortKey, SortDirection)>,
) -> Vec<StockRecord> {
    let mut rows = filter_rows(stocks, search_term);
    if let Some((key, direction)) = sort {
        sort_rows(&mut rows, key, direction);
    }
    rows.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::{Prediction, Trend};

    fn record(ticker: &str, name: &str, sector: Option<&str>, price: Option<f64>) -> StockRecord {
        StockRecord {
            sector: sector.map(str::to_string),
            price,
            ..StockRecord::new(ticker, name)
        }
    }

    fn with_trend(mut record: StockRecord, trend_pct: f64) -> StockRecord {
        record.prediction = Some(Prediction {
            ticker: record.ticker.clone(),
            current_price: 10.0,
            predicted_price: 10.0 * (1.0 + trend_pct / 100.0),
            trend_pct,
            trend: Trend::Neutral,
            forecast_days: 7,
        });
        record
    }

    fn sample() -> Vec<StockRecord> {
        vec![
            record("PKO.WA", "PKO BP", Some("Financial Services"), Some(58.1)),
            record("CDR.WA", "CD Projekt", Some("Communication Services"), Some(120.5)),
            record("KGH.WA", "KGHM", Some("Basic Materials"), None),
            record("PEO.WA", "Bank Pekao", Some("Financial Services"), Some(150.2)),
            record("ALE.WA", "Allegro", None, Some(31.9)),
        ]
    }

    fn tickers(rows: &[StockRecord]) -> Vec<&str> {
        rows.iter().map(|row| row.ticker.as_str()).collect()
    }

    #[test]
    fn no_search_and_no_sort_is_identity() {
        let stocks = sample();
        assert_eq!(derive_rows(&stocks, "", None), stocks);
        assert_eq!(derive_rows(&stocks, "   ", None), stocks);
    }

    #[test]
    fn search_matches_name_ticker_and_sector_case_insensitively() {
        let stocks = sample();
        assert_eq!(
            tickers(&derive_rows(&stocks, "  FINANCIAL ", None)),
            vec!["PKO.WA", "PEO.WA"]
        );
        assert_eq!(tickers(&derive_rows(&stocks, "cdr", None)), vec!["CDR.WA"]);
        assert_eq!(tickers(&derive_rows(&stocks, "allegro", None)), vec!["ALE.WA"]);
        assert!(derive_rows(&stocks, "nonexistent", None).is_empty());
    }

    #[test]
    fn every_search_hit_contains_the_term() {
        let stocks = sample();
        for term in ["a", "wa", "serv", "PK", "o"] {
            let needle = term.to_lowercase();
            for row in derive_rows(&stocks, term, None) {
                assert!(row.matches_lowercase(&needle), "{} should match {term}", row.ticker);
            }
        }
    }

    #[test]
    fn missing_values_sort_low_in_both_directions() {
        let stocks = sample();
        let desc = derive_rows(&stocks, "", Some((SortKey::Price, SortDirection::Desc)));
        assert_eq!(
            tickers(&desc),
            vec!["PEO.WA", "CDR.WA", "PKO.WA", "ALE.WA", "KGH.WA"]
        );

        let asc = derive_rows(&stocks, "", Some((SortKey::Price, SortDirection::Asc)));
        assert_eq!(
            tickers(&asc),
            vec!["KGH.WA", "ALE.WA", "PKO.WA", "CDR.WA", "PEO.WA"]
        );
    }

    #[test]
    fn reversing_direction_reverses_tie_free_rows() {
        let stocks = sample();
        for key in [SortKey::Ticker, SortKey::Name, SortKey::Price] {
            let asc = derive_rows(&stocks, "", Some((key, SortDirection::Asc)));
            let mut desc = derive_rows(&stocks, "", Some((key, SortDirection::Desc)));
            desc.reverse();
            assert_eq!(asc, desc, "reversal mismatch for {key}");
        }
    }

    #[test]
    fn unpredicted_rows_trail_under_descending_trend() {
        let stocks = vec![
            record("A", "Alpha", None, None),
            with_trend(record("B", "Beta", None, None), -3.5),
            record("C", "Gamma", None, None),
            with_trend(record("D", "Delta", None, None), 2.0),
        ];

        let desc = derive_rows(&stocks, "", Some((SortKey::TrendPct, SortDirection::Desc)));
        assert_eq!(tickers(&desc), vec!["D", "B", "A", "C"]);

        let asc = derive_rows(&stocks, "", Some((SortKey::TrendPct, SortDirection::Asc)));
        assert_eq!(tickers(&asc), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn trend_far_below_any_sentinel_still_beats_missing() {
        let stocks = vec![
            record("A", "Alpha", None, None),
            with_trend(record("B", "Beta", None, None), -5_000.0),
        ];
        let desc = derive_rows(&stocks, "", Some((SortKey::TrendPct, SortDirection::Desc)));
        assert_eq!(tickers(&desc), vec!["B", "A"]);
    }

    #[test]
    fn quality_score_key_uses_computed_score() {
        let cheap = StockRecord {
            pe: Some(9.0),
            pbv: Some(1.1),
            ..StockRecord::new("PZU.WA", "PZU")
        };
        let pricey = StockRecord {
            pe: Some(40.0),
            ..StockRecord::new("LPP.WA", "LPP")
        };
        let stocks = vec![pricey, cheap];
        let rows = derive_rows(
            &stocks,
            "",
            Some((SortKey::QualityScore, SortDirection::Desc)),
        );
        assert_eq!(tickers(&rows), vec!["PZU.WA", "LPP.WA"]);
    }

    #[test]
    fn ties_keep_filter_order() {
        let stocks = sample();
        let rows = derive_rows(
            &stocks,
            "",
            Some((SortKey::QualityScore, SortDirection::Desc)),
        );
        assert_eq!(tickers(&rows), tickers(&stocks));
    }

    #[test]
    fn input_is_left_untouched() {
        let stocks = sample();
        let before = stocks.clone();
        let _ = derive_rows(&stocks, "bank", Some((SortKey::Price, SortDirection::Asc)));
        assert_eq!(stocks, before);
    }

    #[test]
    fn toggle_flips_active_column_and_resets_new_one() {
        let mut sort = SortState::default();
        assert_eq!(sort.active(), None);

        sort.toggle(SortKey::Pe);
        assert_eq!(sort.active(), Some((SortKey::Pe, SortDirection::Desc)));
        sort.toggle(SortKey::Pe);
        assert_eq!(sort.active(), Some((SortKey::Pe, SortDirection::Asc)));
        sort.toggle(SortKey::Roe);
        assert_eq!(sort.active(), Some((SortKey::Roe, SortDirection::Desc)));
    }

    #[test]
    fn keys_and_directions_parse_from_snake_case() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        assert!("volume".parse::<SortKey>().is_err());
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("up".parse::<SortDirection>().is_err());
    }
}
