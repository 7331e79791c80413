use crate::stock::StockRecord;

const CLAUSE_POINTS: u8 = 25;
const LOW_BETA_BONUS: u8 = 5;
const MAX_SCORE: u8 = 100;

/// Which valuation and profitability thresholds a record passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QualityBreakdown {
    /// `0 < pe < 15`
    pub cheap_pe: bool,
    /// `0 < pbv < 2`
    pub cheap_pbv: bool,
    /// `roe > 0.15`
    pub high_roe: bool,
    /// `div_yield > 0.04`
    pub high_yield: bool,
    /// `beta` known, non-zero and below 1.0
    pub low_beta: bool,
}

impl QualityBreakdown {
    pub fn of(record: &StockRecord) -> Self {
        Self {
            cheap_pe: matches!(record.pe, Some(pe) if pe > 0.0 && pe < 15.0),
            cheap_pbv: matches!(record.pbv, Some(pbv) if pbv > 0.0 && pbv < 2.0),
            high_roe: matches!(record.roe, Some(roe) if roe > 0.15),
            high_yield: matches!(record.div_yield, Some(yield_) if yield_ > 0.04),
            low_beta: matches!(record.beta, Some(beta) if beta != 0.0 && beta < 1.0),
        }
    }

    pub fn score(&self) -> u8 {
        let base = [self.cheap_pe, self.cheap_pbv, self.high_roe, self.high_yield]
            .into_iter()
            .filter(|passed| *passed)
            .count() as u8
            * CLAUSE_POINTS;

        if self.low_beta {
            (base + LOW_BETA_BONUS).min(MAX_SCORE)
        } else {
            base
        }
    }
}

/// Quality heuristic in `[0, 100]`, recomputed from the record on every call.
pub fn quality_score(record: &StockRecord) -> u8 {
    QualityBreakdown::of(record).score()
}

/// Colour band of a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    Strong,
    Fair,
    Weak,
}

impl QualityTier {
    pub fn from_score(score: u8) -> Self {
        if score >= 75 {
            QualityTier::Strong
        } else if score >= 50 {
            QualityTier::Fair
        } else {
            QualityTier::Weak
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Strong => "strong",
            QualityTier::Fair => "fair",
            QualityTier::Weak => "weak",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fundamentals(pe: f64, pbv: f64, roe: f64, div_yield: f64, beta: Option<f64>) -> StockRecord {
        StockRecord {
            pe: Some(pe),
            pbv: Some(pbv),
            roe: Some(roe),
            div_yield: Some(div_yield),
            beta,
            ..StockRecord::new("PKO.WA", "PKO BP")
        }
    }

    #[test]
    fn every_clause_plus_low_beta_caps_at_hundred() {
        let record = fundamentals(10.0, 1.0, 0.2, 0.05, Some(0.8));
        assert_eq!(quality_score(&record), 100);
    }

    #[test]
    fn low_beta_adds_bonus_below_cap() {
        let record = fundamentals(10.0, 3.0, 0.05, 0.01, Some(0.7));
        assert_eq!(quality_score(&record), 30);
    }

    #[test]
    fn absent_and_zero_inputs_fail_their_clause() {
        let empty = StockRecord::new("JSW.WA", "JSW");
        assert_eq!(quality_score(&empty), 0);

        let zeros = fundamentals(0.0, 0.0, 0.0, 0.0, Some(0.0));
        assert_eq!(quality_score(&zeros), 0);
    }

    #[test]
    fn negative_pe_is_not_cheap() {
        let record = fundamentals(-4.0, 1.5, 0.0, 0.0, None);
        let breakdown = QualityBreakdown::of(&record);
        assert!(!breakdown.cheap_pe);
        assert!(breakdown.cheap_pbv);
        assert_eq!(breakdown.score(), 25);
    }

    #[test]
    fn score_stays_in_range_over_a_grid() {
        let values = [-1.0, 0.0, 0.1, 0.5, 1.5, 10.0, 20.0];
        for pe in values {
            for pbv in values {
                for roe in values {
                    for beta in values {
                        let record = fundamentals(pe, pbv, roe, roe, Some(beta));
                        let score = quality_score(&record);
                        assert!(score <= 100, "score {score} out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(QualityTier::from_score(100), QualityTier::Strong);
        assert_eq!(QualityTier::from_score(75), QualityTier::Strong);
        assert_eq!(QualityTier::from_score(55), QualityTier::Fair);
        assert_eq!(QualityTier::from_score(30), QualityTier::Weak);
    }
}
