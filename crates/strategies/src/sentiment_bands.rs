use crate::error::StrategyError;
use crate::{Directive, Intent, Strategy};
use configuration::Policy;
use core_types::{SentimentBand, SentimentReading};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Upper edge of a band. Rules are tried in order, so each band's lower edge is
/// the previous band's upper edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpperBound {
    Inclusive(Decimal),
    Exclusive(Decimal),
    Unbounded,
}

impl UpperBound {
    fn admits(&self, score: Decimal) -> bool {
        match *self {
            UpperBound::Inclusive(limit) => score <= limit,
            UpperBound::Exclusive(limit) => score < limit,
            UpperBound::Unbounded => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BandRule {
    band: SentimentBand,
    upper: UpperBound,
    intent: Intent,
}

/// The Fear & Greed band table.
///
/// | band          | score         | intent       |
/// |---------------|---------------|--------------|
/// | Extreme Fear  | <= 25         | buy 4 lots   |
/// | Fear          | (25, 45)      | buy 2 lots   |
/// | Neutral       | [45, 55]      | hold         |
/// | Greed         | (55, 75)      | sell <= 2    |
/// | Extreme Greed | >= 75         | sell <= 4    |
///
/// Lot counts come from `Policy`; the thresholds are fixed.
#[derive(Debug, Clone)]
pub struct SentimentBands {
    rules: Vec<BandRule>,
}

impl SentimentBands {
    pub fn new(params: Policy) -> Result<Self, StrategyError> {
        let tiers = [
            ("extreme_fear_buy_lots", params.extreme_fear_buy_lots),
            ("fear_buy_lots", params.fear_buy_lots),
            ("greed_sell_lots", params.greed_sell_lots),
            ("extreme_greed_sell_lots", params.extreme_greed_sell_lots),
        ];
        if let Some((name, _)) = tiers.iter().find(|(_, lots)| *lots == 0) {
            return Err(StrategyError::InvalidParameters(format!(
                "{} must be at least 1",
                name
            )));
        }

        Ok(Self::from_tiers(&params))
    }

    fn from_tiers(params: &Policy) -> Self {
        let rules = vec![
            BandRule {
                band: SentimentBand::ExtremeFear,
                upper: UpperBound::Inclusive(dec!(25)),
                intent: Intent::Buy { lots: params.extreme_fear_buy_lots },
            },
            BandRule {
                band: SentimentBand::Fear,
                upper: UpperBound::Exclusive(dec!(45)),
                intent: Intent::Buy { lots: params.fear_buy_lots },
            },
            BandRule {
                band: SentimentBand::Neutral,
                upper: UpperBound::Inclusive(dec!(55)),
                intent: Intent::Hold,
            },
            BandRule {
                band: SentimentBand::Greed,
                upper: UpperBound::Exclusive(dec!(75)),
                intent: Intent::Sell { max_lots: params.greed_sell_lots },
            },
            BandRule {
                band: SentimentBand::ExtremeGreed,
                upper: UpperBound::Unbounded,
                intent: Intent::Sell { max_lots: params.extreme_greed_sell_lots },
            },
        ];

        Self { rules }
    }

    /// First matching rule wins. The last rule is unbounded, so every score lands somewhere.
    pub fn classify(&self, score: Decimal) -> SentimentBand {
        self.rule_for(score).band
    }

    fn rule_for(&self, score: Decimal) -> &BandRule {
        let last = self.rules.len() - 1;
        self.rules
            .iter()
            .find(|rule| rule.upper.admits(score))
            .unwrap_or(&self.rules[last])
    }
}

impl Default for SentimentBands {
    fn default() -> Self {
        Self::from_tiers(&Policy::default())
    }
}

impl Strategy for SentimentBands {
    fn evaluate(&self, reading: &SentimentReading) -> Result<Directive, StrategyError> {
        let rule = self.rule_for(reading.score);
        tracing::trace!(date = %reading.date, score = %reading.score, band = ?rule.band, "classified sentiment");
        Ok(Directive {
            band: rule.band,
            intent: rule.intent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bands() -> SentimentBands {
        SentimentBands::default()
    }

    #[test]
    fn boundary_scores_resolve_to_one_side() {
        let b = bands();
        let cases = [
            (dec!(25), SentimentBand::ExtremeFear),
            (dec!(26), SentimentBand::Fear),
            (dec!(44), SentimentBand::Fear),
            (dec!(45), SentimentBand::Neutral),
            (dec!(55), SentimentBand::Neutral),
            (dec!(56), SentimentBand::Greed),
            (dec!(74), SentimentBand::Greed),
            (dec!(75), SentimentBand::ExtremeGreed),
        ];
        for (score, expected) in cases {
            assert_eq!(b.classify(score), expected, "score {score}");
        }
    }

    #[test]
    fn fractional_scores_between_integer_boundaries_are_covered() {
        let b = bands();
        assert_eq!(b.classify(dec!(25.5)), SentimentBand::Fear);
        assert_eq!(b.classify(dec!(44.9)), SentimentBand::Fear);
        assert_eq!(b.classify(dec!(55.01)), SentimentBand::Greed);
        assert_eq!(b.classify(dec!(74.99)), SentimentBand::Greed);
    }

    #[test]
    fn scores_outside_the_usual_range_still_classify() {
        let b = bands();
        assert_eq!(b.classify(dec!(-1000)), SentimentBand::ExtremeFear);
        assert_eq!(b.classify(Decimal::MIN), SentimentBand::ExtremeFear);
        assert_eq!(b.classify(dec!(250)), SentimentBand::ExtremeGreed);
        assert_eq!(b.classify(Decimal::MAX), SentimentBand::ExtremeGreed);
    }

    #[test]
    fn bands_are_monotonic_over_a_sweep() {
        let b = bands();
        let mut previous = SentimentBand::ExtremeFear;
        let mut score = dec!(-10);
        while score <= dec!(110) {
            let band = b.classify(score);
            assert!(band >= previous, "band went backwards at {score}");
            previous = band;
            score += dec!(0.25);
        }
        assert_eq!(previous, SentimentBand::ExtremeGreed);
    }

    #[test]
    fn each_band_carries_its_intent() {
        let b = bands();
        let cases = [
            (dec!(10), Intent::Buy { lots: 4 }),
            (dec!(30), Intent::Buy { lots: 2 }),
            (dec!(50), Intent::Hold),
            (dec!(60), Intent::Sell { max_lots: 2 }),
            (dec!(90), Intent::Sell { max_lots: 4 }),
        ];
        for (score, expected) in cases {
            let reading = SentimentReading::new(NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(), score);
            assert_eq!(b.evaluate(&reading).unwrap().intent, expected, "score {score}");
        }
    }

    #[test]
    fn evaluate_returns_band_and_intent() {
        let reading = SentimentReading::new(NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(), dec!(10));
        let directive = bands().evaluate(&reading).unwrap();
        assert_eq!(directive.band, SentimentBand::ExtremeFear);
        assert_eq!(directive.intent, Intent::Buy { lots: 4 });
    }

    #[test]
    fn zero_lot_tiers_are_rejected() {
        let params = Policy { fear_buy_lots: 0, ..Policy::default() };
        assert!(matches!(
            SentimentBands::new(params),
            Err(StrategyError::InvalidParameters(_))
        ));
    }
}
