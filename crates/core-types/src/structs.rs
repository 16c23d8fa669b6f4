use crate::enums::{SentimentBand, TradeAction};
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// A ticker symbol, e.g. "00646.TW".
pub type Instrument = String;

/// One day of the sentiment index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub date: NaiveDate,
    pub score: Decimal,
}

impl SentimentReading {
    pub fn new(date: NaiveDate, score: Decimal) -> Self {
        Self { date, score }
    }

    /// Parses a raw score as found in a CSV cell or a text column.
    ///
    /// Anything that is not a finite number is rejected; a reading is never
    /// defaulted into some band.
    pub fn parse(date: NaiveDate, raw: &str) -> Result<Self, CoreError> {
        let score = parse_score(raw)?;
        Ok(Self { date, score })
    }
}

/// Parses a sentiment score, accepting plain and scientific notation.
///
/// Digit separators are not accepted: `4_5` is malformed, not 45.
pub fn parse_score(raw: &str) -> Result<Decimal, CoreError> {
    let trimmed = raw.trim();
    if trimmed.contains('_') {
        return Err(CoreError::MalformedScore(raw.to_string()));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CoreError::MalformedScore(raw.to_string()))
}

/// Daily closing prices per instrument.
///
/// A missing entry means the instrument did not trade that day.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    closes: HashMap<Instrument, BTreeMap<NaiveDate, Decimal>>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a close. Prices must be strictly positive.
    pub fn insert(
        &mut self,
        instrument: &str,
        date: NaiveDate,
        close: Decimal,
    ) -> Result<(), CoreError> {
        if close <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                format!("close of {} on {}", instrument, date),
                close.to_string(),
            ));
        }
        self.closes
            .entry(instrument.to_string())
            .or_default()
            .insert(date, close);
        Ok(())
    }

    pub fn close(&self, instrument: &str, date: NaiveDate) -> Option<Decimal> {
        self.closes.get(instrument)?.get(&date).copied()
    }

    pub fn has_date(&self, instrument: &str, date: NaiveDate) -> bool {
        self.close(instrument, date).is_some()
    }

    /// Every instrument's close on `date`, skipping those with no print.
    pub fn closes_on(&self, date: NaiveDate) -> HashMap<Instrument, Decimal> {
        self.closes
            .iter()
            .filter_map(|(instrument, series)| {
                series.get(&date).map(|close| (instrument.clone(), *close))
            })
            .collect()
    }

    /// Total number of (instrument, date) closes held.
    pub fn len(&self) -> usize {
        self.closes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An executed trade, in ledger column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub instrument: Instrument,
    pub action: TradeAction,
    pub unit_price: Decimal,
    pub lots: u32,
    pub commission: Decimal,
    pub tax: Decimal,
    pub borrow_fee: Decimal,
    pub margin_amount: Decimal,
    /// Negative for buys, positive for sells.
    pub net_cash_flow: Decimal,
    pub date: NaiveDate,
    pub sentiment: SentimentBand,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    #[test]
    fn parses_integer_and_fractional_scores() {
        assert_eq!(SentimentReading::parse(day(3), "42").unwrap().score, dec!(42));
        assert_eq!(SentimentReading::parse(day(3), " 55.5 ").unwrap().score, dec!(55.5));
        assert_eq!(SentimentReading::parse(day(3), "1e1").unwrap().score, dec!(10));
    }

    #[test]
    fn rejects_non_numeric_scores() {
        for raw in ["", "abc", "NaN", "inf", "forty"] {
            let err = SentimentReading::parse(day(3), raw).unwrap_err();
            assert!(matches!(err, CoreError::MalformedScore(_)), "{raw}");
        }
    }

    #[test]
    fn digit_separators_do_not_make_a_score() {
        for raw in ["4_5", "1_0", "_50", "50_"] {
            assert!(matches!(parse_score(raw), Err(CoreError::MalformedScore(_))), "{raw}");
        }
        assert!(matches!(parse_score("45,0"), Err(CoreError::MalformedScore(_))));
    }

    #[test]
    fn price_lookup_misses_are_per_instrument() {
        let mut prices = PriceSeries::new();
        prices.insert("AAA", day(3), dec!(20)).unwrap();
        prices.insert("BBB", day(4), dec!(30)).unwrap();

        assert_eq!(prices.close("AAA", day(3)), Some(dec!(20)));
        assert_eq!(prices.close("AAA", day(4)), None);
        assert!(prices.has_date("BBB", day(4)));
        assert_eq!(prices.closes_on(day(4)).len(), 1);
        assert_eq!(prices.len(), 2);
    }

    #[test]
    fn non_positive_closes_are_rejected() {
        let mut prices = PriceSeries::new();
        assert!(prices.insert("AAA", day(3), Decimal::ZERO).is_err());
        assert!(prices.insert("AAA", day(3), dec!(-1)).is_err());
        assert!(prices.is_empty());
    }
}
