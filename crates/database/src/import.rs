//! Readers for the CSV exports the replay is fed from.
//!
//! Sentiment files carry `Date,Fear_and_Greed_Index`. Price files are daily
//! OHLC exports (`Date,Open,High,Low,Close,...`); only `Close` is kept.

use crate::DbError;
use chrono::NaiveDate;
use core_types::{parse_score, SentimentReading};
use rust_decimal::Decimal;
use std::io::BufRead;

const DATE_COLUMN: &str = "Date";
const SENTIMENT_COLUMN: &str = "Fear_and_Greed_Index";
const CLOSE_COLUMN: &str = "Close";

/// Column positions taken from a header row.
struct Header {
    columns: Vec<String>,
}

impl Header {
    fn parse(line: &str) -> Self {
        Self {
            columns: line
                .split(',')
                .map(|c| c.trim().trim_start_matches('\u{feff}').to_string())
                .collect(),
        }
    }

    fn position(&self, name: &str) -> Result<usize, DbError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| DbError::Parse {
                line: 1,
                reason: format!("missing '{name}' column"),
            })
    }
}

/// Parses a leading `YYYY-MM-DD`, ignoring any time-of-day suffix.
fn parse_date(raw: &str, line: usize) -> Result<NaiveDate, DbError> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| DbError::Parse {
        line,
        reason: format!("bad date '{raw}': {e}"),
    })
}

fn field<'a>(fields: &[&'a str], index: usize, line: usize) -> Result<&'a str, DbError> {
    fields.get(index).map(|f| f.trim()).ok_or_else(|| DbError::Parse {
        line,
        reason: format!("expected at least {} fields, found {}", index + 1, fields.len()),
    })
}

/// Reads a sentiment CSV. A malformed score is an error, never skipped.
pub fn read_sentiment_csv<R: BufRead>(reader: R) -> Result<Vec<SentimentReading>, DbError> {
    let mut lines = reader.lines();
    let Some(header) = lines.next().transpose()? else {
        return Ok(Vec::new());
    };
    let header = Header::parse(&header);
    let date_idx = header.position(DATE_COLUMN)?;
    let score_idx = header.position(SENTIMENT_COLUMN)?;

    let mut readings = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line_no = offset + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let date = parse_date(field(&fields, date_idx, line_no)?, line_no)?;
        let score = parse_score(field(&fields, score_idx, line_no)?)?;
        readings.push(SentimentReading::new(date, score));
    }

    tracing::debug!(count = readings.len(), "Parsed sentiment CSV");
    Ok(readings)
}

/// Reads the closes out of an OHLC CSV.
///
/// Rows whose first field is not a date (the extra ticker header rows some
/// exporters add) and rows with an empty or `null` close are skipped.
pub fn read_price_csv<R: BufRead>(reader: R) -> Result<Vec<(NaiveDate, Decimal)>, DbError> {
    let mut lines = reader.lines();
    let Some(header) = lines.next().transpose()? else {
        return Ok(Vec::new());
    };
    let header = Header::parse(&header);
    let date_idx = header
        .position(DATE_COLUMN)
        .or_else(|_| header.position("Price"))?;
    let close_idx = header.position(CLOSE_COLUMN)?;

    let mut closes = Vec::new();
    let mut skipped = 0usize;
    for (offset, line) in lines.enumerate() {
        let line_no = offset + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let raw_date = field(&fields, date_idx, line_no)?;
        if !raw_date.starts_with(|c: char| c.is_ascii_digit()) {
            skipped += 1;
            continue;
        }
        let date = parse_date(raw_date, line_no)?;

        let raw_close = field(&fields, close_idx, line_no)?;
        if raw_close.is_empty() || raw_close.eq_ignore_ascii_case("null") {
            skipped += 1;
            continue;
        }
        let close = parse_score(raw_close).map_err(|_| DbError::Parse {
            line: line_no,
            reason: format!("bad close '{raw_close}'"),
        })?;
        closes.push((date, close));
    }

    tracing::debug!(count = closes.len(), skipped, "Parsed price CSV");
    Ok(closes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn sentiment_rows_are_read_in_file_order() {
        let csv = "Date,Fear_and_Greed_Index\n2024-09-04,38\n2024-09-03,41.5\n\n";
        let readings = read_sentiment_csv(Cursor::new(csv)).unwrap();

        assert_eq!(
            readings,
            vec![
                SentimentReading::new(day(9, 4), dec!(38)),
                SentimentReading::new(day(9, 3), dec!(41.5)),
            ]
        );
    }

    #[test]
    fn sentiment_columns_are_found_by_name() {
        let csv = "Fear_and_Greed_Index,Date\n12,2024-09-03 00:00:00\n";
        let readings = read_sentiment_csv(Cursor::new(csv)).unwrap();
        assert_eq!(readings, vec![SentimentReading::new(day(9, 3), dec!(12))]);
    }

    #[test]
    fn malformed_score_is_an_error() {
        let csv = "Date,Fear_and_Greed_Index\n2024-09-03,fearful\n";
        let err = read_sentiment_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::MalformedScore(_))));
    }

    #[test]
    fn missing_sentiment_column_is_reported() {
        let csv = "Date,Score\n2024-09-03,12\n";
        let err = read_sentiment_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, DbError::Parse { line: 1, .. }));
    }

    #[test]
    fn empty_file_yields_no_readings() {
        assert!(read_sentiment_csv(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn price_file_keeps_only_closes() {
        let csv = "Date,Open,High,Low,Close,Adj Close,Volume\n\
                   2024-09-03,20.1,20.5,19.9,20.35,20.35,120000\n\
                   2024-09-04,20.3,20.4,19.5,null,null,0\n\
                   2024-09-05,19.6,19.8,19.4,19.55,19.55,98000\n";
        let closes = read_price_csv(Cursor::new(csv)).unwrap();
        assert_eq!(closes, vec![(day(9, 3), dec!(20.35)), (day(9, 5), dec!(19.55))]);
    }

    #[test]
    fn multi_row_ticker_headers_are_skipped() {
        let csv = "Price,Close,High,Low,Open,Volume\n\
                   Ticker,00646.TW,00646.TW,00646.TW,00646.TW,00646.TW\n\
                   Date,,,,,\n\
                   2024-09-03,20.35,20.5,19.9,20.1,120000\n";
        let closes = read_price_csv(Cursor::new(csv)).unwrap();
        assert_eq!(closes, vec![(day(9, 3), dec!(20.35))]);
    }

    #[test]
    fn unparseable_close_names_its_line() {
        let csv = "Date,Close\n2024-09-03,20\n2024-09-04,abc\n";
        let err = read_price_csv(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, DbError::Parse { line: 3, .. }));
    }
}
