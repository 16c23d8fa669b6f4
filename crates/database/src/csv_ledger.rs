use crate::DbError;
use analytics::SummaryRecord;
use core_types::{LabelLocale, LedgerError, LedgerSink, TransactionRecord};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

const LEDGER_HEADER_EN: &str = "instrument,action,unit_price,lots,commission,tax,borrow_fee,margin_amount,net_cash_flow,date,sentiment";
const LEDGER_HEADER_ZH: &str =
    "台股代碼(名稱),交易類別,成交價(元),張數,手續費(張),證交稅(元),借券費(元),融資金額,收付金額,時間,市場情緒";

const SUMMARY_HEADER_EN: &str =
    "cash,securities_value,margin_debt,net_assets,profit,return_rate_pct,maintenance_ratio";
const SUMMARY_HEADER_ZH: &str = "現金資產,證券資產,信用借款,淨資產,獲利,總報酬率(%),整戶維持率(%)";

fn ledger_header(locale: LabelLocale) -> &'static str {
    match locale {
        LabelLocale::English => LEDGER_HEADER_EN,
        LabelLocale::TraditionalChinese => LEDGER_HEADER_ZH,
    }
}

fn summary_header(locale: LabelLocale) -> &'static str {
    match locale {
        LabelLocale::English => SUMMARY_HEADER_EN,
        LabelLocale::TraditionalChinese => SUMMARY_HEADER_ZH,
    }
}

/// Opens `path` for appending, writing `header` first if the file is new.
fn open_append(path: &Path, header: &str) -> std::io::Result<File> {
    let is_new = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if is_new {
        writeln!(file, "{header}")?;
    }
    Ok(file)
}

/// An append-only CSV transaction ledger.
///
/// Rows from successive runs accumulate in the same file; the header is only
/// written when the file is created.
pub struct CsvLedger {
    file: File,
    locale: LabelLocale,
}

impl CsvLedger {
    pub fn open(path: &Path, locale: LabelLocale) -> Result<Self, DbError> {
        let file = open_append(path, ledger_header(locale))?;
        Ok(Self { file, locale })
    }
}

impl LedgerSink for CsvLedger {
    fn record(&mut self, record: TransactionRecord) -> Result<(), LedgerError> {
        writeln!(
            self.file,
            "{},{},{},{},{},{},{},{},{},{},{}",
            record.instrument,
            record.action.label(self.locale),
            record.unit_price,
            record.lots,
            record.commission,
            record.tax,
            record.borrow_fee,
            record.margin_amount,
            record.net_cash_flow,
            record.date.format("%Y-%m-%d"),
            record.sentiment.label(self.locale),
        )?;
        Ok(())
    }
}

/// Appends one summary row to `path`, creating it with a header if needed.
///
/// The maintenance ratio is written as `N/A` when there is no margin debt.
pub fn write_summary_csv(
    path: &Path,
    summary: &SummaryRecord,
    locale: LabelLocale,
) -> Result<(), DbError> {
    let mut file = open_append(path, summary_header(locale))?;
    let maintenance_ratio = summary
        .maintenance_ratio
        .map_or_else(|| "N/A".to_string(), |ratio| ratio.to_string());
    writeln!(
        file,
        "{},{},{},{},{},{},{}",
        summary.cash,
        summary.securities_value,
        summary.margin_debt,
        summary.net_assets,
        summary.profit,
        summary.return_rate_pct,
        maintenance_ratio,
    )?;
    Ok(())
}

/// Writes a finished run to disk: its ledger rows, then its summary row.
///
/// Taking the summary up front means a run that could not be valued leaves
/// both files untouched. Returns the number of ledger rows appended.
pub fn export_run_csv(
    ledger_path: &Path,
    summary_path: &Path,
    records: &[TransactionRecord],
    summary: &SummaryRecord,
    locale: LabelLocale,
) -> Result<usize, DbError> {
    let mut ledger = CsvLedger::open(ledger_path, locale)?;
    for record in records {
        ledger.record(record.clone())?;
    }
    write_summary_csv(summary_path, summary, locale)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{SentimentBand, TradeAction};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn buy_record() -> TransactionRecord {
        TransactionRecord {
            instrument: "00646.TW".to_string(),
            action: TradeAction::Buy,
            unit_price: dec!(20),
            lots: 4,
            commission: dec!(114.00),
            tax: dec!(0.00),
            borrow_fee: Decimal::ZERO,
            margin_amount: Decimal::ZERO,
            net_cash_flow: dec!(-80114.00),
            date: NaiveDate::from_ymd_opt(2024, 9, 3).unwrap(),
            sentiment: SentimentBand::ExtremeFear,
        }
    }

    fn summary() -> SummaryRecord {
        SummaryRecord {
            cash: dec!(1879127.00),
            securities_value: dec!(120000),
            margin_debt: Decimal::ZERO,
            net_assets: dec!(1999127.00),
            profit: dec!(-873.00),
            return_rate_pct: dec!(-0.04365),
            maintenance_ratio: None,
        }
    }

    #[test]
    fn ledger_writes_header_once_across_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");

        for _ in 0..2 {
            let mut ledger = CsvLedger::open(&path, LabelLocale::English).unwrap();
            ledger.record(buy_record()).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], LEDGER_HEADER_EN);
        assert_eq!(
            lines[1],
            "00646.TW,Cash Buy,20,4,114.00,0.00,0,0,-80114.00,2024-09-03,Extreme Fear"
        );
        assert_eq!(lines[1], lines[2]);
    }

    #[test]
    fn ledger_uses_traditional_chinese_labels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");

        let mut ledger = CsvLedger::open(&path, LabelLocale::TraditionalChinese).unwrap();
        ledger.record(buy_record()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some(LEDGER_HEADER_ZH));
        let row = lines.next().unwrap();
        assert!(row.contains(",現股買進,"));
        assert!(row.ends_with(",極度恐慌"));
    }

    #[test]
    fn existing_ledger_file_is_appended_without_a_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "previous run\n").unwrap();

        let mut ledger = CsvLedger::open(&path, LabelLocale::English).unwrap();
        ledger.record(buy_record()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("previous run\n00646.TW,"));
    }

    #[test]
    fn summary_without_margin_reports_not_applicable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asset_summary.csv");

        write_summary_csv(&path, &summary(), LabelLocale::English).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], SUMMARY_HEADER_EN);
        assert_eq!(lines[1], "1879127.00,120000,0,1999127.00,-873.00,-0.04365,N/A");
    }

    #[test]
    fn summary_with_margin_writes_the_ratio() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("asset_summary.csv");
        let with_margin = SummaryRecord {
            margin_debt: dec!(1000),
            maintenance_ratio: Some(dec!(1999.127)),
            ..summary()
        };

        write_summary_csv(&path, &with_margin, LabelLocale::TraditionalChinese).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], SUMMARY_HEADER_ZH);
        assert!(lines[1].ends_with(",1999.127"));
    }

    #[test]
    fn exported_run_writes_ledger_and_summary_together() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("history.csv");
        let summary_path = dir.path().join("asset_summary.csv");
        let records = vec![buy_record(), buy_record()];

        let written = export_run_csv(
            &ledger_path,
            &summary_path,
            &records,
            &summary(),
            LabelLocale::English,
        )
        .unwrap();

        assert_eq!(written, 2);
        let ledger = std::fs::read_to_string(&ledger_path).unwrap();
        assert_eq!(ledger.lines().count(), 3);
        let summary_rows = std::fs::read_to_string(&summary_path).unwrap();
        assert_eq!(summary_rows.lines().count(), 2);
    }

    #[test]
    fn exporting_an_empty_run_still_writes_the_summary() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("history.csv");
        let summary_path = dir.path().join("asset_summary.csv");

        let written =
            export_run_csv(&ledger_path, &summary_path, &[], &summary(), LabelLocale::English)
                .unwrap();

        assert_eq!(written, 0);
        assert_eq!(std::fs::read_to_string(&ledger_path).unwrap(), format!("{LEDGER_HEADER_EN}\n"));
        assert!(std::fs::read_to_string(&summary_path).unwrap().ends_with(",N/A\n"));
    }
}
