use crate::DbError;
use analytics::SummaryRecord;
use chrono::NaiveDate;
use core_types::{LabelLocale, PriceSeries, SentimentReading, TransactionRecord};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{Row, Transaction};
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts a batch of sentiment readings in one transaction.
    ///
    /// Re-importing a date replaces its score.
    pub async fn save_sentiment_readings(
        &self,
        readings: &[SentimentReading],
    ) -> Result<u64, DbError> {
        let mut tx: Transaction<Postgres> = self.pool.begin().await?;
        let mut written = 0;
        for reading in readings {
            written += sqlx::query(
                r#"
                INSERT INTO sentiment_readings (reading_date, score)
                VALUES ($1, $2)
                ON CONFLICT (reading_date) DO UPDATE SET score = EXCLUDED.score
                "#,
            )
            .bind(reading.date)
            .bind(reading.score)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    /// Fetches the sentiment calendar for `[start, end]`, oldest first.
    pub async fn get_sentiment_series(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SentimentReading>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT reading_date, score
            FROM sentiment_readings
            WHERE reading_date >= $1 AND reading_date <= $2
            ORDER BY reading_date ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<SentimentReading, DbError> {
                Ok(SentimentReading::new(
                    row.try_get("reading_date")?,
                    row.try_get("score")?,
                ))
            })
            .collect()
    }

    /// Upserts a batch of closes for one symbol in one transaction.
    pub async fn save_daily_closes(
        &self,
        symbol: &str,
        closes: &[(NaiveDate, Decimal)],
    ) -> Result<u64, DbError> {
        let mut tx: Transaction<Postgres> = self.pool.begin().await?;
        let mut written = 0;
        for (date, close) in closes {
            written += sqlx::query(
                r#"
                INSERT INTO daily_closes (symbol, close_date, close)
                VALUES ($1, $2, $3)
                ON CONFLICT (symbol, close_date) DO UPDATE SET close = EXCLUDED.close
                "#,
            )
            .bind(symbol)
            .bind(date)
            .bind(close)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(written)
    }

    /// Loads the closes of `symbols` within `[start, end]` into a `PriceSeries`.
    ///
    /// Symbols with no stored closes simply have no entries.
    pub async fn get_price_series(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT symbol, close_date, close
            FROM daily_closes
            WHERE symbol = ANY($1) AND close_date >= $2 AND close_date <= $3
            ORDER BY symbol, close_date ASC
            "#,
        )
        .bind(symbols)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut series = PriceSeries::new();
        for row in rows {
            let symbol: String = row.try_get("symbol")?;
            series.insert(&symbol, row.try_get("close_date")?, row.try_get("close")?)?;
        }
        Ok(series)
    }

    /// Archives a finished replay: the run row, its ledger in emission order
    /// (`seq`) and its summary, all in one database transaction.
    ///
    /// Nothing is written unless every insert succeeds.
    pub async fn archive_run(
        &self,
        run_id: Uuid,
        parameters: &JsonValue,
        records: &[TransactionRecord],
        summary: &SummaryRecord,
    ) -> Result<(), DbError> {
        let mut tx: Transaction<Postgres> = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO replay_runs (run_id, parameters, created_at) VALUES ($1, $2, NOW())",
        )
        .bind(run_id)
        .bind(parameters)
        .execute(&mut *tx)
        .await?;

        for (seq, record) in (0_i32..).zip(records) {
            sqlx::query(
                r#"
                INSERT INTO replay_transactions (
                    run_id, seq, instrument, action, unit_price, lots, commission, tax,
                    borrow_fee, margin_amount, net_cash_flow, trade_date, sentiment
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(run_id)
            .bind(seq)
            .bind(&record.instrument)
            .bind(record.action.label(LabelLocale::English))
            .bind(record.unit_price)
            .bind(i64::from(record.lots))
            .bind(record.commission)
            .bind(record.tax)
            .bind(record.borrow_fee)
            .bind(record.margin_amount)
            .bind(record.net_cash_flow)
            .bind(record.date)
            .bind(record.sentiment.label(LabelLocale::English))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO replay_summaries (
                run_id, cash, securities_value, margin_debt, net_assets, profit,
                return_rate_pct, maintenance_ratio
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(run_id)
        .bind(summary.cash)
        .bind(summary.securities_value)
        .bind(summary.margin_debt)
        .bind(summary.net_assets)
        .bind(summary.profit)
        .bind(summary.return_rate_pct)
        .bind(summary.maintenance_ratio)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
