//! # Sentiment Replay Database Crate
//!
//! The adapters between the replay and the outside world: PostgreSQL for the
//! sentiment and price history plus the archive of past runs, and flat CSV
//! files for importing data and exporting the ledger and summary.
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: pool setup and schema migrations.
//! - `DbRepository`: all SQL access (readings, closes, and the single-transaction run archive).
//! - `CsvLedger` / `write_summary_csv` / `export_run_csv`: append-only CSV output.
//! - `read_sentiment_csv` / `read_price_csv`: CSV importers.

pub mod connection;
pub mod csv_ledger;
pub mod error;
pub mod import;
pub mod repository;

pub use connection::{connect, connect_to, run_migrations};
pub use csv_ledger::{export_run_csv, write_summary_csv, CsvLedger};
pub use error::DbError;
pub use import::{read_price_csv, read_sentiment_csv};
pub use repository::DbRepository;
