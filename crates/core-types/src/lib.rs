//! # Sentiment Replay Core Types
//!
//! Layer 0 of the workspace. Every other crate speaks in these types: the dated
//! sentiment readings that drive a replay, the close-price table it trades
//! against, and the `TransactionRecord` rows it emits.
//!
//! The `LedgerSink` trait lives here as well so that the engine can emit rows
//! without knowing whether they end up in memory, a CSV file, or the database.

pub mod enums;
pub mod error;
pub mod ledger;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{LabelLocale, SentimentBand, TradeAction};
pub use error::{CoreError, LedgerError};
pub use ledger::{LedgerSink, VecLedger};
pub use structs::{parse_score, Instrument, PriceSeries, SentimentReading, TransactionRecord};
