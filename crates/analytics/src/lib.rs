//! # Sentiment Replay Analytics
//!
//! Marks the final portfolio to market and derives the run's summary figures.
//!
//! ## Architectural Principles
//!
//! - **Stateless Calculation:** The `AnalyticsEngine` takes the final portfolio,
//!   the terminal closes and the starting cash, and produces a `SummaryRecord`.
//!   It never sees the ledger or the price history.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The valuation calculator.
//! - `SummaryRecord`: The end-of-run figures.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::SummaryRecord;
