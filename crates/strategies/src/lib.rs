//! # Sentiment Replay Strategy Library
//!
//! Turns a day's sentiment reading into a trading directive. It has no
//! knowledge of prices, cash or holdings; sizing a sell against inventory and
//! checking a buy against cash happen further down the pipeline.
//!
//! ## Public API
//!
//! - `Strategy`: The trait the backtester drives.
//! - `SentimentBands`: The ordered band table (Extreme Fear .. Extreme Greed).
//! - `Directive` / `Intent`: What a strategy asks for on a given day.
//! - `create_strategy`: The factory used by the binary.

// Declare all the modules that constitute this crate.
pub mod error;
pub mod factory;
pub mod sentiment_bands;

// Re-export the key components to create a clean, public-facing API.
pub use error::StrategyError;
pub use factory::create_strategy;
pub use sentiment_bands::SentimentBands;

use core_types::{SentimentBand, SentimentReading};

/// What the strategy wants done with each instrument today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Buy { lots: u32 },
    Hold,
    /// Sell up to `max_lots`; fewer if the inventory is smaller.
    Sell { max_lots: u32 },
}

/// A classified reading together with the intent attached to its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub band: SentimentBand,
    pub intent: Intent,
}

/// The core trait that all trading strategies must implement.
///
/// Evaluation is pure: the same reading always yields the same directive, and
/// the directive applies to every instrument visited on that date.
pub trait Strategy: Send + Sync {
    fn evaluate(&self, reading: &SentimentReading) -> Result<Directive, StrategyError>;
}
