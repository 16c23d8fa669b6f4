use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::LabelLocale;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub simulation: Simulation,
    #[serde(default)]
    pub fees: Fees,
    #[serde(default)]
    pub policy: Policy,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

/// Contains parameters for a single replay.
#[derive(Debug, Clone, Deserialize)]
pub struct Simulation {
    /// The cash the portfolio starts with.
    pub starting_cash: Decimal,
    /// Instruments traded each day, in the order they are visited.
    /// The first one is the calendar reference.
    pub instruments: Vec<String>,
    /// First date to load from the sentiment and price stores.
    pub start_date: NaiveDate,
    /// Last date to load (inclusive).
    pub end_date: NaiveDate,
    /// The date whose closes mark the remaining holdings to market.
    pub terminal_date: NaiveDate,
    /// Underlying shares per lot.
    #[serde(default = "default_lot_size")]
    pub lot_size: u32,
}

fn default_lot_size() -> u32 {
    1000
}

/// Brokerage commission and transaction tax rates.
#[derive(Debug, Clone, Deserialize)]
pub struct Fees {
    /// Charged on buys and sells. 0.001425 corresponds to 0.1425%.
    pub commission_rate: Decimal,
    /// Charged on sells only.
    pub tax_rate: Decimal,
}

impl Default for Fees {
    fn default() -> Self {
        Self {
            commission_rate: dec!(0.001425),
            tax_rate: dec!(0.003),
        }
    }
}

/// Lot tiers requested by each sentiment band.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub extreme_fear_buy_lots: u32,
    pub fear_buy_lots: u32,
    pub greed_sell_lots: u32,
    pub extreme_greed_sell_lots: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            extreme_fear_buy_lots: 4,
            fear_buy_lots: 2,
            greed_sell_lots: 2,
            extreme_greed_sell_lots: 4,
        }
    }
}

/// Where ledger and summary rows are appended.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Output {
    pub ledger_path: PathBuf,
    pub summary_path: PathBuf,
    pub locale: LabelLocale,
    /// Also persist the run to the database.
    pub persist_to_database: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("history.csv"),
            summary_path: PathBuf::from("asset_summary.csv"),
            locale: LabelLocale::default(),
            persist_to_database: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}

impl Config {
    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;

        if sim.starting_cash <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "starting_cash must be positive, got {}",
                sim.starting_cash
            )));
        }
        if sim.instruments.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one instrument must be configured".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for instrument in &sim.instruments {
            if instrument.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "instrument symbols must not be blank".to_string(),
                ));
            }
            // Ledger rows are unquoted CSV.
            if instrument.contains([',', '"', '\n', '\r']) {
                return Err(ConfigError::ValidationError(format!(
                    "instrument {:?} contains a CSV delimiter or quote",
                    instrument
                )));
            }
            if !seen.insert(instrument.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "instrument {} is listed more than once",
                    instrument
                )));
            }
        }
        if sim.lot_size == 0 {
            return Err(ConfigError::ValidationError(
                "lot_size must be at least 1".to_string(),
            ));
        }
        if sim.start_date > sim.end_date {
            return Err(ConfigError::ValidationError(format!(
                "start_date {} is after end_date {}",
                sim.start_date, sim.end_date
            )));
        }
        if self.fees.commission_rate.is_sign_negative() || self.fees.tax_rate.is_sign_negative() {
            return Err(ConfigError::ValidationError(
                "fee rates must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}
