use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid valuation configuration: {0}")]
    Configuration(String),

    #[error("No terminal price for {0}, which still has open holdings")]
    MissingTerminalPrice(String),
}
