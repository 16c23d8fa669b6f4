use crate::error::StrategyError;
use crate::sentiment_bands::SentimentBands;
use crate::Strategy;
use configuration::Config;

/// Creates the sentiment strategy described by the `[policy]` section.
pub fn create_strategy(config: &Config) -> Result<Box<dyn Strategy>, StrategyError> {
    let params = config.policy.clone();
    Ok(Box::new(SentimentBands::new(params)?))
}
