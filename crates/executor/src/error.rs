use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Not enough cash available to execute trade. Required: {required}, Available: {available}")]
    InsufficientCash { required: String, available: String },

    #[error("Instrument is not part of this portfolio: {0}")]
    UnknownInstrument(String),

    #[error("Invalid quantity for selling {instrument}. Requested: {requested}, Available: {available}")]
    InvalidClosingQuantity {
        instrument: String,
        requested: u32,
        available: u32,
    },

    #[error("Order for {0} has a zero lot quantity")]
    ZeroQuantity(String),

    #[error("Order for {instrument} has a non-positive price: {price}")]
    InvalidPrice { instrument: String, price: String },
}
