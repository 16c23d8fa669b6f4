use crate::error::LedgerError;
use crate::structs::TransactionRecord;

/// The side channel through which the engine hands off executed trades.
///
/// Implementations take ownership of each record; the engine keeps nothing.
pub trait LedgerSink {
    fn record(&mut self, record: TransactionRecord) -> Result<(), LedgerError>;
}

/// An in-memory ledger that simply collects every record it receives.
#[derive(Debug, Default, Clone)]
pub struct VecLedger {
    pub records: Vec<TransactionRecord>,
}

impl VecLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }
}

impl LedgerSink for VecLedger {
    fn record(&mut self, record: TransactionRecord) -> Result<(), LedgerError> {
        self.records.push(record);
        Ok(())
    }
}

impl<S: LedgerSink + ?Sized> LedgerSink for &mut S {
    fn record(&mut self, record: TransactionRecord) -> Result<(), LedgerError> {
        (**self).record(record)
    }
}
