use crate::error::BacktestError;
use chrono::NaiveDate;
use configuration::Config;
use core_types::{
    LedgerSink, PriceSeries, SentimentBand, SentimentReading, TransactionRecord,
};
use executor::{Executor, FeeModel, Fill, PortfolioState, SimulatedExecutor};
use indicatif::{ProgressBar, ProgressStyle};
use risk::{CashAccountRiskManager, Decision, RiskManager};
use rust_decimal::Decimal;
use strategies::Strategy;
use uuid::Uuid;

pub mod error;

/// Counters collected while walking the calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Readings whose date the reference instrument traded on.
    pub dates_walked: usize,
    /// Readings skipped because the reference instrument had no close.
    pub dates_skipped: usize,
    /// (date, instrument) pairs skipped for lack of a close.
    pub prices_missing: usize,
    pub trades_executed: usize,
    pub buys_rejected: usize,
}

/// What a finished replay hands back: the final account and its counters.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub portfolio: PortfolioState,
    pub stats: RunStats,
}

/// The main backtesting engine.
///
/// Walks the sentiment calendar once, in order, visiting the configured
/// instruments in order on every tradeable date. Later trades see the cash and
/// holdings left by earlier ones, so neither order may change.
pub struct Backtester {
    // --- Context ---
    run_id: Uuid,
    instruments: Vec<String>,
    show_progress: bool,
    // --- Components ---
    portfolio: PortfolioState,
    strategy: Box<dyn Strategy>,
    risk_manager: Box<dyn RiskManager>,
    executor: Box<dyn Executor>,
}

impl Backtester {
    /// Constructs a new `Backtester`. The first instrument is the calendar reference.
    pub fn new(
        run_id: Uuid,
        instruments: Vec<String>,
        portfolio: PortfolioState,
        strategy: Box<dyn Strategy>,
        risk_manager: Box<dyn RiskManager>,
        executor: Box<dyn Executor>,
    ) -> Result<Self, BacktestError> {
        if instruments.is_empty() {
            return Err(BacktestError::Configuration(
                "no instruments to trade".to_string(),
            ));
        }
        Ok(Self {
            run_id,
            instruments,
            show_progress: false,
            portfolio,
            strategy,
            risk_manager,
            executor,
        })
    }

    /// Wires up the standard components from a validated configuration.
    pub fn from_config(run_id: Uuid, config: &Config) -> Result<Self, BacktestError> {
        let sim = &config.simulation;
        if sim.starting_cash <= Decimal::ZERO {
            return Err(BacktestError::Configuration(format!(
                "starting cash must be positive, got {}",
                sim.starting_cash
            )));
        }

        let strategy = strategies::create_strategy(config)?;
        let executor = SimulatedExecutor::new(FeeModel::new(&config.fees), sim.lot_size);
        let portfolio = PortfolioState::new(sim.starting_cash, &sim.instruments);

        Self::new(
            run_id,
            sim.instruments.clone(),
            portfolio,
            strategy,
            Box::new(CashAccountRiskManager::new()),
            Box::new(executor),
        )
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn reference_instrument(&self) -> &str {
        &self.instruments[0]
    }

    /// Runs the replay, handing every executed trade to `ledger`.
    ///
    /// Missing prices, unaffordable buys and empty sells are absorbed. Only
    /// component failures (including the ledger's) end the run early.
    pub fn run(
        mut self,
        sentiment: &[SentimentReading],
        prices: &PriceSeries,
        ledger: &mut dyn LedgerSink,
    ) -> Result<RunOutcome, BacktestError> {
        let span = tracing::info_span!("replay", run_id = %self.run_id);
        let _guard = span.enter();
        tracing::info!(
            readings = sentiment.len(),
            instruments = self.instruments.len(),
            reference = self.reference_instrument(),
            "Starting replay"
        );

        let progress_bar = if self.show_progress {
            ProgressBar::new(sentiment.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("=>-"),
        );

        let mut stats = RunStats::default();

        for reading in sentiment {
            progress_bar.inc(1);

            if !prices.has_date(self.reference_instrument(), reading.date) {
                tracing::trace!(date = %reading.date, "Reference instrument did not trade, skipping date");
                stats.dates_skipped += 1;
                continue;
            }
            stats.dates_walked += 1;

            let directive = self.strategy.evaluate(reading)?;

            for instrument in &self.instruments {
                let Some(price) = prices.close(instrument, reading.date) else {
                    tracing::trace!(date = %reading.date, %instrument, "No close, skipping instrument");
                    stats.prices_missing += 1;
                    continue;
                };

                let decision = self.risk_manager.evaluate(
                    directive.intent,
                    instrument,
                    price,
                    &self.portfolio,
                    self.executor.as_ref(),
                )?;

                match decision {
                    Decision::Execute(fill) => {
                        self.portfolio.apply(&fill)?;
                        tracing::debug!(
                            date = %reading.date,
                            %instrument,
                            action = ?fill.action,
                            lots = fill.lots,
                            net = %fill.net_cash_flow(),
                            cash = %self.portfolio.cash(),
                            "Trade executed"
                        );
                        ledger.record(to_record(fill, reading.date, directive.band))?;
                        stats.trades_executed += 1;
                    }
                    Decision::Rejected { required, available } => {
                        tracing::debug!(
                            date = %reading.date,
                            %instrument,
                            %required,
                            %available,
                            "Buy rejected, insufficient cash"
                        );
                        stats.buys_rejected += 1;
                    }
                    Decision::NoAction => {}
                }
            }
        }

        progress_bar.finish_with_message("Replay complete.");
        tracing::info!(
            walked = stats.dates_walked,
            skipped = stats.dates_skipped,
            trades = stats.trades_executed,
            rejected = stats.buys_rejected,
            cash = %self.portfolio.cash(),
            "Replay finished"
        );

        Ok(RunOutcome {
            portfolio: self.portfolio,
            stats,
        })
    }
}

fn to_record(fill: Fill, date: NaiveDate, band: SentimentBand) -> TransactionRecord {
    let net_cash_flow = fill.net_cash_flow();
    TransactionRecord {
        instrument: fill.instrument,
        action: fill.action,
        unit_price: fill.unit_price,
        lots: fill.lots,
        commission: fill.fees.commission,
        tax: fill.fees.tax,
        borrow_fee: Decimal::ZERO,
        margin_amount: Decimal::ZERO,
        net_cash_flow,
        date,
        sentiment: band,
    }
}
