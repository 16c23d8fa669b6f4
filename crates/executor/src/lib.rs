//! # Sentiment Replay Executor Crate
//!
//! Trade costing and portfolio state.
//!
//! ## Architectural Principles
//!
//! - **State vs. Logic Decoupling:** The `Executor` trait is a pure calculator. It
//!   prices an order (notional, commission, tax) into a `Fill` without touching any
//!   account. `PortfolioState` is the state machine that applies a `Fill` to cash and
//!   holdings. Keeping the two apart lets admission control inspect a fill before
//!   anything is committed.
//!
//! ## Public API
//!
//! - `FeeModel`: Commission and transaction tax, rounded to cents.
//! - `Executor` / `SimulatedExecutor`: Turns an `OrderRequest` into a `Fill`.
//! - `PortfolioState`: Cash, lot holdings and margin debt for one run.
//! - `ExecutorError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod exchange;
pub mod fees;
pub mod portfolio;

// Re-export the key components to provide a clean, public-facing API.
pub use error::ExecutorError;
pub use exchange::{Executor, Fill, OrderRequest, SimulatedExecutor};
pub use fees::{FeeBreakdown, FeeModel};
pub use portfolio::PortfolioState;
