//! # Executor Crate
//!
//! This crate is the order-execution strategy engine. It turns one validated
//! `OrderRequest` into the sequence of primitive exchange orders that carries it out.
//!
//! ## Architectural Principles
//!
//! - **Capability Injection:** The exchange is consumed only through the `ExchangeClient`
//!   trait and time only through the `Clock` trait, so every strategy can be exercised
//!   against an in-memory exchange and a virtual clock.
//! - **Strictly Sequential:** One submission is in flight at a time. Results are recorded
//!   in submission order, so index `i` of a report is slice/level `i`.
//! - **Fail Fast, Never Undo:** The first rejected submission ends a run. Nothing is
//!   retried and orders already placed stay live on the exchange.
//!
//! ## Public API
//!
//! - `StrategyRunner`: Dispatches a request to the right executor.
//! - `PrimitiveOrderExecutor`: Places single MARKET, LIMIT and STOP orders.
//! - `TwapScheduler` / `TwapPlan`: Time-paced, step-rounded market slices.
//! - `GridPlanner` / `plan_grid`: An evenly spaced ladder of limit orders.
//! - `ExecutionReport`, `ExecutionError`, `OrderSubmissionError`.

// Declare the modules that constitute this crate.
pub mod clock;
pub mod error;
pub mod grid;
pub mod primitive;
pub mod report;
pub mod runner;
pub mod twap;

// Re-export the key components to provide a clean, public-facing API.
pub use clock::{CancelSignal, Clock, SystemClock};
pub use error::{ExecutionError, OrderSubmissionError};
pub use grid::{plan_grid, GridLevel, GridPlan, GridPlanner};
pub use primitive::PrimitiveOrderExecutor;
pub use report::ExecutionReport;
pub use runner::{ExecutionSettings, StrategyRunner};
pub use twap::{round_quantity_to_step_size, TwapPlan, TwapScheduler};
