use crate::clock::{CancelSignal, Clock};
use crate::error::ExecutionError;
use crate::grid::{plan_grid, GridPlanner};
use crate::primitive::PrimitiveOrderExecutor;
use crate::report::ExecutionReport;
use crate::twap::{TwapPlan, TwapScheduler};
use api_client::ExchangeClient;
use configuration::ExecutionConfig;
use core_types::{Market, OrderKind, OrderRequest, OrderType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Tunables for the strategy engine.
#[derive(Debug, Clone)]
pub struct ExecutionSettings {
    /// Minimum quantity increment; TWAP slices are floored to it.
    pub quantity_step: Decimal,
    /// Longest single sleep while waiting for a TWAP slice.
    pub poll_interval: Duration,
    /// Keep the orders placed so far on the error when a run stops early.
    pub expose_partial_report: bool,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            quantity_step: dec!(0.001),
            poll_interval: Duration::from_secs(1),
            expose_partial_report: false,
        }
    }
}

impl From<&ExecutionConfig> for ExecutionSettings {
    fn from(config: &ExecutionConfig) -> Self {
        Self {
            quantity_step: config.quantity_step,
            poll_interval: config.poll_interval(),
            expose_partial_report: config.expose_partial_report,
        }
    }
}

/// The single entry point that turns an `OrderRequest` into exchange orders.
pub struct StrategyRunner {
    executor: PrimitiveOrderExecutor,
    clock: Arc<dyn Clock>,
    settings: ExecutionSettings,
    cancel: CancelSignal,
}

impl StrategyRunner {
    pub fn new(client: Arc<dyn ExchangeClient>, clock: Arc<dyn Clock>, settings: ExecutionSettings) -> Self {
        Self {
            executor: PrimitiveOrderExecutor::new(client),
            clock,
            settings,
            cancel: CancelSignal::default(),
        }
    }

    /// Stops multi-step runs before their next submission once `true` is sent on the channel.
    pub fn with_cancellation(mut self, receiver: watch::Receiver<bool>) -> Self {
        self.cancel = CancelSignal::new(receiver);
        self
    }

    pub fn executor(&self) -> &PrimitiveOrderExecutor {
        &self.executor
    }

    /// Executes `request`, dispatching on its order type.
    ///
    /// MARKET, LIMIT and STOP place one order; TWAP and GRID place one per slice/level
    /// and stop at the first rejection. Orders already placed are never cancelled.
    pub async fn execute(&self, request: &OrderRequest) -> Result<ExecutionReport, ExecutionError> {
        let order_type = request.order_type();
        if request.market != Market::Futures {
            return Err(ExecutionError::UnsupportedOrderType(format!(
                "{} orders on the {:?} market",
                order_type, request.market
            )));
        }

        let symbol = request.symbol.as_str();
        let side = request.side;
        let quantity = request.quantity;

        tracing::info!(%order_type, symbol, %side, %quantity, "Executing order request.");

        let report = match &request.kind {
            OrderKind::Market => {
                let result = self.executor.place_market(symbol, side, quantity).await?;
                ExecutionReport::single(OrderType::Market, result)
            }
            OrderKind::Limit { price } => {
                let result = self.executor.place_limit(symbol, side, quantity, *price).await?;
                ExecutionReport::single(OrderType::Limit, result)
            }
            OrderKind::Stop { stop_price } => {
                let result = self.executor.place_stop(symbol, side, quantity, *stop_price).await?;
                ExecutionReport::single(OrderType::Stop, result)
            }
            OrderKind::Twap {
                start_time,
                end_time,
                slices,
            } => {
                let plan = TwapPlan::new(quantity, *start_time, *end_time, *slices, self.settings.quantity_step)?;
                let scheduler = TwapScheduler::new(
                    self.executor.clone(),
                    self.clock.clone(),
                    self.settings.clone(),
                    self.cancel.clone(),
                );
                scheduler.execute(symbol, side, &plan).await?
            }
            OrderKind::Grid {
                lower_price,
                upper_price,
                levels,
            } => {
                let ladder = plan_grid(quantity, *lower_price, *upper_price, *levels)?;
                let planner = GridPlanner::new(
                    self.executor.clone(),
                    self.settings.expose_partial_report,
                    self.cancel.clone(),
                );
                planner.execute(symbol, side, &ladder).await?
            }
        };

        tracing::info!(%order_type, symbol, submitted = report.len(), "Execution complete.");
        Ok(report)
    }
}
