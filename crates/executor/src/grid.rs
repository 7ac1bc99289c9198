use crate::clock::CancelSignal;
use crate::error::ExecutionError;
use crate::primitive::PrimitiveOrderExecutor;
use crate::report::ExecutionReport;
use core_types::{OrderSide, OrderType};
use rust_decimal::Decimal;

/// One rung of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

/// An evenly spaced ladder from `lower_price` to `upper_price`, both inclusive.
///
/// Each level gets `total_quantity / levels`. Unlike TWAP slices, this is not rounded
/// to the exchange's quantity step. Levels are computed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlan {
    lower_price: Decimal,
    step: Decimal,
    quantity: Decimal,
    levels: u32,
}

impl GridPlan {
    pub fn len(&self) -> usize {
        self.levels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.levels == 0
    }

    pub fn level(&self, index: u32) -> GridLevel {
        GridLevel {
            price: self.lower_price + self.step * Decimal::from(index),
            quantity: self.quantity,
        }
    }

    pub fn levels(&self) -> impl Iterator<Item = GridLevel> + '_ {
        (0..self.levels).map(|i| self.level(i))
    }
}

/// Plans `levels` limit orders between the two prices.
///
/// Fails if the top of the ladder does not fit in a `Decimal`; every lower level is then
/// known to fit as well.
pub fn plan_grid(
    total_quantity: Decimal,
    lower_price: Decimal,
    upper_price: Decimal,
    levels: u32,
) -> Result<GridPlan, ExecutionError> {
    let levels = levels.max(2);
    let top_index = Decimal::from(levels - 1);

    let step = upper_price
        .checked_sub(lower_price)
        .and_then(|span| span.checked_div(top_index))
        .filter(|step| {
            step.checked_mul(top_index)
                .and_then(|span| lower_price.checked_add(span))
                .is_some()
        })
        .ok_or_else(|| {
            ExecutionError::InvalidPlan(format!(
                "GRID ladder from {} to {} over {} levels overflows",
                lower_price, upper_price, levels
            ))
        })?;

    Ok(GridPlan {
        lower_price,
        step,
        quantity: total_quantity / Decimal::from(levels),
        levels,
    })
}

/// Submits a grid ladder as limit orders, lowest price first, without pacing.
pub struct GridPlanner {
    executor: PrimitiveOrderExecutor,
    expose_partial_report: bool,
    cancel: CancelSignal,
}

impl GridPlanner {
    pub fn new(executor: PrimitiveOrderExecutor, expose_partial_report: bool, cancel: CancelSignal) -> Self {
        Self {
            executor,
            expose_partial_report,
            cancel,
        }
    }

    pub async fn execute(
        &self,
        symbol: &str,
        side: OrderSide,
        plan: &GridPlan,
    ) -> Result<ExecutionReport, ExecutionError> {
        let total = plan.len();
        let mut report = ExecutionReport::new(OrderType::Grid);

        tracing::info!(
            symbol,
            %side,
            levels = total,
            lowest = %plan.level(0).price,
            highest = %plan.level(plan.levels - 1).price,
            "Starting GRID execution."
        );

        for (index, level) in plan.levels().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::warn!(symbol, completed = report.len(), "GRID execution cancelled.");
                return Err(ExecutionError::cancelled(report, self.expose_partial_report));
            }

            match self.executor.place_limit(symbol, side, level.quantity, level.price).await {
                Ok(result) => {
                    tracing::info!(step = index + 1, total, price = %level.price, order_id = ?result.order_id(), "GRID level placed.");
                    report.push(result);
                }
                Err(source) => {
                    tracing::error!(step = index + 1, total, price = %level.price, error = %source, "GRID level failed, halting.");
                    return Err(ExecutionError::step_failed(report, source, self.expose_partial_report));
                }
            }
        }

        Ok(report)
    }
}
