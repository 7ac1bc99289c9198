use crate::clock::{CancelSignal, Clock};
use crate::error::ExecutionError;
use crate::primitive::PrimitiveOrderExecutor;
use crate::report::ExecutionReport;
use crate::runner::ExecutionSettings;
use chrono::{DateTime, TimeDelta, Utc};
use core_types::{OrderSide, OrderType};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Rounds a quantity down to the exchange's step size.
///
/// The remainder is dropped rather than pushed onto a later slice, so the total
/// executed can fall short of the request by less than one step per slice.
/// Returns `None` if the intermediate quotient overflows `Decimal`.
pub fn round_quantity_to_step_size(quantity: Decimal, step_size: Decimal) -> Option<Decimal> {
    let steps = quantity.checked_div(step_size)?.floor();
    steps.checked_mul(step_size).map(|q| q.normalize())
}

/// The slice size and submission schedule of a TWAP run.
///
/// Target times are derived on demand, so the plan stays small however many slices it has.
#[derive(Debug, Clone, PartialEq)]
pub struct TwapPlan {
    pub slice_quantity: Decimal,
    start: DateTime<Utc>,
    interval_ms: i64,
    slices: u32,
}

impl TwapPlan {
    /// Expects `end > start` and `slices >= 1`, as guaranteed by request validation.
    pub fn new(
        total_quantity: Decimal,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        slices: u32,
        quantity_step: Decimal,
    ) -> Result<Self, ExecutionError> {
        let slices = slices.max(1);
        let interval_ms = (end - start).num_milliseconds() / i64::from(slices);

        let slice_quantity = round_quantity_to_step_size(total_quantity / Decimal::from(slices), quantity_step)
            .ok_or_else(|| {
                ExecutionError::InvalidPlan(format!(
                    "TWAP slice of {} over {} slices cannot be rounded to step {}",
                    total_quantity, slices, quantity_step
                ))
            })?;

        Ok(Self {
            slice_quantity,
            start,
            interval_ms,
            slices,
        })
    }

    pub fn slices(&self) -> usize {
        self.slices as usize
    }

    /// `start + interval * index`.
    pub fn target(&self, index: u32) -> DateTime<Utc> {
        self.start + TimeDelta::milliseconds(self.interval_ms * i64::from(index))
    }

    pub fn targets(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        (0..self.slices).map(|i| self.target(i))
    }
}

/// Submits a TWAP plan as market orders, one slice at a time, each at its target time.
pub struct TwapScheduler {
    executor: PrimitiveOrderExecutor,
    clock: Arc<dyn Clock>,
    settings: ExecutionSettings,
    cancel: CancelSignal,
}

impl TwapScheduler {
    pub fn new(
        executor: PrimitiveOrderExecutor,
        clock: Arc<dyn Clock>,
        settings: ExecutionSettings,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            executor,
            clock,
            settings,
            cancel,
        }
    }

    /// Runs every slice in order and stops at the first rejection.
    ///
    /// Slices whose target time has already passed are submitted immediately.
    pub async fn execute(
        &self,
        symbol: &str,
        side: OrderSide,
        plan: &TwapPlan,
    ) -> Result<ExecutionReport, ExecutionError> {
        let total = plan.slices();
        let mut report = ExecutionReport::new(OrderType::Twap);

        tracing::info!(
            symbol,
            %side,
            slices = total,
            slice_quantity = %plan.slice_quantity,
            first = %plan.target(0).to_rfc3339(),
            "Starting TWAP execution."
        );

        for (index, target) in plan.targets().enumerate() {
            if !self.wait_until(target).await {
                tracing::warn!(symbol, completed = report.len(), "TWAP execution cancelled.");
                return Err(ExecutionError::cancelled(report, self.settings.expose_partial_report));
            }

            match self.executor.place_market(symbol, side, plan.slice_quantity).await {
                Ok(result) => {
                    tracing::info!(step = index + 1, total, order_id = ?result.order_id(), "TWAP slice submitted.");
                    report.push(result);
                }
                Err(source) => {
                    tracing::error!(step = index + 1, total, error = %source, "TWAP slice failed, halting.");
                    return Err(ExecutionError::step_failed(report, source, self.settings.expose_partial_report));
                }
            }
        }

        Ok(report)
    }

    /// Polls the clock until `target`, sleeping at most one poll interval at a time.
    /// Returns `false` if cancellation was requested while waiting.
    async fn wait_until(&self, target: DateTime<Utc>) -> bool {
        loop {
            if self.cancel.is_cancelled() {
                return false;
            }
            let now = self.clock.now();
            if now >= target {
                return true;
            }
            let remaining = (target - now).to_std().unwrap_or_default();
            self.clock.sleep(remaining.min(self.settings.poll_interval)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn rounds_down_to_step() {
        assert_eq!(round_quantity_to_step_size(dec!(0.0019), dec!(0.001)), Some(dec!(0.001)));
        assert_eq!(round_quantity_to_step_size(dec!(0.003), dec!(0.001)), Some(dec!(0.003)));
        assert_eq!(round_quantity_to_step_size(dec!(0.0004), dec!(0.001)), Some(dec!(0)));
    }

    #[test]
    fn even_split_is_exact() {
        let plan = TwapPlan::new(dec!(0.01), start(), start() + TimeDelta::minutes(10), 10, dec!(0.001)).unwrap();

        assert_eq!(plan.slice_quantity, dec!(0.001));
        assert_eq!(plan.slices(), 10);
        assert_eq!(plan.slice_quantity * Decimal::from(10), dec!(0.01));
    }

    #[test]
    fn uneven_split_under_executes_by_less_than_a_step_per_slice() {
        let total = dec!(0.01);
        let plan = TwapPlan::new(total, start(), start() + TimeDelta::minutes(3), 3, dec!(0.001)).unwrap();

        assert_eq!(plan.slice_quantity, dec!(0.003));
        let executed = plan.slice_quantity * Decimal::from(3);
        assert!(executed <= total);
        assert!(total - executed < dec!(0.001) * Decimal::from(3));
    }

    #[test]
    fn targets_are_evenly_spaced_from_start() {
        let plan = TwapPlan::new(dec!(1), start(), start() + TimeDelta::minutes(60), 4, dec!(0.001)).unwrap();

        let expected: Vec<_> = (0..4).map(|i| start() + TimeDelta::minutes(15 * i)).collect();
        assert_eq!(plan.targets().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn single_slice_targets_start() {
        let plan = TwapPlan::new(dec!(0.5), start(), start() + TimeDelta::hours(1), 1, dec!(0.001)).unwrap();

        assert_eq!(plan.targets().collect::<Vec<_>>(), vec![start()]);
        assert_eq!(plan.slice_quantity, dec!(0.5));
    }

    #[test]
    fn rounding_reports_overflow_instead_of_panicking() {
        assert_eq!(round_quantity_to_step_size(Decimal::MAX, dec!(0.001)), None);
    }

    #[test]
    fn oversized_quantity_is_an_invalid_plan() {
        let err = TwapPlan::new(Decimal::MAX, start(), start() + TimeDelta::minutes(1), 1, dec!(0.001)).unwrap_err();

        assert!(matches!(err, ExecutionError::InvalidPlan(_)));
        assert!(err.to_string().contains("step 0.001"));
    }

    #[test]
    fn huge_slice_count_does_not_materialize_targets() {
        let end = start() + TimeDelta::days(365);
        let plan = TwapPlan::new(dec!(1), start(), end, u32::MAX, dec!(0.001)).unwrap();

        assert_eq!(plan.slices(), u32::MAX as usize);
        assert_eq!(plan.slice_quantity, dec!(0));
        assert_eq!(plan.target(0), start());
        assert!(plan.target(u32::MAX - 1) <= end);
    }
}
