use core_types::{OrderResult, OrderType};
use serde::Serialize;
use serde_json::Value;

/// The orders placed for one request, in submission order.
///
/// Index `i` of `results` is slice/level `i` of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionReport {
    strategy: OrderType,
    results: Vec<OrderResult>,
}

impl ExecutionReport {
    pub fn new(strategy: OrderType) -> Self {
        Self {
            strategy,
            results: Vec::new(),
        }
    }

    pub fn single(strategy: OrderType, result: OrderResult) -> Self {
        Self {
            strategy,
            results: vec![result],
        }
    }

    pub(crate) fn push(&mut self, result: OrderResult) {
        self.results.push(result);
    }

    pub fn strategy(&self) -> OrderType {
        self.strategy
    }

    pub fn results(&self) -> &[OrderResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The value printed for the user: the bare exchange record for a single
    /// MARKET/LIMIT/STOP order, an ordered array for TWAP and GRID runs.
    pub fn to_output(&self) -> Value {
        match self.results.as_slice() {
            [only] if self.strategy.is_primitive() => only.raw().clone(),
            results => Value::Array(results.iter().map(|r| r.raw().clone()).collect()),
        }
    }
}
