use crate::error::OrderSubmissionError;
use api_client::{ApiError, ExchangeClient};
use core_types::{OrderResult, OrderSide, TimeInForce};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Places single MARKET, LIMIT and STOP orders through an `ExchangeClient`.
///
/// Every call is exactly one submission. Nothing is retried: a rejected order is
/// logged and handed back to the caller as an `OrderSubmissionError`.
#[derive(Clone)]
pub struct PrimitiveOrderExecutor {
    client: Arc<dyn ExchangeClient>,
}

impl PrimitiveOrderExecutor {
    pub fn new(client: Arc<dyn ExchangeClient>) -> Self {
        Self { client }
    }

    pub async fn place_market(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<OrderResult, OrderSubmissionError> {
        ensure_positive("quantity", quantity)?;
        let outcome = self.client.place_market_order(symbol, side, quantity).await;
        log_outcome("MARKET", symbol, side, quantity, None, outcome)
    }

    pub async fn place_limit(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderResult, OrderSubmissionError> {
        ensure_positive("quantity", quantity)?;
        ensure_positive("price", price)?;
        let outcome = self
            .client
            .place_limit_order(symbol, side, quantity, price, TimeInForce::Gtc)
            .await;
        log_outcome("LIMIT", symbol, side, quantity, Some(price), outcome)
    }

    pub async fn place_stop(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        stop_price: Decimal,
    ) -> Result<OrderResult, OrderSubmissionError> {
        ensure_positive("quantity", quantity)?;
        ensure_positive("stop price", stop_price)?;
        let outcome = self
            .client
            .place_stop_order(symbol, side, quantity, stop_price, TimeInForce::Gtc, false)
            .await;
        log_outcome("STOP", symbol, side, quantity, Some(stop_price), outcome)
    }

    /// Fetches the exchange's current view of an order.
    pub async fn query_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, OrderSubmissionError> {
        match self.client.get_order(symbol, order_id).await {
            Ok(result) => {
                tracing::info!(symbol, order_id, status = ?result.status(), "Order lookup succeeded.");
                Ok(result)
            }
            Err(e) => {
                tracing::error!(symbol, order_id, error = %e, "Order lookup failed.");
                Err(e.into())
            }
        }
    }
}

// Upstream validation already guarantees this; a zero here would only be
// rejected by the exchange anyway, so fail without spending a request.
fn ensure_positive(field: &str, value: Decimal) -> Result<(), OrderSubmissionError> {
    if value <= Decimal::ZERO {
        return Err(OrderSubmissionError::local(format!(
            "{} must be greater than 0, got {}",
            field, value
        )));
    }
    Ok(())
}

fn log_outcome(
    order_type: &str,
    symbol: &str,
    side: OrderSide,
    quantity: Decimal,
    price: Option<Decimal>,
    outcome: Result<OrderResult, ApiError>,
) -> Result<OrderResult, OrderSubmissionError> {
    match outcome {
        Ok(result) => {
            tracing::info!(
                order_type,
                symbol,
                %side,
                %quantity,
                price = ?price,
                order_id = ?result.order_id(),
                status = ?result.status(),
                "Order placed."
            );
            Ok(result)
        }
        Err(e) => {
            tracing::error!(order_type, symbol, %side, %quantity, price = ?price, error = %e, "Order rejected.");
            Err(e.into())
        }
    }
}
