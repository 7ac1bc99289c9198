//! Builders for the parameter sets of each `/fapi/v1/order` call.

use core_types::{OrderSide, TimeInForce};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub type Params = BTreeMap<&'static str, String>;

/// Formats a decimal without trailing zeros, e.g. `0.0010` -> `0.001`.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn base_order(symbol: &str, side: OrderSide, order_type: &str, quantity: Decimal) -> Params {
    let mut params = BTreeMap::new();
    params.insert("symbol", symbol.to_string());
    params.insert("side", side.as_str().to_string());
    params.insert("type", order_type.to_string());
    params.insert("quantity", format_decimal(quantity));
    params
}

pub fn market_order(symbol: &str, side: OrderSide, quantity: Decimal) -> Params {
    base_order(symbol, side, "MARKET", quantity)
}

pub fn limit_order(
    symbol: &str,
    side: OrderSide,
    quantity: Decimal,
    price: Decimal,
    time_in_force: TimeInForce,
) -> Params {
    let mut params = base_order(symbol, side, "LIMIT", quantity);
    params.insert("price", format_decimal(price));
    params.insert("timeInForce", time_in_force.as_str().to_string());
    params
}

/// A stop-market order: becomes a market order once the mark price crosses `stop_price`.
pub fn stop_order(
    symbol: &str,
    side: OrderSide,
    quantity: Decimal,
    stop_price: Decimal,
    time_in_force: TimeInForce,
    reduce_only: bool,
) -> Params {
    let mut params = base_order(symbol, side, "STOP_MARKET", quantity);
    params.insert("stopPrice", format_decimal(stop_price));
    params.insert("timeInForce", time_in_force.as_str().to_string());
    params.insert("reduceOnly", reduce_only.to_string());
    params
}

pub fn order_query(symbol: &str, order_id: i64) -> Params {
    let mut params = BTreeMap::new();
    params.insert("symbol", symbol.to_string());
    params.insert("orderId", order_id.to_string());
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn market_order_has_no_price_fields() {
        let params = market_order("BTCUSDT", OrderSide::Sell, dec!(0.0010));

        assert_eq!(params["type"], "MARKET");
        assert_eq!(params["side"], "SELL");
        assert_eq!(params["quantity"], "0.001");
        assert!(!params.contains_key("price"));
        assert!(!params.contains_key("timeInForce"));
    }

    #[test]
    fn limit_order_carries_price_and_time_in_force() {
        let params = limit_order("BTCUSDT", OrderSide::Buy, dec!(0.002), dec!(28000.00), TimeInForce::Gtc);

        assert_eq!(params["type"], "LIMIT");
        assert_eq!(params["price"], "28000");
        assert_eq!(params["timeInForce"], "GTC");
    }

    #[test]
    fn stop_order_maps_to_stop_market() {
        let params = stop_order("ETHUSDT", OrderSide::Sell, dec!(1), dec!(1500.5), TimeInForce::Gtc, false);

        assert_eq!(params["type"], "STOP_MARKET");
        assert_eq!(params["stopPrice"], "1500.5");
        assert_eq!(params["reduceOnly"], "false");
        assert!(!params.contains_key("price"));
    }

    #[test]
    fn order_query_uses_order_id() {
        let params = order_query("BTCUSDT", 987654321);
        assert_eq!(params["orderId"], "987654321");
        assert_eq!(params.len(), 2);
    }
}
