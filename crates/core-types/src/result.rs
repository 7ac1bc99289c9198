use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An order record exactly as the exchange returned it.
///
/// The executor never interprets the contents beyond logging, so the raw JSON
/// is kept and serialized back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderResult(Value);

impl OrderResult {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn order_id(&self) -> Option<i64> {
        self.0.get("orderId").and_then(Value::as_i64)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn into_raw(self) -> Value {
        self.0
    }
}

impl From<Value> for OrderResult {
    fn from(raw: Value) -> Self {
        Self(raw)
    }
}
