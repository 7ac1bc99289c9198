use crate::enums::{Market, OrderSide, OrderType};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single, immutable trading intent submitted for one run of the bot.
///
/// The fields shared by every order type live on the struct itself, while the
/// type-specific parameters are carried by exactly one `OrderKind` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub market: Market,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    #[serde(flatten)]
    pub kind: OrderKind,
}

/// The type-specific part of an `OrderRequest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum OrderKind {
    Market,
    Limit {
        price: Decimal,
    },
    Stop {
        stop_price: Decimal,
    },
    /// Splits the quantity into `slices` market orders spread over `[start_time, end_time)`.
    Twap {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        slices: u32,
    },
    /// Ladders the quantity into `levels` limit orders between the two prices, inclusive.
    Grid {
        lower_price: Decimal,
        upper_price: Decimal,
        levels: u32,
    },
}

impl OrderKind {
    pub fn order_type(&self) -> OrderType {
        match self {
            OrderKind::Market => OrderType::Market,
            OrderKind::Limit { .. } => OrderType::Limit,
            OrderKind::Stop { .. } => OrderType::Stop,
            OrderKind::Twap { .. } => OrderType::Twap,
            OrderKind::Grid { .. } => OrderType::Grid,
        }
    }
}

impl OrderRequest {
    pub fn new(market: Market, symbol: impl Into<String>, side: OrderSide, quantity: Decimal, kind: OrderKind) -> Self {
        Self {
            market,
            symbol: symbol.into(),
            side,
            quantity,
            kind,
        }
    }

    pub fn order_type(&self) -> OrderType {
        self.kind.order_type()
    }

    /// Checks the request against the rules the exchange-facing core relies on.
    ///
    /// Returns the first violation found. Nothing downstream re-validates these
    /// fields, so every request must pass through here before it is executed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.symbol.trim().is_empty() {
            return Err(ValidationError::invalid("symbol", "must not be empty"));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationError::invalid("qty", "quantity must be greater than 0"));
        }

        match &self.kind {
            OrderKind::Market => {}
            OrderKind::Limit { price } => {
                if *price <= Decimal::ZERO {
                    return Err(ValidationError::invalid(
                        "price",
                        "price must be greater than 0 for LIMIT orders",
                    ));
                }
            }
            OrderKind::Stop { stop_price } => {
                if *stop_price <= Decimal::ZERO {
                    return Err(ValidationError::invalid(
                        "stop_price",
                        "stop price must be greater than 0 for STOP orders",
                    ));
                }
            }
            OrderKind::Twap {
                start_time,
                end_time,
                slices,
            } => {
                if *slices < 1 {
                    return Err(ValidationError::invalid("slices", "slices must be at least 1"));
                }
                if end_time <= start_time {
                    return Err(ValidationError::invalid(
                        "end_time",
                        format!("end time {} must be after start time {}", end_time, start_time),
                    ));
                }
            }
            OrderKind::Grid {
                lower_price,
                upper_price,
                levels,
            } => {
                if *levels < 2 {
                    return Err(ValidationError::invalid(
                        "levels",
                        "levels must be at least 2 to form a grid",
                    ));
                }
                if *lower_price <= Decimal::ZERO {
                    return Err(ValidationError::invalid(
                        "lower_price",
                        "lower price must be greater than 0",
                    ));
                }
                if upper_price <= lower_price {
                    return Err(ValidationError::invalid(
                        "upper_price",
                        format!("upper price {} must be above lower price {}", upper_price, lower_price),
                    ));
                }
            }
        }

        Ok(())
    }
}
