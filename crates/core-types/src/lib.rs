pub mod enums;
pub mod error;
pub mod request;
pub mod result;

// Re-export the core types to provide a clean public API.
pub use enums::{Market, OrderSide, OrderType, TimeInForce};
pub use error::ValidationError;
pub use request::{OrderKind, OrderRequest};
pub use result::OrderResult;
