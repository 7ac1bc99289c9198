use crate::auth::signed_query;
use crate::requests::Params;
use async_trait::async_trait;
use configuration::{ApiKeys, ExchangeConfig};
use core_types::{OrderResult, OrderSide, TimeInForce};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use rust_decimal::Decimal;

mod auth;
pub mod error;
pub mod requests;
pub mod responses;
// --- Public API ---
pub use auth::sign_request;
pub use error::ApiError;
pub use responses::ApiErrorResponse;

/// The order-placement capability of a futures exchange.
///
/// This trait is the only thing the strategy engine knows about the exchange,
/// allowing the underlying implementation (live or mock) to be swapped out.
/// Calls are made strictly one at a time.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Places a market order. (Authenticated)
    async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<OrderResult, ApiError>;

    /// Places a limit order resting at `price`. (Authenticated)
    async fn place_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderResult, ApiError>;

    /// Places a stop-market order triggered at `stop_price`. (Authenticated)
    async fn place_stop_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        stop_price: Decimal,
        time_in_force: TimeInForce,
        reduce_only: bool,
    ) -> Result<OrderResult, ApiError>;

    /// Looks up an existing order by its exchange id. (Authenticated)
    async fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, ApiError>;
}

/// A concrete implementation of the `ExchangeClient` for Binance USDⓈ-M futures.
#[derive(Clone)]
pub struct BinanceClient {
    client: reqwest::Client,
    base_url: String,
    api_secret: String,
    recv_window_ms: u64,
}

impl BinanceClient {
    pub fn new(exchange: &ExchangeConfig, keys: &ApiKeys) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let key_header = HeaderValue::from_str(&keys.key)
            .map_err(|_| ApiError::InvalidCredentials("API key contains invalid characters".to_string()))?;
        headers.insert("X-MBX-APIKEY", key_header);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: exchange.base_url.trim_end_matches('/').to_string(),
            api_secret: keys.secret.clone(),
            recv_window_ms: exchange.recv_window_ms,
        })
    }

    /// Signs `params` and sends them as the query string of a `method` request to `path`.
    async fn send_signed(&self, method: Method, path: &str, mut params: Params) -> Result<OrderResult, ApiError> {
        let timestamp = chrono::Utc::now().timestamp_millis();
        let query_string = signed_query(&mut params, &self.api_secret, timestamp, self.recv_window_ms)?;
        let url = format!("{}{}?{}", self.base_url, path, query_string);

        tracing::debug!(%method, path, symbol = params.get("symbol").map(String::as_str), "Sending signed request.");

        let response = self.client.request(method, &url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<serde_json::Value>(&text)
                .map(OrderResult::new)
                .map_err(|e| ApiError::Deserialization(format!("{}. Original text: {}", e, text)))
        } else {
            Err(responses::decode_error(status.as_u16(), &text))
        }
    }
}

const ORDER_PATH: &str = "/fapi/v1/order";

#[async_trait]
impl ExchangeClient for BinanceClient {
    async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<OrderResult, ApiError> {
        self.send_signed(Method::POST, ORDER_PATH, requests::market_order(symbol, side, quantity))
            .await
    }

    async fn place_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderResult, ApiError> {
        let params = requests::limit_order(symbol, side, quantity, price, time_in_force);
        self.send_signed(Method::POST, ORDER_PATH, params).await
    }

    async fn place_stop_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        stop_price: Decimal,
        time_in_force: TimeInForce,
        reduce_only: bool,
    ) -> Result<OrderResult, ApiError> {
        let params = requests::stop_order(symbol, side, quantity, stop_price, time_in_force, reduce_only);
        self.send_signed(Method::POST, ORDER_PATH, params).await
    }

    async fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, ApiError> {
        self.send_signed(Method::GET, ORDER_PATH, requests::order_query(symbol, order_id))
            .await
    }
}
