use crate::error::ApiError;
use serde::Deserialize;

/// Represents an error response from the Binance API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub code: i64,
    pub msg: String,
}

/// Turns a non-2xx response body into the most specific `ApiError` available.
pub fn decode_error(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => ApiError::Exchange {
            code: err.code,
            message: err.msg,
        },
        Err(_) => ApiError::UnexpectedResponse {
            status,
            body: body.to_string(),
        },
    }
}
