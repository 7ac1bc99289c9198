use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Binance API error {code}: {message}")]
    Exchange { code: i64, message: String },

    #[error("Unexpected HTTP {status} response: {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format: {0}")]
    InvalidData(String),

    #[error("Invalid API credentials: {0}")]
    InvalidCredentials(String),
}

impl ApiError {
    /// The exchange's numeric error code, when the exchange produced one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Exchange { code, .. } => Some(*code),
            _ => None,
        }
    }
}
