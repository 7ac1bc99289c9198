use thiserror::Error;

/// A malformed `OrderRequest`, reported before anything is sent to the exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
