use crate::report::ExecutionReport;
use api_client::ApiError;
use core_types::OrderType;
use std::fmt;
use thiserror::Error;

/// A single primitive order that the exchange (or the transport) refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmissionError {
    /// The exchange's error code, when the exchange produced one.
    pub code: Option<i64>,
    pub message: String,
}

impl OrderSubmissionError {
    pub(crate) fn local(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for OrderSubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for OrderSubmissionError {}

impl From<ApiError> for OrderSubmissionError {
    fn from(err: ApiError) -> Self {
        let code = err.code();
        let message = match err {
            ApiError::Exchange { message, .. } => message,
            other => other.to_string(),
        };
        Self { code, message }
    }
}

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Order submission failed: {0}")]
    Submission(#[from] OrderSubmissionError),

    #[error("{strategy} step {step} failed after {completed} successful submissions: {source}")]
    StepFailed {
        strategy: OrderType,
        /// 1-indexed position of the failed submission.
        step: usize,
        completed: usize,
        source: OrderSubmissionError,
        /// Orders placed before the failure, if partial reports are enabled.
        partial: Option<ExecutionReport>,
    },

    #[error("{strategy} run cancelled after {completed} submissions")]
    Cancelled {
        strategy: OrderType,
        completed: usize,
        partial: Option<ExecutionReport>,
    },

    #[error("Unsupported order type: {0}")]
    UnsupportedOrderType(String),

    /// The request passed validation but its numbers cannot be turned into orders.
    #[error("Cannot plan execution: {0}")]
    InvalidPlan(String),
}

impl ExecutionError {
    /// Builds the error for a failure at the submission right after everything in `report`.
    pub(crate) fn step_failed(report: ExecutionReport, source: OrderSubmissionError, expose_partial: bool) -> Self {
        let completed = report.len();
        ExecutionError::StepFailed {
            strategy: report.strategy(),
            step: completed + 1,
            completed,
            source,
            partial: expose_partial.then_some(report),
        }
    }

    pub(crate) fn cancelled(report: ExecutionReport, expose_partial: bool) -> Self {
        ExecutionError::Cancelled {
            strategy: report.strategy(),
            completed: report.len(),
            partial: expose_partial.then_some(report),
        }
    }

    /// The orders placed before the run stopped, when they were kept.
    pub fn partial_report(&self) -> Option<&ExecutionReport> {
        match self {
            ExecutionError::StepFailed { partial, .. } | ExecutionError::Cancelled { partial, .. } => partial.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_errors_keep_their_code() {
        let err: OrderSubmissionError = ApiError::Exchange {
            code: -1111,
            message: "Precision is over the maximum defined for this asset.".to_string(),
        }
        .into();

        assert_eq!(err.code, Some(-1111));
        assert_eq!(err.to_string(), "[-1111] Precision is over the maximum defined for this asset.");
    }

    #[test]
    fn transport_errors_have_no_code() {
        let err: OrderSubmissionError = ApiError::UnexpectedResponse {
            status: 503,
            body: "Service Unavailable".to_string(),
        }
        .into();

        assert_eq!(err.code, None);
        assert!(err.message.contains("503"));
    }

    #[test]
    fn step_failed_counts_prior_submissions() {
        let mut report = ExecutionReport::new(OrderType::Grid);
        report.push(serde_json::json!({ "orderId": 1 }).into());
        report.push(serde_json::json!({ "orderId": 2 }).into());

        let err = ExecutionError::step_failed(report, OrderSubmissionError::local("boom"), false);

        match &err {
            ExecutionError::StepFailed { strategy, step, completed, partial, .. } => {
                assert_eq!(*strategy, OrderType::Grid);
                assert_eq!(*step, 3);
                assert_eq!(*completed, 2);
                assert!(partial.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "GRID step 3 failed after 2 successful submissions: boom");
    }
}
