use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub exchange: ExchangeConfig,
    pub api: ApiKeys,
    pub execution: ExecutionConfig,
    pub logging: LoggingConfig,
}

/// Where orders are sent.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// REST base URL, the futures testnet unless overridden.
    pub base_url: String,
    /// How long (ms) after `timestamp` the exchange should still accept a signed request.
    pub recv_window_ms: u64,
}

/// API credentials. Populated from `BINANCE_API_KEY` / `BINANCE_API_SECRET`.
#[derive(Clone, Deserialize)]
pub struct ApiKeys {
    pub key: String,
    pub secret: String,
}

// Keep secrets out of logs and panic messages.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("key", &mask(&self.key))
            .field("secret", &"***")
            .finish()
    }
}

fn mask(value: &str) -> String {
    if value.chars().count() <= 4 {
        return "***".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    format!("{}***", prefix)
}

/// Parameters for the strategy engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// Minimum quantity increment the exchange accepts. TWAP slices are floored to it.
    pub quantity_step: Decimal,
    /// Upper bound on a single sleep while waiting for a TWAP slice's target time.
    pub poll_interval_ms: u64,
    /// Attach the orders placed so far to the error when a multi-step run fails.
    pub expose_partial_report: bool,
}

impl ExecutionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG` when set.
    pub level: String,
    /// Directory the log file is written into.
    pub directory: String,
    pub file: String,
}

impl Config {
    /// Rejects settings that would only fail later, mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.key.trim().is_empty() || self.api.secret.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "API credentials missing: set BINANCE_API_KEY and BINANCE_API_SECRET".to_string(),
            ));
        }
        if self.exchange.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("exchange.base_url must not be empty".to_string()));
        }
        if self.exchange.recv_window_ms == 0 {
            return Err(ConfigError::ValidationError("exchange.recv_window_ms must be greater than 0".to_string()));
        }
        if self.execution.quantity_step <= Decimal::ZERO {
            return Err(ConfigError::ValidationError("execution.quantity_step must be greater than 0".to_string()));
        }
        if self.execution.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError("execution.poll_interval_ms must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_config() -> Config {
        Config {
            exchange: ExchangeConfig {
                base_url: "https://testnet.binancefuture.com".to_string(),
                recv_window_ms: 5000,
            },
            api: ApiKeys {
                key: "test-key".to_string(),
                secret: "test-secret".to_string(),
            },
            execution: ExecutionConfig {
                quantity_step: dec!(0.001),
                poll_interval_ms: 1000,
                expose_partial_report: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: ".".to_string(),
                file: "bot.log".to_string(),
            },
        }
    }

    #[test]
    fn accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_missing_credentials() {
        let mut config = valid_config();
        config.api.secret = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(msg)) if msg.contains("BINANCE_API_SECRET")));
    }

    #[test]
    fn rejects_non_positive_step_and_zero_poll() {
        let mut config = valid_config();
        config.execution.quantity_step = Decimal::ZERO;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.execution.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_masks_secrets() {
        let rendered = format!("{:?}", valid_config().api);
        assert!(!rendered.contains("test-secret"));
        assert!(rendered.contains("test***"));
    }
}
