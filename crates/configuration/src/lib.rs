use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{ApiKeys, Config, ExchangeConfig, ExecutionConfig, LoggingConfig};

/// The USDⓈ-M futures testnet REST endpoint.
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// Loads the application configuration from `config.toml` (optional) and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from("config.toml")
}

/// Loads the configuration, layering sources from lowest to highest priority:
///
/// 1. Built-in defaults (testnet, 0.001 quantity step, 1s polling).
/// 2. The TOML file at `path`, if it exists.
/// 3. `BOT__<SECTION>__<KEY>` environment variables.
/// 4. `BINANCE_API_KEY` / `BINANCE_API_SECRET` for the credentials.
pub fn load_config_from(path: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("exchange.base_url", TESTNET_BASE_URL)?
        .set_default("exchange.recv_window_ms", 5000_i64)?
        .set_default("api.key", "")?
        .set_default("api.secret", "")?
        .set_default("execution.quantity_step", "0.001")?
        .set_default("execution.poll_interval_ms", 1000_i64)?
        .set_default("execution.expose_partial_report", false)?
        .set_default("logging.level", "info")?
        .set_default("logging.directory", ".")?
        .set_default("logging.file", "bot.log")?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("BOT")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("api.key", std::env::var("BINANCE_API_KEY").ok())?
        .set_override_option("api.secret", std::env::var("BINANCE_API_SECRET").ok())?
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}
