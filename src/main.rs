use anyhow::Context;
use api_client::{BinanceClient, ExchangeClient};
use clap::Parser;
use cli::{Action, Cli};
use core_types::OrderRequest;
use executor::{ExecutionSettings, StrategyRunner, SystemClock};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

mod cli;

/// The main entry point for the futures order bot.
#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli.command.into_action()).await {
        tracing::error!(error = %format!("{:#}", e), "Run failed.");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(action: Action) -> anyhow::Result<()> {
    // Reject malformed requests before touching credentials or the network.
    if let Action::Execute(request) = &action {
        request.validate().context("Request rejected")?;
    }

    // A missing .env is fine; credentials may already be in the environment.
    dotenvy::dotenv().ok();

    let config = configuration::load_config().context("Failed to load configuration")?;
    config.validate()?;
    let _log_guard = configuration::init_logging(&config.logging)?;

    let client: Arc<dyn ExchangeClient> = Arc::new(
        BinanceClient::new(&config.exchange, &config.api).context("Failed to build the exchange client")?,
    );
    let runner = StrategyRunner::new(client, Arc::new(SystemClock), ExecutionSettings::from(&config.execution));

    let output = match action {
        Action::Execute(request) => execute(runner, &request).await?,
        Action::Lookup { symbol, order_id } => runner.executor().query_order(&symbol, order_id).await?.into_raw(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Runs one order request, stopping multi-step strategies cleanly on Ctrl-C.
async fn execute(runner: StrategyRunner, request: &OrderRequest) -> anyhow::Result<Value> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping before the next submission.");
            let _ = cancel_tx.send(true);
        }
    });
    let runner = runner.with_cancellation(cancel_rx);

    tracing::info!(request = %serde_json::to_string(request)?, "Order request accepted.");
    let report = runner.execute(request).await?;
    let output = report.to_output();
    tracing::info!(result = %output, "{} executed.", request.order_type());
    Ok(output)
}
