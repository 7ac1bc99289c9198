use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use core_types::{Market, OrderKind, OrderRequest, OrderSide};
use rust_decimal::Decimal;

/// Place orders on the Binance USDⓈ-M futures testnet.
#[derive(Parser)]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Examples:\n  futures-bot market --symbol BTCUSDT --qty 0.001\n  futures-bot limit --symbol BTCUSDT --qty 0.001 --limit-price 28000\n  futures-bot twap -s BTCUSDT -q 0.01 --start-time 2025-01-01T10:00:00Z --end-time 2025-01-01T11:00:00Z -n 10"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Place a MARKET order.
    Market(CommonArgs),
    /// Place a LIMIT order.
    Limit(LimitArgs),
    /// Place a STOP (stop-market) order.
    Stop(StopArgs),
    /// Execute a TWAP (Time Weighted Average Price) order.
    Twap(TwapArgs),
    /// Execute a GRID trading strategy.
    Grid(GridArgs),
    /// Look up an existing order.
    Status(StatusArgs),
}

#[derive(Args)]
pub struct CommonArgs {
    /// Trading pair, e.g. BTCUSDT.
    #[arg(long, short = 's')]
    pub symbol: String,

    /// Order side.
    #[arg(long, default_value = "BUY")]
    pub side: OrderSide,

    /// Quantity to trade.
    #[arg(long, short = 'q')]
    pub qty: Decimal,
}

#[derive(Args)]
pub struct LimitArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Price for the LIMIT order.
    #[arg(long, short = 'l')]
    pub limit_price: Decimal,
}

#[derive(Args)]
pub struct StopArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Trigger price for the STOP order.
    #[arg(long)]
    pub stop_price: Decimal,
}

#[derive(Args)]
pub struct TwapArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// When the first slice is sent (RFC 3339, or naive ISO-8601 taken as UTC).
    #[arg(long, value_parser = parse_timestamp)]
    pub start_time: DateTime<Utc>,

    /// End of the execution window.
    #[arg(long, value_parser = parse_timestamp)]
    pub end_time: DateTime<Utc>,

    /// Number of equal slices.
    #[arg(long, short = 'n')]
    pub slices: u32,
}

#[derive(Args)]
pub struct GridArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Lowest price of the ladder.
    #[arg(long)]
    pub lower_price: Decimal,

    /// Highest price of the ladder.
    #[arg(long)]
    pub upper_price: Decimal,

    /// Number of price levels, including both bounds.
    #[arg(long, short = 'g')]
    pub levels: u32,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Trading pair, e.g. BTCUSDT.
    #[arg(long, short = 's')]
    pub symbol: String,

    /// The exchange order id.
    #[arg(long)]
    pub order_id: i64,
}

/// What a parsed command asks the bot to do.
pub enum Action {
    Execute(OrderRequest),
    Lookup { symbol: String, order_id: i64 },
}

impl Commands {
    pub fn into_action(self) -> Action {
        let (common, kind) = match self {
            Commands::Market(common) => (common, OrderKind::Market),
            Commands::Status(args) => {
                return Action::Lookup {
                    symbol: args.symbol.trim().to_uppercase(),
                    order_id: args.order_id,
                };
            }
            Commands::Limit(args) => (args.common, OrderKind::Limit { price: args.limit_price }),
            Commands::Stop(args) => (args.common, OrderKind::Stop { stop_price: args.stop_price }),
            Commands::Twap(args) => (
                args.common,
                OrderKind::Twap {
                    start_time: args.start_time,
                    end_time: args.end_time,
                    slices: args.slices,
                },
            ),
            Commands::Grid(args) => (
                args.common,
                OrderKind::Grid {
                    lower_price: args.lower_price,
                    upper_price: args.upper_price,
                    levels: args.levels,
                },
            ),
        };

        Action::Execute(OrderRequest::new(
            Market::Futures,
            common.symbol.trim().to_uppercase(),
            common.side,
            common.qty,
            kind,
        ))
    }
}

/// Accepts `2025-01-01T10:00:00Z`, `2025-01-01T10:00:00+02:00` or `2025-01-01T10:00:00` (UTC).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", value, e))
}
