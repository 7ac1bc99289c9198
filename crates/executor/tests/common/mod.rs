#![allow(dead_code)]

use api_client::{ApiError, ExchangeClient};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use core_types::{OrderResult, OrderSide, TimeInForce};
use executor::Clock;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, hour, minute, second).unwrap()
}

/// A clock whose `sleep` advances virtual time instantly.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
    cancel_after: Mutex<Option<(usize, watch::Sender<bool>)>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        })
    }

    /// Flips `sender` to `true` at the end of the `n`-th sleep.
    pub fn cancelling_after_sleeps(now: DateTime<Utc>, n: usize, sender: watch::Sender<bool>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(Some((n, sender))),
        })
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        let delta = TimeDelta::from_std(duration).unwrap();
        *self.now.lock().unwrap() += delta;
        let slept = {
            let mut sleeps = self.sleeps.lock().unwrap();
            sleeps.push(duration);
            sleeps.len()
        };
        if let Some((n, sender)) = self.cancel_after.lock().unwrap().as_ref() {
            if slept == *n {
                sender.send(true).unwrap();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub order_type: &'static str,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub time_in_force: Option<TimeInForce>,
    pub reduce_only: Option<bool>,
    pub at: DateTime<Utc>,
}

/// An exchange that records every submission attempt, stamped with the clock's time.
pub struct MockExchange {
    clock: Arc<ManualClock>,
    submissions: Mutex<Vec<Submission>>,
    reject_on: Option<usize>,
    cancel_after: Mutex<Option<(usize, watch::Sender<bool>)>>,
}

impl MockExchange {
    pub fn new(clock: Arc<ManualClock>) -> Arc<Self> {
        Arc::new(Self {
            clock,
            submissions: Mutex::new(Vec::new()),
            reject_on: None,
            cancel_after: Mutex::new(None),
        })
    }

    /// Rejects the `k`-th submission (1-indexed) and accepts all others.
    pub fn rejecting(clock: Arc<ManualClock>, k: usize) -> Arc<Self> {
        Arc::new(Self {
            clock,
            submissions: Mutex::new(Vec::new()),
            reject_on: Some(k),
            cancel_after: Mutex::new(None),
        })
    }

    /// Flips `sender` to `true` right after the `n`-th accepted submission.
    pub fn cancelling_after(clock: Arc<ManualClock>, n: usize, sender: watch::Sender<bool>) -> Arc<Self> {
        Arc::new(Self {
            clock,
            submissions: Mutex::new(Vec::new()),
            reject_on: None,
            cancel_after: Mutex::new(Some((n, sender))),
        })
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &self,
        order_type: &'static str,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Option<Decimal>,
        time_in_force: Option<TimeInForce>,
        reduce_only: Option<bool>,
    ) -> Result<OrderResult, ApiError> {
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(Submission {
            order_type,
            symbol: symbol.to_string(),
            side,
            quantity,
            price,
            time_in_force,
            reduce_only,
            at: self.clock.now(),
        });
        let count = submissions.len();

        if self.reject_on == Some(count) {
            return Err(ApiError::Exchange {
                code: -2019,
                message: "Margin is insufficient.".to_string(),
            });
        }

        if let Some((n, sender)) = self.cancel_after.lock().unwrap().as_ref() {
            if *n == count {
                sender.send(true).unwrap();
            }
        }

        Ok(json!({
            "orderId": count as i64,
            "symbol": symbol,
            "side": side.as_str(),
            "type": order_type,
            "origQty": quantity.to_string(),
            "status": "NEW",
        })
        .into())
    }
}

#[async_trait]
impl ExchangeClient for MockExchange {
    async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<OrderResult, ApiError> {
        self.record("MARKET", symbol, side, quantity, None, None, None)
    }

    async fn place_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        time_in_force: TimeInForce,
    ) -> Result<OrderResult, ApiError> {
        self.record("LIMIT", symbol, side, quantity, Some(price), Some(time_in_force), None)
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
        self.record(
            "STOP_MARKET",
            symbol,
            side,
            quantity,
            Some(stop_price),
            Some(time_in_force),
            Some(reduce_only),
        )
    }

    async fn get_order(&self, symbol: &str, order_id: i64) -> Result<OrderResult, ApiError> {
        Ok(json!({ "orderId": order_id, "symbol": symbol, "status": "FILLED" }).into())
    }
}
