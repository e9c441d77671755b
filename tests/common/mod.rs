#![allow(dead_code)]

use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tradelog::domain::error::JournalError;
pub use tradelog::domain::trade::{EmotionalStateRaw, Market, Side, Trade};
use tradelog::ports::config_port::ConfigPort;
use tradelog::ports::location_port::LocationPort;
use tradelog::ports::trade_port::TradePort;

pub struct MockTradePort {
    pub trades: Vec<Trade>,
    pub error: Option<String>,
}

impl MockTradePort {
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            error: None,
        }
    }

    pub fn with_trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl TradePort for MockTradePort {
    fn fetch_trades(&self) -> Result<Vec<Trade>, JournalError> {
        if let Some(reason) = &self.error {
            return Err(JournalError::Storage {
                reason: reason.clone(),
            });
        }
        Ok(self.trades.clone())
    }
}

pub struct MockConfigPort;

impl ConfigPort for MockConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match (section, key) {
            ("storage", "trades_path") => Some("trades.csv".to_string()),
            ("server", "bind") => Some("127.0.0.1:0".to_string()),
            _ => None,
        }
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match (section, key) {
            ("sync", "delay_ms") => 500,
            _ => default,
        }
    }

    fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
        default
    }

    fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
        default
    }
}

/// Location fake that counts writes, for debounce assertions.
pub struct CountingLocation {
    url: Mutex<String>,
    pub writes: AtomicUsize,
}

impl CountingLocation {
    pub fn new(url: &str) -> Self {
        Self {
            url: Mutex::new(url.to_string()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn current(&self) -> String {
        self.url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl LocationPort for CountingLocation {
    fn read(&self) -> Option<String> {
        Some(self.current())
    }

    fn replace(&self, url: &str) {
        *self.url.lock().unwrap_or_else(PoisonError::into_inner) = url.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_trade(id: &str, symbol: &str, pnl: Option<f64>, day: u32) -> Trade {
    Trade {
        id: id.to_string(),
        symbol: symbol.to_string(),
        market: Market::Crypto,
        side: Some(Side::Buy),
        pnl,
        trade_date: date(2024, 3, day),
        strategy_id: Some("s1".to_string()),
        emotional_state: EmotionalStateRaw::default(),
    }
}

pub fn tagged_trade(id: &str, side: Side, tags: &[&str]) -> Trade {
    Trade {
        side: Some(side),
        emotional_state: EmotionalStateRaw::StringArray(
            tags.iter().map(|s| s.to_string()).collect(),
        ),
        ..make_trade(id, "BTCUSD", Some(10.0), 1)
    }
}
