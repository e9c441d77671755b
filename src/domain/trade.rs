//! Journal trade representation.
//!
//! Trades are read-only input to this crate: they arrive from a
//! [`TradePort`](crate::ports::trade_port::TradePort) implementation and are
//! filtered and aggregated, never mutated or written back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Market a trade was taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Stock,
    Crypto,
    Forex,
    Futures,
}

impl Market {
    /// Query-string form, e.g. `crypto`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Stock => "stock",
            Market::Crypto => "crypto",
            Market::Forex => "forex",
            Market::Futures => "futures",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stock" => Some(Market::Stock),
            "crypto" => Some(Market::Crypto),
            "forex" => Some(Market::Forex),
            "futures" => Some(Market::Futures),
            _ => None,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Query-string form, capitalized: `Buy` / `Sell`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Buy" => Some(Side::Buy),
            "Sell" => Some(Side::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `emotional_state` payload as it arrives from storage.
///
/// Upstream writers have stored this column as a JSON array, as a bare tag
/// string, and occasionally as junk. The shape is kept explicit so decoding
/// happens in exactly one place instead of ad hoc type checks at each use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmotionalStateRaw {
    StringArray(Vec<String>),
    SingleString(String),
    Malformed,
}

impl EmotionalStateRaw {
    /// Decode to raw tag strings with fallback.
    ///
    /// An array is used as-is. A string is first tried as a JSON array of
    /// strings; failing that the whole string is one tag. `Malformed`
    /// decodes to nothing. Vocabulary filtering happens later, per tag.
    pub fn decode(&self) -> Vec<String> {
        match self {
            EmotionalStateRaw::StringArray(tags) => tags.clone(),
            EmotionalStateRaw::SingleString(s) => {
                match serde_json::from_str::<Vec<String>>(s) {
                    Ok(tags) => tags,
                    Err(_) => vec![s.clone()],
                }
            }
            EmotionalStateRaw::Malformed => Vec::new(),
        }
    }
}

impl Default for EmotionalStateRaw {
    fn default() -> Self {
        EmotionalStateRaw::StringArray(Vec::new())
    }
}

/// One journaled trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    pub market: Market,
    /// `None` on rows where the side column was absent or unreadable.
    pub side: Option<Side>,
    pub pnl: Option<f64>,
    pub trade_date: NaiveDate,
    pub strategy_id: Option<String>,
    pub emotional_state: EmotionalStateRaw,
}
