//! Filter state and the per-field descriptor table.
//!
//! `FilterState` is never invalid in flight: invalidity is resolved at the
//! codec boundary, where out-of-domain values are dropped. The
//! [`FilterField`] table carries validation and encode/decode for each of
//! the ten recognized query keys so the URL codec and the analytics API
//! validate identically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::emotion::EmotionTag;
use super::trade::{Market, Side};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Profit/loss constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PnlFilter {
    All,
    Profitable,
    Lossable,
}

impl PnlFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PnlFilter::All => "all",
            PnlFilter::Profitable => "profitable",
            PnlFilter::Lossable => "lossable",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(PnlFilter::All),
            "profitable" => Some(PnlFilter::Profitable),
            "lossable" => Some(PnlFilter::Lossable),
            _ => None,
        }
    }

    /// Whether a trade's pnl satisfies this constraint. An unknown pnl
    /// never satisfies a directional constraint.
    pub fn matches(&self, pnl: Option<f64>) -> bool {
        match self {
            PnlFilter::All => true,
            PnlFilter::Profitable => pnl.is_some_and(|p| p > 0.0),
            PnlFilter::Lossable => pnl.is_some_and(|p| p < 0.0),
        }
    }
}

/// Sort dimension for the aggregator's explicit sort pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    TradeDate,
    Symbol,
    Pnl,
    Market,
    Side,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::TradeDate => "trade_date",
            SortBy::Symbol => "symbol",
            SortBy::Pnl => "pnl",
            SortBy::Market => "market",
            SortBy::Side => "side",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "trade_date" => Some(SortBy::TradeDate),
            "symbol" => Some(SortBy::Symbol),
            "pnl" => Some(SortBy::Pnl),
            "market" => Some(SortBy::Market),
            "side" => Some(SortBy::Side),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Conjunctive trade filter. Absent/empty fields are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub symbol: Option<String>,
    pub market: Option<Market>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub pnl_filter: Option<PnlFilter>,
    pub strategy_id: Option<String>,
    pub side: Option<Side>,
    pub emotional_states: Vec<EmotionTag>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl FilterState {
    /// Reduce to the minimal unambiguous form: empty strings become absent
    /// and duplicate emotion tags collapse, first occurrence wins.
    pub fn canonicalize(mut self) -> Self {
        if self.symbol.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.symbol = None;
        }
        if self
            .strategy_id
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            self.strategy_id = None;
        }
        let mut seen = Vec::new();
        self.emotional_states.retain(|tag| {
            if seen.contains(tag) {
                false
            } else {
                seen.push(*tag);
                true
            }
        });
        self
    }

    /// True when no field constrains anything and no sort is requested.
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| f.encode(self).is_none())
    }
}

/// The ten recognized query keys.
///
/// One table drives both the URL codec and the analytics endpoint, so the
/// two can never drift apart on what they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Symbol,
    Market,
    DateFrom,
    DateTo,
    PnlFilter,
    StrategyId,
    Side,
    EmotionalStates,
    SortBy,
    SortOrder,
}

impl FilterField {
    pub const ALL: [FilterField; 10] = [
        FilterField::Symbol,
        FilterField::Market,
        FilterField::DateFrom,
        FilterField::DateTo,
        FilterField::PnlFilter,
        FilterField::StrategyId,
        FilterField::Side,
        FilterField::EmotionalStates,
        FilterField::SortBy,
        FilterField::SortOrder,
    ];

    /// Exact wire key.
    pub fn key(&self) -> &'static str {
        match self {
            FilterField::Symbol => "symbol",
            FilterField::Market => "market",
            FilterField::DateFrom => "dateFrom",
            FilterField::DateTo => "dateTo",
            FilterField::PnlFilter => "pnlFilter",
            FilterField::StrategyId => "strategyId",
            FilterField::Side => "side",
            FilterField::EmotionalStates => "emotionalStates",
            FilterField::SortBy => "sortBy",
            FilterField::SortOrder => "sortOrder",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        FilterField::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Whether a raw value is acceptable for this field. The empty string
    /// is always acceptable: empty means unconstrained.
    pub fn validate(&self, raw: &str) -> bool {
        if raw.is_empty() {
            return true;
        }
        match self {
            FilterField::Symbol | FilterField::StrategyId => true,
            FilterField::Market => Market::parse(raw).is_some(),
            FilterField::DateFrom | FilterField::DateTo => {
                NaiveDate::parse_from_str(raw, DATE_FORMAT).is_ok()
            }
            FilterField::PnlFilter => PnlFilter::parse(raw).is_some(),
            FilterField::Side => Side::parse(raw).is_some(),
            FilterField::EmotionalStates => raw
                .split(',')
                .any(|segment| EmotionTag::parse(segment.trim()).is_some()),
            FilterField::SortBy => SortBy::parse(raw).is_some(),
            FilterField::SortOrder => SortOrder::parse(raw).is_some(),
        }
    }

    /// Decode a raw value into the filter state. Out-of-domain values leave
    /// the field untouched; this never fails and never guesses a default.
    pub fn decode_into(&self, state: &mut FilterState, raw: &str) {
        if raw.is_empty() {
            return;
        }
        match self {
            FilterField::Symbol => state.symbol = Some(raw.to_string()),
            FilterField::Market => state.market = Market::parse(raw),
            FilterField::DateFrom => {
                state.date_from = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
            }
            FilterField::DateTo => {
                state.date_to = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
            }
            FilterField::PnlFilter => state.pnl_filter = PnlFilter::parse(raw),
            FilterField::StrategyId => state.strategy_id = Some(raw.to_string()),
            FilterField::Side => state.side = Side::parse(raw),
            FilterField::EmotionalStates => {
                // Per-tag validation: invalid segments drop, survivors keep
                // the field alive. Nothing surviving leaves the field absent.
                state.emotional_states = raw
                    .split(',')
                    .filter_map(|segment| EmotionTag::parse(segment.trim()))
                    .collect();
            }
            FilterField::SortBy => state.sort_by = SortBy::parse(raw),
            FilterField::SortOrder => state.sort_order = SortOrder::parse(raw),
        }
    }

    /// Encode the field's current value, `None` when unconstrained.
    pub fn encode(&self, state: &FilterState) -> Option<String> {
        match self {
            FilterField::Symbol => state
                .symbol
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            FilterField::Market => state.market.map(|m| m.as_str().to_string()),
            FilterField::DateFrom => state.date_from.map(|d| d.format(DATE_FORMAT).to_string()),
            FilterField::DateTo => state.date_to.map(|d| d.format(DATE_FORMAT).to_string()),
            FilterField::PnlFilter => state.pnl_filter.map(|p| p.as_str().to_string()),
            FilterField::StrategyId => state
                .strategy_id
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            FilterField::Side => state.side.map(|s| s.as_str().to_string()),
            FilterField::EmotionalStates => {
                if state.emotional_states.is_empty() {
                    None
                } else {
                    Some(
                        state
                            .emotional_states
                            .iter()
                            .map(|t| t.as_str())
                            .collect::<Vec<_>>()
                            .join(","),
                    )
                }
            }
            FilterField::SortBy => state.sort_by.map(|s| s.as_str().to_string()),
            FilterField::SortOrder => state.sort_order.map(|s| s.as_str().to_string()),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
