//! Trade aggregation: conjunctive filtering plus an explicit sort pass.

use std::cmp::Ordering;

use super::emotion::decode_tags;
use super::filter::{FilterState, SortBy, SortOrder};
use super::trade::Trade;

/// Apply a filter state as a conjunctive predicate, then sort.
///
/// Filtering is stable: survivors keep their input order. Sorting is a
/// distinct stable pass and only runs when `sort_by` is set.
pub fn apply(trades: &[Trade], filters: &FilterState) -> Vec<Trade> {
    let mut result: Vec<Trade> = trades
        .iter()
        .filter(|trade| matches(trade, filters))
        .cloned()
        .collect();
    sort_trades(&mut result, filters);
    result
}

/// Whether a single trade passes every active dimension.
pub fn matches(trade: &Trade, filters: &FilterState) -> bool {
    if let Some(symbol) = &filters.symbol {
        if !trade
            .symbol
            .to_lowercase()
            .contains(&symbol.to_lowercase())
        {
            return false;
        }
    }

    if let Some(market) = filters.market {
        if trade.market != market {
            return false;
        }
    }

    if let Some(from) = filters.date_from {
        if trade.trade_date < from {
            return false;
        }
    }

    if let Some(to) = filters.date_to {
        if trade.trade_date > to {
            return false;
        }
    }

    if let Some(pnl_filter) = filters.pnl_filter {
        if !pnl_filter.matches(trade.pnl) {
            return false;
        }
    }

    if let Some(strategy_id) = &filters.strategy_id {
        if trade.strategy_id.as_deref() != Some(strategy_id.as_str()) {
            return false;
        }
    }

    if let Some(side) = filters.side {
        if trade.side != Some(side) {
            return false;
        }
    }

    // OR within this one dimension: any selected tag on the trade passes.
    if !filters.emotional_states.is_empty() {
        let tags = decode_tags(trade);
        if !filters
            .emotional_states
            .iter()
            .any(|selected| tags.contains(selected))
        {
            return false;
        }
    }

    true
}

/// Stable sort by the requested dimension; ties keep prior order. Absent
/// `sort_order` sorts ascending.
pub fn sort_trades(trades: &mut [Trade], filters: &FilterState) {
    let Some(sort_by) = filters.sort_by else {
        return;
    };
    let descending = filters.sort_order == Some(SortOrder::Desc);

    trades.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare(a: &Trade, b: &Trade, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::TradeDate => a.trade_date.cmp(&b.trade_date),
        SortBy::Symbol => a.symbol.cmp(&b.symbol),
        SortBy::Pnl => compare_pnl(a.pnl, b.pnl),
        SortBy::Market => a.market.as_str().cmp(b.market.as_str()),
        SortBy::Side => side_rank(a).cmp(&side_rank(b)),
    }
}

// Unknown pnl sorts before any known value.
fn compare_pnl(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

fn side_rank(trade: &Trade) -> u8 {
    match trade.side {
        Some(super::trade::Side::Buy) => 0,
        Some(super::trade::Side::Sell) => 1,
        None => 2,
    }
}
