//! CSV trade storage adapter.
//!
//! Reads journal exports with columns
//! `id,symbol,market,side,pnl,trade_date,strategy_id,emotional_state`.
//! Structural problems (unreadable file, bad market, bad date) are storage
//! errors; per-row optional fields degrade to `None` and the raw
//! emotional-state cell is carried as-is for the defensive decode.

use crate::domain::error::JournalError;
use crate::domain::trade::{EmotionalStateRaw, Market, Side, Trade};
use crate::ports::trade_port::TradePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvTradeAdapter {
    path: PathBuf,
}

impl CsvTradeAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn column<'a>(record: &'a csv::StringRecord, idx: usize, name: &str) -> Result<&'a str, JournalError> {
        record.get(idx).ok_or_else(|| JournalError::Storage {
            reason: format!("missing {name} column"),
        })
    }
}

impl TradePort for CsvTradeAdapter {
    fn fetch_trades(&self) -> Result<Vec<Trade>, JournalError> {
        let content = fs::read_to_string(&self.path).map_err(|e| JournalError::Storage {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut trades = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| JournalError::Storage {
                reason: format!("CSV parse error: {}", e),
            })?;

            let id = Self::column(&record, 0, "id")?.to_string();
            let symbol = Self::column(&record, 1, "symbol")?.to_string();

            let market_str = Self::column(&record, 2, "market")?;
            let market = Market::parse(market_str).ok_or_else(|| JournalError::Storage {
                reason: format!("unknown market '{market_str}' for trade {id}"),
            })?;

            // Optional columns: empty or unparseable cells become None.
            let side = Side::parse(Self::column(&record, 3, "side")?);

            let pnl_str = Self::column(&record, 4, "pnl")?;
            let pnl = if pnl_str.is_empty() {
                None
            } else {
                pnl_str.parse::<f64>().ok()
            };

            let date_str = Self::column(&record, 5, "trade_date")?;
            let trade_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                JournalError::Storage {
                    reason: format!("invalid trade_date for trade {id}: {e}"),
                }
            })?;

            let strategy_str = Self::column(&record, 6, "strategy_id")?;
            let strategy_id = if strategy_str.is_empty() {
                None
            } else {
                Some(strategy_str.to_string())
            };

            let state_str = Self::column(&record, 7, "emotional_state")?;
            let emotional_state = if state_str.is_empty() {
                EmotionalStateRaw::default()
            } else {
                EmotionalStateRaw::SingleString(state_str.to_string())
            };

            trades.push(Trade {
                id,
                symbol,
                market,
                side,
                pnl,
                trade_date,
                strategy_id,
                emotional_state,
            });
        }

        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::emotion::{decode_tags, EmotionTag};
    use tempfile::TempDir;

    const HEADER: &str = "id,symbol,market,side,pnl,trade_date,strategy_id,emotional_state\n";

    fn write_csv(rows: &str) -> (TempDir, CsvTradeAdapter) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        fs::write(&path, format!("{HEADER}{rows}")).unwrap();
        let adapter = CsvTradeAdapter::new(path);
        (dir, adapter)
    }

    #[test]
    fn fetch_parses_full_rows() {
        let (_dir, adapter) = write_csv(
            "t1,BTCUSD,crypto,Buy,125.5,2024-03-01,breakout-1,\"[\"\"FOMO\"\",\"\"TILT\"\"]\"\n",
        );
        let trades = adapter.fetch_trades().unwrap();

        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.id, "t1");
        assert_eq!(trade.symbol, "BTCUSD");
        assert_eq!(trade.market, Market::Crypto);
        assert_eq!(trade.side, Some(Side::Buy));
        assert_eq!(trade.pnl, Some(125.5));
        assert_eq!(
            trade.trade_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(trade.strategy_id.as_deref(), Some("breakout-1"));
        assert_eq!(
            decode_tags(trade),
            vec![EmotionTag::Fomo, EmotionTag::Tilt]
        );
    }

    #[test]
    fn empty_optional_cells_become_none() {
        let (_dir, adapter) = write_csv("t1,ETHUSD,crypto,,,2024-03-02,,\n");
        let trades = adapter.fetch_trades().unwrap();

        let trade = &trades[0];
        assert_eq!(trade.side, None);
        assert_eq!(trade.pnl, None);
        assert_eq!(trade.strategy_id, None);
        assert!(decode_tags(trade).is_empty());
    }

    #[test]
    fn bare_tag_cell_is_a_single_string() {
        let (_dir, adapter) = write_csv("t1,ETHUSD,crypto,Sell,-3.2,2024-03-02,,FOMO\n");
        let trades = adapter.fetch_trades().unwrap();
        assert_eq!(
            trades[0].emotional_state,
            EmotionalStateRaw::SingleString("FOMO".into())
        );
        assert_eq!(decode_tags(&trades[0]), vec![EmotionTag::Fomo]);
    }

    #[test]
    fn unknown_market_is_a_storage_error() {
        let (_dir, adapter) = write_csv("t1,ETHUSD,bonds,Buy,1.0,2024-03-02,,\n");
        let err = adapter.fetch_trades().unwrap_err();
        assert!(matches!(err, JournalError::Storage { .. }));
    }

    #[test]
    fn invalid_date_is_a_storage_error() {
        let (_dir, adapter) = write_csv("t1,ETHUSD,crypto,Buy,1.0,03/02/2024,,\n");
        assert!(adapter.fetch_trades().is_err());
    }

    #[test]
    fn missing_file_is_a_storage_error() {
        let adapter = CsvTradeAdapter::new(PathBuf::from("/nonexistent/trades.csv"));
        let err = adapter.fetch_trades().unwrap_err();
        assert!(matches!(err, JournalError::Storage { .. }));
    }

    #[test]
    fn unparseable_pnl_degrades_to_none() {
        let (_dir, adapter) = write_csv("t1,ETHUSD,crypto,Buy,abc,2024-03-02,,\n");
        let trades = adapter.fetch_trades().unwrap();
        assert_eq!(trades[0].pnl, None);
    }
}
