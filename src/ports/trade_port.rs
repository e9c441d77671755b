//! Trade storage port trait.

use crate::domain::error::JournalError;
use crate::domain::trade::Trade;

/// Read access to the journaled trade set.
///
/// Storage, transport and auth failures propagate to the caller unmodified;
/// this core never retries or masks them.
pub trait TradePort {
    fn fetch_trades(&self) -> Result<Vec<Trade>, JournalError>;
}
