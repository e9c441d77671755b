//! Raw psychological scoring port trait.

use crate::domain::trade::Trade;

/// Black-box provider of raw discipline/tilt scores.
///
/// The pair it returns is uncorrected; the core sanitizes it through
/// [`psychology::correct`](crate::domain::psychology::correct) before
/// anything downstream sees it.
pub trait ScoringPort {
    /// `(raw_discipline, raw_tilt)` for a trade set.
    fn raw_scores(&self, trades: &[Trade]) -> (f64, f64);
}
