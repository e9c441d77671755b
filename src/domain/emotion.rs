//! Emotion vocabulary and per-tag leaning statistics.
//!
//! For a filtered trade set, each recognized emotion tag is tallied by the
//! side of the trades it appears on, producing a signed "leaning" value:
//! positive means the tag shows up on buys, negative on sells.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::trade::{Side, Trade};

/// Closed vocabulary of recognized emotion tags.
///
/// Tags outside this set are dropped during decode; they never fail a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EmotionTag {
    Fomo,
    Revenge,
    Tilt,
    Patience,
    Discipline,
    Confident,
    Anxious,
    Neutral,
    Greedy,
    Fearful,
}

/// Vocabulary in canonical order. Aggregates are reported in this order.
pub const EMOTION_VOCABULARY: [EmotionTag; 10] = [
    EmotionTag::Fomo,
    EmotionTag::Revenge,
    EmotionTag::Tilt,
    EmotionTag::Patience,
    EmotionTag::Discipline,
    EmotionTag::Confident,
    EmotionTag::Anxious,
    EmotionTag::Neutral,
    EmotionTag::Greedy,
    EmotionTag::Fearful,
];

impl EmotionTag {
    /// Wire form, e.g. `FOMO`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionTag::Fomo => "FOMO",
            EmotionTag::Revenge => "REVENGE",
            EmotionTag::Tilt => "TILT",
            EmotionTag::Patience => "PATIENCE",
            EmotionTag::Discipline => "DISCIPLINE",
            EmotionTag::Confident => "CONFIDENT",
            EmotionTag::Anxious => "ANXIOUS",
            EmotionTag::Neutral => "NEUTRAL",
            EmotionTag::Greedy => "GREEDY",
            EmotionTag::Fearful => "FEARFUL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        EMOTION_VOCABULARY
            .iter()
            .copied()
            .find(|tag| tag.as_str() == value)
    }
}

impl fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional classification of a tag's leaning value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leaning {
    #[serde(rename = "Buy Leaning")]
    BuyLeaning,
    #[serde(rename = "Sell Leaning")]
    SellLeaning,
    Balanced,
}

/// |leaning| must exceed this to classify as directional.
const LEANING_THRESHOLD: f64 = 15.0;

/// Per-tag tallies for one aggregation request. Recomputed fresh each time,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAggregate {
    pub tag: EmotionTag,
    pub buy_count: usize,
    pub sell_count: usize,
    pub null_count: usize,
    pub total_trades: usize,
    pub leaning_value: f64,
    pub leaning: Leaning,
    pub side: Option<Side>,
}

/// Decode a trade's emotional state into vocabulary tags.
///
/// Unrecognized tags are dropped per tag; the trade itself always survives.
pub fn decode_tags(trade: &Trade) -> Vec<EmotionTag> {
    trade
        .emotional_state
        .decode()
        .iter()
        .filter_map(|raw| EmotionTag::parse(raw.trim()))
        .collect()
}

/// Compute per-tag leaning aggregates over a trade set.
///
/// Tags with no occurrences are excluded from the output entirely.
pub fn emotion_leaning(trades: &[Trade]) -> Vec<EmotionAggregate> {
    let mut buy = [0usize; EMOTION_VOCABULARY.len()];
    let mut sell = [0usize; EMOTION_VOCABULARY.len()];
    let mut null = [0usize; EMOTION_VOCABULARY.len()];

    for trade in trades {
        for tag in decode_tags(trade) {
            let idx = EMOTION_VOCABULARY
                .iter()
                .position(|t| *t == tag)
                .unwrap_or(0);
            match trade.side {
                Some(Side::Buy) => buy[idx] += 1,
                Some(Side::Sell) => sell[idx] += 1,
                None => null[idx] += 1,
            }
        }
    }

    let mut aggregates = Vec::new();
    for (idx, tag) in EMOTION_VOCABULARY.iter().enumerate() {
        let total = buy[idx] + sell[idx] + null[idx];
        if total == 0 {
            continue;
        }

        let raw = (buy[idx] as f64 - sell[idx] as f64) / total as f64 * 100.0;
        let leaning_value = raw.clamp(-100.0, 100.0);

        let (leaning, side) = if leaning_value > LEANING_THRESHOLD {
            (Leaning::BuyLeaning, Some(Side::Buy))
        } else if leaning_value < -LEANING_THRESHOLD {
            (Leaning::SellLeaning, Some(Side::Sell))
        } else {
            (Leaning::Balanced, None)
        };

        aggregates.push(EmotionAggregate {
            tag: *tag,
            buy_count: buy[idx],
            sell_count: sell[idx],
            null_count: null[idx],
            total_trades: total,
            leaning_value,
            leaning,
            side,
        });
    }

    aggregates
}
