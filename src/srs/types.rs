use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EASE: f64 = 2.5;
pub const MIN_EASE: f64 = 1.3;
pub const MAX_EASE: f64 = 3.0;

/// Which recall task a card represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// See the target word, recall its meaning.
    Forward,
    /// See the meaning, produce the target word.
    Reverse,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Reverse];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
        }
    }
}

/// User-reported recall outcome for one review.
///
/// Any string other than the three known judgments deserializes to
/// [`Judgment::Other`], which the engine treats as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Judgment {
    Got,
    Almost,
    Missed,
    Other,
}

impl Judgment {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "got" => Self::Got,
            "almost" => Self::Almost,
            "missed" => Self::Missed,
            _ => Self::Other,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl From<String> for Judgment {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    New,
    Learning,
    Mastered,
}

/// Scheduling state for one card in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsState {
    /// Days until the next review.
    pub interval: u32,
    pub ease: f64,
    pub next_review: Option<DateTime<Utc>>,
    pub review_count: u32,
    pub lapses: u32,
}

impl Default for SrsState {
    fn default() -> Self {
        Self {
            interval: 0,
            ease: DEFAULT_EASE,
            next_review: None,
            review_count: 0,
            lapses: 0,
        }
    }
}

impl SrsState {
    /// Builds a state from possibly-missing or malformed legacy values.
    pub fn from_parts(
        interval: Option<f64>,
        ease: Option<f64>,
        next_review: Option<DateTime<Utc>>,
        review_count: Option<f64>,
        lapses: Option<f64>,
    ) -> Self {
        let ease = match ease {
            Some(e) if e.is_finite() => e.clamp(MIN_EASE, MAX_EASE),
            _ => DEFAULT_EASE,
        };
        Self {
            interval: count_or_zero(interval),
            ease,
            next_review,
            review_count: count_or_zero(review_count),
            lapses: count_or_zero(lapses),
        }
    }
}

fn count_or_zero(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judgment_parses_known_values() {
        assert_eq!(Judgment::parse("got"), Judgment::Got);
        assert_eq!(Judgment::parse("almost"), Judgment::Almost);
        assert_eq!(Judgment::parse("missed"), Judgment::Missed);
        assert_eq!(Judgment::parse("GOT"), Judgment::Other);
        assert_eq!(Judgment::parse(""), Judgment::Other);
    }

    #[test]
    fn unknown_judgment_deserializes_to_other() {
        let j: Judgment = serde_json::from_str("\"skipped\"").unwrap();
        assert_eq!(j, Judgment::Other);
        let j: Judgment = serde_json::from_str("\"missed\"").unwrap();
        assert_eq!(j, Judgment::Missed);
    }

    #[test]
    fn from_parts_defaults_missing_fields() {
        let state = SrsState::from_parts(None, None, None, None, None);
        assert_eq!(state, SrsState::default());
    }

    #[test]
    fn from_parts_repairs_malformed_values() {
        let state = SrsState::from_parts(Some(-4.0), Some(f64::NAN), None, Some(2.6), Some(-1.0));
        assert_eq!(state.interval, 0);
        assert_eq!(state.ease, DEFAULT_EASE);
        assert_eq!(state.review_count, 3);
        assert_eq!(state.lapses, 0);

        let high = SrsState::from_parts(None, Some(9.0), None, None, None);
        assert_eq!(high.ease, MAX_EASE);
        let low = SrsState::from_parts(None, Some(0.5), None, None, None);
        assert_eq!(low.ease, MIN_EASE);
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Reverse).unwrap(), "\"reverse\"");
    }
}
