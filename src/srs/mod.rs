//! Spaced-repetition scheduling core.
//!
//! Everything under this module is pure: "today" is always passed in by the
//! caller, so scheduling decisions are a function of their inputs only.

pub mod classify;
pub mod clock;
pub mod engine;
pub mod record;
pub mod types;

pub use classify::{classify, sort_cards_by_srs, CardClass, SrsBuckets};
pub use engine::{calculate_record_srs, calculate_srs, mastery_level, next_review_date};
pub use record::{StoredVocabularyRecord, VocabularyRecord};
pub use types::{Direction, Judgment, MasteryLevel, SrsState};
