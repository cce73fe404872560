use chrono::{DateTime, Days, NaiveDate, Utc};

use super::clock::midnight;
use super::record::VocabularyRecord;
use super::types::{Direction, Judgment, MasteryLevel, SrsState, MAX_EASE, MIN_EASE};

const EASE_BONUS: f64 = 0.1;
const EASE_PENALTY: f64 = 0.2;
/// Interval (days) at which a card counts as mastered.
const MASTERED_INTERVAL: u32 = 21;
/// Upper bound on scheduled intervals so review dates stay representable.
const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Local midnight `interval_days` after `today`.
pub fn next_review_date(interval_days: u32, today: NaiveDate) -> DateTime<Utc> {
    let days = interval_days.min(MAX_INTERVAL_DAYS);
    let date = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(today);
    midnight(date)
}

/// Next scheduling state after one judgment.
///
/// [`Judgment::Other`] returns `state` untouched; `review_count` is not
/// incremented in that case.
pub fn calculate_srs(judgment: Judgment, state: &SrsState, today: NaiveDate) -> SrsState {
    let mut next = *state;
    match judgment {
        Judgment::Got => {
            next.interval = match state.interval {
                0 => 1,
                1 => 3,
                prior => grown_interval(prior, state.ease),
            };
            next.ease = (state.ease + EASE_BONUS).min(MAX_EASE);
        }
        Judgment::Almost => {
            next.interval = 1;
        }
        Judgment::Missed => {
            next.interval = 0;
            next.ease = (state.ease - EASE_PENALTY).max(MIN_EASE);
            next.lapses = state.lapses.saturating_add(1);
        }
        Judgment::Other => return next,
    }
    next.review_count = state.review_count.saturating_add(1);
    next.next_review = Some(next_review_date(next.interval, today));
    next
}

/// Applies `judgment` to one direction of `record`, leaving the other as is.
pub fn calculate_record_srs(
    judgment: Judgment,
    record: &VocabularyRecord,
    direction: Direction,
    today: NaiveDate,
) -> VocabularyRecord {
    let mut updated = record.clone();
    *updated.srs_mut(direction) = calculate_srs(judgment, record.srs(direction), today);
    updated
}

pub fn mastery_level(state: &SrsState) -> MasteryLevel {
    if state.review_count == 0 {
        MasteryLevel::New
    } else if state.interval >= MASTERED_INTERVAL {
        MasteryLevel::Mastered
    } else {
        MasteryLevel::Learning
    }
}

fn grown_interval(prior: u32, ease: f64) -> u32 {
    let grown = (f64::from(prior) * ease).round();
    grown.min(f64::from(MAX_INTERVAL_DAYS)) as u32
}
