use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, Utc};

use super::clock::midnight;
use super::record::VocabularyRecord;
use super::types::{Direction, SrsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardClass {
    New,
    Due,
    NotDue,
}

/// Cards of one direction split by review status.
#[derive(Debug, Clone, Default)]
pub struct SrsBuckets<'a> {
    /// Most overdue first.
    pub due: Vec<&'a VocabularyRecord>,
    pub new: Vec<&'a VocabularyRecord>,
    pub not_due: Vec<&'a VocabularyRecord>,
}

impl<'a> SrsBuckets<'a> {
    /// Default presentation order: due, then new, then not-due.
    pub fn ordered(&self) -> Vec<&'a VocabularyRecord> {
        self.due
            .iter()
            .chain(self.new.iter())
            .chain(self.not_due.iter())
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.due.len() + self.new.len() + self.not_due.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn classify(state: &SrsState, now: DateTime<Utc>) -> CardClass {
    if state.review_count == 0 && state.next_review.is_none() {
        return CardClass::New;
    }
    match state.next_review {
        Some(at) if at > now => CardClass::NotDue,
        _ => CardClass::Due,
    }
}

/// Classifies `cards` by their `direction` state against midnight of
/// `today`.
pub fn sort_cards_by_srs(
    cards: &[VocabularyRecord],
    direction: Direction,
    today: NaiveDate,
) -> SrsBuckets<'_> {
    let now = midnight(today);
    let mut buckets = SrsBuckets::default();

    for card in cards {
        match classify(card.srs(direction), now) {
            CardClass::New => buckets.new.push(card),
            CardClass::Due => buckets.due.push(card),
            CardClass::NotDue => buckets.not_due.push(card),
        }
    }

    // sort_by_key is stable, so equally overdue cards keep input order
    buckets
        .due
        .sort_by_key(|card| Reverse(overdue_millis(card.srs(direction), now)));
    buckets
}

fn overdue_millis(state: &SrsState, now: DateTime<Utc>) -> i64 {
    match state.next_review {
        Some(at) => (now - at).num_milliseconds(),
        None => i64::MAX,
    }
}
