//! Daily review sessions: construction, resumption and progress.

pub mod builder;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::srs::clock::day_string;
use crate::srs::{Direction, Judgment};

pub use builder::{build_daily_session, BuildOptions, SessionOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResults {
    pub got: u32,
    pub almost: u32,
    pub missed: u32,
}

impl SessionResults {
    pub fn total(&self) -> u32 {
        self.got + self.almost + self.missed
    }
}

/// One entry of the day's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCard {
    pub key: String,
    pub direction: Direction,
}

/// The day's review plan for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// `YYYY-MM-DD`; the only day this session is valid for.
    pub date: String,
    pub lang_id: String,
    pub card_keys: Vec<String>,
    /// Parallel to `card_keys`.
    pub card_directions: Vec<Direction>,
    /// Next card to present.
    pub index: usize,
    pub results: SessionResults,
    pub new_cards_used: u32,
}

impl SessionState {
    pub fn empty(date: NaiveDate, lang_id: &str) -> Self {
        Self {
            date: day_string(date),
            lang_id: lang_id.to_string(),
            card_keys: Vec::new(),
            card_directions: Vec::new(),
            index: 0,
            results: SessionResults::default(),
            new_cards_used: 0,
        }
    }

    pub fn is_valid_for(&self, today: NaiveDate, lang_id: &str) -> bool {
        self.date == day_string(today) && self.lang_id == lang_id
    }

    pub fn len(&self) -> usize {
        self.card_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.card_keys.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.card_keys.len()
    }

    pub fn remaining(&self) -> usize {
        self.card_keys.len().saturating_sub(self.index)
    }

    pub fn card_at(&self, position: usize) -> Option<SessionCard> {
        let key = self.card_keys.get(position)?;
        let direction = *self.card_directions.get(position)?;
        Some(SessionCard {
            key: key.clone(),
            direction,
        })
    }

    pub fn current_card(&self) -> Option<SessionCard> {
        self.card_at(self.index)
    }

    pub fn cards(&self) -> impl Iterator<Item = SessionCard> + '_ {
        self.card_keys
            .iter()
            .zip(self.card_directions.iter())
            .map(|(key, direction)| SessionCard {
                key: key.clone(),
                direction: *direction,
            })
    }

    /// Tallies `judgment` against the current card and advances the cursor.
    ///
    /// Returns the judged card, or `None` when the session is already
    /// complete or the judgment is not one of got/almost/missed.
    pub fn record_judgment(&mut self, judgment: Judgment) -> Option<SessionCard> {
        let card = self.current_card()?;
        match judgment {
            Judgment::Got => self.results.got += 1,
            Judgment::Almost => self.results.almost += 1,
            Judgment::Missed => self.results.missed += 1,
            Judgment::Other => return None,
        }
        self.index += 1;
        Some(card)
    }

    pub(crate) fn push(&mut self, key: &str, direction: Direction) {
        self.card_keys.push(key.to_string());
        self.card_directions.push(direction);
    }
}
